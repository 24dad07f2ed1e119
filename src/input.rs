/// Accepted timestamp shapes.
///
/// Candidate records reach us from several places (API payloads, Firestore
/// documents, cached UI state), and each of them spells a point in time a
/// little differently. `TimestampInput` is the closed set of shapes the
/// normalizer understands; `from_json` maps an untyped record field onto it.
use chrono::{DateTime, TimeZone};
use serde_json::Value;
use std::time::SystemTime;

/// A timestamp value in one of the accepted shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum TimestampInput {
    /// An absolute instant, handed over as-is
    Instant(SystemTime),
    /// Epoch number: 10-digit Unix seconds, otherwise milliseconds
    Number(f64),
    /// Numeric string or human-readable date string
    Text(String),
    /// `{epochMs}` or `{value}` record
    Epoch(EpochField),
    /// Firestore-style `{seconds, nanoseconds?}` record
    Seconds(SecondsTimestamp),
}

/// Record carrying its timestamp in a single named field.
#[derive(Debug, Clone, PartialEq)]
pub enum EpochField {
    /// `{epochMs: number}`
    EpochMs(f64),
    /// `{value: number}`
    Number(f64),
    /// `{value: string}`
    Text(String),
}

/// Firestore-style timestamp record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SecondsTimestamp {
    pub seconds: f64,
    pub nanoseconds: Option<f64>,
}

impl SecondsTimestamp {
    pub fn new(seconds: f64) -> Self {
        Self {
            seconds,
            nanoseconds: None,
        }
    }

    pub fn with_nanos(seconds: f64, nanoseconds: f64) -> Self {
        Self {
            seconds,
            nanoseconds: Some(nanoseconds),
        }
    }

    /// Milliseconds since the epoch: `seconds * 1000 + floor(nanoseconds / 1e6)`.
    pub fn to_millis(&self) -> f64 {
        let nanos = self.nanoseconds.unwrap_or(0.0);
        self.seconds * 1000.0 + (nanos / 1_000_000.0).floor()
    }
}

impl TimestampInput {
    /// Map an untyped record value onto an accepted shape.
    ///
    /// Objects are checked in a fixed order: a numeric `epochMs`, then a
    /// numeric or string `value`, then a numeric `seconds` (with optional
    /// numeric `nanoseconds`). Anything else (null, booleans, arrays, objects
    /// with none of those fields) has no timestamp and yields `None`.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_f64().map(Self::Number),
            Value::String(s) => Some(Self::Text(s.clone())),
            Value::Object(fields) => {
                if let Some(ms) = fields.get("epochMs").and_then(Value::as_f64) {
                    return Some(Self::Epoch(EpochField::EpochMs(ms)));
                }

                match fields.get("value") {
                    Some(Value::Number(n)) => {
                        if let Some(v) = n.as_f64() {
                            return Some(Self::Epoch(EpochField::Number(v)));
                        }
                    }
                    Some(Value::String(s)) => {
                        return Some(Self::Epoch(EpochField::Text(s.clone())));
                    }
                    _ => {}
                }

                let seconds = fields.get("seconds").and_then(Value::as_f64)?;
                let nanoseconds = fields.get("nanoseconds").and_then(Value::as_f64);
                Some(Self::Seconds(SecondsTimestamp {
                    seconds,
                    nanoseconds,
                }))
            }
            Value::Null | Value::Bool(_) | Value::Array(_) => None,
        }
    }

    /// Interpret a loosely typed argument: JSON when it parses as JSON,
    /// otherwise the raw text.
    ///
    /// `1700000000` and `{"seconds": 1700000000}` are read as JSON, while
    /// `2023-11-14` or `Nov 14, 2023` fall through to plain text.
    pub fn from_json_or_text(raw: &str) -> Option<Self> {
        match serde_json::from_str::<Value>(raw) {
            Ok(value) => Self::from_json(&value),
            Err(_) => Some(Self::Text(raw.to_string())),
        }
    }
}

impl From<SystemTime> for TimestampInput {
    fn from(t: SystemTime) -> Self {
        Self::Instant(t)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for TimestampInput {
    fn from(dt: DateTime<Tz>) -> Self {
        Self::Instant(dt.into())
    }
}

impl From<f64> for TimestampInput {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for TimestampInput {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<u64> for TimestampInput {
    fn from(n: u64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<i32> for TimestampInput {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<&str> for TimestampInput {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for TimestampInput {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<EpochField> for TimestampInput {
    fn from(field: EpochField) -> Self {
        Self::Epoch(field)
    }
}

impl From<SecondsTimestamp> for TimestampInput {
    fn from(ts: SecondsTimestamp) -> Self {
        Self::Seconds(ts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_scalars() {
        assert_eq!(
            TimestampInput::from_json(&json!(1700000000)),
            Some(TimestampInput::Number(1700000000.0))
        );
        assert_eq!(
            TimestampInput::from_json(&json!("2023-11-14")),
            Some(TimestampInput::Text("2023-11-14".to_string()))
        );
    }

    #[test]
    fn test_from_json_rejects_shapeless_values() {
        assert_eq!(TimestampInput::from_json(&json!(null)), None);
        assert_eq!(TimestampInput::from_json(&json!(true)), None);
        assert_eq!(TimestampInput::from_json(&json!([1700000000])), None);
        assert_eq!(TimestampInput::from_json(&json!({})), None);
        assert_eq!(TimestampInput::from_json(&json!({"seconds": "soon"})), None);
    }

    #[test]
    fn test_object_field_precedence() {
        // epochMs wins over value, value wins over seconds
        let all = json!({"epochMs": 1, "value": 2, "seconds": 3});
        assert_eq!(
            TimestampInput::from_json(&all),
            Some(TimestampInput::Epoch(EpochField::EpochMs(1.0)))
        );

        let value_and_seconds = json!({"value": "2023-11-14", "seconds": 3});
        assert_eq!(
            TimestampInput::from_json(&value_and_seconds),
            Some(TimestampInput::Epoch(EpochField::Text("2023-11-14".into())))
        );

        // a non-numeric epochMs is skipped rather than rejected
        let fallthrough = json!({"epochMs": "x", "seconds": 3, "nanoseconds": 7});
        assert_eq!(
            TimestampInput::from_json(&fallthrough),
            Some(TimestampInput::Seconds(SecondsTimestamp::with_nanos(3.0, 7.0)))
        );
    }

    #[test]
    fn test_non_numeric_nanoseconds_are_dropped() {
        let record = json!({"seconds": 1700000000, "nanoseconds": "500"});
        assert_eq!(
            TimestampInput::from_json(&record),
            Some(TimestampInput::Seconds(SecondsTimestamp::new(1700000000.0)))
        );
    }

    #[test]
    fn test_seconds_to_millis() {
        assert_eq!(
            SecondsTimestamp::with_nanos(1700000000.0, 500_000_000.0).to_millis(),
            1_700_000_000_500.0
        );
        assert_eq!(
            SecondsTimestamp::with_nanos(1.0, 1_999_999.0).to_millis(),
            1001.0
        );
        assert_eq!(SecondsTimestamp::new(2.0).to_millis(), 2000.0);
    }

    #[test]
    fn test_from_json_or_text() {
        assert_eq!(
            TimestampInput::from_json_or_text("1700000000"),
            Some(TimestampInput::Number(1700000000.0))
        );
        assert_eq!(
            TimestampInput::from_json_or_text("Nov 14, 2023"),
            Some(TimestampInput::Text("Nov 14, 2023".into()))
        );
        assert_eq!(TimestampInput::from_json_or_text("null"), None);
    }
}
