/// Timestamp normalization
///
/// Turns any accepted `TimestampInput` into a canonical UTC instant with
/// millisecond resolution, or `None` when no valid instant can be derived.
/// Every function here is pure and never panics.
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::input::{EpochField, TimestampInput};

/// Digit count that marks an epoch number as Unix seconds rather than milliseconds.
const SECONDS_DIGITS: usize = 10;

/// Date-times without an offset, read as UTC.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%b %d, %Y %H:%M:%S",
    "%b %d, %Y %H:%M",
    "%B %d, %Y %H:%M:%S",
    "%B %d, %Y %H:%M",
    "%d %b %Y %H:%M:%S",
    "%d %b %Y %H:%M",
    "%d %B %Y %H:%M:%S",
    "%d %B %Y %H:%M",
];

/// Date-only forms, read as UTC midnight.
/// `%b` only takes abbreviations, so every month-name form has a `%B` twin.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%b %d, %Y",
    "%B %d, %Y",
    "%d %b %Y",
    "%d %B %Y",
];

/// Date-times that carry their own offset.
const OFFSET_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    // Browser `Date#toString()`, e.g. "Tue Nov 14 2023 22:13:20 GMT+0530"
    "%a %b %d %Y %H:%M:%S GMT%z",
];

/// Normalize a timestamp input into a canonical instant.
pub fn normalize(input: &TimestampInput) -> Option<DateTime<Utc>> {
    match input {
        TimestampInput::Instant(t) => from_system_time(*t),
        TimestampInput::Number(n) => from_epoch_number(*n),
        TimestampInput::Text(s) => from_text(s),
        TimestampInput::Epoch(EpochField::EpochMs(ms)) => normalize(&TimestampInput::Number(*ms)),
        TimestampInput::Epoch(EpochField::Number(n)) => normalize(&TimestampInput::Number(*n)),
        TimestampInput::Epoch(EpochField::Text(s)) => from_text(s),
        TimestampInput::Seconds(ts) => normalize(&TimestampInput::Number(ts.to_millis())),
    }
}

/// Normalize an untyped record value.
pub fn normalize_json(value: &Value) -> Option<DateTime<Utc>> {
    TimestampInput::from_json(value).and_then(|input| normalize(&input))
}

fn from_system_time(t: SystemTime) -> Option<DateTime<Utc>> {
    let millis = match t.duration_since(UNIX_EPOCH) {
        Ok(after) => i64::try_from(after.as_millis()).ok()?,
        Err(err) => {
            // Round towards negative infinity so sub-millisecond parts truncate like the positive side.
            let before = err.duration();
            let whole = i64::try_from(before.as_millis()).ok()?;
            let partial = i64::from(before.subsec_nanos() % 1_000_000 != 0);
            whole.checked_add(partial)?.checked_neg()?
        }
    };
    from_millis(millis)
}

fn from_epoch_number(n: f64) -> Option<DateTime<Utc>> {
    if !n.is_finite() {
        return None;
    }
    let millis = if is_seconds_repr(&n.to_string()) {
        n * 1000.0
    } else {
        n
    };
    from_millis_f64(millis)
}

fn from_text(s: &str) -> Option<DateTime<Utc>> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }

    if trimmed.bytes().all(|b| b.is_ascii_digit()) {
        let value: f64 = trimmed.parse().ok()?;
        let millis = if is_seconds_repr(trimmed) {
            value * 1000.0
        } else {
            value
        };
        return from_millis_f64(millis);
    }

    parse_date_string(trimmed)
}

/// The seconds-versus-milliseconds rule: exactly ten decimal digits means seconds.
///
/// Millisecond values that happen to have ten digits (1970-01-12 to
/// 1970-04-26) are misread as seconds, and seconds outside 2001-09-09 to
/// 2286-11-20 are misread as milliseconds. Stored records depend on this
/// rule, so it stays as is.
///
/// Unlike a plain length check on the rendered number, a sign or a decimal
/// point disqualifies the value: `-170000000` and `1.23456789` are both ten
/// characters long but are read as milliseconds here.
fn is_seconds_repr(repr: &str) -> bool {
    repr.len() == SECONDS_DIGITS && repr.bytes().all(|b| b.is_ascii_digit())
}

fn from_millis_f64(millis: f64) -> Option<DateTime<Utc>> {
    if !millis.is_finite() {
        return None;
    }
    // Saturating cast; out-of-range values are rejected by chrono below.
    from_millis(millis.trunc() as i64)
}

fn from_millis(millis: i64) -> Option<DateTime<Utc>> {
    match Utc.timestamp_millis_opt(millis) {
        chrono::LocalResult::Single(datetime) => Some(datetime),
        _ => None,
    }
}

/// Truncate to whole milliseconds.
fn canonical(datetime: DateTime<Utc>) -> Option<DateTime<Utc>> {
    from_millis(datetime.timestamp_millis())
}

/// General date-string parsing for anything that is not a bare number.
pub fn parse_date_string(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return canonical(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return canonical(dt.with_timezone(&Utc));
    }

    // Drop a trailing zone name such as " (India Standard Time)"
    let without_zone_name = match s.rfind(" (") {
        Some(pos) if s.ends_with(')') => &s[..pos],
        _ => s,
    };
    for format in OFFSET_DATETIME_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(without_zone_name, format) {
            return canonical(dt.with_timezone(&Utc));
        }
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return canonical(naive.and_utc());
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
        }
    }

    None
}
