use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, Utc};
use std::fmt::Write;
use std::sync::Arc;

use crate::config::DisplayConfig;
use crate::error::RenderError;
use crate::input::TimestampInput;
use crate::normalize::normalize;
use crate::relative::{distance_in_words, RelativeOptions};
use crate::warn_once::{process_notifier, WarnOnce};

/// Formats timestamps for display, never failing towards the caller.
///
/// Inputs that do not normalize produce the fallback string. Rendering
/// failures also produce the fallback, and the first one is logged through
/// the formatter's `WarnOnce`.
#[derive(Debug, Clone)]
pub struct TimestampFormatter {
    config: DisplayConfig,
    zone: FixedOffset,
    notifier: Arc<WarnOnce>,
}

impl Default for TimestampFormatter {
    fn default() -> Self {
        Self::new(DisplayConfig::default())
    }
}

impl TimestampFormatter {
    /// Formatter reporting through the process-wide notifier.
    pub fn new(config: DisplayConfig) -> Self {
        Self::with_notifier(config, process_notifier())
    }

    pub fn with_notifier(config: DisplayConfig, notifier: Arc<WarnOnce>) -> Self {
        let zone = config.display_zone();
        Self {
            config,
            zone,
            notifier,
        }
    }

    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    pub fn notifier(&self) -> &WarnOnce {
        &self.notifier
    }

    /// Format with the configured default pattern and fallback.
    pub fn format_default(&self, input: &TimestampInput) -> String {
        self.format_absolute_with_fallback(
            input,
            &self.config.default_pattern,
            &self.config.fallback,
        )
    }

    pub fn format_absolute(&self, input: &TimestampInput, pattern: &str) -> String {
        self.format_absolute_with_fallback(input, pattern, &self.config.fallback)
    }

    pub fn format_absolute_with_fallback(
        &self,
        input: &TimestampInput,
        pattern: &str,
        fallback: &str,
    ) -> String {
        let Some(instant) = normalize(input) else {
            return fallback.to_string();
        };
        match render_absolute(instant, pattern, self.zone) {
            Ok(text) => text,
            Err(err) => {
                self.report("format_absolute", &err);
                fallback.to_string()
            }
        }
    }

    pub fn format_relative(&self, input: &TimestampInput, options: &RelativeOptions) -> String {
        self.format_relative_with_fallback(input, options, &self.config.fallback)
    }

    pub fn format_relative_with_fallback(
        &self,
        input: &TimestampInput,
        options: &RelativeOptions,
        fallback: &str,
    ) -> String {
        let Some(instant) = normalize(input) else {
            return fallback.to_string();
        };
        match render_relative(instant, options) {
            Ok(text) => text,
            Err(err) => {
                self.report("format_relative", &err);
                fallback.to_string()
            }
        }
    }

    fn report(&self, operation: &'static str, err: &RenderError) {
        if self.notifier.mark_warned() {
            tracing::warn!(
                operation,
                error = %err,
                "Timestamp rendering failed, showing fallback; further failures will not be logged"
            );
        }
    }
}

/// Render `instant` in `zone` using a `strftime` pattern.
pub fn render_absolute(
    instant: DateTime<Utc>,
    pattern: &str,
    zone: FixedOffset,
) -> Result<String, RenderError> {
    let items: Vec<Item<'_>> = StrftimeItems::new(pattern).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return Err(RenderError::InvalidPattern(pattern.to_string()));
    }

    let mut text = String::new();
    write!(
        text,
        "{}",
        instant.with_timezone(&zone).format_with_items(items.iter())
    )?;
    Ok(text)
}

/// Render the distance between `instant` and the options' base (or now).
pub fn render_relative(
    instant: DateTime<Utc>,
    options: &RelativeOptions,
) -> Result<String, RenderError> {
    let base = match &options.base {
        Some(base) => normalize(base).ok_or(RenderError::InvalidBase)?,
        None => Utc::now(),
    };
    Ok(distance_in_words(instant, base, options))
}

/// Format with the default display settings, `-` when the input has no valid instant.
pub fn format_absolute(input: &TimestampInput, pattern: &str) -> String {
    TimestampFormatter::default().format_absolute(input, pattern)
}

pub fn format_absolute_with_fallback(
    input: &TimestampInput,
    pattern: &str,
    fallback: &str,
) -> String {
    TimestampFormatter::default().format_absolute_with_fallback(input, pattern, fallback)
}

/// Relative wording with the default display settings, `-` when the input has no valid instant.
pub fn format_relative(input: &TimestampInput, options: &RelativeOptions) -> String {
    TimestampFormatter::default().format_relative(input, options)
}

pub fn format_relative_with_fallback(
    input: &TimestampInput,
    options: &RelativeOptions,
    fallback: &str,
) -> String {
    TimestampFormatter::default().format_relative_with_fallback(input, options, fallback)
}
