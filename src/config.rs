use anyhow::{Context, Result};
use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

pub const ENV_CONFIG_PATH: &str = "SCREEN_DATES_CONFIG";
pub const ENV_FALLBACK: &str = "SCREEN_DATES_FALLBACK";
pub const ENV_PATTERN: &str = "SCREEN_DATES_PATTERN";
pub const ENV_UTC_OFFSET: &str = "SCREEN_DATES_UTC_OFFSET";

/// India Standard Time, UTC+05:30
const IST_OFFSET_MINUTES: i32 = 330;

/// Display settings shared by the formatters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Shown in place of timestamps that cannot be normalized or rendered
    pub fallback: String,
    /// `strftime` pattern used when the caller does not pass one
    pub default_pattern: String,
    /// Offset of the zone absolute timestamps are shown in
    pub utc_offset_minutes: i32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            fallback: "-".to_string(),
            default_pattern: "%d %b %Y, %I:%M %p".to_string(),
            utc_offset_minutes: IST_OFFSET_MINUTES,
        }
    }
}

impl DisplayConfig {
    /// Load settings from a JSON file. Missing fields keep their defaults.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: DisplayConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON from: {}", path.display()))?;

        Ok(config)
    }

    /// Resolve settings: explicit path, then `SCREEN_DATES_CONFIG`, then
    /// defaults, with environment overrides applied on top.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| env::var_os(ENV_CONFIG_PATH).map(PathBuf::from));

        let mut config = match path {
            Some(path) => Self::load_from_file(&path)?,
            None => Self::default(),
        };
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    /// Apply overrides from any key lookup.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(fallback) = lookup(ENV_FALLBACK) {
            self.fallback = fallback;
        }
        if let Some(pattern) = lookup(ENV_PATTERN).filter(|p| !p.trim().is_empty()) {
            self.default_pattern = pattern;
        }
        if let Some(raw) = lookup(ENV_UTC_OFFSET) {
            match raw.trim().parse::<i32>() {
                Ok(minutes) => self.utc_offset_minutes = minutes,
                Err(_) => tracing::warn!(
                    value = %raw,
                    "Ignoring {}: expected whole minutes east of UTC",
                    ENV_UTC_OFFSET
                ),
            }
        }
    }

    /// Zone used for absolute formatting. Falls back to UTC when the offset
    /// is a day or more.
    pub fn display_zone(&self) -> FixedOffset {
        let zone = self
            .utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt);

        match zone {
            Some(zone) => zone,
            None => {
                tracing::warn!(
                    offset_minutes = self.utc_offset_minutes,
                    "UTC offset out of range, showing timestamps in UTC"
                );
                Utc.fix()
            }
        }
    }
}
