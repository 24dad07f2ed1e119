// Library exports for the CLI and tests
pub mod config;
pub mod error;
pub mod input;
pub mod logging;
pub mod normalize;
pub mod relative;
pub mod timefmt;
pub mod warn_once;

pub use input::{EpochField, SecondsTimestamp, TimestampInput};
pub use normalize::{normalize, normalize_json};
pub use relative::RelativeOptions;
pub use timefmt::{
    format_absolute, format_absolute_with_fallback, format_relative,
    format_relative_with_fallback, TimestampFormatter,
};
pub use warn_once::WarnOnce;
