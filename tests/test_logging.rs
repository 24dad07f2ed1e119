use std::sync::Arc;

use screen_dates::config::DisplayConfig;
use screen_dates::logging::{self, LOG_FILE_NAME};
use screen_dates::{TimestampFormatter, TimestampInput, WarnOnce};

#[test]
fn test_rendering_failure_reaches_log_file() -> anyhow::Result<()> {
    let test_dir = tempfile::tempdir()?;
    let log_dir = test_dir.path().join("logs");

    // The default filter lets warnings through; an ambient RUST_LOG might not.
    std::env::set_var("RUST_LOG", "warn");
    logging::init_logging(Some(&log_dir), false)?;

    let formatter =
        TimestampFormatter::with_notifier(DisplayConfig::default(), Arc::new(WarnOnce::new()));
    let input = TimestampInput::from(1_700_000_000_i64);
    assert_eq!(formatter.format_absolute(&input, "%Q"), "-");
    assert_eq!(formatter.format_absolute(&input, "%Q"), "-");

    let contents = std::fs::read_to_string(log_dir.join(LOG_FILE_NAME))?;
    assert!(contents.contains("screen-dates session"), "{}", contents);
    assert_eq!(
        contents.matches("Timestamp rendering failed").count(),
        1,
        "{}",
        contents
    );

    Ok(())
}
