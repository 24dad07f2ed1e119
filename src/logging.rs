/// Diagnostic logging setup.
///
/// Diagnostics go to stderr; when a log directory is given they are also
/// appended to `{log_dir}/screen-dates.log`, one separator per session.
use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use std::io::Write;
use std::path::Path;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_FILE_NAME: &str = "screen-dates.log";

const DEFAULT_FILTER: &str = "warn,screen_dates=info";
const VERBOSE_FILTER: &str = "info,screen_dates=debug";

/// Initializes the global subscriber.
///
/// `RUST_LOG` overrides the default filter. Calling this again after a
/// subscriber is installed is a no-op.
///
/// # Arguments
///
/// * `log_dir` - Optional directory for a persistent log file
/// * `verbose` - Lower the default filter to debug for this crate
pub fn init_logging(log_dir: Option<&Path>, verbose: bool) -> Result<()> {
    let file_layer = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;

            write_session_separator(dir)?;

            let file_appender = tracing_appender::rolling::never(dir, LOG_FILE_NAME);
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true),
            )
        }
        None => None,
    };

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false);

    let default_filter = if verbose {
        VERBOSE_FILTER
    } else {
        DEFAULT_FILTER
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .ok(); // Ignore error if already initialized

    tracing::debug!(log_dir = ?log_dir, "Logging initialized");

    Ok(())
}

fn write_session_separator(dir: &Path) -> Result<()> {
    let path = dir.join(LOG_FILE_NAME);
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    writeln!(
        file,
        "\n{sep}\n[{ts}] screen-dates session\n{sep}",
        sep = "=".repeat(80),
        ts = chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
    )
    .with_context(|| format!("Failed to write log file: {}", path.display()))?;

    Ok(())
}
