use anyhow::{Context, Result};
use chrono::SecondsFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use screen_dates::config::DisplayConfig;
use screen_dates::input::TimestampInput;
use screen_dates::logging;
use screen_dates::normalize::normalize;
use screen_dates::relative::RelativeOptions;
use screen_dates::timefmt::TimestampFormatter;

#[derive(Parser)]
#[command(name = "screen-dates")]
#[command(about = "Normalize and format candidate-record timestamps", long_about = None)]
struct Cli {
    /// JSON display config (defaults to $SCREEN_DATES_CONFIG, then built-in defaults)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Also append diagnostics to <DIR>/screen-dates.log
    #[arg(long, global = true, value_name = "DIR")]
    log_dir: Option<PathBuf>,

    /// Debug-level diagnostics
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the canonical UTC instant (RFC 3339, milliseconds)
    Normalize {
        /// Timestamp as JSON (1700000000, {"seconds":1700000000}) or plain text
        input: String,
    },
    /// Format a timestamp with a strftime pattern
    Format {
        /// Timestamp as JSON or plain text
        input: String,
        /// strftime pattern (default from config)
        #[arg(short, long)]
        pattern: Option<String>,
        /// Text shown when the timestamp cannot be formatted
        #[arg(long)]
        fallback: Option<String>,
    },
    /// Describe a timestamp relative to now, e.g. "about 3 hours ago"
    Relative {
        /// Timestamp as JSON or plain text
        input: String,
        /// Add "ago" / "in"
        #[arg(long)]
        suffix: bool,
        /// Finer wording below 90 seconds
        #[arg(long)]
        include_seconds: bool,
        /// Compare against this timestamp instead of now
        #[arg(long)]
        base: Option<String>,
        /// Text shown when the timestamp cannot be formatted
        #[arg(long)]
        fallback: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init_logging(cli.log_dir.as_deref(), cli.verbose)
        .context("Failed to initialize logging")?;

    let config = DisplayConfig::resolve(cli.config.as_deref())?;
    let formatter = TimestampFormatter::new(config);

    let output = match cli.command {
        Commands::Normalize { input } => {
            let instant = TimestampInput::from_json_or_text(&input).and_then(|i| normalize(&i));
            match instant {
                Some(instant) => instant.to_rfc3339_opts(SecondsFormat::Millis, true),
                None => {
                    tracing::debug!(%input, "Input does not resolve to an instant");
                    formatter.config().fallback.clone()
                }
            }
        }
        Commands::Format {
            input,
            pattern,
            fallback,
        } => {
            let pattern = pattern.unwrap_or_else(|| formatter.config().default_pattern.clone());
            let fallback = fallback.unwrap_or_else(|| formatter.config().fallback.clone());
            match TimestampInput::from_json_or_text(&input) {
                Some(input) => {
                    formatter.format_absolute_with_fallback(&input, &pattern, &fallback)
                }
                None => fallback,
            }
        }
        Commands::Relative {
            input,
            suffix,
            include_seconds,
            base,
            fallback,
        } => {
            let fallback = fallback.unwrap_or_else(|| formatter.config().fallback.clone());
            let options = RelativeOptions {
                add_suffix: suffix,
                include_seconds,
                // A base without a timestamp shape stays as text so it fails to
                // normalize instead of silently meaning "now".
                base: base.map(|raw| {
                    TimestampInput::from_json_or_text(&raw)
                        .unwrap_or(TimestampInput::Text(raw))
                }),
            };
            match TimestampInput::from_json_or_text(&input) {
                Some(input) => {
                    formatter.format_relative_with_fallback(&input, &options, &fallback)
                }
                None => fallback,
            }
        }
    };

    println!("{}", output);
    Ok(())
}
