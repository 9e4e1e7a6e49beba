//! Logging configuration using tracing
//!
//! stdout belongs to the headless NDJSON stream, so all diagnostics go to a
//! rolling log file.

use std::path::{Path, PathBuf};
use tracing::Subscriber;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Layer};

use crate::error::Result;

/// Environment variable controlling the log filter
pub const LOG_ENV_VAR: &str = "VERPAGER_LOG";

const LOG_FILE_NAME: &str = "verpager.log";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Initialize the logging subsystem
///
/// Logs are written to `~/.local/share/version-pager/logs/`
/// Log level is controlled by `VERPAGER_LOG` environment variable.
///
/// # Examples
/// ```bash
/// VERPAGER_LOG=debug verpager --catalog versions.json --parent 12-42
/// VERPAGER_LOG=verpager_app=trace verpager --catalog versions.json --parent 12-42
/// ```
pub fn init() -> Result<()> {
    let log_dir = get_log_directory()?;
    std::fs::create_dir_all(&log_dir)?;

    let env_filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(default_filter()));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer(&log_dir))
        .init();

    tracing::info!("═══════════════════════════════════════════════════════");
    tracing::info!("Version pager starting");
    tracing::info!("Log directory: {}", log_dir.display());
    tracing::info!("═══════════════════════════════════════════════════════");

    Ok(())
}

/// Plain-text layer writing to a daily rolling file in `log_dir`
fn file_layer<S>(log_dir: &Path) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let appender = RollingFileAppender::new(Rotation::DAILY, log_dir, LOG_FILE_NAME);
    fmt::layer()
        .with_writer(appender)
        .with_ansi(false)
        .with_file(true)
        .with_line_number(true)
        .with_timer(fmt::time::ChronoLocal::new(TIMESTAMP_FORMAT.to_string()))
}

fn default_filter() -> &'static str {
    "version_pager=info,verpager_app=info,verpager_core=info,warn"
}

/// Get the log directory path
fn get_log_directory() -> Result<PathBuf> {
    let base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    Ok(base.join("version-pager").join("logs"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_parses() {
        let filter = EnvFilter::try_new(default_filter());
        assert!(filter.is_ok());
    }

    #[test]
    fn test_log_directory_lives_under_app_dir() {
        let dir = get_log_directory().unwrap();
        assert!(dir.ends_with("version-pager/logs"));
    }
}
