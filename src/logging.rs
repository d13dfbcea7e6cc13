//! Tracing setup. The terminal belongs to the UI, so logs go to a daily
//! rolling file instead of stderr.

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::{LoggingSettings, default_log_dir};

const LOG_FILE_PREFIX: &str = "trackdeck.log";
const DEFAULT_FILTER: &str = "info,trackdeck=debug";

/// Where log files end up for the given settings.
pub fn log_dir(settings: &LoggingSettings) -> PathBuf {
    settings
        .directory
        .clone()
        .or_else(default_log_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Install the global subscriber. Keep the returned guard alive for the
/// lifetime of the program or buffered lines are lost on exit.
pub fn init(settings: &LoggingSettings) -> Result<WorkerGuard, Box<dyn std::error::Error>> {
    let dir = log_dir(settings);
    std::fs::create_dir_all(&dir)?;

    let guard = init_in(&dir)?;
    tracing::info!(dir = %dir.display(), "logging initialised");
    Ok(guard)
}

fn init_in(dir: &Path) -> Result<WorkerGuard, Box<dyn std::error::Error>> {
    let file_appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let subscriber = tracing_subscriber::fmt()
        .with_writer(writer)
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .with_env_filter(filter)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_dir_prefers_configured_directory() {
        let settings = LoggingSettings {
            directory: Some(PathBuf::from("/tmp/trackdeck-logs")),
        };
        assert_eq!(log_dir(&settings), PathBuf::from("/tmp/trackdeck-logs"));
    }
}
