//! # Logging Setup
//!
//! Console logging through `tracing-subscriber`, plus an optional
//! daily-rolling log file through `tracing-appender`.
//!
//! `RUST_LOG` takes precedence over `logging.level` when set.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingConfig;

/// Log file name prefix inside `logging.file_dir`
pub const LOG_FILE_PREFIX: &str = "rokoko-bridge.log";

/// Builds the level filter from `RUST_LOG`, falling back to the config level.
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level))
}

/// Install the global subscriber.
///
/// The returned guard flushes the file writer on drop and must be kept alive
/// for the lifetime of the process. It is `None` when file logging is off.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init(config: &LoggingConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let console = fmt::layer().with_target(false);

    if config.file_dir.is_empty() {
        tracing_subscriber::registry()
            .with(env_filter(config))
            .with(console)
            .try_init()?;
        return Ok(None);
    }

    let appender = tracing_appender::rolling::daily(&config.file_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(console)
        .with(fmt::layer().with_ansi(false).with_writer(writer))
        .try_init()?;

    Ok(Some(guard))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_filter_from_config_level() {
        std::env::remove_var("RUST_LOG");
        let config = LoggingConfig {
            level: "debug".to_string(),
            file_dir: String::new(),
        };
        let filter = env_filter(&config);
        assert_eq!(filter.to_string(), "debug");
    }
}
