//! Tracing subscriber setup.
//!
//! Events go to stderr so stdout stays free for pipeline output. With
//! `logging.directory` set, a daily rolling file gets a copy as well; the
//! returned [`WorkerGuard`] flushes it and must be kept alive by the caller.

use crate::config::LoggingSettings;
use crate::error::{Result, StreamsError};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// File name prefix of rolling log files.
pub const LOG_FILE_PREFIX: &str = "persona-streams.log";

/// Install the global subscriber.
///
/// `RUST_LOG` wins over `settings.level`. Fails if a global subscriber is
/// already installed.
pub fn init(settings: &LoggingSettings) -> Result<Option<WorkerGuard>> {
    if !settings.enabled {
        return Ok(None);
    }

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .map_err(|e| StreamsError::Logging(format!("Invalid log level '{}': {}", settings.level, e)))?;

    let (file_layer, guard) = match &settings.directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_ansi(false).with_writer(writer)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()
        .map_err(|e| StreamsError::Logging(format!("Failed to install subscriber: {}", e)))?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_disabled_installs_nothing() {
        let settings = LoggingSettings {
            enabled: false,
            ..Default::default()
        };
        assert!(init(&settings).unwrap().is_none());
    }

    #[test]
    #[serial]
    fn test_second_init_fails() {
        let settings = LoggingSettings::default();
        let _ = init(&settings);
        assert!(matches!(init(&settings), Err(StreamsError::Logging(_))));
    }
}
