//! # Logging Setup
//!
//! Console logging through `tracing-subscriber`, optionally mirrored into daily
//! rolling files through `tracing-appender`.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LoggingConfig;

/// File name prefix for rolling log files
pub const LOG_FILE_NAME: &str = "ins-link.log";

/// Build the filter: `RUST_LOG` wins over the configured level
pub fn build_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level))
}

/// Initialize the global subscriber
///
/// Returns the file writer guard when file logging is enabled; keep it alive
/// for the lifetime of the program so buffered lines are flushed on exit.
pub fn init_logging(config: &LoggingConfig) -> Option<WorkerGuard> {
    let (file_layer, guard) = match config.file_dir.as_deref() {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_NAME);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(fmt::layer().with_writer(writer).with_ansi(false)), Some(guard))
        }
        None => (None, None),
    };

    // A subscriber may already be installed (tests, embedding programs)
    let _ = tracing_subscriber::registry()
        .with(build_filter(config))
        .with(fmt::layer())
        .with(file_layer)
        .try_init();

    guard
}
