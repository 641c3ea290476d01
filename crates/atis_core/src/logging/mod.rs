//! Logging infrastructure for the ATIS composer.
//!
//! This module provides:
//! - Global `tracing` subscriber setup honouring `RUST_LOG`
//! - Per-session loggers with file + callback dual output
//! - A tail of recent rejected edits for inline review
//!
//! # Example
//!
//! ```no_run
//! use atis_core::logging::{SessionLogger, LogConfig};
//!
//! let logger = SessionLogger::new("ksea", "/path/to/logs", LogConfig::default(), None).unwrap();
//! logger.section("Session");
//! logger.accepted("airport", "KSEA");
//! logger.rejected("wind_gust", "gust 10 must exceed velocity 12");
//! ```

mod session_logger;
mod types;

pub use session_logger::SessionLogger;
pub(crate) use session_logger::sanitize_filename;
pub use types::{LogCallback, LogConfig, LogLevel, MessagePrefix};

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize global tracing subscriber for application-wide logging.
///
/// Respects `RUST_LOG`, falling back to `default_level`. Output goes to
/// stderr so stdout stays free for transcripts. Call once at startup.
pub fn init_tracing(default_level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_to_filter_str(default_level)));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false),
        )
        .with(filter)
        .init();
}

/// Initialize tracing for tests (only logs warnings and above).
#[cfg(test)]
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
}

fn level_to_filter_str(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Trace => "trace",
        LogLevel::Debug => "debug",
        LogLevel::Info => "info",
        LogLevel::Warn => "warn",
        LogLevel::Error => "error",
    }
}
