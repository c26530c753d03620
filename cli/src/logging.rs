//! Logging setup for the dispatch CLI.
//!
//! Logs go to stderr so stdout carries nothing but response lines.
//! `RUST_LOG` takes precedence over `--log-level` when set.

use crate::error::CliError;
use std::io;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Default filter when neither `RUST_LOG` nor `--log-level` is given.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Build the filter from `RUST_LOG`, falling back to `level`.
pub fn build_filter(level: &str) -> Result<EnvFilter, CliError> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| CliError::LoggingInit(format!("invalid log filter '{}': {}", level, e)))
}

/// Install the global subscriber.
///
/// # Errors
///
/// Returns error if the filter does not parse or a subscriber is already set
pub fn init_logging(level: &str) -> Result<(), CliError> {
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(false)
        .with_target(false);

    tracing_subscriber::registry()
        .with(build_filter(level)?)
        .with(stderr_layer)
        .try_init()
        .map_err(|e| CliError::LoggingInit(e.to_string()))
}
