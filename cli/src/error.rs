//! CLI error handling with user-friendly messages.

use atc_dispatch_core::ConfigError;
use std::fmt;
use std::process;

/// CLI-specific errors.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Table configuration rejected
    Config(ConfigError),
    /// Failed to open the request file
    Input { path: String, error: std::io::Error },
    /// Failed while reading requests or writing responses
    Io(std::io::Error),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        if let CliError::Config(_) = self {
            eprintln!();
            eprintln!("Table names come from --aircraft-table / --priority-table / --airport-table");
            eprintln!("or AIRCRAFT_TABLE_NAME / PRIORITY_AIRCRAFT_TABLE_NAME / AIRPORT_QUEUE_TABLE_NAME.");
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::Input { path, error } => write!(f, "Failed to open '{}': {}", path, error),
            CliError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::Input { error, .. } => Some(error),
            CliError::Io(e) => Some(e),
            CliError::LoggingInit(_) => None,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e)
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}
