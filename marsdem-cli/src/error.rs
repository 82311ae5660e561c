//! CLI error type.

use std::fmt;

use marsdem::logging::LoggingError;
use marsdem::StoreError;

/// Errors surfaced to the user by CLI commands.
#[derive(Debug)]
pub enum CliError {
    /// Configuration could not be located or parsed.
    Config(String),
    /// The store failed to open or answer a query.
    Store(StoreError),
    /// Logging could not be set up.
    Logging(LoggingError),
    /// Output could not be serialized.
    Output(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Store(e) => write!(f, "{}", e),
            CliError::Logging(e) => write!(f, "Logging setup failed: {}", e),
            CliError::Output(msg) => write!(f, "Failed to write output: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Store(e) => Some(e),
            CliError::Logging(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StoreError> for CliError {
    fn from(e: StoreError) -> Self {
        CliError::Store(e)
    }
}

impl From<LoggingError> for CliError {
    fn from(e: LoggingError) -> Self {
        CliError::Logging(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Output(e.to_string())
    }
}

impl CliError {
    /// Process exit code: 2 for a coverage miss, 1 for everything else.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Store(e) if e.is_no_data() => 2,
            _ => 1,
        }
    }
}
