//! Error handling for the kitemcp CLI
//!
//! Library errors are mapped onto the exit codes in [`crate::exit_codes`]:
//! bad configuration and startup failures exit with `EXIT_ERROR`, anything that
//! goes wrong once the command is running exits with `EXIT_WARNING`.

use crate::exit_codes::{EXIT_ERROR, EXIT_SUCCESS};
use kitemcp::mcp::ServerError;
use kitemcp::ConfigError;
use std::error::Error;
use std::fmt;

/// CLI-specific result type that preserves error information
pub type CliResult<T> = Result<T, CliError>;

/// CLI error carrying the exit code the process should end with
#[derive(Debug)]
pub struct CliError {
    pub message: String,
    pub exit_code: i32,
    pub source: Option<Box<dyn Error + Send + Sync>>,
}

impl CliError {
    /// Create a new CLI error with a message and exit code
    pub fn new(message: impl Into<String>, exit_code: i32) -> Self {
        Self {
            message: message.into(),
            exit_code,
            source: None,
        }
    }

    /// Wrap `error`, keeping it as the source
    pub fn from_error<E: Error + Send + Sync + 'static>(
        context: &str,
        error: E,
        exit_code: i32,
    ) -> Self {
        Self {
            message: format!("{context}: {error}"),
            exit_code,
            source: Some(Box::new(error)),
        }
    }

    /// Full error chain, one cause per line
    pub fn full_chain(&self) -> String {
        let mut result = self.message.clone();

        // The top-level source is already part of `message`.
        let mut current_source = self.source().and_then(|e| e.source());
        while let Some(err) = current_source {
            result.push_str(&format!("\n  Caused by: {}", err));
            current_source = err.source();
        }

        result
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn Error + 'static))
    }
}

impl From<ConfigError> for CliError {
    fn from(error: ConfigError) -> Self {
        Self::from_error("Invalid configuration", error, EXIT_ERROR)
    }
}

impl From<ServerError> for CliError {
    fn from(error: ServerError) -> Self {
        Self::from_error("Failed to create MCP server", error, EXIT_ERROR)
    }
}

/// Convert a CliResult to an exit code, printing the error chain on failure
pub fn handle_cli_result<T>(result: CliResult<T>) -> i32 {
    match result {
        Ok(_) => EXIT_SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("Error: {}", e.full_chain());
            e.exit_code
        }
    }
}
