//! Unified error handling for the kitemcp library
//!
//! Errors are layered the way calls flow: the broker client raises [`BrokerError`],
//! the session client wraps it in [`SessionError`], and the tool registry raises
//! [`ToolError`] for lookup and argument problems. Only the registry turns any of
//! these into text for the agent host.

use thiserror::Error;

/// Errors raised by a brokerage API client
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BrokerError {
    /// The API answered with an error envelope or a non-success status
    #[error("{message}")]
    Api {
        /// Human readable message from the API
        message: String,
        /// Error class reported by the API, e.g. `TokenException`
        error_type: Option<String>,
    },

    /// The request never produced a usable HTTP response
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A configured endpoint is not a valid URL
    #[error("Invalid broker URL: {0}")]
    Url(#[from] url::ParseError),

    /// The response body could not be decoded
    #[error("Unexpected response from broker: {0}")]
    Decode(String),
}

impl BrokerError {
    /// Create an API error carrying only a message
    pub fn api(message: impl Into<String>) -> Self {
        Self::Api {
            message: message.into(),
            error_type: None,
        }
    }
}

/// Errors raised by the brokerage session client
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    /// The operation requires an access token and none has been generated
    #[error("No access token. Please generate session first.")]
    NotAuthenticated,

    /// The brokerage API call failed
    #[error(transparent)]
    Upstream(#[from] BrokerError),

    /// The request was rejected before reaching the brokerage
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A broker response could not be rendered
    #[error("JSON error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A single argument failed schema validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid argument '{field}': {reason}")]
pub struct ValidationError {
    /// Name of the offending field
    pub field: String,
    /// Why the value was rejected
    pub reason: String,
}

impl ValidationError {
    /// Create a validation error for `field`
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Errors raised by the tool registry itself
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ToolError {
    /// No tool is registered under the requested name
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// A tool with the same name is already registered
    #[error("Tool '{0}' is already registered")]
    DuplicateTool(String),

    /// The arguments did not match the tool's declared schema
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Configuration errors
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// Missing configuration
    #[error("Missing configuration: {name}")]
    Missing {
        /// Environment variable that was not set
        name: String,
    },

    /// Invalid configuration
    #[error("Invalid configuration '{name}': {reason}")]
    Invalid {
        /// Environment variable holding the bad value
        name: String,
        /// Why the value was rejected
        reason: String,
    },
}

/// Result type alias for session client operations
pub type Result<T> = std::result::Result<T, SessionError>;
