//! Error types for the dashkit core library
//!
//! These errors cover setup-time failures only: building a client, resolving
//! credentials, parsing a verb. Failures that happen while a call is in flight
//! never surface as `Err`; they are folded into [`crate::ApiResult`].

use thiserror::Error;

/// Main error type for dashkit operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors (missing API key, bad base URL, zero timeouts)
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// HTTP client construction errors
    #[error("HTTP request error: {message}")]
    HttpRequest {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// JSON parsing and serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Unsupported feature or operation
    #[error("Unsupported operation: {message}")]
    Unsupported {
        message: String,
        feature: Option<String>,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a configuration error without an underlying cause
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io {
            message: err.to_string(),
            source: err,
        }
    }
}
