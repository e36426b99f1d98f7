//! Error types and handling for the CLI

use std::io;
use std::path::PathBuf;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for CLI operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error (file operations, etc.)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Error from dashkit-core
    #[error("Core error: {0}")]
    Core(#[from] dashkit_core::Error),

    /// Configuration file not found
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid argument value
    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    /// Organization could not be selected
    #[error(transparent)]
    Select(#[from] dashkit_core::SelectError),

    /// A dashboard call needed by the command did not succeed
    #[error("{message}")]
    Api {
        message: String,
        errors: Option<serde_json::Value>,
    },

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML configuration parse error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Generic error with context
    #[error("{message}")]
    Other { message: String },
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an invalid arguments error
    pub fn invalid_args(message: impl Into<String>) -> Self {
        Self::InvalidArgs(message.into())
    }

    /// Create a generic error with message
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Io(_) => 4,
            Self::Core(_) => 2,
            Self::FileNotFound { .. } => 3,
            Self::Config(_) => 5,
            Self::InvalidArgs(_) => 6,
            Self::Select(_) => 7,
            Self::Api { .. } => 10,
            Self::Json(_) => 12,
            Self::Toml(_) => 13,
            Self::Other { .. } => 99,
        }
    }

    /// Check if this error should display usage help
    pub fn should_show_help(&self) -> bool {
        matches!(self, Self::InvalidArgs(_))
    }
}

/// Format an error for display to the user
pub fn format_error(error: &Error, use_color: bool) -> String {
    let mut message = if use_color {
        use colored::Colorize;
        format!("{} {}", "Error:".red().bold(), error)
    } else {
        format!("Error: {}", error)
    };

    if let Error::Api {
        errors: Some(errors), ..
    } = error
    {
        message.push_str(&format!("\n  API errors: {}", errors));
    }
    message
}
