//! Call-time failure classification
//!
//! Nothing here crosses the client boundary as an `Err`. Transport errors and
//! failure kinds are reported to the [`RequestObserver`](super::RequestObserver)
//! and then folded into a failed [`ApiResult`](super::ApiResult).

use serde::{Deserialize, Serialize};
use std::fmt;

/// A failure before any response was received.
///
/// All variants are terminal; the core never retries a transport failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("redirect failed: {0}")]
    Redirect(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The request could not be constructed (bad header name or value)
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("transport error: {0}")]
    Other(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        let message = error.to_string();
        if error.is_timeout() {
            TransportError::Timeout(message)
        } else if error.is_connect() {
            TransportError::Connect(message)
        } else if error.is_redirect() {
            TransportError::Redirect(message)
        } else if error.is_builder() {
            TransportError::InvalidRequest(message)
        } else {
            TransportError::Other(message)
        }
    }
}

/// Why a call ended with `success == false` without a usable response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    /// Connection, timeout or protocol failure; no response
    Transport,
    /// 429 responses persisted past the retry bound
    RateLimitExceeded,
    /// A continuation page failed after earlier pages succeeded
    Pagination,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Transport => write!(f, "transport"),
            FailureKind::RateLimitExceeded => write!(f, "rate limit exceeded"),
            FailureKind::Pagination => write!(f, "pagination"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_display() {
        let err = TransportError::Connect("refused".to_string());
        assert_eq!(err.to_string(), "connection failed: refused");
    }

    #[test]
    fn test_failure_kind_display() {
        assert_eq!(FailureKind::RateLimitExceeded.to_string(), "rate limit exceeded");
        assert_eq!(FailureKind::Pagination.to_string(), "pagination");
    }
}
