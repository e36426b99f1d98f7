//! Call diagnostics
//!
//! The client reports what happens during a call through a [`RequestObserver`]
//! rather than printing. [`TracingObserver`] forwards events to `tracing`;
//! [`SilentObserver`] drops them.

use std::time::Duration;

use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::http::error::FailureKind;
use crate::http::request::Verb;

/// Receives diagnostic events. Every method defaults to a no-op.
///
/// Events never carry the API key.
pub trait RequestObserver: Send + Sync {
    /// A transmission is about to go out; `attempt` is zero for the first
    fn request_sent(&self, _verb: Verb, _url: &str, _attempt: u32) {}

    fn response_received(&self, _status: u16) {}

    /// A 429 was received; the next transmission is `attempt` after `wait`
    fn rate_limited(&self, _attempt: u32, _wait: Duration) {}

    /// A response carried an `errors` field
    fn payload_errors(&self, _errors: &Value) {}

    /// A continuation page is being followed
    fn next_page(&self, _url: &str) {}

    fn failed(&self, _kind: FailureKind, _detail: &str) {}
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentObserver;

impl RequestObserver for SilentObserver {}

/// Forwards events to `tracing`.
///
/// Request and response lines go out at `info` when `verbose` is set and at
/// `debug` otherwise. Throttling and payload errors are warnings, terminal
/// failures are errors.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver {
    verbose: bool,
}

impl TracingObserver {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl RequestObserver for TracingObserver {
    fn request_sent(&self, verb: Verb, url: &str, attempt: u32) {
        if self.verbose {
            info!(%verb, url, attempt, "Sending request");
        } else {
            debug!(%verb, url, attempt, "Sending request");
        }
    }

    fn response_received(&self, status: u16) {
        if self.verbose {
            info!(status, "Response received");
        } else {
            debug!(status, "Response received");
        }
    }

    fn rate_limited(&self, attempt: u32, wait: Duration) {
        warn!(attempt, wait_secs = wait.as_secs(), "Rate limited, retrying");
    }

    fn payload_errors(&self, errors: &Value) {
        warn!(%errors, "Response carried errors");
    }

    fn next_page(&self, url: &str) {
        if self.verbose {
            info!(url, "Following next page");
        } else {
            debug!(url, "Following next page");
        }
    }

    fn failed(&self, kind: FailureKind, detail: &str) {
        error!(%kind, detail, "Request failed");
    }
}
