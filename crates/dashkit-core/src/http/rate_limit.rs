//! Rate-limit retry gate
//!
//! The dashboard API signals throttling with `429 Too Many Requests` and an
//! optional `Retry-After` header in whole seconds. The gate decides whether a
//! response should be retransmitted, how long to wait first, and when the
//! retry budget is spent.

use std::time::Duration;

use reqwest::header::{HeaderMap, RETRY_AFTER};
use serde::{Deserialize, Serialize};

use crate::http::transport::RawResponse;

/// Status code that triggers a rate-limit retry
pub const RATE_LIMIT_STATUS: u16 = 429;

/// Retry policy configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Maximum number of rate-limit retries after the first transmission
    pub max_retries: u32,
    /// Wait used when a 429 carries no usable `Retry-After` (in seconds)
    pub default_wait_secs: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            default_wait_secs: 3,
        }
    }
}

impl RetryPolicy {
    /// Create a new retry policy with custom settings
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Default::default()
        }
    }

    /// Set the fallback wait
    pub fn with_default_wait(mut self, seconds: u64) -> Self {
        self.default_wait_secs = seconds;
        self
    }

    pub fn default_wait(&self) -> Duration {
        Duration::from_secs(self.default_wait_secs)
    }

    /// Fresh retry state for one page
    pub fn start(&self) -> RetryState {
        RetryState::new(self.max_retries)
    }
}

/// Attempt counter for one logical transmission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryState {
    attempt: u32,
    max_attempts: u32,
}

impl RetryState {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            attempt: 0,
            max_attempts,
        }
    }

    /// Start from an arbitrary attempt count
    pub fn at(self, attempt: u32) -> Self {
        Self { attempt, ..self }
    }

    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// The chain aborts once the attempt count exceeds the maximum
    pub fn exhausted(&self) -> bool {
        self.attempt > self.max_attempts
    }

    pub fn next(self) -> Self {
        Self {
            attempt: self.attempt.saturating_add(1),
            ..self
        }
    }
}

/// Decision on what to do with a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Not rate limited; hand the response on
    Proceed,
    /// Sleep for `delay`, then retransmit with `next`
    Retry { delay: Duration, next: RetryState },
    /// Rate limited and out of retries
    Exhausted,
}

/// Inspects responses for the rate-limit signal
#[derive(Debug, Clone, Default)]
pub struct RateLimitGate {
    policy: RetryPolicy,
}

impl RateLimitGate {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Determine whether `response`, received at `state`, should be retried
    pub fn inspect(&self, response: &RawResponse, state: RetryState) -> RetryDecision {
        if response.status != RATE_LIMIT_STATUS {
            return RetryDecision::Proceed;
        }

        let next = state.next();
        if next.exhausted() {
            return RetryDecision::Exhausted;
        }

        RetryDecision::Retry {
            delay: self.wait_interval(&response.headers),
            next,
        }
    }

    /// `Retry-After` when present and an integer, else the policy default
    pub fn wait_interval(&self, headers: &HeaderMap) -> Duration {
        retry_after(headers)
            .map(Duration::from_secs)
            .unwrap_or_else(|| self.policy.default_wait())
    }
}

/// Parse `Retry-After` as whole seconds. Header names are case-insensitive;
/// HTTP-date values are not supported and yield `None`.
pub fn retry_after(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok())
}
