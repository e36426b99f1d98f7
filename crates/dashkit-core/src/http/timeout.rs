//! Per-attempt timeout configuration
//!
//! Two independent bounds apply to every transmission: the time allowed to
//! establish a connection, and the time allowed for any single read of the
//! response to make progress. A body that keeps arriving is never cut off.
//! Nothing bounds a whole call across retries and pages.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Timeout configuration for HTTP requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
    /// Transmit timeout in seconds, applied to each read of the response
    pub transmit_timeout_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 60,
            transmit_timeout_secs: 60,
        }
    }
}

impl TimeoutConfig {
    pub fn new(connect_timeout_secs: u64, transmit_timeout_secs: u64) -> Self {
        Self {
            connect_timeout_secs,
            transmit_timeout_secs,
        }
    }

    pub fn connect(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn transmit(&self) -> Duration {
        Duration::from_secs(self.transmit_timeout_secs)
    }

    /// Validate timeout configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.connect_timeout_secs == 0 {
            return Err("Connect timeout cannot be zero".to_string());
        }
        if self.transmit_timeout_secs == 0 {
            return Err("Transmit timeout cannot be zero".to_string());
        }
        Ok(())
    }
}
