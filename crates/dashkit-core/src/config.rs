//! Client configuration

use serde::{Deserialize, Serialize};
use url::Url;

use crate::http::{PaginationPolicy, RedirectPolicy, RetryPolicy, TimeoutConfig};
use crate::{Error, Result};

/// Production dashboard API root
pub const DEFAULT_BASE_URL: &str = "https://api.meraki.com/api/v1";

/// Everything needed to build a [`DashboardClient`](crate::DashboardClient)
/// apart from the API key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL; request paths are appended to it verbatim
    pub base_url: String,
    pub timeouts: TimeoutConfig,
    pub retry: RetryPolicy,
    pub redirect: RedirectPolicy,
    pub pagination: PaginationPolicy,
    /// Log each transmission at `info` instead of `debug`
    pub verbose: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeouts: TimeoutConfig::default(),
            retry: RetryPolicy::default(),
            redirect: RedirectPolicy::default(),
            pagination: PaginationPolicy::default(),
            verbose: false,
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_pagination(mut self, pagination: PaginationPolicy) -> Self {
        self.pagination = pagination;
        self
    }

    /// Check the configuration before any client is built
    pub fn validate(&self) -> Result<()> {
        self.parsed_base_url()?;
        self.timeouts.validate().map_err(Error::configuration)?;
        Ok(())
    }

    /// The base URL as a parsed `Url`; only http and https are accepted
    pub fn parsed_base_url(&self) -> Result<Url> {
        let url = Url::parse(&self.base_url).map_err(|e| Error::Configuration {
            message: format!("Invalid base URL '{}'", self.base_url),
            source: Some(Box::new(e)),
        })?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            scheme => Err(Error::configuration(format!(
                "Unsupported base URL scheme '{}'",
                scheme
            ))),
        }
    }
}
