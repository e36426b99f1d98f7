//! Authentication handling for the dashboard API
//!
//! The API authenticates with a bearer token. The token is resolved once per
//! process, from an explicit argument or the `MERAKI_DASHBOARD_API_KEY`
//! environment variable, and injected into every transmission.

use std::fmt;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};

use crate::{Error, Result};

/// Environment variable consulted when no key is passed explicitly
pub const API_KEY_ENV_VAR: &str = "MERAKI_DASHBOARD_API_KEY";

/// A dashboard API key. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap an explicit key, rejecting blank input
    pub fn new(key: impl Into<String>) -> Result<Self> {
        let key = key.into().trim().to_string();
        if key.is_empty() {
            return Err(Error::configuration("API key is blank"));
        }
        Ok(Self(key))
    }

    /// Explicit argument first, then the environment (a `.env` file is honored)
    pub fn resolve(explicit: Option<&str>) -> Result<Self> {
        if explicit.is_none() {
            dotenv::dotenv().ok();
        }
        Self::resolve_with(explicit, |name| std::env::var(name).ok())
    }

    /// Like [`ApiKey::resolve`], reading variables through `lookup`
    pub(crate) fn resolve_with(explicit: Option<&str>, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(key) = explicit {
            return Self::new(key);
        }
        match lookup(API_KEY_ENV_VAR) {
            Some(key) => Self::new(key),
            None => Err(Error::configuration(format!(
                "API key not found. Pass it explicitly or set {}",
                API_KEY_ENV_VAR
            ))),
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Trait for injecting credentials into outgoing headers
pub trait AuthHandler: Send + Sync {
    /// Apply authentication to request headers
    fn apply_auth(&self, headers: &mut HeaderMap) -> Result<()>;

    /// Validate that required credentials are available
    fn validate_credentials(&self) -> Result<()>;
}

/// `Authorization: Bearer <key>`
#[derive(Debug, Clone)]
pub struct BearerAuth {
    api_key: ApiKey,
}

impl BearerAuth {
    pub fn new(api_key: ApiKey) -> Self {
        Self { api_key }
    }

    fn header_value(&self) -> Result<HeaderValue> {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", self.api_key.expose()))
            .map_err(|e| Error::Configuration {
                message: "API key contains characters not allowed in a header".to_string(),
                source: Some(Box::new(e)),
            })?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl AuthHandler for BearerAuth {
    fn apply_auth(&self, headers: &mut HeaderMap) -> Result<()> {
        headers.insert(AUTHORIZATION, self.header_value()?);
        Ok(())
    }

    fn validate_credentials(&self) -> Result<()> {
        self.header_value().map(|_| ())
    }
}
