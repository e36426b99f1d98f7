//! Configuration management for the CLI
//!
//! Settings are merged from, in increasing precedence:
//! - Default values
//! - A TOML configuration file
//! - Environment variables (`DASHKIT_BASE_URL`, `DASHKIT_MAX_RETRIES`)
//! - Command-line arguments

use std::path::{Path, PathBuf};

use dashkit_core::ClientConfig;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::logging::LogFormat;

/// Main configuration structure
///
/// ```toml
/// [client]
/// base_url = "https://api.meraki.com/api/v1"
/// pagination = "keep_partial"
///
/// [client.retry]
/// max_retries = 5
///
/// [logging]
/// level = "info"
/// format = "json"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Dashboard client settings
    pub client: ClientConfig,

    /// Logging settings
    pub logging: LoggingSettings,
}

/// Logging settings; unset fields fall back to the verbosity flags
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level filter (trace, debug, info, warn, error)
    pub level: Option<String>,

    /// Log format (compact, full, json)
    pub format: Option<LogFormat>,
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration from a specific file or the default location,
    /// then apply environment overrides
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        let mut config = match (file, Self::default_path()) {
            (Some(path), _) => Self::from_file(path)?,
            (None, Some(path)) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };
        config.apply_env(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// `<config_dir>/dashkit/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("dashkit").join("config.toml"))
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(base_url) = lookup("DASHKIT_BASE_URL") {
            self.client.base_url = base_url;
        }

        if let Some(max_retries) = lookup("DASHKIT_MAX_RETRIES") {
            self.client.retry.max_retries = max_retries.trim().parse().map_err(|_| {
                Error::config(format!(
                    "DASHKIT_MAX_RETRIES must be a non-negative integer, got '{}'",
                    max_retries
                ))
            })?;
        }

        Ok(())
    }
}
