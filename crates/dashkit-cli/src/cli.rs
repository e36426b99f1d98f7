//! Command-line interface argument parsing and definitions
//!
//! This module defines the CLI structure using clap's derive API.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::logging::LogFormat;

/// Dashkit - a resilient client for the Meraki Dashboard API
///
/// Every call retries on rate limiting and follows pagination links, so list
/// endpoints return all pages as one JSON array.
#[derive(Parser, Debug)]
#[command(
    name = "dashkit",
    version,
    author,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Dashboard API key
    #[arg(short = 'k', long, global = true, env = "MERAKI_DASHBOARD_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long, global = true, env = "DASHKIT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log output format
    #[arg(long, value_enum, global = true)]
    pub log_format: Option<LogFormat>,

    /// Output format for results
    #[arg(short, long, value_enum, global = true, default_value = "json-pretty")]
    pub output: OutputFormat,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the organizations visible to the API key
    Orgs,

    /// Download an organization's OpenAPI document
    Openapi(OpenapiArgs),

    /// Run one API call and print its result
    Request(RequestArgs),
}

/// Arguments for the openapi command
#[derive(Parser, Debug)]
pub struct OpenapiArgs {
    /// Organization name; optional when the key sees exactly one organization
    #[arg(short = 'O', long)]
    pub org: Option<String>,

    /// Output file (defaults to a timestamped name in the current directory)
    #[arg(short = 'f', long, value_name = "FILE")]
    pub file: Option<PathBuf>,
}

/// Arguments for the request command
#[derive(Parser, Debug)]
pub struct RequestArgs {
    /// HTTP verb: GET, POST, PUT or DELETE
    #[arg(value_name = "VERB")]
    pub verb: String,

    /// Resource path relative to the base URL, e.g. /organizations
    #[arg(value_name = "PATH")]
    pub path: String,

    /// Query parameter as NAME=VALUE; repeat a name for array values
    #[arg(long = "query", value_name = "NAME=VALUE", value_parser = parse_key_value)]
    pub query: Vec<(String, String)>,

    /// Extra header as NAME=VALUE
    #[arg(long = "header", value_name = "NAME=VALUE", value_parser = parse_key_value)]
    pub headers: Vec<(String, String)>,

    /// JSON request body (POST and PUT only)
    #[arg(long)]
    pub body: Option<String>,

    /// Keep pages fetched before a pagination failure
    #[arg(long)]
    pub keep_partial: bool,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Single-line JSON
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

/// Parse `NAME=VALUE`; the value may itself contain `=`
pub fn parse_key_value(input: &str) -> Result<(String, String), String> {
    match input.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected NAME=VALUE, got '{}'", input)),
    }
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective verbosity level (considering quiet flag)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}
