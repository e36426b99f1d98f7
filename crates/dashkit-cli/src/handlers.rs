//! Command handlers for CLI subcommands
//!
//! Handlers write their results to the given writer and log progress through
//! `tracing`, which goes to stderr.

mod openapi;
mod orgs;
mod request;

pub use openapi::handle_openapi;
pub use orgs::handle_orgs;
pub use request::handle_request;

use std::io::Write;

use serde::Serialize;

use crate::cli::OutputFormat;
use crate::error::Result;

/// Serialize `value` in the selected format, followed by a newline
pub fn write_value<T: Serialize>(out: &mut impl Write, value: &T, format: OutputFormat) -> Result<()> {
    let text = match format {
        OutputFormat::Json => serde_json::to_string(value)?,
        OutputFormat::JsonPretty => serde_json::to_string_pretty(value)?,
    };
    writeln!(out, "{}", text)?;
    Ok(())
}
