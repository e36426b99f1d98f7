//! Dashkit CLI - command-line access to the Meraki Dashboard API
//!
//! Lists organizations, downloads an organization's OpenAPI document and
//! runs arbitrary calls through the resilient request core.

mod cli;
mod config;
mod error;
mod handlers;
mod logging;

use std::io::IsTerminal;
use std::process;

use cli::{Cli, Commands};
use config::Config;
use dashkit_core::{ApiKey, DashboardClient, PaginationPolicy};
use error::Result;
use logging::LoggingConfig;
use tracing::instrument;

/// Exit status when a call completed but reported `success == false`
pub(crate) const EXIT_UNSUCCESSFUL: i32 = 1;

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    if let Err(e) = init_logging(&cli) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    match run(cli).await {
        Ok(true) => process::exit(0),
        Ok(false) => process::exit(EXIT_UNSUCCESSFUL),
        Err(e) => {
            eprintln!("{}", error::format_error(&e, std::io::stderr().is_terminal()));

            if e.should_show_help() {
                eprintln!("\nFor more information, try '--help'");
            }

            process::exit(e.exit_code());
        }
    }
}

/// Main application logic; `Ok(false)` means the API call was unsuccessful
#[instrument(skip(cli), fields(command = ?cli.command))]
async fn run(cli: Cli) -> Result<bool> {
    let mut config = Config::load_with_file(cli.config.as_deref())?;
    config.client.verbose = cli.verbosity_level() > 0;
    if let Commands::Request(args) = &cli.command {
        if args.keep_partial {
            config.client.pagination = PaginationPolicy::KeepPartial;
        }
    }

    let api_key = ApiKey::resolve(cli.api_key.as_deref())?;
    let client = DashboardClient::new(&config.client, api_key)?;
    tracing::info!(base_url = %client.base_url(), "Executing command");

    let mut stdout = std::io::stdout();
    match cli.command {
        Commands::Orgs => handlers::handle_orgs(&client, cli.output, &mut stdout).await.map(|()| true),
        Commands::Openapi(args) => handlers::handle_openapi(&client, args, &mut stdout)
            .await
            .map(|_| true),
        Commands::Request(args) => handlers::handle_request(&client, &args, cli.output, &mut stdout).await,
    }
}

/// Initialize the logging system
fn init_logging(cli: &Cli) -> Result<()> {
    let file_settings = Config::load_with_file(cli.config.as_deref())
        .map(|config| config.logging)
        .unwrap_or_default();

    let mut logging_config = LoggingConfig::from_verbosity(cli.verbosity_level());
    if cli.verbosity_level() == 0 {
        if let Some(level) = file_settings.level {
            logging_config.level = level;
        }
    }
    if let Some(format) = file_settings.format {
        logging_config.format = format;
    }

    logging_config.merge_with_env();

    if let Some(format) = cli.log_format {
        logging_config.format = format;
    }

    if cli.quiet {
        logging_config.level = "error".to_string();
    }

    logging::init_logging(logging_config)
}
