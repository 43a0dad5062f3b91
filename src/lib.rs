pub mod api;
pub mod chat;
pub mod cli;
pub mod config;
pub mod logging;
pub mod search;

use anyhow::{Context, Result};
use reqwest::Client;
use tracing::info;

use config::Config;

/// Entry point shared by the binary: resolve configuration, build the HTTP
/// client, and dispatch the parsed subcommand. Every error is returned to the
/// caller, which maps it onto stderr and a non-zero exit status.
pub async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    logging::init();

    let cli = cli::parse();
    let Some(command) = cli.command else {
        // Mirror the no-subcommand contract: usage on stdout, exit status 1.
        cli::print_help()?;
        std::process::exit(1);
    };

    let cfg = Config::from_env()?;
    info!(
        api_base_url = %cfg.api_base_url,
        timeout_ms = cfg.timeout_ms,
        "loaded runtime configuration"
    );

    let client = Client::builder()
        .timeout(cfg.timeout())
        .build()
        .context("Failed to initialize HTTP client")?;

    cli::run(command, &client, &cfg).await
}
