//! `featherkey` - obtain `OAuth 1.0a` access tokens from the command line.
//!
//! Runs the PIN, browser-callback or xAuth flow and prints the resulting
//! credential as JSON on stdout. Logs go to stderr.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod cli;
mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Command};
use config::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "featherkey=info,featherkey_oauth1=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config_path = cli
        .global
        .config
        .clone()
        .unwrap_or_else(Settings::default_path);
    let settings = Settings::load(&config_path).await?;
    let config = config::resolve(&cli.global, settings)?;
    tracing::info!(provider = %config.endpoints.name, "Starting authorization");

    let credential = match cli.command {
        Command::Pin { no_browser } => commands::pin(&config, no_browser).await?,
        Command::Broker { port, path, wait } => commands::broker(&config, port, &path, wait).await?,
        Command::Xauth { username, password } => {
            commands::xauth(&config, &username, password).await?
        }
    };

    tracing::info!(screen_name = %credential.screen_name, "Authorized");
    println!("{}", serde_json::to_string_pretty(&credential)?);
    Ok(())
}
