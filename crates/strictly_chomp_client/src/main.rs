//! Strictly Chomp - terminal client
//!
//! Connects to a matchmaking relay and plays one game of Chomp.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use strictly_chomp_client::{ChompClient, ClientConfig, TerminalInput, Transport};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ClientConfig::from_file(path)?,
        None => ClientConfig::default(),
    };
    let config = config.with_overrides(cli.host, cli.port, cli.log_file);

    initialize_tracing(&config)?;
    run(config).await
}

/// Routes logs to stderr or a file so they never mix with the board.
fn initialize_tracing(config: &ClientConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_filter()));

    match config.log_file() {
        Some(path) => {
            let log_file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::sync::Arc::new(log_file))
                .with_ansi(false)
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

/// Resolve the server, connect, and play one game.
#[instrument(skip_all)]
async fn run(config: ClientConfig) -> Result<()> {
    let mut input = TerminalInput::stdio().context("Failed to start reading standard input")?;
    let (host, port) = config.resolve_endpoint(&mut input).await?;

    info!(%host, port, "Connecting to server");
    let transport = Transport::connect(&host, port)
        .await
        .with_context(|| format!("Failed to connect to {host}:{port}"))?;

    let mut client = ChompClient::new(transport, input, tokio::io::stdout());
    let outcome = client.run().await?;
    info!(%outcome, "Session finished");
    Ok(())
}
