//! bb - Building Blocks node
//!
//! Runs one node of a test topology: an HTTP/1.1 listener feeding one of
//! the strategies, optionally forwarding to downstream nodes.

mod bootstrap;
mod cli;

use anyhow::Context;
use clap::Parser;
use infrastructure::{AppConfig, init_logging};
use tracing::info;

use crate::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config =
        AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    cli.apply(&mut config);
    config.validate().context("Invalid configuration")?;

    init_logging(&config.log).context("Failed to initialize logging")?;

    let strategy = cli.command.kind();
    info!(
        version = env!("CARGO_PKG_VERSION"),
        node = %config.service.id,
        strategy = %strategy,
        "Starting bb"
    );

    let reason = bootstrap::run(&config, strategy)
        .await
        .with_context(|| format!("Node [{}] failed", config.service.id))?;
    info!(?reason, "Goodbye");

    Ok(())
}
