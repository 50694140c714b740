//! COT breakout decision engine CLI.

mod cli;
mod logging;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use cot_config::load_config;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(Some(&cli.config))
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;

    // Setup logging
    let level = cli
        .log_level
        .map(|l| l.as_str())
        .unwrap_or(config.logging.level.as_str());
    let json = cli.json_logs || config.logging.format == "json";
    let _guard = logging::setup_logging(level, json, config.logging.file.as_deref().map(Path::new))?;

    // Execute command
    match cli.command {
        Commands::Replay(args) => cli::commands::replay::run(args, &config).await,
        Commands::Signals => cli::commands::signals::run().await,
        Commands::Contracts => cli::commands::contracts::run(&config).await,
        Commands::ValidateConfig => cli::commands::validate::run(&config, &cli.config).await,
        Commands::ShowConfig => cli::commands::show_config::run(&config).await,
    }
}
