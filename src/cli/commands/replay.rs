//! Replay command implementation.

use anyhow::{Context, Result};
use cot_backtest::{BacktestRunner, IntentJournal};
use cot_config::AppConfig;
use cot_data::{load_universe, CsvDataSource};
use cot_engine::PortfolioEngine;
use std::path::PathBuf;
use tracing::info;

use crate::cli::{OutputFormat, ReplayArgs};

pub async fn run(args: ReplayArgs, config: &AppConfig) -> Result<()> {
    let mut config = config.clone();
    if let Some(signal) = &args.signal {
        config.strategy.positioning_signal_kind = Some(signal.clone());
    }
    if !args.symbols.is_empty() {
        config.strategy.universe = args.symbols.clone();
    }
    if args.close {
        config.strategy.intraday = false;
    }
    if let Some(n) = args.n_entries {
        config.strategy.n_entries = n;
    }

    let settings = config.validate().context("Invalid configuration")?;
    let schedule = config.contract_schedule();
    info!(
        "Starting replay: signal {}, {} instruments",
        settings.signal_kind,
        settings.universe.len()
    );

    let data_dir = args
        .data
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.data.dir));
    if !data_dir.is_dir() {
        anyhow::bail!(
            "Data directory '{}' does not exist. Provide a directory containing price/ and cot/ (e.g. --data ./data)",
            data_dir.display()
        );
    }
    let source = CsvDataSource::new(data_dir);
    let data = load_universe(&source, &settings.universe)
        .await
        .context("Failed to load data")?;

    let broker = IntentJournal::new(settings.initial_aum);
    let engine = PortfolioEngine::new(settings, &schedule).context("Failed to build engine")?;
    let mut runner = BacktestRunner::new(engine, broker);
    let report = runner.run(&data, &schedule).context("Replay aborted")?;

    match args.output {
        OutputFormat::Json => println!("{}", report.to_json()?),
        OutputFormat::Text => println!("{}", report.summary()),
    }

    if let Some(save_path) = &args.save {
        let json = report.intents_to_json()?;
        std::fs::write(save_path, json)
            .with_context(|| format!("Failed to write {}", save_path.display()))?;
        info!("Intents saved to {:?}", save_path);
    }

    Ok(())
}
