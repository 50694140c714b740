//! Validate configuration command.

use anyhow::Result;
use cot_config::AppConfig;
use std::path::Path;

pub async fn run(config: &AppConfig, config_path: &Path) -> Result<()> {
    println!("Validating configuration: {:?}", config_path);

    match config.validate() {
        Ok(settings) => {
            println!("Configuration is valid!");
            println!();
            println!("App: {}", config.app.name);
            println!("Environment: {}", config.app.environment);
            println!("Log level: {}", config.logging.level);
            println!("Signal: {}", settings.signal_kind);
            println!("Universe: {}", settings.universe.join(", "));
            println!(
                "Channel: {} bars ({:?})",
                settings.channel_period, settings.breakout_mode
            );
            println!(
                "Positioning: {} records, bounds {}/{}",
                settings.positioning_lookback, settings.thresholds.llim, settings.thresholds.ulim
            );
            println!("Entries: {}", settings.n_entries);
            println!("Initial AUM: ${}", settings.initial_aum);
            println!("Risk fraction: {}", settings.risk_fraction);
            println!("Concentration cap: {}", settings.concentration_cap);
            println!("Entry precedence: {}", settings.entry_precedence);
        }
        Err(e) => {
            println!("Configuration error: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}
