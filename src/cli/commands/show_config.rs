//! Show configuration command.

use anyhow::{Context, Result};
use cot_config::AppConfig;

pub async fn run(config: &AppConfig) -> Result<()> {
    let text = config
        .to_toml()
        .context("Failed to serialize configuration")?;
    println!("{}", text);
    Ok(())
}
