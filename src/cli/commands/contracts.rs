//! List contracts command.

use anyhow::{Context, Result};
use cot_config::AppConfig;
use cot_core::traits::ContractLookup;

pub async fn run(config: &AppConfig) -> Result<()> {
    let schedule = config.contract_schedule();

    println!("Futures Contracts");
    println!("═══════════════════════════════════════════════════════════");
    println!("  Symbol  Multiplier  Commission      Margin");
    println!("  ───────────────────────────────────────────────────────");
    for symbol in schedule.symbols() {
        let spec = schedule
            .lookup(symbol)
            .with_context(|| format!("Contract {} disappeared", symbol))?;
        let margin = spec
            .margin
            .map(|m| format!("${:.2}", m))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:<6}  {:>10}  {:>10}  {:>10}",
            symbol,
            spec.multiplier.to_string(),
            format!("${:.2}", spec.commission_per_contract),
            margin
        );
    }
    println!();

    Ok(())
}
