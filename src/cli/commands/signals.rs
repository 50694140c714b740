//! List positioning signals command.

use anyhow::Result;
use cot_signals::PositioningSignalKind;

pub async fn run() -> Result<()> {
    println!("Positioning Signals");
    println!("═══════════════════════════════════════════════════════════");
    println!();

    for kind in PositioningSignalKind::ALL {
        println!("  {} (alias: {})", kind.name(), kind.legacy_alias());
        println!("  ───────────────────────────────────────────────────────");
        println!("  {}", kind.description());
        println!();
    }

    println!("Use --signal <name> or strategy.positioning_signal_kind to select one.");

    Ok(())
}
