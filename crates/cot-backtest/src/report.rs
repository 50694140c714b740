//! Replay report.

use chrono::NaiveDate;
use cot_core::types::{OrderIntent, OrderKind};
use cot_engine::{EngineSettings, InstrumentSnapshot};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An intent together with the bar that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentRecord {
    pub date: NaiveDate,
    pub bar_index: usize,
    pub intent: OrderIntent,
}

/// Outcome of a replay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Settings the engine ran with
    pub settings: EngineSettings,
    /// Broker the intents were handed to
    pub broker: String,
    /// First and last date of the merged timeline
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    /// Dates in the merged timeline
    pub bars_processed: usize,
    /// Stop executions reported by the broker
    pub stop_fills: usize,
    /// Commission on market intents at the contract schedule's rates
    pub estimated_commission: Decimal,
    /// Every emitted intent, in emission order
    pub intents: Vec<IntentRecord>,
    /// Final state of each instrument, in universe order
    pub instruments: Vec<InstrumentSnapshot>,
}

impl RunReport {
    pub fn market_intents(&self) -> usize {
        self.intents
            .iter()
            .filter(|r| r.intent.kind == OrderKind::Market)
            .count()
    }

    pub fn stop_intents(&self) -> usize {
        self.intents
            .iter()
            .filter(|r| r.intent.kind == OrderKind::Stop)
            .count()
    }

    /// Generate a text summary.
    pub fn summary(&self) -> String {
        let mut s = String::new();

        s.push_str("═══════════════════════════════════════════════════════════\n");
        s.push_str("                   COT BREAKOUT REPLAY                      \n");
        s.push_str("═══════════════════════════════════════════════════════════\n\n");

        s.push_str("RUN\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str(&format!(
            "  Signal:              {}\n",
            self.settings.signal_kind
        ));
        s.push_str(&format!(
            "  Breakout:            {:?}, channel {}\n",
            self.settings.breakout_mode, self.settings.channel_period
        ));
        s.push_str(&format!(
            "  Initial AUM:         ${:.2}\n",
            self.settings.initial_aum
        ));
        s.push_str(&format!("  Broker:              {}\n", self.broker));
        if let (Some(start), Some(end)) = (self.start, self.end) {
            s.push_str(&format!("  Period:              {} to {}\n", start, end));
        }
        s.push_str(&format!(
            "  Bars Processed:      {}\n",
            self.bars_processed
        ));
        s.push('\n');

        s.push_str("INTENTS\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str(&format!(
            "  Market:              {}\n",
            self.market_intents()
        ));
        s.push_str(&format!(
            "  Protective Stops:    {}\n",
            self.stop_intents()
        ));
        s.push_str(&format!("  Stop Fills:          {}\n", self.stop_fills));
        s.push_str(&format!(
            "  Est. Commission:     ${:.2}\n",
            self.estimated_commission
        ));
        s.push('\n');

        s.push_str("INSTRUMENTS\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str("  Symbol  Status    Size  Entries  Scale-ins  Inactive  Stop\n");
        for i in &self.instruments {
            let stop = i
                .live_stop
                .map(|p| format!("{:.4}", p))
                .unwrap_or_else(|| "-".to_string());
            s.push_str(&format!(
                "  {:<6}  {:<8}  {:>4}  {:>7}  {:>9}  {:>8}  {}\n",
                i.symbol,
                i.status.to_string(),
                i.size,
                i.entries,
                i.scale_ins,
                i.inactive_bars,
                stop
            ));
        }
        s.push('\n');

        s.push_str("═══════════════════════════════════════════════════════════\n");

        s
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export the intent log alone.
    pub fn intents_to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.intents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cot_core::types::Side;
    use cot_signals::PositioningSignalKind;
    use rust_decimal_macros::dec;

    fn report() -> RunReport {
        let date = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        RunReport {
            settings: EngineSettings::new(vec!["C".to_string()], PositioningSignalKind::Concentration),
            broker: "Intent journal".to_string(),
            start: Some(date),
            end: Some(date),
            bars_processed: 1,
            stop_fills: 0,
            estimated_commission: dec!(61.28),
            intents: vec![
                IntentRecord {
                    date,
                    bar_index: 0,
                    intent: OrderIntent::market("C", Side::Buy, dec!(450), 4),
                },
                IntentRecord {
                    date,
                    bar_index: 0,
                    intent: OrderIntent::stop("C", Side::Sell, dec!(440), 4),
                },
            ],
            instruments: Vec::new(),
        }
    }

    #[test]
    fn test_report_summary() {
        let report = report();
        assert_eq!(report.market_intents(), 1);
        assert_eq!(report.stop_intents(), 1);

        let summary = report.summary();
        assert!(summary.contains("concentration"));
        assert!(summary.contains("$61.28"));
        assert!(summary.contains("2024-02-01 to 2024-02-01"));
    }

    #[test]
    fn test_intents_json() {
        let json = report().intents_to_json().unwrap();
        let parsed: Vec<IntentRecord> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[1].intent.kind, OrderKind::Stop);
    }
}
