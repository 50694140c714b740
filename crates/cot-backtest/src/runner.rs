//! Bar-by-bar replay driver.

use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;
use cot_core::error::{CotError, EngineError};
use cot_core::traits::{Broker, ContractLookup};
use cot_core::types::OrderKind;
use cot_data::InstrumentData;
use cot_engine::{BarContext, PortfolioEngine};
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::report::{IntentRecord, RunReport};

/// Drives an engine over prepared data and hands its intents to a broker.
///
/// For every date of the merged timeline the runner applies the broker's
/// pending notifications, snapshots AUM once, then lets each instrument with
/// a bar on that date decide, in universe order.
pub struct BacktestRunner<B: Broker> {
    engine: PortfolioEngine,
    broker: B,
}

impl<B: Broker> BacktestRunner<B> {
    pub fn new(engine: PortfolioEngine, broker: B) -> Self {
        Self { engine, broker }
    }

    pub fn engine(&self) -> &PortfolioEngine {
        &self.engine
    }

    pub fn broker(&self) -> &B {
        &self.broker
    }

    /// Replay every date once.
    pub fn run(
        &mut self,
        data: &[InstrumentData],
        contracts: &impl ContractLookup,
    ) -> Result<RunReport, CotError> {
        let by_symbol: HashMap<&str, &InstrumentData> =
            data.iter().map(|d| (d.symbol.as_str(), d)).collect();
        for d in data {
            if self.engine.position(&d.symbol).is_none() {
                return Err(EngineError::UnknownInstrument(d.symbol.clone()).into());
            }
        }
        let universe: Vec<String> = self.engine.universe().map(str::to_string).collect();
        let dates = merged_dates(data);

        info!(
            "Replaying {} dates for {} instruments through {}",
            dates.len(),
            universe.len(),
            self.broker.name()
        );

        let mut intents = Vec::new();
        let mut stop_fills = 0;
        let mut commission = Decimal::ZERO;

        for (bar_index, &date) in dates.iter().enumerate() {
            stop_fills += self.apply_notifications()?;

            let ctx = BarContext {
                date,
                bar_index,
                aum: self.broker.current_aum(),
            };

            for symbol in &universe {
                let Some(instrument) = by_symbol.get(symbol.as_str()) else {
                    continue;
                };
                let Some(bar) = instrument.prices.on(date) else {
                    continue;
                };
                let record = instrument.positioning.on(date);

                for intent in self.engine.on_bar(symbol, bar, record, &ctx)? {
                    self.broker.submit(&intent)?;
                    if intent.kind == OrderKind::Market {
                        let spec = contracts.lookup(&intent.instrument)?;
                        commission += spec.commission_per_contract * Decimal::from(intent.size);
                    }
                    intents.push(IntentRecord {
                        date,
                        bar_index,
                        intent,
                    });
                }
            }
        }
        stop_fills += self.apply_notifications()?;

        let report = RunReport {
            settings: self.engine.settings().clone(),
            broker: self.broker.name().to_string(),
            start: dates.first().copied(),
            end: dates.last().copied(),
            bars_processed: dates.len(),
            stop_fills,
            estimated_commission: commission,
            intents,
            instruments: self.engine.snapshots(),
        };

        info!(
            "Replay complete: {} market intents, {} stops, {} stop fills",
            report.market_intents(),
            report.stop_intents(),
            report.stop_fills
        );
        Ok(report)
    }

    fn apply_notifications(&mut self) -> Result<usize, EngineError> {
        let events = self.broker.drain_events();
        for event in &events {
            debug!("Broker event: {:?}", event);
            self.engine.apply_event(event)?;
        }
        Ok(events.len())
    }
}

/// Sorted union of every price date.
fn merged_dates(data: &[InstrumentData]) -> Vec<NaiveDate> {
    data.iter()
        .flat_map(|d| d.prices.iter().map(|b| b.date))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
