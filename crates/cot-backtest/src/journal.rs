//! Recording broker.

use std::collections::HashMap;

use cot_core::error::BrokerError;
use cot_core::traits::{Broker, BrokerEvent};
use cot_core::types::OrderIntent;
use rust_decimal::Decimal;
use tracing::debug;

/// Broker that records intents without simulating the market.
///
/// Market intents are treated as filled at once and move the signed
/// position. Stops are held as the live protective stop of their instrument
/// and only execute when [`IntentJournal::trigger_stop`] is called. AUM stays
/// at its initial value.
#[derive(Debug, Clone)]
pub struct IntentJournal {
    aum: Decimal,
    submitted: Vec<OrderIntent>,
    positions: HashMap<String, i64>,
    live_stops: HashMap<String, OrderIntent>,
    pending: Vec<BrokerEvent>,
}

impl IntentJournal {
    pub fn new(aum: Decimal) -> Self {
        Self {
            aum,
            submitted: Vec::new(),
            positions: HashMap::new(),
            live_stops: HashMap::new(),
            pending: Vec::new(),
        }
    }

    /// Every intent accepted so far, in submission order.
    pub fn submitted(&self) -> &[OrderIntent] {
        &self.submitted
    }

    pub fn live_stop(&self, instrument: &str) -> Option<&OrderIntent> {
        self.live_stops.get(instrument)
    }

    /// Execute the live stop of an instrument: flatten it and queue the
    /// notification for the next drain.
    pub fn trigger_stop(&mut self, instrument: &str) -> Result<(), BrokerError> {
        if self.live_stops.remove(instrument).is_none() {
            return Err(BrokerError::Rejected(format!(
                "no live stop for {}",
                instrument
            )));
        }
        self.positions.remove(instrument);
        self.pending.push(BrokerEvent::StopFilled {
            instrument: instrument.to_string(),
        });
        Ok(())
    }
}

impl Broker for IntentJournal {
    fn submit(&mut self, intent: &OrderIntent) -> Result<(), BrokerError> {
        if intent.size == 0 {
            return Err(BrokerError::Rejected(format!("zero size: {}", intent)));
        }

        if intent.is_market() {
            *self.positions.entry(intent.instrument.clone()).or_insert(0) += intent.signed_size();
        } else {
            let live = self.live_stops.contains_key(&intent.instrument);
            if intent.replaces_prior_stop && !live {
                return Err(BrokerError::Rejected(format!(
                    "nothing to replace: {}",
                    intent
                )));
            }
            if !intent.replaces_prior_stop && live {
                return Err(BrokerError::Rejected(format!(
                    "second protective stop: {}",
                    intent
                )));
            }
            self.live_stops
                .insert(intent.instrument.clone(), intent.clone());
        }

        debug!("Journal: {}", intent);
        self.submitted.push(intent.clone());
        Ok(())
    }

    fn current_position(&self, instrument: &str) -> i64 {
        self.positions.get(instrument).copied().unwrap_or(0)
    }

    fn current_aum(&self) -> Decimal {
        self.aum
    }

    fn drain_events(&mut self) -> Vec<BrokerEvent> {
        std::mem::take(&mut self.pending)
    }

    fn name(&self) -> &str {
        "Intent journal"
    }
}
