//! COT positioning signals.
//!
//! Every signal in this family normalizes one or more report metrics with a
//! rolling stochastic and classifies the readings against a symmetric pair of
//! thresholds. Positive values favor longs, negative values favor shorts.

mod clustering;
mod concentration;
mod net;

pub use clustering::{classify_clustering_size, ClusteringSizeSignal};
pub use concentration::{classify_concentration, ConcentrationSignal};
pub use net::{classify_net, NetExposureSignal};

use cot_core::error::ConfigError;
use cot_core::traits::StreamingIndicator;
use cot_core::types::{PositioningMetric, PositioningRecord, SignalValue};
use cot_indicators::RollingStochastic;
use serde::{Deserialize, Serialize};

use crate::PositioningSignalKind;

/// A positioning signal consumes one report record per bar.
pub trait PositioningSignal: Send {
    /// Feed the bar's record and return the classified value, or `None`
    /// while any stochastic is warming up or undefined.
    fn update(&mut self, record: &PositioningRecord) -> Option<SignalValue>;

    /// Last value returned by `update`.
    fn current(&self) -> Option<SignalValue>;

    /// Check that every underlying window has filled.
    fn is_ready(&self) -> bool;

    /// Clear all rolling state.
    fn reset(&mut self);

    /// The registered kind of this signal.
    fn kind(&self) -> PositioningSignalKind;
}

/// Classification bounds on the 0..=100 stochastic scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Upper limit (T)
    pub ulim: f64,
    /// Lower limit (100 - T)
    pub llim: f64,
}

impl Thresholds {
    /// Default threshold in percentage points.
    pub const DEFAULT_PERCENT: f64 = 70.0;

    /// Build thresholds from T in percentage points.
    ///
    /// T must lie strictly between 50 and 100 so that `llim < ulim`.
    pub fn from_percent(threshold: f64) -> Result<Self, ConfigError> {
        if !(threshold.is_finite() && threshold > 50.0 && threshold < 100.0) {
            return Err(ConfigError::invalid(
                "positioning_threshold",
                format!("must lie strictly between 50 and 100, got {}", threshold),
            ));
        }
        Ok(Self {
            ulim: threshold,
            llim: 100.0 - threshold,
        })
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            ulim: Self::DEFAULT_PERCENT,
            llim: 100.0 - Self::DEFAULT_PERCENT,
        }
    }
}

/// A stochastic bound to one record column.
#[derive(Debug, Clone)]
pub(crate) struct MetricStochastic {
    metric: PositioningMetric,
    stoch: RollingStochastic,
}

impl MetricStochastic {
    pub(crate) fn new(metric: PositioningMetric, lookback: usize) -> Self {
        Self {
            metric,
            stoch: RollingStochastic::new(lookback),
        }
    }

    pub(crate) fn update(&mut self, record: &PositioningRecord) -> Option<f64> {
        self.stoch.update(record.metric(self.metric))
    }

    pub(crate) fn is_ready(&self) -> bool {
        self.stoch.is_ready()
    }

    pub(crate) fn reset(&mut self) {
        self.stoch.reset();
    }
}
