//! Producer/merchant net exposure signals.

use cot_core::types::{PositioningMetric, PositioningRecord, SignalValue};

use super::{MetricStochastic, PositioningSignal, Thresholds};
use crate::PositioningSignalKind;

/// 1 above the upper limit, -1 below the lower limit, else 0.
pub fn classify_net(stoch: f64, t: Thresholds) -> SignalValue {
    if stoch > t.ulim {
        1.0
    } else if stoch < t.llim {
        -1.0
    } else {
        0.0
    }
}

/// Net exposure over a single metric: open interest, trader count or
/// average position size.
#[derive(Debug, Clone)]
pub struct NetExposureSignal {
    kind: PositioningSignalKind,
    stoch: MetricStochastic,
    thresholds: Thresholds,
    last: Option<SignalValue>,
}

impl NetExposureSignal {
    /// Net open interest variant.
    pub fn open_interest(lookback: usize, thresholds: Thresholds) -> Self {
        Self::with_metric(
            PositioningSignalKind::NetOpenInterest,
            PositioningMetric::NetOpenInterest,
            lookback,
            thresholds,
        )
    }

    /// Net trader count variant.
    pub fn trader_count(lookback: usize, thresholds: Thresholds) -> Self {
        Self::with_metric(
            PositioningSignalKind::NetTraderCount,
            PositioningMetric::NetTraderCount,
            lookback,
            thresholds,
        )
    }

    /// Net average position size variant.
    pub fn position_size(lookback: usize, thresholds: Thresholds) -> Self {
        Self::with_metric(
            PositioningSignalKind::NetPosSize,
            PositioningMetric::NetPosSize,
            lookback,
            thresholds,
        )
    }

    fn with_metric(
        kind: PositioningSignalKind,
        metric: PositioningMetric,
        lookback: usize,
        thresholds: Thresholds,
    ) -> Self {
        Self {
            kind,
            stoch: MetricStochastic::new(metric, lookback),
            thresholds,
            last: None,
        }
    }
}

impl PositioningSignal for NetExposureSignal {
    fn update(&mut self, record: &PositioningRecord) -> Option<SignalValue> {
        self.last = self
            .stoch
            .update(record)
            .map(|s| classify_net(s, self.thresholds));
        self.last
    }

    fn current(&self) -> Option<SignalValue> {
        self.last
    }

    fn is_ready(&self) -> bool {
        self.stoch.is_ready()
    }

    fn reset(&mut self) {
        self.stoch.reset();
        self.last = None;
    }

    fn kind(&self) -> PositioningSignalKind {
        self.kind
    }
}
