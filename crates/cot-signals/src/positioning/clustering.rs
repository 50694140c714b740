//! Money-manager clustering and position-size signal.

use cot_core::types::{PositioningMetric, PositioningRecord, SignalValue};

use super::{MetricStochastic, PositioningSignal, Thresholds};
use crate::PositioningSignalKind;

/// Classify one side: extreme clustering confirmed (or not) by position size.
///
/// Returns the value from the perspective of the long side; the short side
/// uses the negation.
fn classify_side(clustering: f64, size: f64, t: Thresholds) -> SignalValue {
    if clustering > t.ulim && size > t.ulim {
        -1.0
    } else if clustering > t.ulim && size < t.ulim {
        -0.5
    } else if clustering < t.llim && size > t.llim {
        0.5
    } else if clustering < t.llim && size < t.llim {
        1.0
    } else {
        0.0
    }
}

/// Sum of the long-side and short-side classifications.
///
/// Values lie in {-2, -1.5, -1, -0.5, 0, 0.5, 1, 1.5, 2}.
pub fn classify_clustering_size(
    clustering_long: f64,
    size_long: f64,
    clustering_short: f64,
    size_short: f64,
    t: Thresholds,
) -> SignalValue {
    classify_side(clustering_long, size_long, t) - classify_side(clustering_short, size_short, t)
}

/// Clustering and position-size signal.
#[derive(Debug, Clone)]
pub struct ClusteringSizeSignal {
    clustering_long: MetricStochastic,
    clustering_short: MetricStochastic,
    size_long: MetricStochastic,
    size_short: MetricStochastic,
    thresholds: Thresholds,
    last: Option<SignalValue>,
}

impl ClusteringSizeSignal {
    pub fn new(lookback: usize, thresholds: Thresholds) -> Self {
        Self {
            clustering_long: MetricStochastic::new(PositioningMetric::ClusteringLong, lookback),
            clustering_short: MetricStochastic::new(PositioningMetric::ClusteringShort, lookback),
            size_long: MetricStochastic::new(PositioningMetric::PosSizeLong, lookback),
            size_short: MetricStochastic::new(PositioningMetric::PosSizeShort, lookback),
            thresholds,
            last: None,
        }
    }
}

impl PositioningSignal for ClusteringSizeSignal {
    fn update(&mut self, record: &PositioningRecord) -> Option<SignalValue> {
        let cl = self.clustering_long.update(record);
        let cs = self.clustering_short.update(record);
        let sl = self.size_long.update(record);
        let ss = self.size_short.update(record);
        self.last = match (cl, sl, cs, ss) {
            (Some(cl), Some(sl), Some(cs), Some(ss)) => {
                Some(classify_clustering_size(cl, sl, cs, ss, self.thresholds))
            }
            _ => None,
        };
        self.last
    }

    fn current(&self) -> Option<SignalValue> {
        self.last
    }

    fn is_ready(&self) -> bool {
        self.clustering_long.is_ready()
            && self.clustering_short.is_ready()
            && self.size_long.is_ready()
            && self.size_short.is_ready()
    }

    fn reset(&mut self) {
        self.clustering_long.reset();
        self.clustering_short.reset();
        self.size_long.reset();
        self.size_short.reset();
        self.last = None;
    }

    fn kind(&self) -> PositioningSignalKind {
        PositioningSignalKind::ClusteringSize
    }
}
