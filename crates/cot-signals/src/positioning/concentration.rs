//! Money-manager concentration signal.

use cot_core::types::{PositioningMetric, PositioningRecord, SignalValue};

use super::{MetricStochastic, PositioningSignal, Thresholds};
use crate::PositioningSignalKind;

/// Classify long/short concentration stochastics.
///
/// Crowded longs are contrarian bearish: −2 when shorts are also light,
/// −1 when shorts are merely below the upper limit. Crowded shorts mirror
/// this with positive values. Anything else is neutral.
pub fn classify_concentration(long: f64, short: f64, t: Thresholds) -> SignalValue {
    if long > t.ulim {
        if short < t.llim {
            -2.0
        } else if short < t.ulim {
            -1.0
        } else {
            0.0
        }
    } else if short > t.ulim {
        if long < t.llim {
            2.0
        } else if long < t.ulim {
            1.0
        } else {
            0.0
        }
    } else {
        0.0
    }
}

/// Concentration signal, values in {-2, -1, 0, 1, 2}.
#[derive(Debug, Clone)]
pub struct ConcentrationSignal {
    long: MetricStochastic,
    short: MetricStochastic,
    thresholds: Thresholds,
    last: Option<SignalValue>,
}

impl ConcentrationSignal {
    pub fn new(lookback: usize, thresholds: Thresholds) -> Self {
        Self {
            long: MetricStochastic::new(PositioningMetric::ConcentrationLong, lookback),
            short: MetricStochastic::new(PositioningMetric::ConcentrationShort, lookback),
            thresholds,
            last: None,
        }
    }
}

impl PositioningSignal for ConcentrationSignal {
    fn update(&mut self, record: &PositioningRecord) -> Option<SignalValue> {
        let long = self.long.update(record);
        let short = self.short.update(record);
        self.last = match (long, short) {
            (Some(l), Some(s)) => Some(classify_concentration(l, s, self.thresholds)),
            _ => None,
        };
        self.last
    }

    fn current(&self) -> Option<SignalValue> {
        self.last
    }

    fn is_ready(&self) -> bool {
        self.long.is_ready() && self.short.is_ready()
    }

    fn reset(&mut self) {
        self.long.reset();
        self.short.reset();
        self.last = None;
    }

    fn kind(&self) -> PositioningSignalKind {
        PositioningSignalKind::Concentration
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::positioning::test_support::{path_to, record};

    #[test]
    fn test_crowded_longs_light_shorts_is_strong_short() {
        let t = Thresholds::from_percent(70.0).unwrap();
        assert_eq!(classify_concentration(80.0, 20.0, t), -2.0);
    }

    #[test]
    fn test_classification_branches() {
        let t = Thresholds::default();
        assert_eq!(classify_concentration(80.0, 50.0, t), -1.0);
        assert_eq!(classify_concentration(80.0, 75.0, t), 0.0);
        assert_eq!(classify_concentration(20.0, 80.0, t), 2.0);
        assert_eq!(classify_concentration(50.0, 80.0, t), 1.0);
        assert_eq!(classify_concentration(50.0, 50.0, t), 0.0);
        // Limits are exclusive.
        assert_eq!(classify_concentration(70.0, 20.0, t), 0.0);
    }

    #[test]
    fn test_signal_streams_records() {
        let mut signal = ConcentrationSignal::new(3, Thresholds::default());
        let longs = path_to(80.0);
        let shorts = path_to(20.0);

        let mut out = None;
        for i in 0..3 {
            let mut r = record(i as u64);
            r.concentration_long = longs[i];
            r.concentration_short = shorts[i];
            out = signal.update(&r);
            if i < 2 {
                assert_eq!(out, None);
            }
        }
        assert_eq!(out, Some(-2.0));
        assert!(signal.is_ready());
        assert_eq!(signal.kind(), PositioningSignalKind::Concentration);
    }

    #[test]
    fn test_gap_in_one_column_keeps_windows_aligned() {
        let mut signal = ConcentrationSignal::new(3, Thresholds::default());
        let longs = [0.0, f64::NAN, 0.0, 100.0, 80.0];
        let shorts = [0.0, 100.0, 0.0, 100.0, 20.0];

        let mut out = Vec::new();
        for i in 0..5 {
            let mut r = record(i as u64);
            r.concentration_long = longs[i];
            r.concentration_short = shorts[i];
            out.push(signal.update(&r));
        }
        // The long gap on the second record stays in the window through the
        // fourth; both windows then span the last three records.
        assert_eq!(out, vec![None, None, None, None, Some(-2.0)]);
    }

    #[test]
    fn test_one_flat_metric_makes_signal_undefined() {
        let mut signal = ConcentrationSignal::new(2, Thresholds::default());
        for i in 0..4 {
            let mut r = record(i);
            r.concentration_long = i as f64;
            r.concentration_short = 5.0;
            assert_eq!(signal.update(&r), None);
        }
    }
}
