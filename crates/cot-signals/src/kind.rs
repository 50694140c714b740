//! Positioning signal registry.

use std::fmt;
use std::str::FromStr;

use cot_core::error::ConfigError;
use serde::{Deserialize, Serialize};

use crate::positioning::{
    ClusteringSizeSignal, ConcentrationSignal, NetExposureSignal, PositioningSignal, Thresholds,
};

/// The closed set of positioning signals.
///
/// Resolved once from configuration; an unknown name never reaches the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PositioningSignalKind {
    #[serde(rename = "concentration")]
    Concentration,
    #[serde(rename = "clustering_size")]
    ClusteringSize,
    #[serde(rename = "net_open_interest")]
    NetOpenInterest,
    #[serde(rename = "net_trader_count")]
    NetTraderCount,
    #[serde(rename = "net_possize")]
    NetPosSize,
}

impl PositioningSignalKind {
    /// All kinds, in listing order.
    pub const ALL: [PositioningSignalKind; 5] = [
        PositioningSignalKind::Concentration,
        PositioningSignalKind::ClusteringSize,
        PositioningSignalKind::NetOpenInterest,
        PositioningSignalKind::NetTraderCount,
        PositioningSignalKind::NetPosSize,
    ];

    /// Canonical configuration name.
    pub fn name(&self) -> &'static str {
        match self {
            PositioningSignalKind::Concentration => "concentration",
            PositioningSignalKind::ClusteringSize => "clustering_size",
            PositioningSignalKind::NetOpenInterest => "net_open_interest",
            PositioningSignalKind::NetTraderCount => "net_trader_count",
            PositioningSignalKind::NetPosSize => "net_possize",
        }
    }

    /// Report-column style alias accepted for older configurations.
    pub fn legacy_alias(&self) -> &'static str {
        match self {
            PositioningSignalKind::Concentration => "mm_concentration",
            PositioningSignalKind::ClusteringSize => "mm_clustering&possize",
            PositioningSignalKind::NetOpenInterest => "pmpu_oi",
            PositioningSignalKind::NetTraderCount => "pmpu_t",
            PositioningSignalKind::NetPosSize => "pmpu_possize",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            PositioningSignalKind::Concentration => {
                "Money-manager long/short concentration, contrarian (-2..2)"
            }
            PositioningSignalKind::ClusteringSize => {
                "Money-manager clustering confirmed by average position size (-2..2, half steps)"
            }
            PositioningSignalKind::NetOpenInterest => {
                "Producer/merchant net share of open interest (-1, 0, 1)"
            }
            PositioningSignalKind::NetTraderCount => {
                "Producer/merchant net share of traders (-1, 0, 1)"
            }
            PositioningSignalKind::NetPosSize => {
                "Producer/merchant net average position size (-1, 0, 1)"
            }
        }
    }

    /// Create a fresh signal instance for one instrument.
    pub fn build(&self, lookback: usize, thresholds: Thresholds) -> Box<dyn PositioningSignal> {
        match self {
            PositioningSignalKind::Concentration => {
                Box::new(ConcentrationSignal::new(lookback, thresholds))
            }
            PositioningSignalKind::ClusteringSize => {
                Box::new(ClusteringSizeSignal::new(lookback, thresholds))
            }
            PositioningSignalKind::NetOpenInterest => {
                Box::new(NetExposureSignal::open_interest(lookback, thresholds))
            }
            PositioningSignalKind::NetTraderCount => {
                Box::new(NetExposureSignal::trader_count(lookback, thresholds))
            }
            PositioningSignalKind::NetPosSize => {
                Box::new(NetExposureSignal::position_size(lookback, thresholds))
            }
        }
    }

    fn valid_names() -> String {
        Self::ALL
            .iter()
            .map(|k| k.name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromStr for PositioningSignalKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|k| k.name() == needle || k.legacy_alias() == needle)
            .ok_or_else(|| ConfigError::UnknownSignalKind {
                name: s.to_string(),
                valid: Self::valid_names(),
            })
    }
}

impl fmt::Display for PositioningSignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
