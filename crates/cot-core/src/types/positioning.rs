//! Commitments of Traders positioning metrics.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::DataError;

/// Positioning metrics for one price date.
///
/// The long/short pairs describe money-manager longs and shorts; the net
/// metrics describe producer/merchant/processor/user net exposure. Records
/// are already aligned to price dates (including the reporting lag) by the
/// data preparation step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositioningRecord {
    pub date: NaiveDate,
    pub concentration_long: f64,
    pub concentration_short: f64,
    pub clustering_long: f64,
    pub clustering_short: f64,
    pub possize_long: f64,
    pub possize_short: f64,
    pub net_open_interest: f64,
    pub net_trader_count: f64,
    pub net_possize: f64,
}

impl PositioningRecord {
    /// Create a record with every metric set to zero.
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            concentration_long: 0.0,
            concentration_short: 0.0,
            clustering_long: 0.0,
            clustering_short: 0.0,
            possize_long: 0.0,
            possize_short: 0.0,
            net_open_interest: 0.0,
            net_trader_count: 0.0,
            net_possize: 0.0,
        }
    }

    /// Read a single metric.
    #[inline]
    pub fn metric(&self, metric: PositioningMetric) -> f64 {
        match metric {
            PositioningMetric::ConcentrationLong => self.concentration_long,
            PositioningMetric::ConcentrationShort => self.concentration_short,
            PositioningMetric::ClusteringLong => self.clustering_long,
            PositioningMetric::ClusteringShort => self.clustering_short,
            PositioningMetric::PosSizeLong => self.possize_long,
            PositioningMetric::PosSizeShort => self.possize_short,
            PositioningMetric::NetOpenInterest => self.net_open_interest,
            PositioningMetric::NetTraderCount => self.net_trader_count,
            PositioningMetric::NetPosSize => self.net_possize,
        }
    }
}

/// Selector for one column of a [`PositioningRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositioningMetric {
    ConcentrationLong,
    ConcentrationShort,
    ClusteringLong,
    ClusteringShort,
    PosSizeLong,
    PosSizeShort,
    NetOpenInterest,
    NetTraderCount,
    NetPosSize,
}

impl std::fmt::Display for PositioningMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PositioningMetric::ConcentrationLong => "concentration_long",
            PositioningMetric::ConcentrationShort => "concentration_short",
            PositioningMetric::ClusteringLong => "clustering_long",
            PositioningMetric::ClusteringShort => "clustering_short",
            PositioningMetric::PosSizeLong => "possize_long",
            PositioningMetric::PosSizeShort => "possize_short",
            PositioningMetric::NetOpenInterest => "net_open_interest",
            PositioningMetric::NetTraderCount => "net_trader_count",
            PositioningMetric::NetPosSize => "net_possize",
        };
        f.write_str(name)
    }
}

/// Date-ordered positioning records for one instrument.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PositioningSeries {
    pub symbol: String,
    records: Vec<PositioningRecord>,
}

impl PositioningSeries {
    /// Build a series, sorting by date and rejecting duplicate dates.
    pub fn new(
        symbol: impl Into<String>,
        mut records: Vec<PositioningRecord>,
    ) -> Result<Self, DataError> {
        let symbol = symbol.into();
        records.sort_by_key(|r| r.date);

        if let Some(pair) = records.windows(2).find(|w| w[0].date == w[1].date) {
            return Err(DataError::DuplicateDate {
                symbol,
                date: pair[0].date,
            });
        }

        Ok(Self { symbol, records })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[PositioningRecord] {
        &self.records
    }

    /// Find the record aligned to a price date.
    pub fn on(&self, date: NaiveDate) -> Option<&PositioningRecord> {
        self.records
            .binary_search_by_key(&date, |r| r.date)
            .ok()
            .map(|i| &self.records[i])
    }
}
