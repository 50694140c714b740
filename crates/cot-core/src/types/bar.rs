//! Daily price bars.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::DataError;

/// Daily futures bar.
/// Uses f64 for fast indicator calculations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InstrumentBar {
    /// Trading date
    pub date: NaiveDate,
    /// Opening price
    pub open: f64,
    /// Highest price
    pub high: f64,
    /// Lowest price
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Contracts traded
    pub volume: f64,
    /// Open interest
    pub open_interest: f64,
}

impl InstrumentBar {
    /// Create a new bar with zero volume and open interest.
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume: 0.0,
            open_interest: 0.0,
        }
    }

    /// Set volume and open interest.
    pub fn with_activity(mut self, volume: f64, open_interest: f64) -> Self {
        self.volume = volume;
        self.open_interest = open_interest;
        self
    }

    /// Calculate the bar's range (high - low).
    #[inline]
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// Check that all prices are finite.
    pub fn is_finite(&self) -> bool {
        self.open.is_finite() && self.high.is_finite() && self.low.is_finite() && self.close.is_finite()
    }
}

/// Date-ordered bars for one instrument.
///
/// Read-only input to the engine, owned by the data layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InstrumentSeries {
    /// Symbol identifier
    pub symbol: String,
    bars: Vec<InstrumentBar>,
}

impl InstrumentSeries {
    /// Build a series, sorting by date and rejecting duplicate dates.
    pub fn new(symbol: impl Into<String>, mut bars: Vec<InstrumentBar>) -> Result<Self, DataError> {
        let symbol = symbol.into();
        bars.sort_by_key(|b| b.date);

        if let Some(pair) = bars.windows(2).find(|w| w[0].date == w[1].date) {
            return Err(DataError::DuplicateDate {
                symbol,
                date: pair[0].date,
            });
        }

        Ok(Self { symbol, bars })
    }

    /// Get the number of bars.
    #[inline]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Check if the series is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Get all bars.
    pub fn bars(&self) -> &[InstrumentBar] {
        &self.bars
    }

    /// Get a bar by index (0 = oldest).
    pub fn get(&self, index: usize) -> Option<&InstrumentBar> {
        self.bars.get(index)
    }

    /// Find the bar for a date.
    pub fn on(&self, date: NaiveDate) -> Option<&InstrumentBar> {
        self.bars
            .binary_search_by_key(&date, |b| b.date)
            .ok()
            .map(|i| &self.bars[i])
    }

    /// Get the last bar.
    pub fn last(&self) -> Option<&InstrumentBar> {
        self.bars.last()
    }

    /// Get an iterator over the bars.
    pub fn iter(&self) -> impl Iterator<Item = &InstrumentBar> {
        self.bars.iter()
    }
}
