//! Data loading for prepared price and positioning files.
//!
//! Files are produced upstream (report cleaning, weekly-to-daily alignment
//! and reporting lag are already applied). This crate only reads them.

mod csv_source;

pub use csv_source::{read_positioning, read_prices, CsvDataSource};

use cot_core::error::DataError;
use cot_core::types::{InstrumentSeries, PositioningSeries};
use futures::future::try_join_all;
use tracing::info;

/// Price and positioning series of one instrument.
#[derive(Debug, Clone)]
pub struct InstrumentData {
    pub symbol: String,
    pub prices: InstrumentSeries,
    pub positioning: PositioningSeries,
}

/// Load one instrument on the blocking pool.
pub async fn load_instrument(
    source: &CsvDataSource,
    symbol: &str,
) -> Result<InstrumentData, DataError> {
    let source = source.clone();
    let symbol = symbol.to_string();
    tokio::task::spawn_blocking(move || {
        let prices = source.load_prices(&symbol)?;
        let positioning = source.load_positioning(&symbol)?;
        Ok::<_, DataError>(InstrumentData {
            symbol,
            prices,
            positioning,
        })
    })
    .await
    .map_err(|e| DataError::Task(e.to_string()))?
}

/// Load every instrument concurrently, returned in universe order.
pub async fn load_universe(
    source: &CsvDataSource,
    universe: &[String],
) -> Result<Vec<InstrumentData>, DataError> {
    let data = try_join_all(universe.iter().map(|s| load_instrument(source, s))).await?;

    for d in &data {
        info!(
            "Loaded {}: {} bars, {} positioning records",
            d.symbol,
            d.prices.len(),
            d.positioning.len()
        );
    }
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn write_instrument(dir: &Path, symbol: &str, rows: usize) {
        fs::create_dir_all(dir.join("price")).unwrap();
        fs::create_dir_all(dir.join("cot")).unwrap();

        let mut price = String::from("Date,Open,High,Low,Close,OI,Volume\n");
        let mut cot = String::from("Date,PMPU_Net_OI\n");
        for i in 0..rows {
            let day = format!("2023-03-{:02}", i + 1);
            price.push_str(&format!("{},10,11,9,10.5,100,50\n", day));
            cot.push_str(&format!("{},{}\n", day, i));
        }
        fs::write(dir.join("price").join(format!("{}.csv", symbol)), price).unwrap();
        fs::write(dir.join("cot").join(format!("{}.csv", symbol)), cot).unwrap();
    }

    #[tokio::test]
    async fn test_load_universe_keeps_order() {
        let dir = tempfile::tempdir().unwrap();
        write_instrument(dir.path(), "C", 5);
        write_instrument(dir.path(), "SB", 3);

        let source = CsvDataSource::new(dir.path());
        let universe = vec!["SB".to_string(), "C".to_string()];
        let data = load_universe(&source, &universe).await.unwrap();

        assert_eq!(data.len(), 2);
        assert_eq!(data[0].symbol, "SB");
        assert_eq!(data[0].prices.len(), 3);
        assert_eq!(data[1].positioning.len(), 5);
        assert!(data[1].positioning.records()[0].concentration_long.is_nan());
    }

    #[tokio::test]
    async fn test_missing_instrument_fails_load() {
        let dir = tempfile::tempdir().unwrap();
        write_instrument(dir.path(), "C", 2);

        let source = CsvDataSource::new(dir.path());
        let universe = vec!["C".to_string(), "KC".to_string()];
        let result = load_universe(&source, &universe).await;
        assert!(matches!(result, Err(DataError::NoDataAvailable(_))));
    }
}
