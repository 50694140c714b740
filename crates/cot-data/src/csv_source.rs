//! CSV readers for prepared price and positioning files.

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use cot_core::error::DataError;
use cot_core::types::{InstrumentBar, InstrumentSeries, PositioningRecord, PositioningSeries};
use csv::ReaderBuilder;
use serde::Deserialize;

/// Price CSV record format.
#[derive(Debug, Deserialize)]
struct PriceRecord {
    #[serde(alias = "Date")]
    date: String,
    #[serde(alias = "Open")]
    open: f64,
    #[serde(alias = "High")]
    high: f64,
    #[serde(alias = "Low")]
    low: f64,
    #[serde(alias = "Close")]
    close: f64,
    #[serde(alias = "Volume", default)]
    volume: Option<f64>,
    #[serde(alias = "OI", alias = "oi", default)]
    open_interest: Option<f64>,
}

/// Positioning CSV record format. Empty cells become NaN and leave the
/// affected signal undefined for that date.
#[derive(Debug, Deserialize)]
struct PositioningCsvRecord {
    #[serde(alias = "Date")]
    date: String,
    #[serde(alias = "MML_Concentration", alias = "mml_concentration", default)]
    concentration_long: Option<f64>,
    #[serde(alias = "MMS_Concentration", alias = "mms_concentration", default)]
    concentration_short: Option<f64>,
    #[serde(alias = "MML_Clustering", alias = "mml_clustering", default)]
    clustering_long: Option<f64>,
    #[serde(alias = "MMS_Clustering", alias = "mms_clustering", default)]
    clustering_short: Option<f64>,
    #[serde(alias = "MML_PosSize", alias = "mml_possize", default)]
    possize_long: Option<f64>,
    #[serde(alias = "MMS_PosSize", alias = "mms_possize", default)]
    possize_short: Option<f64>,
    #[serde(alias = "PMPU_Net_OI", alias = "pmpu_net_oi", default)]
    net_open_interest: Option<f64>,
    #[serde(alias = "PMPU_Net_T", alias = "pmpu_net_t", default)]
    net_trader_count: Option<f64>,
    #[serde(alias = "PMPU_Net_PosSize", alias = "pmpu_net_possize", default)]
    net_possize: Option<f64>,
}

impl PositioningCsvRecord {
    fn into_record(self, date: NaiveDate) -> PositioningRecord {
        let value = |v: Option<f64>| v.unwrap_or(f64::NAN);
        PositioningRecord {
            date,
            concentration_long: value(self.concentration_long),
            concentration_short: value(self.concentration_short),
            clustering_long: value(self.clustering_long),
            clustering_short: value(self.clustering_short),
            possize_long: value(self.possize_long),
            possize_short: value(self.possize_short),
            net_open_interest: value(self.net_open_interest),
            net_trader_count: value(self.net_trader_count),
            net_possize: value(self.net_possize),
        }
    }
}

/// Prepared data directory with `price/` and `cot/` subdirectories.
#[derive(Debug, Clone)]
pub struct CsvDataSource {
    root: PathBuf,
}

impl CsvDataSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Price file for a symbol: `price/<SYM>.csv`, or the perpetual
    /// contract file `price/<SYM>/perpetual_OI.csv`.
    pub fn price_path(&self, symbol: &str) -> Result<PathBuf, DataError> {
        let flat = self.root.join("price").join(format!("{}.csv", symbol));
        if flat.is_file() {
            return Ok(flat);
        }
        let perpetual = self.root.join("price").join(symbol).join("perpetual_OI.csv");
        if perpetual.is_file() {
            return Ok(perpetual);
        }
        Err(DataError::NoDataAvailable(format!(
            "no price file for {} under {}",
            symbol,
            self.root.display()
        )))
    }

    /// Positioning file for a symbol: `cot/<SYM>.csv`.
    pub fn positioning_path(&self, symbol: &str) -> Result<PathBuf, DataError> {
        let path = self.root.join("cot").join(format!("{}.csv", symbol));
        if path.is_file() {
            Ok(path)
        } else {
            Err(DataError::NoDataAvailable(format!(
                "no positioning file for {} under {}",
                symbol,
                self.root.display()
            )))
        }
    }

    /// Load the price series of a symbol.
    pub fn load_prices(&self, symbol: &str) -> Result<InstrumentSeries, DataError> {
        let path = self.price_path(symbol)?;
        read_prices(&path, symbol)
    }

    /// Load the positioning series of a symbol.
    pub fn load_positioning(&self, symbol: &str) -> Result<PositioningSeries, DataError> {
        let path = self.positioning_path(symbol)?;
        read_positioning(&path, symbol)
    }
}

/// Read a price CSV file.
pub fn read_prices(path: &Path, symbol: &str) -> Result<InstrumentSeries, DataError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| DataError::ParseError(format!("{}: {}", path.display(), e)))?;

    let mut bars = Vec::new();
    for result in reader.deserialize() {
        let record: PriceRecord =
            result.map_err(|e| DataError::ParseError(format!("{}: {}", path.display(), e)))?;
        let date = parse_date(&record.date)?;
        bars.push(
            InstrumentBar::new(date, record.open, record.high, record.low, record.close)
                .with_activity(
                    record.volume.unwrap_or(0.0),
                    record.open_interest.unwrap_or(0.0),
                ),
        );
    }

    if bars.is_empty() {
        return Err(DataError::NoDataAvailable(format!(
            "{} has no price rows",
            path.display()
        )));
    }
    InstrumentSeries::new(symbol, bars)
}

/// Read a positioning CSV file.
pub fn read_positioning(path: &Path, symbol: &str) -> Result<PositioningSeries, DataError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| DataError::ParseError(format!("{}: {}", path.display(), e)))?;

    let mut records = Vec::new();
    for result in reader.deserialize() {
        let row: PositioningCsvRecord =
            result.map_err(|e| DataError::ParseError(format!("{}: {}", path.display(), e)))?;
        let date = parse_date(&row.date)?;
        records.push(row.into_record(date));
    }

    PositioningSeries::new(symbol, records)
}

/// Parse the date formats found in prepared files.
fn parse_date(date_str: &str) -> Result<NaiveDate, DataError> {
    let formats = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%Y%m%d"];

    for format in formats {
        if let Ok(d) = NaiveDate::parse_from_str(date_str, format) {
            return Ok(d);
        }
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt.date());
    }

    Err(DataError::ParseError(format!(
        "Could not parse date: {}",
        date_str
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(dir: &Path, rel: &str, contents: &str) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_parse_date() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(parse_date("2024-01-15").unwrap(), expected);
        assert_eq!(parse_date("01/15/2024").unwrap(), expected);
        assert_eq!(parse_date("2024-01-15 00:00:00").unwrap(), expected);
        assert!(parse_date("15th Jan").is_err());
    }

    #[test]
    fn test_read_prices_sorts_rows() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "price/C.csv",
            "Date,Open,High,Low,Close,OI,Volume\n\
             2024-01-03,452,455,450,454,1200,300\n\
             2024-01-02,450,453,448,452,1100,250\n",
        );

        let series = CsvDataSource::new(dir.path()).load_prices("C").unwrap();
        assert_eq!(series.len(), 2);
        let first = series.get(0).unwrap();
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(first.open_interest, 1100.0);
        assert_eq!(first.volume, 250.0);
    }

    #[test]
    fn test_perpetual_layout_fallback() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "price/W/perpetual_OI.csv",
            "date,open,high,low,close\n2024-01-02,600,610,590,605\n",
        );

        let source = CsvDataSource::new(dir.path());
        assert!(source.price_path("W").unwrap().ends_with("perpetual_OI.csv"));
        assert_eq!(source.load_prices("W").unwrap().len(), 1);
    }

    #[test]
    fn test_read_positioning_with_gaps() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "cot/KC.csv",
            "Date,MML_Concentration,MMS_Concentration,MML_Clustering,MMS_Clustering,\
             MML_PosSize,MMS_PosSize,PMPU_Net_OI,PMPU_Net_T,PMPU_Net_PosSize\n\
             2024-01-02,0.3,0.1,0.25,0.2,150,90,-0.4,-0.1,-35\n\
             2024-01-03,0.31,,0.26,0.21,151,91,-0.41,-0.11,-36\n",
        );

        let series = CsvDataSource::new(dir.path()).load_positioning("KC").unwrap();
        assert_eq!(series.len(), 2);
        let first = series.records()[0];
        assert_eq!(first.concentration_long, 0.3);
        assert_eq!(first.net_possize, -35.0);
        assert!(series.records()[1].concentration_short.is_nan());
    }

    #[test]
    fn test_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let source = CsvDataSource::new(dir.path());
        assert!(matches!(
            source.load_prices("CC"),
            Err(DataError::NoDataAvailable(_))
        ));
        assert!(matches!(
            source.load_positioning("CC"),
            Err(DataError::NoDataAvailable(_))
        ));
    }

    #[test]
    fn test_duplicate_dates_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "price/S.csv",
            "Date,Open,High,Low,Close\n2024-01-02,1,2,0.5,1\n2024-01-02,1,2,0.5,1\n",
        );
        assert!(matches!(
            CsvDataSource::new(dir.path()).load_prices("S"),
            Err(DataError::DuplicateDate { .. })
        ));
    }
}
