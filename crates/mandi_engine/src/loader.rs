//! Historical price table loading.
//!
//! [`HistoryLoader`] is the seam between the registry and wherever price
//! tables live. [`CsvHistoryLoader`] reads monthly CSV tables from disk;
//! [`InMemoryLoader`] serves prepared records (tests, embedding callers).
//!
//! # CSV format
//!
//! Header columns `year`, `month` (1-12) and `price`. The capitalised
//! `Year` / `Month` forms and the legacy `WPI` price column are accepted;
//! any other column (e.g. `Rainfall`) is ignored.
//!
//! ```text
//! Month,Year,Rainfall,WPI
//! 1,2012,51.5,98.2
//! 2,2012,12.0,99.1
//! ```

use mandi_core::types::{HistoryError, PriceHistory, PriceRecord, YearMonth};
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

use crate::config::CommoditySource;

/// Price table loading errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoadError {
    /// Source could not be opened or read
    #[error("Failed to read '{source_name}': {message}")]
    Io {
        /// Path or label of the source
        source_name: String,
        /// Underlying error
        message: String,
    },

    /// Malformed CSV (bad header, wrong field type)
    #[error("Malformed price table '{source_name}' at line {line}: {message}")]
    Csv {
        /// Path or label of the source
        source_name: String,
        /// 1-based line number, 0 when unknown
        line: u64,
        /// Decoder message
        message: String,
    },

    /// Row parsed but its month is invalid
    #[error("Invalid record in '{source_name}' at line {line}: {message}")]
    InvalidRecord {
        /// Path or label of the source
        source_name: String,
        /// 1-based line number
        line: u64,
        /// Reason
        message: String,
    },

    /// Rows parsed but do not form a valid history
    #[error("Invalid price history in '{source_name}': {source}")]
    History {
        /// Path or label of the source
        source_name: String,
        /// Validation failure
        #[source]
        source: HistoryError,
    },

    /// No data registered for this commodity
    #[error("No price data for commodity '{0}'")]
    Missing(String),
}

/// Loads the price history of one commodity.
pub trait HistoryLoader: Send + Sync {
    /// Load and validate the history for `source`.
    fn load(&self, source: &CommoditySource) -> Result<PriceHistory, LoadError>;
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(alias = "Year", alias = "YEAR")]
    year: i32,
    #[serde(alias = "Month", alias = "MONTH")]
    month: u32,
    #[serde(alias = "Price", alias = "PRICE", alias = "WPI", alias = "wpi")]
    price: f64,
}

/// Reads price tables from CSV files at each source's path.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvHistoryLoader;

impl CsvHistoryLoader {
    /// Creates a CSV loader.
    pub fn new() -> Self {
        Self
    }

    /// Parse a price table from any reader. `source_name` labels errors.
    pub fn parse<R: Read>(reader: R, source_name: &str) -> Result<PriceHistory, LoadError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let csv_error = |line: u64, e: csv::Error| LoadError::Csv {
            source_name: source_name.to_string(),
            line,
            message: e.to_string(),
        };

        let headers = csv_reader.headers().map_err(|e| csv_error(1, e))?.clone();
        let mut record = csv::StringRecord::new();
        let mut records = Vec::new();

        while csv_reader
            .read_record(&mut record)
            .map_err(|e| csv_error(e.position().map(|p| p.line()).unwrap_or(0), e))?
        {
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            let row: CsvRow = record
                .deserialize(Some(&headers))
                .map_err(|e| csv_error(line, e))?;

            let period = YearMonth::new(row.year, row.month).map_err(|e| {
                LoadError::InvalidRecord {
                    source_name: source_name.to_string(),
                    line,
                    message: e.to_string(),
                }
            })?;
            records.push(PriceRecord::new(period, row.price));
        }

        PriceHistory::new(records).map_err(|source| LoadError::History {
            source_name: source_name.to_string(),
            source,
        })
    }

    /// Read and parse the CSV file at `path`.
    pub fn load_path(&self, path: &Path) -> Result<PriceHistory, LoadError> {
        let source_name = path.display().to_string();
        let file = std::fs::File::open(path).map_err(|e| LoadError::Io {
            source_name: source_name.clone(),
            message: e.to_string(),
        })?;
        let history = Self::parse(file, &source_name)?;
        debug!(
            path = %source_name,
            records = history.len(),
            first = %history.first().period,
            latest = %history.latest().period,
            "Loaded price table"
        );
        Ok(history)
    }
}

impl HistoryLoader for CsvHistoryLoader {
    fn load(&self, source: &CommoditySource) -> Result<PriceHistory, LoadError> {
        self.load_path(&source.path)
    }
}

/// Serves price records registered in memory, keyed by commodity name.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLoader {
    tables: HashMap<String, Vec<PriceRecord>>,
}

impl InMemoryLoader {
    /// Creates an empty loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `records` for the commodity called `name`.
    pub fn with_records(mut self, name: impl Into<String>, records: Vec<PriceRecord>) -> Self {
        self.insert(name, records);
        self
    }

    /// Register a monthly series of `prices` starting at `start`.
    pub fn with_series(self, name: impl Into<String>, start: YearMonth, prices: &[f64]) -> Self {
        let records = prices
            .iter()
            .enumerate()
            .map(|(i, &price)| PriceRecord::new(start.add_months(i as i64), price))
            .collect();
        self.with_records(name, records)
    }

    /// Register or replace the records for `name`.
    pub fn insert(&mut self, name: impl Into<String>, records: Vec<PriceRecord>) {
        self.tables.insert(name.into(), records);
    }
}

impl HistoryLoader for InMemoryLoader {
    fn load(&self, source: &CommoditySource) -> Result<PriceHistory, LoadError> {
        let records = self
            .tables
            .get(&source.name)
            .ok_or_else(|| LoadError::Missing(source.name.clone()))?;

        PriceHistory::new(records.clone()).map_err(|source_err| LoadError::History {
            source_name: source.name.clone(),
            source: source_err,
        })
    }
}
