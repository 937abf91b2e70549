//! CSV-backed historic price table
//!
//! Layout on disk:
//!
//! ```text
//! ,AAPL,MSFT
//! 0,0,310.5
//! 1,182.1,311.0
//! 2,183.4,309.8
//! ```
//!
//! The first column is a row index and is ignored when reading. Every stock
//! column has the same number of rows; shorter series are left-padded with `0`.

use crate::error::{HistoryError, Result};
use csv::{Reader, Writer};
use std::io::{Read, Write};
use std::path::Path;
use tracing::debug;

/// One stock's stored price series, oldest first
#[derive(Debug, Clone, PartialEq)]
struct PriceColumn {
    name: String,
    prices: Vec<f64>,
}

/// Historic prices keyed by stock name, in insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoricPriceStore {
    columns: Vec<PriceColumn>,
}

impl HistoricPriceStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from `(name, prices)` pairs
    pub fn from_series<I, S>(series: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<f64>)>,
        S: Into<String>,
    {
        let mut store = Self::new();
        for (name, prices) in series {
            store.insert(name, prices);
        }
        store
    }

    /// Load the table at `path`
    ///
    /// A missing file is the valid initial state and yields an empty store.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "No historic price file, starting empty");
            return Ok(Self::new());
        }

        let file = std::fs::File::open(path)?;
        let store = Self::from_reader(file)?;
        debug!(
            path = %path.display(),
            stocks = store.len(),
            depth = store.max_len(),
            "Loaded historic prices"
        );
        Ok(store)
    }

    /// Parse a table from any CSV source
    pub fn from_reader<R: Read>(source: R) -> Result<Self> {
        let mut reader = Reader::from_reader(source);

        let mut columns: Vec<PriceColumn> = reader
            .headers()?
            .iter()
            .skip(1)
            .map(|name| PriceColumn {
                name: name.to_string(),
                prices: Vec::new(),
            })
            .collect();

        for (row, record) in reader.records().enumerate() {
            let record = record?;
            for (column, cell) in columns.iter_mut().zip(record.iter().skip(1)) {
                let price = cell
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| HistoryError::InvalidPrice {
                        stock: column.name.clone(),
                        row,
                        value: cell.to_string(),
                    })?;
                column.prices.push(price);
            }
        }

        Ok(Self { columns })
    }

    /// Rewrite the table at `path`, padding shorter columns
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = std::fs::File::create(path)?;
        self.write_to(file)?;
        debug!(
            path = %path.display(),
            stocks = self.len(),
            depth = self.max_len(),
            "Wrote historic prices"
        );
        Ok(())
    }

    /// Serialize the table to any CSV sink, padding shorter columns
    pub fn write_to<W: Write>(&self, sink: W) -> Result<()> {
        let mut aligned = self.clone();
        aligned.equalize();

        let mut writer = Writer::from_writer(sink);

        let mut header = vec![String::new()];
        header.extend(aligned.columns.iter().map(|c| c.name.clone()));
        writer.write_record(&header)?;

        for row in 0..aligned.max_len() {
            let mut record = Vec::with_capacity(aligned.columns.len() + 1);
            record.push(row.to_string());
            record.extend(aligned.columns.iter().map(|c| c.prices[row].to_string()));
            writer.write_record(&record)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Insert or replace a stock's series
    pub fn insert(&mut self, name: impl Into<String>, prices: Vec<f64>) {
        let name = name.into();
        match self.columns.iter_mut().find(|c| c.name == name) {
            Some(column) => column.prices = prices,
            None => self.columns.push(PriceColumn { name, prices }),
        }
    }

    /// Stored series for `name`, oldest first
    pub fn history(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.prices.as_slice())
    }

    /// Length of the longest column
    pub fn max_len(&self) -> usize {
        self.columns
            .iter()
            .map(|c| c.prices.len())
            .max()
            .unwrap_or(0)
    }

    /// Left-pad every shorter column with zeros up to `max_len()`
    pub fn equalize(&mut self) {
        let depth = self.max_len();
        for column in &mut self.columns {
            let padding = depth - column.prices.len();
            if padding > 0 {
                let mut padded = vec![0.0; padding];
                padded.append(&mut column.prices);
                column.prices = padded;
            }
        }
    }

    /// Number of stocks in the table
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Check if the table has no stocks
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
