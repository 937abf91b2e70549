//! Error types for broker-history

use thiserror::Error;

/// Result type alias for broker-history
pub type Result<T> = std::result::Result<T, HistoryError>;

/// Errors raised while reading or writing the historic price table
#[derive(Error, Debug)]
pub enum HistoryError {
    /// Underlying file error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reader or writer error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A cell could not be parsed as a price
    #[error("Invalid price '{value}' for '{stock}' at row {row}")]
    InvalidPrice {
        stock: String,
        row: usize,
        value: String,
    },
}
