//! Historic price store for stock-broker
//!
//! Prices seen on previous runs are kept in a single CSV table, one column per
//! stock. Columns are equalized by left-padding with zeros before every write,
//! and the file is rewritten in full each time.

pub mod error;
pub mod store;

pub use error::{HistoryError, Result};
pub use store::HistoricPriceStore;
