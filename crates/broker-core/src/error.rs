//! Error types for broker-core

use thiserror::Error;

/// Result type alias for broker-core
pub type Result<T> = std::result::Result<T, BrokerError>;

/// Error type for valuation and decision operations
#[derive(Error, Debug)]
pub enum BrokerError {
    /// Evaluation request could not be parsed
    #[error("Invalid input on line {line}: {detail}")]
    InvalidInput { line: usize, detail: String },

    /// A stock was given no prices at all
    #[error("Stock '{0}' has an empty price history")]
    EmptyHistory(String),

    /// Every observed price must be a finite number
    #[error("Stock '{name}' has non-finite price {price}")]
    NonFinitePrice { name: String, price: f64 },

    /// Scoring divides by the current price, so it must be positive
    #[error("Stock '{name}' has non-positive current price {price}")]
    NonPositivePrice { name: String, price: f64 },

    /// Cold-start mode needs at least one stock to buy
    #[error("No stocks available to evaluate")]
    EmptyUniverse,

    /// Engine configuration rejected
    #[error("Configuration error: {0}")]
    Config(#[from] broker_utils::ConfigError),

    /// Historic price store failure
    #[error("History error: {0}")]
    History(#[from] broker_history::HistoryError),

    /// Action list could not be serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Output channel failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BrokerError {
    pub(crate) fn invalid_input(line: usize, detail: impl Into<String>) -> Self {
        Self::InvalidInput {
            line,
            detail: detail.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BrokerError::EmptyHistory("ACME".to_string());
        assert_eq!(err.to_string(), "Stock 'ACME' has an empty price history");

        let err = BrokerError::invalid_input(3, "expected an owned share count");
        assert_eq!(
            err.to_string(),
            "Invalid input on line 3: expected an owned share count"
        );
    }

    #[test]
    fn test_history_error_conversion() {
        let io = std::io::Error::other("disk full");
        let err: BrokerError = broker_history::HistoryError::from(io).into();
        assert!(matches!(err, BrokerError::History(_)));
        assert!(err.to_string().contains("disk full"));
    }
}
