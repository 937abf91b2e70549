//! Stock valuation
//!
//! A [`Stock`] holds one instrument's visible price history and scores how
//! close its current price sits to the historic minimum versus maximum:
//!
//! ```text
//! Min ---Current-------------- Max   (attractive, positive score)
//! Min --------------Current--- Max   (overextended, negative score)
//! ```
//!
//! The raw distance is divided by the current price, so for the same raw
//! position a cheaper stock ranks higher: more shares fit in the budget.

use crate::error::{BrokerError, Result};
use std::cell::OnceCell;
use tracing::debug;

/// One instrument in the evaluated universe
#[derive(Debug, Clone)]
pub struct Stock {
    name: String,
    owned_shares: u64,
    price_history: Vec<f64>,
    min_observed: f64,
    max_observed: f64,
    current_price: f64,
    reversed_position_score: OnceCell<f64>,
}

impl Stock {
    /// Create a stock from its full visible history, oldest price first
    ///
    /// Fails when the history is empty, holds a non-finite price, or the
    /// latest price is not positive.
    pub fn new(
        name: impl Into<String>,
        owned_shares: u64,
        price_history: Vec<f64>,
    ) -> Result<Self> {
        let name = name.into();

        let Some(&current_price) = price_history.last() else {
            return Err(BrokerError::EmptyHistory(name));
        };
        if let Some(&price) = price_history.iter().find(|p| !p.is_finite()) {
            return Err(BrokerError::NonFinitePrice { name, price });
        }
        if current_price <= 0.0 {
            return Err(BrokerError::NonPositivePrice {
                name,
                price: current_price,
            });
        }

        let (min_observed, max_observed) = price_history
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &p| {
                (lo.min(p), hi.max(p))
            });

        Ok(Self {
            name,
            owned_shares,
            price_history,
            min_observed,
            max_observed,
            current_price,
            reversed_position_score: OnceCell::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn owned_shares(&self) -> u64 {
        self.owned_shares
    }

    pub fn is_owned(&self) -> bool {
        self.owned_shares > 0
    }

    pub fn price_history(&self) -> &[f64] {
        &self.price_history
    }

    /// Number of observations, the depth that gates strategy maturity
    pub fn history_depth(&self) -> usize {
        self.price_history.len()
    }

    pub fn min_observed(&self) -> f64 {
        self.min_observed
    }

    pub fn max_observed(&self) -> f64 {
        self.max_observed
    }

    pub fn current_price(&self) -> f64 {
        self.current_price
    }

    /// Position of the current price between min and max, scaled by price
    ///
    /// Computed on first call and reused for the lifetime of the stock.
    /// A score of exactly zero is a cached value like any other.
    pub fn reversed_position_score(&self) -> f64 {
        *self.reversed_position_score.get_or_init(|| {
            let score = self.calculate_reversed_position_score();
            debug!(stock = %self.name, score, "Scored stock");
            score
        })
    }

    fn calculate_reversed_position_score(&self) -> f64 {
        let distance_to_max = self.max_observed - self.current_price;
        let distance_to_min = self.current_price - self.min_observed;
        (distance_to_max - distance_to_min) / self.current_price
    }

    /// Market value of the held position
    pub fn invested_money(&self) -> f64 {
        self.current_price * self.owned_shares as f64
    }

    /// Change over the last three observations, if there are enough of them
    pub fn trend(&self) -> Option<f64> {
        let len = self.price_history.len();
        (len >= 4).then(|| self.price_history[len - 1] - self.price_history[len - 4])
    }
}
