//! Trading actions produced by a decision pass

use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a trade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActionKind {
    Buy,
    Sell,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => f.write_str("BUY"),
            Self::Sell => f.write_str("SELL"),
        }
    }
}

/// One instruction: trade `shares` of `stock`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub stock: String,
    pub kind: ActionKind,
    pub shares: u64,
}

impl Action {
    pub fn buy(stock: impl Into<String>, shares: u64) -> Self {
        Self {
            stock: stock.into(),
            kind: ActionKind::Buy,
            shares,
        }
    }

    pub fn sell(stock: impl Into<String>, shares: u64) -> Self {
        Self {
            stock: stock.into(),
            kind: ActionKind::Sell,
            shares,
        }
    }
}

/// Renders as `name KIND quantity`
impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.stock, self.kind, self.shares)
    }
}
