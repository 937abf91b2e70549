//! Evaluation request parsing
//!
//! Input is line oriented and whitespace separated:
//!
//! ```text
//! <spendable_cash> <number_of_stocks> <days_remaining>
//! <name> <owned_shares> <price_1> ... <price_k>
//! ...
//! ```
//!
//! Prices are oldest first and every stock line needs at least one.

use crate::error::{BrokerError, Result};
use crate::stock::Stock;
use broker_history::HistoricPriceStore;
use std::collections::HashSet;
use std::str::FromStr;
use tracing::debug;

/// One stock line of the request
#[derive(Debug, Clone, PartialEq)]
pub struct StockQuote {
    pub name: String,
    pub owned_shares: u64,
    pub prices: Vec<f64>,
}

/// A parsed evaluation request
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationRequest {
    pub spendable_cash: f64,
    pub days_remaining: i64,
    pub quotes: Vec<StockQuote>,
}

impl EvaluationRequest {
    /// Parse the request text; blank lines are ignored
    pub fn parse(input: &str) -> Result<Self> {
        let mut lines = input
            .lines()
            .enumerate()
            .map(|(index, line)| (index + 1, line))
            .filter(|(_, line)| !line.trim().is_empty());

        let (header_line, header) = lines
            .next()
            .ok_or_else(|| BrokerError::invalid_input(1, "missing header line"))?;
        let mut tokens = header.split_whitespace();
        let spendable_cash: f64 = next_token(&mut tokens, header_line, "spendable cash")?;
        let number_of_stocks: usize = next_token(&mut tokens, header_line, "number of stocks")?;
        let days_remaining: i64 = next_token(&mut tokens, header_line, "days remaining")?;

        let mut quotes = Vec::with_capacity(number_of_stocks);
        let mut seen = HashSet::with_capacity(number_of_stocks);
        for expected in 0..number_of_stocks {
            let (line_number, line) = lines.next().ok_or_else(|| {
                BrokerError::invalid_input(
                    header_line + expected + 1,
                    format!("expected {number_of_stocks} stock lines, found {expected}"),
                )
            })?;
            let quote = parse_quote(line, line_number)?;
            if !seen.insert(quote.name.clone()) {
                return Err(BrokerError::invalid_input(
                    line_number,
                    format!("duplicate stock name '{}'", quote.name),
                ));
            }
            quotes.push(quote);
        }

        if let Some((line_number, _)) = lines.next() {
            return Err(BrokerError::invalid_input(
                line_number,
                format!("unexpected line after {number_of_stocks} stocks"),
            ));
        }

        debug!(
            spendable_cash,
            stocks = quotes.len(),
            days_remaining,
            "Parsed evaluation request"
        );

        Ok(Self {
            spendable_cash,
            days_remaining,
            quotes,
        })
    }

    /// Build the stock universe, extending each quote with stored history
    ///
    /// A stock already in `history` gets its stored series plus only the
    /// latest quoted price; a new stock uses its quoted prices as-is.
    pub fn build_stocks(&self, history: &HistoricPriceStore) -> Result<Vec<Stock>> {
        self.quotes
            .iter()
            .map(|quote| {
                let prices = match (history.history(&quote.name), quote.prices.last()) {
                    (Some(stored), Some(&latest)) => {
                        let mut prices = stored.to_vec();
                        prices.push(latest);
                        prices
                    }
                    _ => quote.prices.clone(),
                };
                Stock::new(quote.name.clone(), quote.owned_shares, prices)
            })
            .collect()
    }
}

/// Snapshot of every stock's effective history, ready to persist
pub fn history_from_stocks(stocks: &[Stock]) -> HistoricPriceStore {
    HistoricPriceStore::from_series(
        stocks
            .iter()
            .map(|stock| (stock.name(), stock.price_history().to_vec())),
    )
}

fn parse_quote(line: &str, line_number: usize) -> Result<StockQuote> {
    let mut tokens = line.split_whitespace();
    let name: String = next_token(&mut tokens, line_number, "stock name")?;
    let owned_shares: u64 = next_token(&mut tokens, line_number, "owned shares")?;

    let prices = tokens
        .map(|token| parse_token::<f64>(token, line_number, "price"))
        .collect::<Result<Vec<_>>>()?;
    if prices.is_empty() {
        return Err(BrokerError::invalid_input(
            line_number,
            format!("stock '{name}' has no prices"),
        ));
    }

    Ok(StockQuote {
        name,
        owned_shares,
        prices,
    })
}

fn next_token<'a, T: FromStr>(
    tokens: &mut impl Iterator<Item = &'a str>,
    line: usize,
    what: &str,
) -> Result<T> {
    let token = tokens
        .next()
        .ok_or_else(|| BrokerError::invalid_input(line, format!("missing {what}")))?;
    parse_token(token, line, what)
}

fn parse_token<T: FromStr>(token: &str, line: usize, what: &str) -> Result<T> {
    token
        .parse()
        .map_err(|_| BrokerError::invalid_input(line, format!("invalid {what} '{token}'")))
}
