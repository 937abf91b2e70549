//! Decision policies
//!
//! A [`DecisionPolicy`] turns a [`StockReport`] into an ordered list of
//! [`Action`]s. [`BuyLowSellHigh`] is the production policy: it distrusts the
//! score until enough history has accumulated, then trades purely on rank.

use crate::action::Action;
use crate::error::{BrokerError, Result};
use crate::report::StockReport;
use crate::stock::Stock;
use broker_utils::EngineConfig;
use tracing::{debug, info};

/// Strategy that produces the action list for one evaluation
#[cfg_attr(test, mockall::automock)]
pub trait DecisionPolicy {
    /// Decide on the actions for this run, in execution order
    fn make_choices(&mut self, report: &StockReport) -> Result<Vec<Action>>;
}

/// Phase of the strategy, picked once per evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyMode {
    /// Not enough history to trust the score
    ColdStart,
    /// Score-driven trading
    SteadyState,
}

impl StrategyMode {
    pub fn select(longest_history_depth: usize, cold_start_depth: usize) -> Self {
        if longest_history_depth < cold_start_depth {
            Self::ColdStart
        } else {
            Self::SteadyState
        }
    }
}

/// Buy stocks trading near their historic low, sell holdings near their high
#[derive(Debug, Clone)]
pub struct BuyLowSellHigh {
    spendable_cash: f64,
    cold_start_depth: usize,
    liquidation_period: usize,
    choices: Vec<Action>,
}

impl BuyLowSellHigh {
    /// Create a policy with the default [`EngineConfig`] thresholds
    pub fn new(spendable_cash: f64) -> Self {
        let defaults = EngineConfig::default();
        Self {
            spendable_cash,
            cold_start_depth: defaults.cold_start_depth,
            liquidation_period: defaults.liquidation_period,
            choices: Vec::new(),
        }
    }

    /// Create a policy with thresholds taken from `config`
    ///
    /// Fails when `config` does not validate, e.g. a zero liquidation period.
    pub fn from_config(spendable_cash: f64, config: &EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            spendable_cash,
            cold_start_depth: config.cold_start_depth,
            liquidation_period: config.liquidation_period,
            choices: Vec::new(),
        })
    }

    /// Cash left after the buys recorded so far
    pub fn remaining_cash(&self) -> f64 {
        self.spendable_cash
    }

    /// Actions recorded so far
    pub fn choices(&self) -> &[Action] {
        &self.choices
    }

    fn buy(&mut self, stock: &Stock) {
        let price = stock.current_price();
        let mut shares = (self.spendable_cash / price).floor() as u64;
        // Division can round up onto the next whole share
        if shares > 0 && shares as f64 * price > self.spendable_cash {
            shares -= 1;
        }

        if shares == 0 {
            debug!(
                stock = stock.name(),
                price,
                cash = self.spendable_cash,
                "Cannot afford a single share"
            );
            return;
        }

        self.spendable_cash -= shares as f64 * price;
        debug!(stock = stock.name(), shares, cash_left = self.spendable_cash, "Buy");
        self.choices.push(Action::buy(stock.name(), shares));
    }

    fn sell(&mut self, stock: &Stock) {
        let shares = stock.owned_shares();
        debug!(stock = stock.name(), shares, "Sell");
        self.choices.push(Action::sell(stock.name(), shares));
    }

    fn cold_start(&mut self, report: &StockReport, depth: usize) -> Result<()> {
        let cheapest = report.cheapest_stock().ok_or(BrokerError::EmptyUniverse)?;
        self.buy(cheapest);

        if depth % self.liquidation_period == 0 {
            info!(depth, "Liquidating all holdings");
            for stock in report.owned_stocks() {
                self.sell(stock);
            }
        }
        Ok(())
    }

    fn steady_state(&mut self, report: &StockReport) {
        for stock in report.negative_score_owned_stocks() {
            self.sell(stock);
        }

        for stock in report.positive_score_stocks() {
            self.buy(stock);
        }
    }
}

impl DecisionPolicy for BuyLowSellHigh {
    fn make_choices(&mut self, report: &StockReport) -> Result<Vec<Action>> {
        let depth = report.longest_history_depth();
        let mode = StrategyMode::select(depth, self.cold_start_depth);
        info!(?mode, depth, cash = self.spendable_cash, "Making choices");

        match mode {
            StrategyMode::ColdStart => self.cold_start(report, depth)?,
            StrategyMode::SteadyState => self.steady_state(report),
        }

        Ok(self.choices.clone())
    }
}
