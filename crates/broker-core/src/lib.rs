//! Valuation, ranking and decision policy for stock-broker
//!
//! One evaluation flows one way:
//!
//! - [`EvaluationRequest`] parses the input and builds each [`Stock`] from its
//!   quoted prices plus any stored history
//! - [`StockReport`] ranks the universe by reversed position score
//! - a [`DecisionPolicy`] ([`BuyLowSellHigh`] in production) turns the report
//!   into [`Action`]s under the cash budget
//! - the [`Broker`] runs the policy once and renders the actions
//!
//! # Example
//!
//! ```
//! use broker_core::{Broker, EvaluationRequest, OutputFormat, StockReport};
//! use broker_history::HistoricPriceStore;
//! use broker_utils::EngineConfig;
//!
//! let request = EvaluationRequest::parse("1000 1 5\nA 0 10 9 8\n").unwrap();
//! let stocks = request.build_stocks(&HistoricPriceStore::new()).unwrap();
//! let report = StockReport::new(stocks);
//!
//! let mut out = Vec::new();
//! Broker::new(request.spendable_cash, &EngineConfig::default())
//!     .unwrap()
//!     .make_decisions(&report, OutputFormat::Lines, &mut out)
//!     .unwrap();
//! assert_eq!(String::from_utf8(out).unwrap(), "1\nA BUY 125\n");
//! ```

pub mod action;
pub mod broker;
pub mod error;
pub mod policy;
pub mod report;
pub mod request;
pub mod stock;

pub use action::{Action, ActionKind};
pub use broker::{Broker, OutputFormat, process_choices};
pub use error::{BrokerError, Result};
pub use policy::{BuyLowSellHigh, DecisionPolicy, StrategyMode};
pub use report::{StockReport, render_report};
pub use request::{EvaluationRequest, StockQuote, history_from_stocks};
pub use stock::Stock;
