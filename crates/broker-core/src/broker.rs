//! Broker orchestration
//!
//! The [`Broker`] owns the run's cash budget and one decision policy. It asks
//! the policy for its choices exactly once and renders them to an output
//! channel.

use crate::action::Action;
use crate::error::Result;
use crate::policy::{BuyLowSellHigh, DecisionPolicy};
use crate::report::StockReport;
use broker_utils::EngineConfig;
use serde::{Deserialize, Serialize};
use std::io::Write;
use tracing::info;

/// How the action list is written out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Count line, then `name KIND quantity` per action
    #[default]
    Lines,
    /// JSON array of actions
    Json,
}

/// Drives one decision pass over a stock report
pub struct Broker<P = BuyLowSellHigh> {
    spendable_cash: f64,
    policy: P,
}

impl Broker<BuyLowSellHigh> {
    /// Create a broker running [`BuyLowSellHigh`] with thresholds from `config`
    pub fn new(spendable_cash: f64, config: &EngineConfig) -> Result<Self> {
        let policy = BuyLowSellHigh::from_config(spendable_cash, config)?;
        Ok(Self::with_policy(spendable_cash, policy))
    }
}

impl<P: DecisionPolicy> Broker<P> {
    /// Create a broker around an existing policy
    pub fn with_policy(spendable_cash: f64, policy: P) -> Self {
        Self {
            spendable_cash,
            policy,
        }
    }

    pub fn spendable_cash(&self) -> f64 {
        self.spendable_cash
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Run the policy once and write the resulting actions to `out`
    pub fn make_decisions<W: Write>(
        &mut self,
        report: &StockReport,
        format: OutputFormat,
        out: &mut W,
    ) -> Result<Vec<Action>> {
        let choices = self.policy.make_choices(report)?;
        info!(
            actions = choices.len(),
            cash = self.spendable_cash,
            "Decisions made"
        );
        process_choices(&choices, format, out)?;
        Ok(choices)
    }
}

/// Render `choices` to `out` in the requested format
pub fn process_choices<W: Write>(
    choices: &[Action],
    format: OutputFormat,
    out: &mut W,
) -> Result<()> {
    match format {
        OutputFormat::Lines => {
            writeln!(out, "{}", choices.len())?;
            for choice in choices {
                writeln!(out, "{choice}")?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, choices)?;
            writeln!(out)?;
        }
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BrokerError;
    use crate::policy::MockDecisionPolicy;
    use crate::stock::Stock;

    fn render(choices: &[Action], format: OutputFormat) -> String {
        let mut out = Vec::new();
        process_choices(choices, format, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_line_protocol() {
        let choices = vec![Action::sell("B", 5), Action::buy("C", 22)];
        assert_eq!(render(&choices, OutputFormat::Lines), "2\nB SELL 5\nC BUY 22\n");
    }

    #[test]
    fn test_empty_choices_print_zero() {
        assert_eq!(render(&[], OutputFormat::Lines), "0\n");
    }

    #[test]
    fn test_json_output_preserves_order() {
        let choices = vec![Action::buy("A", 1), Action::sell("B", 2)];
        let rendered = render(&choices, OutputFormat::Json);
        let parsed: Vec<Action> = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed, choices);
    }

    #[test]
    fn test_policy_invoked_exactly_once() {
        let mut policy = MockDecisionPolicy::new();
        policy
            .expect_make_choices()
            .times(1)
            .returning(|_| Ok(vec![Action::buy("A", 3)]));

        let report = StockReport::new(vec![Stock::new("A", 0, vec![2.0]).unwrap()]);
        let mut broker = Broker::with_policy(10.0, policy);
        let mut out = Vec::new();

        let choices = broker
            .make_decisions(&report, OutputFormat::Lines, &mut out)
            .unwrap();

        assert_eq!(choices, vec![Action::buy("A", 3)]);
        assert_eq!(String::from_utf8(out).unwrap(), "1\nA BUY 3\n");
    }

    #[test]
    fn test_policy_error_writes_nothing() {
        let mut policy = MockDecisionPolicy::new();
        policy
            .expect_make_choices()
            .times(1)
            .returning(|_| Err(BrokerError::EmptyUniverse));

        let report = StockReport::new(Vec::new());
        let mut broker = Broker::with_policy(10.0, policy);
        let mut out = Vec::new();

        let err = broker
            .make_decisions(&report, OutputFormat::Lines, &mut out)
            .unwrap_err();
        assert!(matches!(err, BrokerError::EmptyUniverse));
        assert!(out.is_empty());
    }

    #[test]
    fn test_default_broker_end_to_end() {
        let report = StockReport::new(vec![Stock::new("A", 0, vec![10.0, 9.0, 8.0]).unwrap()]);
        let mut broker = Broker::new(1000.0, &EngineConfig::default()).unwrap();
        let mut out = Vec::new();

        broker
            .make_decisions(&report, OutputFormat::Lines, &mut out)
            .unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "1\nA BUY 125\n");
        assert_eq!(broker.policy().remaining_cash(), 0.0);
        assert_eq!(broker.spendable_cash(), 1000.0);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = EngineConfig {
            liquidation_period: 0,
            ..Default::default()
        };
        let err = Broker::new(1000.0, &config).err().unwrap();
        assert!(matches!(err, BrokerError::Config(_)));
        assert!(err.to_string().contains("liquidation_period"));
    }
}
