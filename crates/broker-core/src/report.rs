//! Point-in-time ranking of the stock universe
//!
//! [`StockReport`] takes ownership of every stock seen in the run and derives
//! the views the decision policy needs. Each derived view is computed on first
//! access and then reused; the report never changes after construction.

use crate::stock::Stock;
use comfy_table::Table;
use std::cell::OnceCell;
use tracing::debug;

/// Ranked, read-only snapshot of the stocks in one evaluation
#[derive(Debug)]
pub struct StockReport {
    stocks: Vec<Stock>,
    owned: Vec<usize>,
    total_invested_money: OnceCell<f64>,
    positive_score: OnceCell<Vec<usize>>,
    negative_score_owned: OnceCell<Vec<usize>>,
}

impl StockReport {
    /// Build a report over `stocks`, in input order
    pub fn new(stocks: Vec<Stock>) -> Self {
        let owned = stocks
            .iter()
            .enumerate()
            .filter(|(_, stock)| stock.is_owned())
            .map(|(index, _)| index)
            .collect();

        Self {
            stocks,
            owned,
            total_invested_money: OnceCell::new(),
            positive_score: OnceCell::new(),
            negative_score_owned: OnceCell::new(),
        }
    }

    /// All stocks, in input order
    pub fn stocks(&self) -> &[Stock] {
        &self.stocks
    }

    /// Stocks with at least one owned share, in input order
    pub fn owned_stocks(&self) -> Vec<&Stock> {
        self.resolve(&self.owned)
    }

    pub fn has_holdings(&self) -> bool {
        !self.owned.is_empty()
    }

    /// Sum of the market value of every held position
    pub fn total_invested_money(&self) -> f64 {
        *self.total_invested_money.get_or_init(|| {
            self.owned
                .iter()
                .map(|&index| self.stocks[index].invested_money())
                .sum()
        })
    }

    /// Buy candidates: every stock scoring above zero, best first
    pub fn positive_score_stocks(&self) -> Vec<&Stock> {
        let indices = self.positive_score.get_or_init(|| {
            let mut selected: Vec<usize> = (0..self.stocks.len())
                .filter(|&index| self.stocks[index].reversed_position_score() > 0.0)
                .collect();
            selected.sort_by(|&a, &b| self.score(b).total_cmp(&self.score(a)));
            debug!(count = selected.len(), "Ranked positive-score stocks");
            selected
        });
        self.resolve(indices)
    }

    /// Sell candidates: held stocks scoring zero or below, worst first
    pub fn negative_score_owned_stocks(&self) -> Vec<&Stock> {
        let indices = self.negative_score_owned.get_or_init(|| {
            let mut selected: Vec<usize> = self
                .owned
                .iter()
                .copied()
                .filter(|&index| self.stocks[index].reversed_position_score() <= 0.0)
                .collect();
            selected.sort_by(|&a, &b| self.score(a).total_cmp(&self.score(b)));
            debug!(count = selected.len(), "Ranked non-positive owned stocks");
            selected
        });
        self.resolve(indices)
    }

    /// Longest price history in the universe, zero when there are no stocks
    pub fn longest_history_depth(&self) -> usize {
        self.stocks
            .iter()
            .map(Stock::history_depth)
            .max()
            .unwrap_or(0)
    }

    /// Stock with the lowest current price; the first one wins ties
    pub fn cheapest_stock(&self) -> Option<&Stock> {
        self.stocks.iter().fold(None, |cheapest: Option<&Stock>, stock| {
            match cheapest {
                Some(best) if best.current_price() <= stock.current_price() => Some(best),
                _ => Some(stock),
            }
        })
    }

    fn score(&self, index: usize) -> f64 {
        self.stocks[index].reversed_position_score()
    }

    fn resolve(&self, indices: &[usize]) -> Vec<&Stock> {
        indices.iter().map(|&index| &self.stocks[index]).collect()
    }
}

/// Human-readable dump of the report, one table per section
pub fn render_report(report: &StockReport) -> String {
    let mut output = String::from("========= STOCK REPORT =========\n");

    let sections = [
        ("POSITIVE STOCKS", report.positive_score_stocks()),
        ("NEGATIVE STOCKS", report.negative_score_owned_stocks()),
        ("OWNED STOCKS", report.owned_stocks()),
    ];
    for (title, stocks) in sections {
        output.push_str(&format!("---------- {title} ----------\n"));
        output.push_str(&stock_table(&stocks).to_string());
        output.push('\n');
    }

    output.push_str(&format!(
        "invested money: {:.2}\nlongest history: {}\n",
        report.total_invested_money(),
        report.longest_history_depth()
    ));
    output
}

fn stock_table(stocks: &[&Stock]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        "name", "owned", "score", "min", "max", "current", "trend", "history",
    ]);

    for stock in stocks {
        let history = stock
            .price_history()
            .iter()
            .map(f64::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        table.add_row(vec![
            stock.name().to_string(),
            stock.owned_shares().to_string(),
            format!("{:.4}", stock.reversed_position_score()),
            stock.min_observed().to_string(),
            stock.max_observed().to_string(),
            stock.current_price().to_string(),
            stock
                .trend()
                .map_or_else(|| "-".to_string(), |trend| format!("{trend:.2}")),
            history,
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stock(name: &str, owned: u64, prices: &[f64]) -> Stock {
        Stock::new(name, owned, prices.to_vec()).unwrap()
    }

    fn names(stocks: &[&Stock]) -> Vec<String> {
        stocks.iter().map(|s| s.name().to_string()).collect()
    }

    fn sample_report() -> StockReport {
        StockReport::new(vec![
            // score (20 - 12 - 2) / 12 = 0.5
            stock("A", 0, &[10.0, 20.0, 12.0]),
            // score (20 - 18 - 8) / 18 < 0
            stock("B", 5, &[10.0, 20.0, 18.0]),
            // score (20 - 11 - 1) / 11 > 0.5
            stock("C", 2, &[10.0, 20.0, 11.0]),
            // midpoint, score 0
            stock("D", 1, &[10.0, 20.0, 15.0]),
            // score (20 - 19 - 9) / 19, worst
            stock("E", 3, &[10.0, 20.0, 19.0]),
        ])
    }

    #[test]
    fn test_owned_subset() {
        let report = sample_report();
        assert!(report.has_holdings());
        assert_eq!(names(&report.owned_stocks()), vec!["B", "C", "D", "E"]);
    }

    #[test]
    fn test_positive_scores_descending() {
        let report = sample_report();
        let positive = report.positive_score_stocks();
        assert_eq!(names(&positive), vec!["C", "A"]);
        assert!(positive.iter().all(|s| s.reversed_position_score() > 0.0));
        assert!(
            positive
                .windows(2)
                .all(|w| w[0].reversed_position_score() > w[1].reversed_position_score())
        );
    }

    #[test]
    fn test_negative_owned_scores_ascending_and_include_zero() {
        let report = sample_report();
        let negative = report.negative_score_owned_stocks();
        assert_eq!(names(&negative), vec!["E", "B", "D"]);
        assert!(
            negative
                .iter()
                .all(|s| s.is_owned() && s.reversed_position_score() <= 0.0)
        );
        assert!(
            negative
                .windows(2)
                .all(|w| w[0].reversed_position_score() < w[1].reversed_position_score())
        );
    }

    #[test]
    fn test_unowned_negative_stock_is_not_a_sell_candidate() {
        let report = StockReport::new(vec![stock("X", 0, &[1.0, 10.0, 9.0])]);
        assert!(report.negative_score_owned_stocks().is_empty());
        assert!(!report.has_holdings());
    }

    #[test]
    fn test_views_are_memoized() {
        let report = sample_report();
        let first: Vec<*const Stock> = report
            .positive_score_stocks()
            .into_iter()
            .map(std::ptr::from_ref)
            .collect();
        let second: Vec<*const Stock> = report
            .positive_score_stocks()
            .into_iter()
            .map(std::ptr::from_ref)
            .collect();
        assert_eq!(first, second);
        assert!(report.positive_score.get().is_some());
        assert!(report.negative_score_owned.get().is_none());
    }

    #[test]
    fn test_total_invested_money() {
        let report = sample_report();
        // 5 * 18 + 2 * 11 + 1 * 15 + 3 * 19
        assert!((report.total_invested_money() - 184.0).abs() < 1e-9);
    }

    #[test]
    fn test_longest_history_depth() {
        let report = StockReport::new(vec![
            stock("SHORT", 0, &[1.0]),
            stock("LONG", 0, &[1.0, 2.0, 3.0, 4.0]),
        ]);
        assert_eq!(report.longest_history_depth(), 4);
        assert_eq!(StockReport::new(Vec::new()).longest_history_depth(), 0);
    }

    #[test]
    fn test_cheapest_stock_first_wins_ties() {
        let report = StockReport::new(vec![
            stock("P", 0, &[9.0]),
            stock("Q", 0, &[3.0]),
            stock("R", 0, &[3.0]),
            stock("S", 0, &[12_000.0]),
        ]);
        assert_eq!(report.cheapest_stock().map(Stock::name), Some("Q"));
    }

    #[test]
    fn test_cheapest_stock_above_ten_thousand() {
        let report = StockReport::new(vec![stock("PRICEY", 0, &[25_000.0])]);
        assert_eq!(report.cheapest_stock().map(Stock::name), Some("PRICEY"));
    }

    #[test]
    fn test_cheapest_stock_empty_universe() {
        assert!(StockReport::new(Vec::new()).cheapest_stock().is_none());
    }

    #[test]
    fn test_render_report_sections() {
        let rendered = render_report(&sample_report());
        assert!(rendered.contains("POSITIVE STOCKS"));
        assert!(rendered.contains("NEGATIVE STOCKS"));
        assert!(rendered.contains("OWNED STOCKS"));
        assert!(rendered.contains("invested money: 184.00"));
    }
}
