//! Aggregation of cash and gold into the displayed portfolio totals.

use crate::core::model::{CashEntry, GoldBar};
use crate::core::valuation::valuate_bar;

/// The four figures shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PortfolioSummary {
    pub cash_total: f64,
    pub gold_assets_value: f64,
    /// Realized and unrealized profit/loss summed over all bars. Sold
    /// bars keep contributing here even though they leave the asset
    /// total; that asymmetry is preserved from the observed behavior.
    pub total_profit_loss: f64,
    pub portfolio_total: f64,
}

/// Recomputes all totals from a full snapshot. Empty collections yield
/// zero totals; there are no error conditions.
pub fn aggregate(
    cash_entries: &[CashEntry],
    gold_bars: &[GoldBar],
    effective_gram_price: f64,
) -> PortfolioSummary {
    let cash_total: f64 = cash_entries.iter().map(|entry| entry.amount).sum();

    let mut gold_assets_value = 0.0;
    let mut total_profit_loss = 0.0;
    for bar in gold_bars {
        let valuation = valuate_bar(bar, effective_gram_price);
        total_profit_loss += valuation.profit_loss;
        if !valuation.realized {
            gold_assets_value += valuation.current_or_sale_value;
        }
    }

    PortfolioSummary {
        cash_total,
        gold_assets_value,
        total_profit_loss,
        portfolio_total: cash_total + gold_assets_value,
    }
}
