//! Per-bar valuation against the effective gram price.

use crate::core::model::GoldBar;

/// Current worth and profit/loss of a single bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarValuation {
    /// Market value of a held bar, or the sale price of a sold one.
    pub current_or_sale_value: f64,
    pub profit_loss: f64,
    /// Whether the profit/loss is locked in by a sale.
    pub realized: bool,
}

/// Values one bar. Sold bars use the recorded sale price and are
/// independent of the price argument; held bars fluctuate with it.
pub fn valuate_bar(bar: &GoldBar, effective_gram_price: f64) -> BarValuation {
    let net_cost = bar.net_cost();

    if bar.is_sold {
        let sale_value = bar.sold_price.unwrap_or(0.0);
        return BarValuation {
            current_or_sale_value: sale_value,
            profit_loss: sale_value - net_cost,
            realized: true,
        };
    }

    let current_value = bar.weight * effective_gram_price;
    BarValuation {
        current_or_sale_value: current_value,
        profit_loss: current_value - net_cost,
        realized: false,
    }
}

/// Sum of the current value of unsold bars. Sold bars leave the asset
/// total once sold; their realized gains only show up in aggregate P/L.
pub fn gold_assets_value(bars: &[GoldBar], effective_gram_price: f64) -> f64 {
    bars.iter()
        .filter(|bar| !bar.is_sold)
        .map(|bar| valuate_bar(bar, effective_gram_price).current_or_sale_value)
        .sum()
}
