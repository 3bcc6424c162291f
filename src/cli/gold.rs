use crate::GoldAction;
use crate::cli::ui::{self, StyleType};
use crate::store::{Ledger, NewGoldBar};
use anyhow::{Result, bail};
use chrono::{Local, NaiveDate};

fn ensure_positive(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        bail!("{name} must be a positive number");
    }
    Ok(())
}

fn ensure_non_negative(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        bail!("{name} must be zero or more");
    }
    Ok(())
}

fn or_today(date: Option<NaiveDate>) -> NaiveDate {
    date.unwrap_or_else(|| Local::now().date_naive())
}

pub fn run(ledger: &Ledger, action: GoldAction) -> Result<()> {
    match action {
        GoldAction::Add {
            weight,
            price,
            manufacturing,
            cashback,
            date,
        } => {
            ensure_positive("Weight", weight)?;
            ensure_non_negative("Price", price)?;
            ensure_non_negative("Manufacturing cost", manufacturing)?;
            ensure_non_negative("Cashback", cashback)?;

            let bar = ledger.add_gold_bar(NewGoldBar {
                weight,
                purchase_total_price: price,
                manufacturing_cost_per_gram: manufacturing,
                cashback_per_gram: cashback,
                purchase_date: or_today(date),
            })?;

            println!(
                "Added gold bar {} ({} g, net cost {})",
                ui::style_text(&bar.id, StyleType::TotalLabel),
                ui::format_amount(bar.weight),
                ui::format_amount(bar.net_cost()),
            );
        }
        GoldAction::Sell { id, price, date } => {
            ensure_non_negative("Sale price", price)?;

            let bar = ledger.sell_gold_bar(&id, price, or_today(date))?;
            let valuation = crate::core::valuate_bar(&bar, 0.0);

            println!(
                "Sold gold bar {} for {} (realized P/L {})",
                ui::style_text(&bar.id, StyleType::TotalLabel),
                ui::format_amount(price),
                ui::format_amount(valuation.profit_loss),
            );
        }
        GoldAction::SetDate { id, date } => {
            let bar = ledger.set_gold_bar_purchase_date(&id, date)?;
            println!(
                "Updated purchase date of {} to {}",
                ui::style_text(&bar.id, StyleType::TotalLabel),
                ui::format_date(date),
            );
        }
        GoldAction::Remove { id } => {
            ledger.delete_gold_bar(&id)?;
            println!("Removed gold bar {}", ui::style_text(&id, StyleType::TotalLabel));
        }
    }
    Ok(())
}
