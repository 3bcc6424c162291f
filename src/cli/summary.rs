use super::ui::{self, StyleType};
use crate::config::AppConfig;
use crate::core::model::{CashEntry, GoldBar, PricingSettings};
use crate::core::quotes::{MarketQuotes, OuncePriceProvider, UsdRateProvider};
use crate::core::{PriceMode, aggregate, effective_gram_price, subscription, valuate_bar};
use crate::store::Ledger;
use anyhow::Result;
use chrono::Utc;
use comfy_table::Cell;
use tracing::{info, warn};

/// Fetches both quotes concurrently. A failed fetch degrades to a zero
/// quote, which downstream valuation treats as "price unavailable".
async fn fetch_quotes(
    ounce_provider: &(dyn OuncePriceProvider + Send + Sync),
    rate_provider: &(dyn UsdRateProvider + Send + Sync),
) -> MarketQuotes {
    let pb = ui::new_progress_bar(2, true);
    pb.set_message("Fetching market quotes...");

    let (xau, usd) = futures::join!(
        async {
            let result = ounce_provider.fetch_ounce_price().await;
            pb.inc(1);
            result
        },
        async {
            let result = rate_provider.fetch_usd_rate().await;
            pb.inc(1);
            result
        }
    );
    pb.finish_and_clear();

    MarketQuotes {
        xau_price: xau.unwrap_or_else(|e| {
            warn!(error = %e, "Ounce quote fetch failed");
            0.0
        }),
        usd_rate: usd.unwrap_or_else(|e| {
            warn!(error = %e, "USD rate fetch failed");
            0.0
        }),
    }
}

fn gold_table(bars: &[GoldBar], gram_price: f64, currency: &str) -> comfy_table::Table {
    let price_known = gram_price != 0.0;
    let mut table = ui::new_styled_table();

    table.set_header(vec![
        ui::header_cell("Purchased"),
        ui::header_cell("Weight (g)"),
        ui::header_cell(&format!("Net Cost ({currency})")),
        ui::header_cell(&format!("Value ({currency})")),
        ui::header_cell(&format!("P/L ({currency})")),
        ui::header_cell("Status"),
        ui::header_cell("ID"),
    ]);

    for bar in bars {
        let valuation = valuate_bar(bar, gram_price);
        let status = match bar.sold_date {
            Some(date) if bar.is_sold => format!("Sold {}", ui::format_date(date)),
            _ if bar.is_sold => "Sold".to_string(),
            _ => "Held".to_string(),
        };

        // Held bars priced against an unknown gram price render as N/A
        // instead of a confident zero.
        let (value_cell, pl_cell) = if valuation.realized || price_known {
            (
                ui::amount_cell(valuation.current_or_sale_value),
                ui::profit_loss_cell(valuation.profit_loss),
            )
        } else {
            (ui::unknown_cell(), ui::unknown_cell())
        };

        table.add_row(vec![
            Cell::new(ui::format_date(bar.purchase_date)),
            ui::amount_cell(bar.weight),
            ui::amount_cell(bar.net_cost()),
            value_cell,
            pl_cell,
            Cell::new(status),
            Cell::new(bar.id.clone()),
        ]);
    }

    table
}

fn cash_table(entries: &[CashEntry], currency: &str) -> comfy_table::Table {
    let mut table = ui::new_styled_table();

    table.set_header(vec![
        ui::header_cell("Date"),
        ui::header_cell("Description"),
        ui::header_cell(&format!("Amount ({currency})")),
        ui::header_cell("ID"),
    ]);

    for entry in entries {
        table.add_row(vec![
            Cell::new(ui::format_date(entry.date)),
            Cell::new(entry.description.clone()),
            ui::profit_loss_cell(entry.amount),
            Cell::new(entry.id.clone()),
        ]);
    }

    table
}

fn print_price_line(settings: &PricingSettings, gram_price: f64, currency: &str) {
    if gram_price != 0.0 {
        println!(
            "Gold price: {} {currency}/g [{}]",
            ui::style_text(&ui::format_amount(gram_price), StyleType::TotalValue),
            settings.price_mode,
        );
    } else {
        // A zero resolution means "unknown", never a real price.
        println!(
            "Gold price: {} [{}]",
            ui::style_text("unavailable", StyleType::Error),
            settings.price_mode,
        );
    }
}

pub async fn run(
    config: &AppConfig,
    ledger: &Ledger,
    ounce_provider: &(dyn OuncePriceProvider + Send + Sync),
    rate_provider: &(dyn UsdRateProvider + Send + Sync),
) -> Result<()> {
    let mut settings = ledger.load_settings()?;
    if subscription::reconcile(&mut settings, Utc::now()) {
        ledger.save_settings(&settings)?;
        info!("Subscription expired, pricing reverted to manual gram price");
    }

    let quotes = if settings.subscription.active && settings.price_mode == PriceMode::Auto {
        fetch_quotes(ounce_provider, rate_provider).await
    } else {
        MarketQuotes::default()
    };

    let gram_price = effective_gram_price(&settings, &quotes);
    let bars = ledger.list_gold_bars()?;
    let cash_entries = ledger.list_cash_entries()?;
    let summary = aggregate(&cash_entries, &bars, gram_price);
    let currency = &config.currency;

    let price_known = gram_price != 0.0;
    let has_held_bars = bars.iter().any(|bar| !bar.is_sold);

    print_price_line(&settings, gram_price, currency);

    if !bars.is_empty() {
        println!(
            "\n{}",
            ui::style_text("Gold bars", StyleType::Title)
        );
        println!("{}", gold_table(&bars, gram_price, currency));
    }

    if !cash_entries.is_empty() {
        println!("\n{}", ui::style_text("Cash", StyleType::Title));
        println!("{}", cash_table(&cash_entries, currency));
    }

    ui::print_separator();

    // Totals involving held gold are unknown whenever the price is.
    let gold_figures_known = price_known || !has_held_bars;
    let format_total = |value: f64, known: bool| {
        if known {
            ui::style_text(&ui::format_amount(value), StyleType::TotalValue)
        } else {
            ui::style_text("N/A (price unavailable)", StyleType::Error)
        }
    };

    println!(
        "{} {}",
        ui::style_text(&format!("Gold assets ({currency}):"), StyleType::TotalLabel),
        format_total(summary.gold_assets_value, gold_figures_known),
    );
    println!(
        "{} {}",
        ui::style_text(&format!("Cash total ({currency}):"), StyleType::TotalLabel),
        ui::style_text(&ui::format_amount(summary.cash_total), StyleType::TotalValue),
    );
    println!(
        "{} {}",
        ui::style_text(&format!("Profit/Loss ({currency}):"), StyleType::TotalLabel),
        if gold_figures_known {
            let text = if summary.total_profit_loss > 0.0 {
                format!("+{}", ui::format_amount(summary.total_profit_loss))
            } else {
                ui::format_amount(summary.total_profit_loss)
            };
            if summary.total_profit_loss >= 0.0 {
                ui::style_text(&text, StyleType::TotalValue)
            } else {
                ui::style_text(&text, StyleType::Error)
            }
        } else {
            ui::style_text("N/A (price unavailable)", StyleType::Error)
        },
    );
    println!(
        "{} {}",
        ui::style_text(
            &format!("Portfolio total ({currency}):"),
            StyleType::TotalLabel
        ),
        format_total(summary.portfolio_total, gold_figures_known),
    );

    Ok(())
}
