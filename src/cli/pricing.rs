use crate::cli::ui::{self, StyleType};
use crate::core::model::PriceMode;
use crate::core::subscription::{self, PlanDuration};
use crate::store::Ledger;
use crate::{PriceAction, SubscriptionAction};
use anyhow::{Result, bail};
use chrono::Utc;
use tracing::info;

fn ensure_price(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        bail!("{name} must be zero or more");
    }
    Ok(())
}

pub fn run_price(ledger: &Ledger, action: PriceAction) -> Result<()> {
    let mut settings = ledger.load_settings()?;
    if subscription::reconcile(&mut settings, Utc::now()) {
        ledger.save_settings(&settings)?;
        info!("Subscription expired, pricing reverted to manual gram price");
    }

    match action {
        PriceAction::Mode { mode } => {
            if mode == PriceMode::Auto && !settings.subscription.active {
                bail!("Automatic pricing requires an active subscription");
            }
            settings.price_mode = mode;
            ledger.save_settings(&settings)?;
            println!("Pricing mode set to {mode}");
        }
        PriceAction::SetGram { price } => {
            ensure_price("Gram price", price)?;
            // Entering a gram price also selects it, matching the
            // dashboard ticker's behavior.
            settings.manual_gram_price = Some(price);
            settings.price_mode = PriceMode::ManualGram;
            ledger.save_settings(&settings)?;
            println!(
                "Manual gram price set to {}",
                ui::style_text(&ui::format_amount(price), StyleType::TotalValue)
            );
        }
        PriceAction::SetOunce { xau, usd } => {
            ensure_price("Ounce price", xau)?;
            ensure_price("USD rate", usd)?;
            settings.manual_xau_price = Some(xau);
            settings.manual_usd_price = Some(usd);
            settings.price_mode = PriceMode::UsdOunce;
            ledger.save_settings(&settings)?;

            let gram = crate::core::resolve_gram_price(
                PriceMode::UsdOunce,
                false,
                None,
                Some(xau),
                Some(usd),
                0.0,
                0.0,
            );
            println!(
                "Ounce pair set; derived gram price {}",
                ui::style_text(&ui::format_amount(gram), StyleType::TotalValue)
            );
        }
    }
    Ok(())
}

pub fn run_subscription(ledger: &Ledger, action: SubscriptionAction) -> Result<()> {
    let mut settings = ledger.load_settings()?;
    let now = Utc::now();
    if subscription::reconcile(&mut settings, now) {
        ledger.save_settings(&settings)?;
        info!("Subscription expired, pricing reverted to manual gram price");
    }

    match action {
        SubscriptionAction::Activate { duration } => {
            subscription::activate(&mut settings, now, duration);
            ledger.save_settings(&settings)?;
            let end = settings
                .subscription
                .end_date
                .map(|end| end.format("%Y-%m-%d %H:%M UTC").to_string())
                .unwrap_or_default();
            println!(
                "Subscription activated: {} (until {end}). Automatic pricing is on.",
                ui::style_text(&settings.subscription.plan, StyleType::TotalValue),
            );
        }
        SubscriptionAction::Cancel => {
            subscription::cancel(&mut settings);
            ledger.save_settings(&settings)?;
            println!("Subscription cancelled. Pricing reverted to the manual gram price.");
        }
        SubscriptionAction::Status => {
            if settings.subscription.active {
                let remaining = settings
                    .subscription
                    .end_date
                    .map_or(chrono::Duration::zero(), |end| end - now);
                let days = remaining.num_days().max(0);
                let hours = (remaining.num_hours() % 24).max(0);
                let minutes = (remaining.num_minutes() % 60).max(0);
                println!(
                    "Subscription {} ({}), {days}d {hours}h {minutes}m remaining",
                    ui::style_text("active", StyleType::TotalValue),
                    settings.subscription.plan,
                );
            } else {
                println!(
                    "Subscription {}. Pricing mode: {}",
                    ui::style_text("inactive", StyleType::Subtle),
                    settings.price_mode,
                );
            }
        }
    }
    Ok(())
}
