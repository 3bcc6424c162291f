pub mod cli;
pub mod config;
pub mod core;
pub mod providers;
pub mod store;

use crate::core::cache::QuoteCache;
use crate::core::model::PriceMode;
use crate::core::subscription::PlanDuration;
use anyhow::Result;
use chrono::NaiveDate;
use std::time::Duration;
use tracing::{debug, info};

/// Quotes fetched within this window are reused instead of re-scraped.
const QUOTE_TTL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub enum GoldAction {
    Add {
        weight: f64,
        price: f64,
        manufacturing: f64,
        cashback: f64,
        date: Option<NaiveDate>,
    },
    Sell {
        id: String,
        price: f64,
        date: Option<NaiveDate>,
    },
    SetDate {
        id: String,
        date: NaiveDate,
    },
    Remove {
        id: String,
    },
}

#[derive(Debug, Clone)]
pub enum CashAction {
    Add {
        amount: f64,
        description: String,
        date: Option<NaiveDate>,
    },
    Edit {
        id: String,
        amount: f64,
        description: String,
        date: NaiveDate,
    },
    Remove {
        id: String,
    },
}

#[derive(Debug, Clone)]
pub enum PriceAction {
    Mode { mode: PriceMode },
    SetGram { price: f64 },
    SetOunce { xau: f64, usd: f64 },
}

#[derive(Debug, Clone)]
pub enum SubscriptionAction {
    Activate { duration: PlanDuration },
    Cancel,
    Status,
}

#[derive(Debug, Clone)]
pub enum AppCommand {
    Summary,
    Gold(GoldAction),
    Cash(CashAction),
    Price(PriceAction),
    Subscription(SubscriptionAction),
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Gold tracker starting...");

    let config = match config_path {
        Some(path) => config::AppConfig::load_from_path(path)?,
        None => config::AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let data_path = config.default_data_path()?;
    std::fs::create_dir_all(&data_path)?;
    let ledger = store::Ledger::open(&data_path.join("ledger"))?;

    match command {
        AppCommand::Summary => {
            let ounce_base_url = config
                .providers
                .ounce
                .as_ref()
                .map_or("https://sa.investing.com", |p| &p.base_url);
            let ounce_provider = providers::InvestingOunceProvider::new(
                ounce_base_url,
                QuoteCache::new(QUOTE_TTL),
            )?;

            let rate_base_url = config
                .providers
                .rate
                .as_ref()
                .map_or("https://gold-price-live.com", |p| &p.base_url);
            let rate_provider =
                providers::SaghaRateProvider::new(rate_base_url, QuoteCache::new(QUOTE_TTL))?;

            cli::summary::run(&config, &ledger, &ounce_provider, &rate_provider).await
        }
        AppCommand::Gold(action) => cli::gold::run(&ledger, action),
        AppCommand::Cash(action) => cli::cash::run(&ledger, action),
        AppCommand::Price(action) => cli::pricing::run_price(&ledger, action),
        AppCommand::Subscription(action) => cli::pricing::run_subscription(&ledger, action),
    }
}
