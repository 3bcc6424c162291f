//! Market quote abstractions for automatic pricing.

use anyhow::Result;
use async_trait::async_trait;

/// The pair of quotes automatic mode derives the gram price from. A
/// value of exactly 0 means "unavailable"; anything else is trusted
/// verbatim with no range validation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MarketQuotes {
    /// USD per troy ounce of gold.
    pub xau_price: f64,
    /// EGP per USD.
    pub usd_rate: f64,
}

impl MarketQuotes {
    pub fn is_available(&self) -> bool {
        self.xau_price != 0.0 && self.usd_rate != 0.0
    }
}

/// Fetches the USD-per-ounce gold quote.
#[async_trait]
pub trait OuncePriceProvider: Send + Sync {
    async fn fetch_ounce_price(&self) -> Result<f64>;
}

/// Fetches the EGP-per-USD exchange rate.
#[async_trait]
pub trait UsdRateProvider: Send + Sync {
    async fn fetch_usd_rate(&self) -> Result<f64>;
}
