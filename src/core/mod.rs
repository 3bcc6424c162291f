//! Pure valuation core and its abstractions

pub mod cache;
pub mod log;
pub mod model;
pub mod portfolio;
pub mod pricing;
pub mod quotes;
pub mod subscription;
pub mod valuation;

// Re-export main types for cleaner imports
pub use model::{CashEntry, GoldBar, PriceMode, PricingSettings, Subscription};
pub use portfolio::{PortfolioSummary, aggregate};
pub use pricing::{GRAMS_PER_TROY_OUNCE, effective_gram_price, resolve_gram_price};
pub use quotes::{MarketQuotes, OuncePriceProvider, UsdRateProvider};
pub use valuation::{BarValuation, valuate_bar};
