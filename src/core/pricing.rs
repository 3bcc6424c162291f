//! Resolution of the effective EGP-per-gram price of pure gold.

use crate::core::model::{PriceMode, PricingSettings};
use crate::core::quotes::MarketQuotes;

/// Grams per troy ounce. Converts a USD/ounce quote plus an EGP/USD rate
/// into EGP per gram of 24-karat gold.
pub const GRAMS_PER_TROY_OUNCE: f64 = 31.1035;

/// Resolves the single gram price used everywhere valuation is needed.
///
/// Priority order, first matching rule wins:
/// 1. Active subscription and `Auto` mode: derive from the API quotes; a
///    zero quote means "unavailable" and resolves to 0.
/// 2. `ManualGram`: the user-entered gram price, 0 when unset.
/// 3. `UsdOunce`: `(xau * usd) / 31.1035` with unset inputs as 0, so an
///    incomplete pair yields 0 rather than an error.
/// 4. Anything else (an `Auto` request without an active subscription)
///    resolves to 0.
///
/// The resolver never reinterprets the stored mode; reverting `Auto` to
/// `ManualGram` on expiry belongs to the subscription reconciler.
pub fn resolve_gram_price(
    mode: PriceMode,
    subscription_active: bool,
    manual_gram_price: Option<f64>,
    manual_xau_price: Option<f64>,
    manual_usd_price: Option<f64>,
    api_xau_price: f64,
    api_usd_rate: f64,
) -> f64 {
    if subscription_active && mode == PriceMode::Auto {
        if api_xau_price == 0.0 || api_usd_rate == 0.0 {
            return 0.0;
        }
        return (api_xau_price / GRAMS_PER_TROY_OUNCE) * api_usd_rate;
    }

    match mode {
        PriceMode::ManualGram => manual_gram_price.unwrap_or(0.0),
        PriceMode::UsdOunce => {
            (manual_xau_price.unwrap_or(0.0) * manual_usd_price.unwrap_or(0.0))
                / GRAMS_PER_TROY_OUNCE
        }
        PriceMode::Auto => 0.0,
    }
}

/// Convenience wrapper over [`resolve_gram_price`] for a settings record
/// plus the latest market quotes.
pub fn effective_gram_price(settings: &PricingSettings, quotes: &MarketQuotes) -> f64 {
    resolve_gram_price(
        settings.price_mode,
        settings.subscription.active,
        settings.manual_gram_price,
        settings.manual_xau_price,
        settings.manual_usd_price,
        quotes.xau_price,
        quotes.usd_rate,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_mode_with_active_subscription() {
        let price = resolve_gram_price(
            PriceMode::Auto,
            true,
            None,
            None,
            None,
            2650.0,
            49.5,
        );
        assert!((price - (2650.0 / GRAMS_PER_TROY_OUNCE) * 49.5).abs() < 1e-9);
    }

    #[test]
    fn test_auto_mode_ignores_manual_fields() {
        // Manual fields set simultaneously must not leak into the result.
        let price = resolve_gram_price(
            PriceMode::Auto,
            true,
            Some(9999.0),
            Some(1.0),
            Some(1.0),
            2650.0,
            49.5,
        );
        assert!((price - (2650.0 / GRAMS_PER_TROY_OUNCE) * 49.5).abs() < 1e-9);
    }

    #[test]
    fn test_auto_mode_with_unavailable_quote_returns_zero() {
        // Scenario 4: a zero API quote is "unknown", not an error and not
        // the manual fallback.
        assert_eq!(
            resolve_gram_price(PriceMode::Auto, true, Some(3600.0), None, None, 0.0, 49.5),
            0.0
        );
        assert_eq!(
            resolve_gram_price(PriceMode::Auto, true, Some(3600.0), None, None, 2650.0, 0.0),
            0.0
        );
    }

    #[test]
    fn test_auto_mode_without_subscription_returns_zero() {
        assert_eq!(
            resolve_gram_price(PriceMode::Auto, false, None, None, None, 2650.0, 49.5),
            0.0
        );
    }

    #[test]
    fn test_manual_gram_mode() {
        assert_eq!(
            resolve_gram_price(PriceMode::ManualGram, false, Some(3600.0), None, None, 0.0, 0.0),
            3600.0
        );
    }

    #[test]
    fn test_manual_gram_mode_unset_returns_zero() {
        let price = resolve_gram_price(PriceMode::ManualGram, false, None, None, None, 0.0, 0.0);
        assert_eq!(price, 0.0);
        assert!(!price.is_nan());
    }

    #[test]
    fn test_manual_gram_wins_over_active_subscription() {
        // An active subscription only matters when the stored mode is Auto.
        assert_eq!(
            resolve_gram_price(
                PriceMode::ManualGram,
                true,
                Some(3600.0),
                None,
                None,
                2650.0,
                49.5
            ),
            3600.0
        );
    }

    #[test]
    fn test_usd_ounce_mode() {
        // (2650 * 49.5) / 31.1035
        let price =
            resolve_gram_price(PriceMode::UsdOunce, false, None, Some(2650.0), Some(49.5), 0.0, 0.0);
        assert!((price - (2650.0 * 49.5) / GRAMS_PER_TROY_OUNCE).abs() < 1e-9);
        assert!(price > 4217.0 && price < 4218.0);
    }

    #[test]
    fn test_usd_ounce_mode_incomplete_pair_returns_zero() {
        assert_eq!(
            resolve_gram_price(PriceMode::UsdOunce, false, None, Some(2650.0), None, 0.0, 0.0),
            0.0
        );
        assert_eq!(
            resolve_gram_price(PriceMode::UsdOunce, false, None, None, Some(49.5), 0.0, 0.0),
            0.0
        );
    }

    #[test]
    fn test_resolution_is_pure() {
        let once = resolve_gram_price(PriceMode::Auto, true, None, None, None, 2650.0, 49.5);
        let twice = resolve_gram_price(PriceMode::Auto, true, None, None, None, 2650.0, 49.5);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_effective_gram_price_reads_settings() {
        let settings = PricingSettings {
            price_mode: PriceMode::ManualGram,
            manual_gram_price: Some(3600.0),
            ..Default::default()
        };
        let quotes = MarketQuotes::default();
        assert_eq!(effective_gram_price(&settings, &quotes), 3600.0);
    }
}
