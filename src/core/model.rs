//! Record types shared across the store, the valuation core and the CLI.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// One purchased (or sold) bar of gold. Weights are grams of pure gold,
/// amounts are EGP.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoldBar {
    pub id: String,
    pub weight: f64,
    /// Total amount paid at purchase, manufacturing fee included.
    pub purchase_total_price: f64,
    pub manufacturing_cost_per_gram: f64,
    pub cashback_per_gram: f64,
    /// Acquisition cost after cashback, fixed at creation time. Records
    /// written by older builds may lack it; see [`GoldBar::net_cost`].
    #[serde(default)]
    pub net_cost: Option<f64>,
    pub purchase_date: NaiveDate,
    pub is_sold: bool,
    #[serde(default)]
    pub sold_price: Option<f64>,
    #[serde(default)]
    pub sold_date: Option<NaiveDate>,
}

impl GoldBar {
    /// The stored net cost, or the creation-time formula recomputed for
    /// records that predate the stored field. Both paths must agree:
    /// `purchase_total_price - cashback_per_gram * weight`.
    pub fn net_cost(&self) -> f64 {
        self.net_cost
            .unwrap_or(self.purchase_total_price - self.cashback_per_gram * self.weight)
    }
}

/// One cash deposit or withdrawal, EGP. Negative amounts are withdrawals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashEntry {
    pub id: String,
    pub amount: f64,
    pub description: String,
    pub date: NaiveDate,
}

/// How the effective gram price is obtained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PriceMode {
    /// A single user-entered EGP-per-gram price.
    #[default]
    ManualGram,
    /// User-entered USD/ounce quote plus EGP/USD rate.
    UsdOunce,
    /// Live market quotes; honored only while a subscription is active.
    Auto,
}

impl Display for PriceMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                PriceMode::ManualGram => "manual-gram",
                PriceMode::UsdOunce => "usd-ounce",
                PriceMode::Auto => "auto",
            }
        )
    }
}

impl FromStr for PriceMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "manual-gram" | "gram" => Ok(PriceMode::ManualGram),
            "usd-ounce" | "ounce" => Ok(PriceMode::UsdOunce),
            "auto" => Ok(PriceMode::Auto),
            _ => Err(anyhow::anyhow!("Invalid price mode: {}", s)),
        }
    }
}

/// Manually-administered subscription gating automatic pricing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Subscription {
    pub active: bool,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub plan: String,
}

/// The single per-user pricing record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PricingSettings {
    #[serde(default)]
    pub price_mode: PriceMode,
    #[serde(default)]
    pub manual_gram_price: Option<f64>,
    /// USD per troy ounce.
    #[serde(default)]
    pub manual_xau_price: Option<f64>,
    /// EGP per USD.
    #[serde(default)]
    pub manual_usd_price: Option<f64>,
    #[serde(default)]
    pub subscription: Subscription,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_net_cost_prefers_stored_value() {
        let bar = GoldBar {
            id: "b1".to_string(),
            weight: 10.0,
            purchase_total_price: 35000.0,
            manufacturing_cost_per_gram: 80.0,
            cashback_per_gram: 50.0,
            net_cost: Some(34500.0),
            purchase_date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            is_sold: false,
            sold_price: None,
            sold_date: None,
        };
        assert_eq!(bar.net_cost(), 34500.0);
    }

    #[test]
    fn test_net_cost_fallback_matches_creation_formula() {
        let mut bar = GoldBar {
            id: "b1".to_string(),
            weight: 10.0,
            purchase_total_price: 35000.0,
            manufacturing_cost_per_gram: 80.0,
            cashback_per_gram: 50.0,
            net_cost: None,
            purchase_date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            is_sold: false,
            sold_price: None,
            sold_date: None,
        };
        // 35000 - 50 * 10
        assert_eq!(bar.net_cost(), 34500.0);

        // A legacy record and a stored one must valuate identically.
        bar.net_cost = Some(34500.0);
        assert_eq!(bar.net_cost(), 34500.0);
    }

    #[test]
    fn test_price_mode_serde_names() {
        assert_eq!(
            serde_json::to_string(&PriceMode::ManualGram).unwrap(),
            "\"manualGram\""
        );
        assert_eq!(
            serde_json::to_string(&PriceMode::UsdOunce).unwrap(),
            "\"usdOunce\""
        );
        assert_eq!(serde_json::to_string(&PriceMode::Auto).unwrap(), "\"auto\"");
    }

    #[test]
    fn test_price_mode_from_str() {
        assert_eq!(
            "manual-gram".parse::<PriceMode>().unwrap(),
            PriceMode::ManualGram
        );
        assert_eq!("ounce".parse::<PriceMode>().unwrap(), PriceMode::UsdOunce);
        assert_eq!("AUTO".parse::<PriceMode>().unwrap(), PriceMode::Auto);
        assert!("gold".parse::<PriceMode>().is_err());
    }

    #[test]
    fn test_settings_deserialize_with_missing_fields() {
        let settings: PricingSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings.price_mode, PriceMode::ManualGram);
        assert!(settings.manual_gram_price.is_none());
        assert!(!settings.subscription.active);
    }
}
