//! Subscription lifecycle for the automatic pricing gate.
//!
//! Expiry is evaluated at read time: callers run [`reconcile`] whenever
//! settings are loaded, and persist the record if it reports a change.
//! "Expired" is never a stored state.

use crate::core::model::{PriceMode, PricingSettings, Subscription};
use anyhow::Result;
use chrono::{DateTime, Duration, Months, Utc};
use std::fmt::Display;
use std::str::FromStr;
use tracing::debug;

/// Subscription length chosen at activation. Bare numbers mean months.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanDuration {
    Minutes(u32),
    Days(u32),
    Weeks(u32),
    Months(u32),
}

impl PlanDuration {
    pub fn end_from(&self, start: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            PlanDuration::Minutes(n) => start + Duration::minutes(i64::from(*n)),
            PlanDuration::Days(n) => start + Duration::days(i64::from(*n)),
            PlanDuration::Weeks(n) => start + Duration::weeks(i64::from(*n)),
            PlanDuration::Months(n) => start
                .checked_add_months(Months::new(*n))
                .unwrap_or(start + Duration::days(i64::from(*n) * 30)),
        }
    }
}

impl Display for PlanDuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlanDuration::Minutes(n) => write!(f, "{n} Minute(s)"),
            PlanDuration::Days(n) => write!(f, "{n} Day(s)"),
            PlanDuration::Weeks(n) => write!(f, "{n} Week(s)"),
            PlanDuration::Months(n) => write!(f, "{n} Month(s)"),
        }
    }
}

impl FromStr for PlanDuration {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let parse_count = |digits: &str| -> Result<u32> {
            let n: u32 = digits
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid duration: {}", s))?;
            if n == 0 {
                anyhow::bail!("Duration must be at least 1: {}", s);
            }
            Ok(n)
        };

        if let Some(digits) = s.strip_suffix("min") {
            Ok(PlanDuration::Minutes(parse_count(digits)?))
        } else if let Some(digits) = s.strip_suffix('d') {
            Ok(PlanDuration::Days(parse_count(digits)?))
        } else if let Some(digits) = s.strip_suffix('w') {
            Ok(PlanDuration::Weeks(parse_count(digits)?))
        } else if let Some(digits) = s.strip_suffix('M') {
            Ok(PlanDuration::Months(parse_count(digits)?))
        } else {
            // Bare numbers keep the old behavior: months.
            Ok(PlanDuration::Months(parse_count(s)?))
        }
    }
}

/// Grants automatic pricing until `now + duration` and switches the mode
/// to `Auto`.
pub fn activate(settings: &mut PricingSettings, now: DateTime<Utc>, duration: PlanDuration) {
    settings.subscription = Subscription {
        active: true,
        start_date: Some(now),
        end_date: Some(duration.end_from(now)),
        plan: duration.to_string(),
    };
    settings.price_mode = PriceMode::Auto;
}

/// Explicit cancellation: clears the subscription and reverts the mode
/// to the manual gram price. Idempotent.
pub fn cancel(settings: &mut PricingSettings) {
    settings.subscription = Subscription::default();
    settings.price_mode = PriceMode::ManualGram;
}

/// Applies the read-time expiry check. An active subscription whose end
/// date has passed (or is missing) is cleared and the mode reverts to
/// `ManualGram`. Returns whether the record changed and must be saved.
pub fn reconcile(settings: &mut PricingSettings, now: DateTime<Utc>) -> bool {
    if !settings.subscription.active {
        return false;
    }

    let expired = settings
        .subscription
        .end_date
        .is_none_or(|end| now >= end);
    if !expired {
        return false;
    }

    debug!(plan = %settings.subscription.plan, "Subscription expired, reverting to manual pricing");
    cancel(settings);
    true
}
