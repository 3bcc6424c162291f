//! Embedded record store.
//!
//! Gold bars, cash entries and the pricing settings live in a fjall
//! keyspace under the data directory, one partition per record kind,
//! values encoded as JSON. Listings are ordered by date descending.

use crate::core::model::{CashEntry, GoldBar, PricingSettings};
use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use fjall::{Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::debug;
use uuid::Uuid;

const GOLD_BARS: &str = "gold_bars";
const CASH_ENTRIES: &str = "cash_entries";
const SETTINGS: &str = "settings";
const SETTINGS_KEY: &str = "global";

/// Fields supplied by the user when adding a bar. The net cost is
/// derived here, once, and stored with the record.
#[derive(Debug, Clone)]
pub struct NewGoldBar {
    pub weight: f64,
    pub purchase_total_price: f64,
    pub manufacturing_cost_per_gram: f64,
    pub cashback_per_gram: f64,
    pub purchase_date: NaiveDate,
}

pub struct Ledger {
    keyspace: Keyspace,
    gold_bars: PartitionHandle,
    cash_entries: PartitionHandle,
    settings: PartitionHandle,
}

impl Ledger {
    pub fn open(path: &Path) -> Result<Self> {
        let keyspace = fjall::Config::new(path)
            .open()
            .with_context(|| format!("Failed to open ledger at {}", path.display()))?;
        let gold_bars = keyspace.open_partition(GOLD_BARS, PartitionCreateOptions::default())?;
        let cash_entries =
            keyspace.open_partition(CASH_ENTRIES, PartitionCreateOptions::default())?;
        let settings = keyspace.open_partition(SETTINGS, PartitionCreateOptions::default())?;

        Ok(Self {
            keyspace,
            gold_bars,
            cash_entries,
            settings,
        })
    }

    fn persist(&self) -> Result<()> {
        self.keyspace
            .persist(PersistMode::SyncAll)
            .context("Failed to persist ledger")
    }

    fn list<T: DeserializeOwned>(partition: &PartitionHandle) -> Result<Vec<T>> {
        let mut records = Vec::new();
        for kv in partition.iter() {
            let (_, value) = kv.context("Failed to read record")?;
            records.push(serde_json::from_slice(&value).context("Failed to decode record")?);
        }
        Ok(records)
    }

    // --- Gold bars ---

    pub fn add_gold_bar(&self, new_bar: NewGoldBar) -> Result<GoldBar> {
        let bar = GoldBar {
            id: Uuid::new_v4().to_string(),
            weight: new_bar.weight,
            purchase_total_price: new_bar.purchase_total_price,
            manufacturing_cost_per_gram: new_bar.manufacturing_cost_per_gram,
            cashback_per_gram: new_bar.cashback_per_gram,
            net_cost: Some(
                new_bar.purchase_total_price - new_bar.cashback_per_gram * new_bar.weight,
            ),
            purchase_date: new_bar.purchase_date,
            is_sold: false,
            sold_price: None,
            sold_date: None,
        };

        self.put_gold_bar(&bar)?;
        debug!(id = %bar.id, "Added gold bar");
        Ok(bar)
    }

    pub fn list_gold_bars(&self) -> Result<Vec<GoldBar>> {
        let mut bars: Vec<GoldBar> = Self::list(&self.gold_bars)?;
        bars.sort_by(|a, b| b.purchase_date.cmp(&a.purchase_date).then(a.id.cmp(&b.id)));
        Ok(bars)
    }

    pub fn get_gold_bar(&self, id: &str) -> Result<GoldBar> {
        let value = self
            .gold_bars
            .get(id)?
            .with_context(|| format!("No gold bar with id {id}"))?;
        serde_json::from_slice(&value).context("Failed to decode gold bar")
    }

    /// One-way transition: a sold bar keeps its sale price and date
    /// forever and cannot be sold again.
    pub fn sell_gold_bar(
        &self,
        id: &str,
        sold_price: f64,
        sold_date: NaiveDate,
    ) -> Result<GoldBar> {
        let mut bar = self.get_gold_bar(id)?;
        if bar.is_sold {
            bail!("Gold bar {id} is already sold");
        }

        bar.is_sold = true;
        bar.sold_price = Some(sold_price);
        bar.sold_date = Some(sold_date);
        self.put_gold_bar(&bar)?;
        debug!(id = %bar.id, "Recorded gold bar sale");
        Ok(bar)
    }

    /// Date correction. Touches only the purchase date; the stored net
    /// cost is never recomputed.
    pub fn set_gold_bar_purchase_date(&self, id: &str, date: NaiveDate) -> Result<GoldBar> {
        let mut bar = self.get_gold_bar(id)?;
        bar.purchase_date = date;
        self.put_gold_bar(&bar)?;
        debug!(id = %bar.id, "Updated gold bar purchase date");
        Ok(bar)
    }

    pub fn delete_gold_bar(&self, id: &str) -> Result<()> {
        // Surface an error for unknown ids instead of silently removing
        // nothing.
        self.get_gold_bar(id)?;
        self.gold_bars.remove(id)?;
        self.persist()?;
        debug!(id, "Deleted gold bar");
        Ok(())
    }

    fn put_gold_bar(&self, bar: &GoldBar) -> Result<()> {
        self.gold_bars
            .insert(&bar.id, serde_json::to_vec(bar)?)?;
        self.persist()
    }

    // --- Cash entries ---

    pub fn add_cash_entry(
        &self,
        amount: f64,
        description: &str,
        date: NaiveDate,
    ) -> Result<CashEntry> {
        let entry = CashEntry {
            id: Uuid::new_v4().to_string(),
            amount,
            description: description.to_string(),
            date,
        };

        self.put_cash_entry(&entry)?;
        debug!(id = %entry.id, "Added cash entry");
        Ok(entry)
    }

    pub fn list_cash_entries(&self) -> Result<Vec<CashEntry>> {
        let mut entries: Vec<CashEntry> = Self::list(&self.cash_entries)?;
        entries.sort_by(|a, b| b.date.cmp(&a.date).then(a.id.cmp(&b.id)));
        Ok(entries)
    }

    pub fn get_cash_entry(&self, id: &str) -> Result<CashEntry> {
        let value = self
            .cash_entries
            .get(id)?
            .with_context(|| format!("No cash entry with id {id}"))?;
        serde_json::from_slice(&value).context("Failed to decode cash entry")
    }

    pub fn update_cash_entry(
        &self,
        id: &str,
        amount: f64,
        description: &str,
        date: NaiveDate,
    ) -> Result<CashEntry> {
        let mut entry = self.get_cash_entry(id)?;
        entry.amount = amount;
        entry.description = description.to_string();
        entry.date = date;
        self.put_cash_entry(&entry)?;
        debug!(id = %entry.id, "Updated cash entry");
        Ok(entry)
    }

    pub fn delete_cash_entry(&self, id: &str) -> Result<()> {
        self.get_cash_entry(id)?;
        self.cash_entries.remove(id)?;
        self.persist()?;
        debug!(id, "Deleted cash entry");
        Ok(())
    }

    fn put_cash_entry(&self, entry: &CashEntry) -> Result<()> {
        self.cash_entries
            .insert(&entry.id, serde_json::to_vec(entry)?)?;
        self.persist()
    }

    // --- Settings ---

    /// Loads the single settings record, or defaults when none has been
    /// written yet.
    pub fn load_settings(&self) -> Result<PricingSettings> {
        match self.settings.get(SETTINGS_KEY)? {
            Some(value) => serde_json::from_slice(&value).context("Failed to decode settings"),
            None => Ok(PricingSettings::default()),
        }
    }

    pub fn save_settings(&self, settings: &PricingSettings) -> Result<()> {
        self.settings
            .insert(SETTINGS_KEY, serde_json::to_vec(settings)?)?;
        self.persist()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::PriceMode;
    use tempfile::tempdir;

    fn new_bar(weight: f64, price: f64, cashback: f64, date: NaiveDate) -> NewGoldBar {
        NewGoldBar {
            weight,
            purchase_total_price: price,
            manufacturing_cost_per_gram: 80.0,
            cashback_per_gram: cashback,
            purchase_date: date,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_add_computes_and_stores_net_cost() {
        let dir = tempdir().unwrap();
        let ledger = Ledger::open(dir.path()).unwrap();

        let bar = ledger
            .add_gold_bar(new_bar(10.0, 35000.0, 50.0, date(2025, 1, 15)))
            .unwrap();

        assert_eq!(bar.net_cost, Some(34500.0));
        assert!(!bar.is_sold);

        let stored = ledger.get_gold_bar(&bar.id).unwrap();
        assert_eq!(stored.net_cost, Some(34500.0));
    }

    #[test]
    fn test_list_gold_bars_orders_by_date_descending() {
        let dir = tempdir().unwrap();
        let ledger = Ledger::open(dir.path()).unwrap();

        ledger
            .add_gold_bar(new_bar(5.0, 17000.0, 0.0, date(2024, 6, 1)))
            .unwrap();
        ledger
            .add_gold_bar(new_bar(10.0, 35000.0, 50.0, date(2025, 1, 15)))
            .unwrap();
        ledger
            .add_gold_bar(new_bar(2.5, 9000.0, 0.0, date(2024, 12, 1)))
            .unwrap();

        let bars = ledger.list_gold_bars().unwrap();
        let dates: Vec<NaiveDate> = bars.iter().map(|b| b.purchase_date).collect();
        assert_eq!(
            dates,
            vec![date(2025, 1, 15), date(2024, 12, 1), date(2024, 6, 1)]
        );
    }

    #[test]
    fn test_sell_is_one_way() {
        let dir = tempdir().unwrap();
        let ledger = Ledger::open(dir.path()).unwrap();

        let bar = ledger
            .add_gold_bar(new_bar(10.0, 35000.0, 50.0, date(2025, 1, 15)))
            .unwrap();

        let sold = ledger
            .sell_gold_bar(&bar.id, 40000.0, date(2025, 3, 1))
            .unwrap();
        assert!(sold.is_sold);
        assert_eq!(sold.sold_price, Some(40000.0));
        assert_eq!(sold.sold_date, Some(date(2025, 3, 1)));

        let again = ledger.sell_gold_bar(&bar.id, 41000.0, date(2025, 3, 2));
        assert!(again.is_err());
    }

    #[test]
    fn test_date_correction_keeps_net_cost() {
        let dir = tempdir().unwrap();
        let ledger = Ledger::open(dir.path()).unwrap();

        let bar = ledger
            .add_gold_bar(new_bar(10.0, 35000.0, 50.0, date(2025, 1, 15)))
            .unwrap();

        let updated = ledger
            .set_gold_bar_purchase_date(&bar.id, date(2025, 1, 20))
            .unwrap();
        assert_eq!(updated.purchase_date, date(2025, 1, 20));
        assert_eq!(updated.net_cost, Some(34500.0));
    }

    #[test]
    fn test_delete_gold_bar() {
        let dir = tempdir().unwrap();
        let ledger = Ledger::open(dir.path()).unwrap();

        let bar = ledger
            .add_gold_bar(new_bar(10.0, 35000.0, 50.0, date(2025, 1, 15)))
            .unwrap();
        ledger.delete_gold_bar(&bar.id).unwrap();

        assert!(ledger.get_gold_bar(&bar.id).is_err());
        assert!(ledger.delete_gold_bar(&bar.id).is_err());
    }

    #[test]
    fn test_cash_entry_crud() {
        let dir = tempdir().unwrap();
        let ledger = Ledger::open(dir.path()).unwrap();

        let entry = ledger
            .add_cash_entry(1000.0, "salary", date(2025, 2, 1))
            .unwrap();
        ledger
            .add_cash_entry(-200.0, "groceries", date(2025, 2, 5))
            .unwrap();

        let entries = ledger.list_cash_entries().unwrap();
        assert_eq!(entries.len(), 2);
        // Most recent first.
        assert_eq!(entries[0].description, "groceries");

        let updated = ledger
            .update_cash_entry(&entry.id, 1200.0, "salary + bonus", date(2025, 2, 2))
            .unwrap();
        assert_eq!(updated.amount, 1200.0);

        ledger.delete_cash_entry(&entry.id).unwrap();
        assert_eq!(ledger.list_cash_entries().unwrap().len(), 1);
    }

    #[test]
    fn test_settings_default_and_roundtrip() {
        let dir = tempdir().unwrap();
        let ledger = Ledger::open(dir.path()).unwrap();

        let settings = ledger.load_settings().unwrap();
        assert_eq!(settings.price_mode, PriceMode::ManualGram);
        assert!(settings.manual_gram_price.is_none());

        let mut settings = settings;
        settings.manual_gram_price = Some(3600.0);
        settings.price_mode = PriceMode::ManualGram;
        ledger.save_settings(&settings).unwrap();

        let reloaded = ledger.load_settings().unwrap();
        assert_eq!(reloaded.manual_gram_price, Some(3600.0));
    }

    #[test]
    fn test_records_survive_reopen() {
        let dir = tempdir().unwrap();
        let bar_id;
        {
            let ledger = Ledger::open(dir.path()).unwrap();
            bar_id = ledger
                .add_gold_bar(new_bar(10.0, 35000.0, 50.0, date(2025, 1, 15)))
                .unwrap()
                .id;
        }

        let ledger = Ledger::open(dir.path()).unwrap();
        let bar = ledger.get_gold_bar(&bar_id).unwrap();
        assert_eq!(bar.weight, 10.0);
    }
}
