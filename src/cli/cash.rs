use crate::CashAction;
use crate::cli::ui::{self, StyleType};
use crate::store::Ledger;
use anyhow::{Result, bail};
use chrono::{Local, NaiveDate};

fn ensure_amount(value: f64) -> Result<()> {
    // Withdrawals are negative entries; only non-numbers are rejected.
    if !value.is_finite() {
        bail!("Amount must be a number");
    }
    Ok(())
}

fn or_today(date: Option<NaiveDate>) -> NaiveDate {
    date.unwrap_or_else(|| Local::now().date_naive())
}

pub fn run(ledger: &Ledger, action: CashAction) -> Result<()> {
    match action {
        CashAction::Add {
            amount,
            description,
            date,
        } => {
            ensure_amount(amount)?;
            let entry = ledger.add_cash_entry(amount, &description, or_today(date))?;
            println!(
                "Added cash entry {} ({})",
                ui::style_text(&entry.id, StyleType::TotalLabel),
                ui::format_amount(entry.amount),
            );
        }
        CashAction::Edit {
            id,
            amount,
            description,
            date,
        } => {
            ensure_amount(amount)?;
            let entry = ledger.update_cash_entry(&id, amount, &description, date)?;
            println!(
                "Updated cash entry {} ({})",
                ui::style_text(&entry.id, StyleType::TotalLabel),
                ui::format_amount(entry.amount),
            );
        }
        CashAction::Remove { id } => {
            ledger.delete_cash_entry(&id)?;
            println!(
                "Removed cash entry {}",
                ui::style_text(&id, StyleType::TotalLabel)
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_add_edit_remove_flow() {
        let dir = tempdir().unwrap();
        let ledger = Ledger::open(dir.path()).unwrap();

        run(
            &ledger,
            CashAction::Add {
                amount: 1000.0,
                description: "salary".to_string(),
                date: NaiveDate::from_ymd_opt(2025, 2, 1),
            },
        )
        .unwrap();

        let entries = ledger.list_cash_entries().unwrap();
        assert_eq!(entries.len(), 1);

        run(
            &ledger,
            CashAction::Edit {
                id: entries[0].id.clone(),
                amount: -200.0,
                description: "correction".to_string(),
                date: NaiveDate::from_ymd_opt(2025, 2, 2).unwrap(),
            },
        )
        .unwrap();
        assert_eq!(ledger.list_cash_entries().unwrap()[0].amount, -200.0);

        run(
            &ledger,
            CashAction::Remove {
                id: entries[0].id.clone(),
            },
        )
        .unwrap();
        assert!(ledger.list_cash_entries().unwrap().is_empty());
    }

    #[test]
    fn test_nan_amount_is_rejected() {
        let dir = tempdir().unwrap();
        let ledger = Ledger::open(dir.path()).unwrap();

        let result = run(
            &ledger,
            CashAction::Add {
                amount: f64::NAN,
                description: "bad".to_string(),
                date: None,
            },
        );
        assert!(result.is_err());
    }
}
