use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::{LedgerError, Result};
use crate::ledger::month::{MonthFilter, MonthKey};
use crate::time::Clock;

/// Single expense. Immutable once recorded; the date is kept in its
/// persisted `YYYY-MM-DD` string form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExpenseEntry {
    pub id: i64,
    pub category: String,
    pub amount: f64,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub comment: String,
}

impl ExpenseEntry {
    /// Month the entry belongs to. `None` when the date is empty or malformed.
    pub fn month_key(&self) -> Option<MonthKey> {
        MonthKey::from_date_str(&self.date)
    }
}

/// Expense entries in insertion order, with timestamp-seeded id assignment.
///
/// Ids are `max(now_millis, last_id + 1)`, so they stay unique even when the
/// clock does not advance between inserts and keep growing past ids restored
/// from a snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryStore {
    entries: Vec<ExpenseEntry>,
    last_id: i64,
}

impl EntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<ExpenseEntry>) -> Self {
        let last_id = entries.iter().map(|entry| entry.id).fold(0, i64::max);
        EntryStore { entries, last_id }
    }

    /// Records an expense. Category membership is the caller's concern: the
    /// store also holds entries loaded from snapshots whose category may no
    /// longer be registered.
    pub fn add(
        &mut self,
        category: &str,
        amount: f64,
        date: Option<NaiveDate>,
        comment: &str,
        clock: &dyn Clock,
    ) -> Result<&ExpenseEntry> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(LedgerError::InvalidAmount(amount));
        }
        let date = date.unwrap_or_else(|| clock.today()).to_string();
        let id = clock.now_millis().max(self.last_id + 1);
        self.last_id = id;
        self.entries.push(ExpenseEntry {
            id,
            category: category.to_string(),
            amount,
            date,
            comment: comment.to_string(),
        });
        tracing::debug!(id, category, amount, "expense recorded");
        Ok(self.entries.last().expect("entry just pushed"))
    }

    /// Removes by id. Returns `false` when no such entry exists.
    pub fn remove(&mut self, id: i64) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        let removed = self.entries.len() != before;
        if removed {
            tracing::debug!(id, "expense removed");
        }
        removed
    }

    pub fn get(&self, id: i64) -> Option<&ExpenseEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn list(&self) -> &[ExpenseEntry] {
        &self.entries
    }

    pub fn list_for_month(&self, filter: MonthFilter) -> Vec<&ExpenseEntry> {
        match filter {
            MonthFilter::All => self.entries.iter().collect(),
            MonthFilter::Month(month) => self
                .entries
                .iter()
                .filter(|entry| entry.month_key() == Some(month))
                .collect(),
        }
    }

    /// Months that have at least one dated entry, most recent first.
    pub fn distinct_months(&self) -> Vec<MonthKey> {
        let months: BTreeSet<MonthKey> = self
            .entries
            .iter()
            .filter_map(ExpenseEntry::month_key)
            .collect();
        months.into_iter().rev().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
