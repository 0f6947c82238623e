//! Pure derivations over ledger state. Nothing here mutates or persists.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::Serialize;

use crate::ledger::category::CategoryRegistry;
use crate::ledger::entry::{EntryStore, ExpenseEntry};
use crate::ledger::income::IncomeLedger;
use crate::ledger::month::{MonthFilter, MonthKey};

/// Label, value, and color sequences for a pie chart, all three aligned
/// in registry order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub colors: Vec<String>,
}

/// One row of the per-month summary table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub month: MonthKey,
    pub expense: f64,
    pub income: f64,
    pub balance: f64,
}

impl SummaryRow {
    /// Rows in deficit are rendered distinctly by consumers.
    pub fn is_deficit(&self) -> bool {
        self.balance < 0.0
    }
}

/// Keyword and date-range selection over the entry list.
///
/// The keyword is matched case-insensitively against the entry the way a
/// list renders it: date, category, amount, and comment. Entries without a
/// parseable date always pass the date bounds.
#[derive(Debug, Clone, Default)]
pub struct EntryQuery {
    pub keyword: String,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl EntryQuery {
    pub fn keyword(keyword: impl Into<String>) -> Self {
        EntryQuery {
            keyword: keyword.into(),
            ..EntryQuery::default()
        }
    }

    pub fn between(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        EntryQuery {
            from,
            to,
            ..EntryQuery::default()
        }
    }

    fn matches(&self, entry: &ExpenseEntry) -> bool {
        if !self.keyword.is_empty() {
            let haystack = format!(
                "{} {} {} {}",
                entry.date, entry.category, entry.amount, entry.comment
            )
            .to_lowercase();
            if !haystack.contains(&self.keyword.to_lowercase()) {
                return false;
            }
        }
        if self.from.is_none() && self.to.is_none() {
            return true;
        }
        match NaiveDate::parse_from_str(&entry.date, "%Y-%m-%d") {
            Ok(date) => {
                self.from.map_or(true, |from| date >= from) && self.to.map_or(true, |to| date <= to)
            }
            Err(_) => true,
        }
    }
}

pub struct ReportService;

impl ReportService {
    /// Sum of expense amounts under the month filter.
    pub fn total_expense(filter: MonthFilter, entries: &EntryStore) -> f64 {
        entries
            .list_for_month(filter)
            .iter()
            .map(|entry| entry.amount)
            .sum()
    }

    /// Income minus expense for a month. The all-months balance is
    /// suppressed and always reports zero.
    pub fn balance(filter: MonthFilter, entries: &EntryStore, incomes: &IncomeLedger) -> f64 {
        match filter {
            MonthFilter::All => 0.0,
            MonthFilter::Month(month) => {
                incomes.income_for(month) - Self::total_expense(filter, entries)
            }
        }
    }

    /// Per-category expense sums in registry order, zero when a category
    /// has no matching entries. Entries whose category is not registered
    /// are omitted here even though they count toward the total.
    pub fn category_breakdown(
        filter: MonthFilter,
        categories: &CategoryRegistry,
        entries: &EntryStore,
    ) -> Vec<(String, f64)> {
        let selected = entries.list_for_month(filter);
        categories
            .list()
            .iter()
            .map(|record| {
                let sum = selected
                    .iter()
                    .filter(|entry| entry.category == record.name)
                    .map(|entry| entry.amount)
                    .sum();
                (record.name.clone(), sum)
            })
            .collect()
    }

    pub fn chart_data(
        filter: MonthFilter,
        categories: &CategoryRegistry,
        entries: &EntryStore,
    ) -> ChartData {
        let breakdown = Self::category_breakdown(filter, categories, entries);
        let mut chart = ChartData::default();
        for ((name, value), record) in breakdown.into_iter().zip(categories.list()) {
            chart.labels.push(name);
            chart.values.push(value);
            chart.colors.push(record.color.clone());
        }
        chart
    }

    /// One row per month that appears in either the entries or the income
    /// ledger, ascending.
    pub fn monthly_summary(entries: &EntryStore, incomes: &IncomeLedger) -> Vec<SummaryRow> {
        let mut expense_by_month: BTreeMap<MonthKey, f64> = BTreeMap::new();
        for entry in entries.list() {
            if let Some(month) = entry.month_key() {
                *expense_by_month.entry(month).or_insert(0.0) += entry.amount;
            }
        }
        let mut months: BTreeSet<MonthKey> = expense_by_month.keys().copied().collect();
        months.extend(incomes.months());
        months
            .into_iter()
            .map(|month| {
                let expense = expense_by_month.get(&month).copied().unwrap_or(0.0);
                let income = incomes.income_for(month);
                SummaryRow {
                    month,
                    expense,
                    income,
                    balance: income - expense,
                }
            })
            .collect()
    }

    pub fn filter_entries<'a>(entries: &'a EntryStore, query: &EntryQuery) -> Vec<&'a ExpenseEntry> {
        entries
            .list()
            .iter()
            .filter(|entry| query.matches(entry))
            .collect()
    }
}

/// Renders an amount the way the entry list shows it: whole amounts
/// without a fraction, followed by the currency symbol.
pub fn format_amount(amount: f64, symbol: &str) -> String {
    format!("{}{}", amount, symbol)
}
