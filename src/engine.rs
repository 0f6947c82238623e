use chrono::NaiveDate;

use crate::config::ConfigManager;
use crate::errors::{LedgerError, Result};
use crate::ledger::category::{CategoryRecord, CategoryRegistry};
use crate::ledger::entry::{EntryStore, ExpenseEntry};
use crate::ledger::income::IncomeLedger;
use crate::ledger::month::{MonthFilter, MonthKey};
use crate::palette::{ColorSource, DefaultPalette};
use crate::reports::{ChartData, EntryQuery, ReportService, SummaryRow};
use crate::storage::{FileStore, KeyValueStore, LoadReport, SnapshotCodec};
use crate::time::{Clock, SystemClock};

/// Facade that owns the ledger state and its collaborators. Every mutation
/// is validated, applied, then written back through the storage medium; a
/// failed write keeps the in-memory change and surfaces as `SnapshotWrite`.
pub struct LedgerEngine {
    categories: CategoryRegistry,
    entries: EntryStore,
    incomes: IncomeLedger,
    store: Box<dyn KeyValueStore>,
    colors: Box<dyn ColorSource>,
    clock: Box<dyn Clock>,
    warnings: Vec<String>,
    migrations: Vec<String>,
}

impl LedgerEngine {
    /// Reads the snapshot out of `store` with the default palette and the
    /// system clock. Missing or corrupt state loads as defaults, never as
    /// an error.
    pub fn load(store: Box<dyn KeyValueStore>) -> Self {
        Self::load_with(store, Box::new(DefaultPalette), Box::new(SystemClock))
    }

    pub fn load_with(
        store: Box<dyn KeyValueStore>,
        colors: Box<dyn ColorSource>,
        clock: Box<dyn Clock>,
    ) -> Self {
        let LoadReport {
            categories,
            entries,
            incomes,
            warnings,
            migrations,
        } = SnapshotCodec::load(store.as_ref(), colors.as_ref());
        let mut engine = Self {
            categories,
            entries,
            incomes,
            store,
            colors,
            clock,
            warnings,
            migrations,
        };
        engine.apply_carry_forward();
        engine
    }

    /// Engine over the file store at the configured data directory.
    pub fn open_default() -> Result<Self> {
        let config = ConfigManager::new()?.load()?;
        let store = FileStore::new(Some(config.resolve_data_dir()))?;
        Ok(Self::load(Box::new(store)))
    }

    fn apply_carry_forward(&mut self) {
        let current = MonthKey::from_date(self.clock.today());
        if self.incomes.carry_forward(current) {
            if let Err(err) = self.persist() {
                tracing::warn!("snapshot save after income carry-forward failed: {err}");
            }
        }
    }

    fn persist(&self) -> Result<()> {
        SnapshotCodec::save(
            self.store.as_ref(),
            &self.categories,
            &self.entries,
            &self.incomes,
        )
    }

    /// Registers a category and persists the snapshot.
    pub fn add_category(&mut self, name: &str) -> Result<CategoryRecord> {
        let record = self.categories.add(name, self.colors.as_ref())?.clone();
        self.persist()?;
        Ok(record)
    }

    /// Records an expense against a registered category and persists the
    /// snapshot. A `None` date defaults to today.
    pub fn add_entry(
        &mut self,
        category: &str,
        amount: f64,
        date: Option<NaiveDate>,
        comment: &str,
    ) -> Result<ExpenseEntry> {
        if !self.categories.contains(category) {
            return Err(LedgerError::InvalidCategory(category.to_string()));
        }
        let entry = self
            .entries
            .add(category, amount, date, comment, self.clock.as_ref())?
            .clone();
        self.persist()?;
        Ok(entry)
    }

    /// Removes an entry by id. Removing an absent id is not an error and
    /// does not touch the medium.
    pub fn remove_entry(&mut self, id: i64) -> Result<bool> {
        if self.entries.remove(id) {
            self.persist()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Declares the income for a month and persists the snapshot.
    pub fn set_income(&mut self, month: MonthKey, amount: f64) -> Result<()> {
        self.incomes.set_income(month, amount);
        self.persist()
    }

    pub fn categories(&self) -> &[CategoryRecord] {
        self.categories.list()
    }

    pub fn color_of(&self, name: &str) -> Option<&str> {
        self.categories.color_of(name)
    }

    pub fn entries(&self) -> &[ExpenseEntry] {
        self.entries.list()
    }

    pub fn entries_for(&self, filter: MonthFilter) -> Vec<&ExpenseEntry> {
        self.entries.list_for_month(filter)
    }

    pub fn entry(&self, id: i64) -> Option<&ExpenseEntry> {
        self.entries.get(id)
    }

    /// Months with at least one dated entry, most recent first.
    pub fn months(&self) -> Vec<MonthKey> {
        self.entries.distinct_months()
    }

    pub fn total_expense(&self, filter: MonthFilter) -> f64 {
        ReportService::total_expense(filter, &self.entries)
    }

    /// Declared income under the filter: the month's value, or the sum of
    /// every declared month for `All`.
    pub fn income(&self, filter: MonthFilter) -> f64 {
        match filter {
            MonthFilter::All => self.incomes.total_income(),
            MonthFilter::Month(month) => self.incomes.income_for(month),
        }
    }

    pub fn balance(&self, filter: MonthFilter) -> f64 {
        ReportService::balance(filter, &self.entries, &self.incomes)
    }

    pub fn base_income(&self) -> f64 {
        self.incomes.base_income()
    }

    pub fn category_breakdown(&self, filter: MonthFilter) -> Vec<(String, f64)> {
        ReportService::category_breakdown(filter, &self.categories, &self.entries)
    }

    pub fn chart_data(&self, filter: MonthFilter) -> ChartData {
        ReportService::chart_data(filter, &self.categories, &self.entries)
    }

    pub fn monthly_summary(&self) -> Vec<SummaryRow> {
        ReportService::monthly_summary(&self.entries, &self.incomes)
    }

    pub fn search(&self, query: &EntryQuery) -> Vec<&ExpenseEntry> {
        ReportService::filter_entries(&self.entries, query)
    }

    /// Recoveries applied by the last load.
    pub fn load_warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Legacy-format accommodations applied by the last load.
    pub fn migrations(&self) -> &[String] {
        &self.migrations
    }
}
