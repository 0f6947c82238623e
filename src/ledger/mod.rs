//! Ledger domain models: categories, expense entries, and monthly income.

pub mod category;
pub mod entry;
pub mod income;
pub mod month;

pub use category::{CategoryRecord, CategoryRegistry, DEFAULT_CATEGORIES};
pub use entry::{EntryStore, ExpenseEntry};
pub use income::IncomeLedger;
pub use month::{MonthFilter, MonthKey};
