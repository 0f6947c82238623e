#![doc(test(attr(deny(warnings))))]

//! Kakeibo Core is the expense ledger and monthly aggregation engine behind
//! a household budget tracker: categories, expense entries, monthly income,
//! chart-ready breakdowns, and a string-keyed snapshot format.

pub mod config;
pub mod engine;
pub mod errors;
pub mod ledger;
pub mod palette;
pub mod reports;
pub mod storage;
pub mod time;
pub mod utils;

pub use engine::LedgerEngine;
pub use errors::{LedgerError, Result};
pub use ledger::{
    CategoryRecord, CategoryRegistry, EntryStore, ExpenseEntry, IncomeLedger, MonthFilter, MonthKey,
};
pub use palette::{ColorSource, DefaultPalette};
pub use reports::{format_amount, ChartData, EntryQuery, ReportService, SummaryRow};
pub use storage::{FileStore, KeyValueStore, MemoryStore, SnapshotCodec};
pub use time::{Clock, FixedClock, SystemClock};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Kakeibo Core tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
    }
}
