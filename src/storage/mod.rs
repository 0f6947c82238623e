pub mod file;
pub mod memory;
pub mod snapshot;

use crate::errors::LedgerError;

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Abstraction over the string-keyed storage medium snapshots live in.
///
/// `get` distinguishes an absent key (`Ok(None)`) from an unreadable medium
/// (`Err`); the snapshot codec treats both as recoverable.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

pub use file::FileStore;
pub use memory::MemoryStore;
pub use snapshot::{
    KEY_CATEGORIES, KEY_INCOME, KEY_ITEMS, KEY_MONTHLY_INCOME, LoadReport, SnapshotCodec,
};
