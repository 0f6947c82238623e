use std::result::Result as StdResult;

use thiserror::Error;

/// Unified error type for ledger validation and snapshot persistence.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Category already exists: {0}")]
    DuplicateCategory(String),
    #[error("Category name must not be empty")]
    EmptyName,
    #[error("Unknown category: {0}")]
    InvalidCategory(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(f64),
    #[error("Snapshot read failed: {0}")]
    SnapshotRead(String),
    #[error("Snapshot write failed: {0}")]
    SnapshotWrite(String),
}

pub type Result<T> = StdResult<T, LedgerError>;

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        LedgerError::SnapshotWrite(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        LedgerError::SnapshotWrite(err.to_string())
    }
}
