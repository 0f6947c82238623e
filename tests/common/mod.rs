use std::sync::Mutex;

use kakeibo_core::storage::FileStore;
use kakeibo_core::time::FixedClock;
use kakeibo_core::{DefaultPalette, LedgerEngine};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// File store in a unique directory that outlives the test body.
pub fn file_store_in_temp_dir() -> FileStore {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    FileStore::new(Some(base)).expect("create file store")
}

/// Engine over `store` with the clock pinned to the given date.
pub fn engine_at(year: i32, month: u32, day: u32, store: FileStore) -> LedgerEngine {
    LedgerEngine::load_with(
        Box::new(store),
        Box::new(DefaultPalette),
        Box::new(FixedClock::at_date(year, month, day)),
    )
}
