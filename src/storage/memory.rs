use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::{KeyValueStore, Result};

/// In-memory store. Clones share the same map, the way browser tabs share
/// one localStorage area.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with the given pairs.
    pub fn seeded<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let store = Self::new();
        {
            let mut map = store.values.lock().expect("store map poisoned");
            for (key, value) in pairs {
                map.insert(key.into(), value.into());
            }
        }
        store
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let map = self.values.lock().expect("store map poisoned");
        Ok(map.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut map = self.values.lock().expect("store map poisoned");
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
