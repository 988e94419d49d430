use std::collections::HashMap;
use std::sync::Mutex;

use tibera_core::errors::{StorageError, TiberaResult};

use crate::KeyValueStore;

/// In-process store. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> TiberaResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries.lock().map_err(|e| {
            StorageError::LockPoisoned {
                details: e.to_string(),
            }
            .into()
        })
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> TiberaResult<Option<String>> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> TiberaResult<()> {
        self.entries()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> TiberaResult<()> {
        self.entries()?.remove(key);
        Ok(())
    }
}
