//! # tibera-storage
//!
//! Key-value persistence for the event queue snapshot. One key maps to one
//! string value, the way browser local storage behaves. `SqliteStore` is the
//! durable backend; `MemoryStore` keeps everything in-process.

mod memory;
pub mod sqlite;

use std::path::Path;
use std::sync::Arc;

use tibera_core::config::StorageConfig;
use tibera_core::errors::{StorageError, TiberaError, TiberaResult};

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// A string-to-string store with overwrite semantics.
pub trait KeyValueStore: Send + Sync {
    /// Read the value under `key`, if any.
    fn get(&self, key: &str) -> TiberaResult<Option<String>>;

    /// Write `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> TiberaResult<()>;

    /// Delete `key`. Deleting a missing key is not an error.
    fn remove(&self, key: &str) -> TiberaResult<()>;
}

/// Open the backend named in the storage config.
pub fn open_store(config: &StorageConfig) -> TiberaResult<Arc<dyn KeyValueStore>> {
    match config.backend.as_str() {
        "sqlite" => Ok(Arc::new(SqliteStore::open(Path::new(&config.db_path))?)),
        "memory" => Ok(Arc::new(MemoryStore::new())),
        other => Err(StorageError::UnknownBackend {
            backend: other.to_string(),
        }
        .into()),
    }
}

/// Helper to wrap a SQLite failure message.
pub fn to_storage_err(message: String) -> TiberaError {
    StorageError::SqliteError { message }.into()
}
