use serde::{Deserialize, Serialize};

use super::defaults;

/// Local store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// "sqlite" or "memory".
    pub backend: String,
    /// Path of the SQLite database file (ignored by the memory backend).
    pub db_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: defaults::DEFAULT_STORAGE_BACKEND.to_string(),
            db_path: defaults::DEFAULT_DB_FILENAME.to_string(),
        }
    }
}
