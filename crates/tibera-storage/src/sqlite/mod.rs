//! SQLite-backed store: a single `kv_store` table, one row per key.

mod migrations;
mod pragmas;

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension};

use tibera_core::errors::{StorageError, TiberaResult};

use crate::{to_storage_err, KeyValueStore};

pub use migrations::{run_migrations, LATEST_VERSION};

/// Durable store. Writes go through a single serialized connection.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) a store backed by a file on disk.
    pub fn open(path: &Path) -> TiberaResult<Self> {
        let conn = Connection::open(path).map_err(|e| to_storage_err(e.to_string()))?;
        pragmas::apply_pragmas(&conn)?;
        Self::initialize(conn)
    }

    /// Open an in-memory store (for testing).
    pub fn open_in_memory() -> TiberaResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| to_storage_err(e.to_string()))?;
        Self::initialize(conn)
    }

    fn initialize(conn: Connection) -> TiberaResult<Self> {
        run_migrations(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> TiberaResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| {
            StorageError::LockPoisoned {
                details: e.to_string(),
            }
            .into()
        })
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> TiberaResult<Option<String>> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT value FROM kv_store WHERE key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))
    }

    fn set(&self, key: &str, value: &str) -> TiberaResult<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO kv_store (key, value, updated_at)
             VALUES (?1, ?2, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at",
            params![key, value],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> TiberaResult<()> {
        let conn = self.conn()?;
        conn.execute("DELETE FROM kv_store WHERE key = ?1", params![key])
            .map_err(|e| to_storage_err(e.to_string()))?;
        Ok(())
    }
}
