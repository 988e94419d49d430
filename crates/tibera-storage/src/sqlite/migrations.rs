//! Schema migrations, tracked with `PRAGMA user_version`.

use rusqlite::Connection;

use tibera_core::errors::{StorageError, TiberaResult};

use crate::to_storage_err;

/// Schema version after all migrations have run.
pub const LATEST_VERSION: u32 = 1;

/// Bring the schema up to [`LATEST_VERSION`]. Safe to run on every open.
pub fn run_migrations(conn: &Connection) -> TiberaResult<()> {
    let current: u32 = conn
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;

    if current < 1 {
        v001_kv_store(conn).map_err(|e| StorageError::MigrationFailed {
            version: 1,
            reason: e.to_string(),
        })?;
        tracing::debug!(version = 1, "storage: migration applied");
    }
    Ok(())
}

fn v001_kv_store(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS kv_store (
            key         TEXT PRIMARY KEY,
            value       TEXT NOT NULL,
            updated_at  TEXT NOT NULL
        );
        PRAGMA user_version = 1;
        ",
    )
}
