//! PRAGMA configuration for file-backed connections.
//!
//! WAL mode, NORMAL sync, 5s busy_timeout.

use rusqlite::Connection;

use tibera_core::errors::TiberaResult;

use crate::to_storage_err;

pub fn apply_pragmas(conn: &Connection) -> TiberaResult<()> {
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA busy_timeout = 5000;
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
