/// Errors from the local key-value store.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("migration failed at version {version}: {reason}")]
    MigrationFailed { version: u32, reason: String },

    #[error("store lock poisoned: {details}")]
    LockPoisoned { details: String },

    #[error("unknown storage backend: {backend}")]
    UnknownBackend { backend: String },
}
