//! Error taxonomy. Each layer owns an enum that converts into [`TiberaError`].

mod storage_error;
mod transport_error;

pub use storage_error::StorageError;
pub use transport_error::TransportError;

/// Workspace-wide result alias.
pub type TiberaResult<T> = Result<T, TiberaError>;

/// Top-level error for the event pipeline.
#[derive(Debug, thiserror::Error)]
pub enum TiberaError {
    #[error("invalid event: {reason}")]
    InvalidEvent { reason: String },

    #[error("storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("transport error: {0}")]
    TransportError(#[from] TransportError),

    #[error("serialization error: {0}")]
    SerializationError(String),

    #[error("config error: {0}")]
    ConfigError(String),
}

impl From<serde_json::Error> for TiberaError {
    fn from(err: serde_json::Error) -> Self {
        TiberaError::SerializationError(err.to_string())
    }
}
