/// Delivery errors. Every variant is treated as retryable by the queue.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("network error: {reason}")]
    NetworkError { reason: String },

    #[error("ingestion endpoint answered HTTP {status}")]
    HttpStatus { status: u16 },

    #[error("HTTP client could not be built: {reason}")]
    ClientBuild { reason: String },
}
