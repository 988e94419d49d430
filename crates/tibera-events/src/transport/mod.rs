//! Transport layer: the delivery seam and its HTTP implementation.

pub mod http;
pub mod protocol;

use async_trait::async_trait;

use tibera_core::errors::TransportError;
use tibera_core::Event;

pub use http::{HttpTransport, HttpTransportConfig};
pub use protocol::{IngestBatch, IngestRequest};

/// Delivers one batch of events to the ingestion endpoint.
///
/// `Ok` means the endpoint acknowledged the whole batch. Every error is
/// treated as retryable; the batch stays queued.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, events: &[Event]) -> Result<(), TransportError>;
}
