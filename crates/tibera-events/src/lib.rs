//! # tibera-events
//!
//! Durable event queue for application telemetry. Events are buffered in
//! memory, mirrored to a local key-value store on every change, and flushed
//! to the ingestion endpoint in FIFO batches with exponential backoff.
//! Nothing in the public surface fails visibly: emitting is fire-and-forget
//! and every storage or delivery error is absorbed, logged, and counted.
//!
//! The queue needs a Tokio runtime to schedule flushes. Outside one, every
//! operation is a silent no-op.

pub mod backoff;
pub mod global;
pub mod phase;
pub mod queue;
pub mod settings;
pub mod transport;

pub use backoff::{Backoff, BackoffPolicy};
pub use phase::FlushPhase;
pub use queue::{DurableEventQueue, QueueBuilder};
pub use settings::QueueSettings;
pub use transport::{HttpTransport, Transport};

pub use tibera_core::{Attributes, EmitOptions, Event, PrivacyLevel};
