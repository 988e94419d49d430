//! # tibera-observability
//!
//! Structured tracing for the event pipeline: subscriber setup, span and
//! event definitions for queue operations, and delivery counters that make
//! the queue's otherwise silent failures inspectable.

pub mod metrics;
pub mod tracing_setup;

pub use metrics::{QueueMetrics, QueueMetricsSnapshot};
pub use tracing_setup::{init_from_config, init_tracing, init_tracing_with_filter};
