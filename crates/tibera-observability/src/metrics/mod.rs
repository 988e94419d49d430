//! Delivery metrics for the event queue.

pub mod queue_metrics;

pub use queue_metrics::{QueueMetrics, QueueMetricsSnapshot};
