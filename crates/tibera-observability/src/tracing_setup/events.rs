//! Structured log events for queue operations.
//!
//! Each function emits a `tracing` event with structured fields.

use std::time::Duration;

/// Log an accepted emission.
pub fn event_queued(event_type: &str, queue_len: usize) {
    tracing::debug!(
        event = "event_queued",
        event_type = %event_type,
        queue_len = queue_len,
        "event queued"
    );
}

/// Log an emission that was ignored.
pub fn event_rejected(reason: &str) {
    tracing::debug!(event = "event_rejected", reason = %reason, "event rejected");
}

/// Log capacity eviction.
pub fn events_evicted(count: usize, capacity: usize) {
    tracing::warn!(
        event = "events_evicted",
        count = count,
        capacity = capacity,
        "event queue full, oldest events evicted"
    );
}

/// Log a snapshot write or read that failed.
pub fn persistence_failed(operation: &str, error: &str) {
    tracing::warn!(
        event = "persistence_failed",
        operation = %operation,
        error = %error,
        "event queue persistence failed"
    );
}

/// Log the queue restored at startup.
pub fn snapshot_restored(restored: usize, discarded: usize) {
    tracing::info!(
        event = "snapshot_restored",
        restored = restored,
        discarded = discarded,
        "event queue restored from store"
    );
}

/// Log a delivered batch.
pub fn batch_delivered(size: usize, remaining: usize) {
    tracing::debug!(
        event = "batch_delivered",
        size = size,
        remaining = remaining,
        "event batch delivered"
    );
}

/// Log a failed batch and the retry delay it caused.
pub fn batch_failed(size: usize, error: &str, retry_in: Duration) {
    tracing::warn!(
        event = "batch_failed",
        size = size,
        error = %error,
        retry_in_ms = retry_in.as_millis() as u64,
        "event batch failed, will retry with backoff"
    );
}

/// Log a host lifecycle notification.
pub fn lifecycle_signal(signal: &str) {
    tracing::debug!(event = "lifecycle_signal", signal = %signal, "lifecycle signal");
}
