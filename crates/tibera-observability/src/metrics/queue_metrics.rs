//! Lock-free counters updated on the emit and flush paths.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Running counters. Every field only ever increases.
#[derive(Debug, Default)]
pub struct QueueMetrics {
    emitted: AtomicU64,
    dropped_invalid: AtomicU64,
    evicted: AtomicU64,
    persist_failures: AtomicU64,
    load_failures: AtomicU64,
    batches_sent: AtomicU64,
    events_delivered: AtomicU64,
    batches_failed: AtomicU64,
}

/// Point-in-time copy of [`QueueMetrics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueMetricsSnapshot {
    pub emitted: u64,
    pub dropped_invalid: u64,
    pub evicted: u64,
    pub persist_failures: u64,
    pub load_failures: u64,
    pub batches_sent: u64,
    /// Events in acknowledged batches. Includes events that were evicted
    /// locally while their batch was in flight, since the endpoint still
    /// received them.
    pub events_delivered: u64,
    pub batches_failed: u64,
}

impl QueueMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_emitted(&self) {
        self.emitted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_dropped_invalid(&self) {
        self.dropped_invalid.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_evicted(&self, count: usize) {
        self.evicted.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn record_persist_failure(&self) {
        self.persist_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_load_failure(&self) {
        self.load_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// `events` is the size of the acknowledged batch.
    pub fn record_batch_sent(&self, events: usize) {
        self.batches_sent.fetch_add(1, Ordering::Relaxed);
        self.events_delivered.fetch_add(events as u64, Ordering::Relaxed);
    }

    pub fn record_batch_failed(&self) {
        self.batches_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> QueueMetricsSnapshot {
        QueueMetricsSnapshot {
            emitted: self.emitted.load(Ordering::Relaxed),
            dropped_invalid: self.dropped_invalid.load(Ordering::Relaxed),
            evicted: self.evicted.load(Ordering::Relaxed),
            persist_failures: self.persist_failures.load(Ordering::Relaxed),
            load_failures: self.load_failures.load(Ordering::Relaxed),
            batches_sent: self.batches_sent.load(Ordering::Relaxed),
            events_delivered: self.events_delivered.load(Ordering::Relaxed),
            batches_failed: self.batches_failed.load(Ordering::Relaxed),
        }
    }
}

impl QueueMetricsSnapshot {
    /// Fraction of attempted batches that were accepted (1.0 when none attempted).
    pub fn delivery_rate(&self) -> f64 {
        let attempted = self.batches_sent + self.batches_failed;
        if attempted == 0 {
            return 1.0;
        }
        self.batches_sent as f64 / attempted as f64
    }
}
