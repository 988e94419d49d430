//! Shared test doubles for the event pipeline: a scriptable transport that
//! records what it receives, a store that always fails, and queue helpers.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use tibera_core::errors::{StorageError, TiberaResult, TransportError};
use tibera_core::Event;
use tibera_events::{DurableEventQueue, QueueSettings, Transport};
use tibera_storage::{KeyValueStore, MemoryStore};

/// Transport that accepts or rejects every batch depending on a switch,
/// records accepted batches, and tracks how many sends overlap.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    accept: AtomicBool,
    latency: Mutex<Duration>,
    batches: Mutex<Vec<Vec<Event>>>,
    attempts: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl RecordingTransport {
    /// Acknowledges every batch.
    pub fn accepting() -> Arc<Self> {
        let transport = Self::default();
        transport.accept.store(true, Ordering::SeqCst);
        Arc::new(transport)
    }

    /// Rejects every batch with HTTP 503.
    pub fn failing() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_accept(&self, accept: bool) {
        self.accept.store(accept, Ordering::SeqCst);
    }

    /// Simulated round-trip time for every send.
    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock().unwrap() = latency;
    }

    /// Batches acknowledged so far, in delivery order.
    pub fn batches(&self) -> Vec<Vec<Event>> {
        self.batches.lock().unwrap().clone()
    }

    /// Every event acknowledged so far, flattened.
    pub fn delivered(&self) -> Vec<Event> {
        self.batches().into_iter().flatten().collect()
    }

    /// Total send calls, accepted or not.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, events: &[Event]) -> Result<(), TransportError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let latency = *self.latency.lock().unwrap();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.accept.load(Ordering::SeqCst) {
            self.batches.lock().unwrap().push(events.to_vec());
            Ok(())
        } else {
            Err(TransportError::HttpStatus { status: 503 })
        }
    }
}

/// Store whose every operation fails, like a full or disabled local storage.
#[derive(Debug, Default)]
pub struct FailingStore;

impl KeyValueStore for FailingStore {
    fn get(&self, _key: &str) -> TiberaResult<Option<String>> {
        Err(StorageError::SqliteError {
            message: "storage unavailable".into(),
        }
        .into())
    }

    fn set(&self, _key: &str, _value: &str) -> TiberaResult<()> {
        Err(StorageError::SqliteError {
            message: "quota exceeded".into(),
        }
        .into())
    }

    fn remove(&self, _key: &str) -> TiberaResult<()> {
        Err(StorageError::SqliteError {
            message: "storage unavailable".into(),
        }
        .into())
    }
}

/// Queue with default settings over the given store and transport.
pub fn queue_with(
    store: Arc<dyn KeyValueStore>,
    transport: Arc<dyn Transport>,
) -> DurableEventQueue {
    DurableEventQueue::new(QueueSettings::default(), store, transport)
}

/// Queue with default settings, a fresh memory store, and `transport`.
/// Returns the store so tests can inspect the persisted snapshot.
pub fn memory_queue(transport: Arc<dyn Transport>) -> (DurableEventQueue, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let queue = queue_with(store.clone(), transport);
    (queue, store)
}

/// Decode the persisted snapshot under the default key.
/// `None` when nothing has been written yet.
pub fn persisted_events(store: &dyn KeyValueStore) -> Option<Vec<Event>> {
    let key = QueueSettings::default().storage_key;
    store
        .get(&key)
        .unwrap()
        .map(|raw| serde_json::from_str(&raw).unwrap())
}

/// Event types in order.
pub fn event_types(events: &[Event]) -> Vec<String> {
    events.iter().map(|e| e.event_type.clone()).collect()
}

/// The integer `n` field of each payload, in order.
pub fn payload_ns(events: &[Event]) -> Vec<u64> {
    events
        .iter()
        .map(|e| e.payload["n"].as_u64().unwrap())
        .collect()
}
