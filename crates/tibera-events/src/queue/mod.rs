//! The durable event queue: buffering, persistence, and lifecycle hooks.
//!
//! All queue mutation is synchronous under one lock and is mirrored to the
//! store before the lock is released. The only asynchronous work is the
//! flush, which runs on its own task and is guarded so that at most one is
//! in flight.

mod builder;
mod flush;
mod state;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde_json::Value;
use tokio::runtime::Handle;

use tibera_core::{Attributes, EmitOptions, Event};
use tibera_observability::tracing_setup::events;
use tibera_observability::{QueueMetrics, QueueMetricsSnapshot};
use tibera_storage::KeyValueStore;

use crate::backoff::Backoff;
use crate::phase::{FlushPhase, TimerKind};
use crate::settings::QueueSettings;
use crate::transport::Transport;

pub use builder::QueueBuilder;

use flush::TimerSlot;
use state::{decode_snapshot, QueueState};

/// Handle to a durable event queue. Clones share the same queue.
#[derive(Clone)]
pub struct DurableEventQueue {
    inner: Arc<Inner>,
}

pub(crate) struct Inner {
    settings: QueueSettings,
    store: Arc<dyn KeyValueStore>,
    transport: Arc<dyn Transport>,
    state: Mutex<QueueState>,
    timer: Mutex<TimerSlot>,
    flushing: AtomicBool,
    online: AtomicBool,
    metrics: QueueMetrics,
}

impl DurableEventQueue {
    pub fn new(
        settings: QueueSettings,
        store: Arc<dyn KeyValueStore>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let backoff = Backoff::new(settings.backoff);
        Self {
            inner: Arc::new(Inner {
                settings,
                store,
                transport,
                state: Mutex::new(QueueState::new(backoff)),
                timer: Mutex::new(TimerSlot::default()),
                flushing: AtomicBool::new(false),
                online: AtomicBool::new(true),
                metrics: QueueMetrics::new(),
            }),
        }
    }

    /// One-time setup: restore the persisted queue, start listening for
    /// lifecycle notifications, and arm the initial flush.
    ///
    /// Idempotent. A no-op outside a Tokio runtime.
    pub fn init(&self) {
        if Handle::try_current().is_err() {
            return;
        }
        {
            let mut state = self.inner.state();
            if state.initialized {
                return;
            }
            state.initialized = true;

            let (restored, skipped) = self.inner.load_snapshot();
            let evicted = state.restore(restored, self.inner.settings.max_queue);
            if evicted > 0 {
                self.inner.metrics.record_evicted(evicted);
            }
            if !state.events.is_empty() || skipped + evicted > 0 {
                events::snapshot_restored(state.events.len(), skipped + evicted);
            }
        }
        self.inner
            .schedule(self.inner.settings.init_flush_delay, TimerKind::Debounce);
    }

    /// Shallow-merge into the context attached to later emissions.
    pub fn set_base_context(&self, context: Attributes) {
        self.inner.state().base_context.extend(context);
    }

    /// Session id attached to later emissions that do not set their own.
    pub fn set_session_id(&self, session_id: Option<String>) {
        self.inner.state().session_id = session_id;
    }

    /// Record an event. Fire-and-forget: invalid input and use outside a
    /// Tokio runtime are silently ignored, and delivery happens later.
    pub fn emit(&self, event_type: &str, payload: Value, options: EmitOptions) {
        if Handle::try_current().is_err() {
            return;
        }
        self.init();

        let inner = &self.inner;
        {
            let mut state = inner.state();
            let event = match Event::compose(
                event_type,
                payload,
                options,
                &state.base_context,
                state.session_id.as_deref(),
            ) {
                Ok(event) => event,
                Err(err) => {
                    inner.metrics.record_dropped_invalid();
                    events::event_rejected(&err.to_string());
                    return;
                }
            };

            let evicted = state.push(event, inner.settings.max_queue);
            if evicted > 0 {
                inner.metrics.record_evicted(evicted);
                events::events_evicted(evicted, inner.settings.max_queue);
            }
            inner.persist(&state);
            inner.metrics.record_emitted();
            events::event_queued(event_type, state.events.len());
        }
        inner.schedule(inner.settings.debounce, TimerKind::Debounce);
    }

    /// Flush without waiting out the debounce.
    pub fn flush_soon(&self) {
        self.inner.schedule(Duration::ZERO, TimerKind::Debounce);
    }

    /// Run the flush routine now and wait for it.
    ///
    /// If another flush is already in flight this returns immediately after
    /// arming a retry; it never sends concurrently.
    pub async fn flush(&self) {
        Arc::clone(&self.inner).flush().await;
    }

    /// The host regained connectivity.
    pub fn notify_online(&self) {
        self.inner.online.store(true, Ordering::SeqCst);
        if self.is_initialized() {
            events::lifecycle_signal("online");
            self.inner.schedule(Duration::ZERO, TimerKind::Debounce);
        }
    }

    /// The host lost connectivity. Flushes are skipped until back online.
    pub fn notify_offline(&self) {
        self.inner.online.store(false, Ordering::SeqCst);
        if self.is_initialized() {
            events::lifecycle_signal("offline");
        }
    }

    /// The host is being hidden or backgrounded; deliver what we can.
    pub fn notify_hidden(&self) {
        if self.is_initialized() {
            events::lifecycle_signal("hidden");
            self.inner.schedule(Duration::ZERO, TimerKind::Debounce);
        }
    }

    /// Cancel the pending timer and make one last delivery attempt.
    pub async fn shutdown(&self) {
        self.inner.cancel_timer();
        self.flush().await;
        self.inner.cancel_timer();
    }

    // --- Read-only accessors ---

    /// Pending event count.
    pub fn len(&self) -> usize {
        self.inner.state().events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pending events, oldest first.
    pub fn snapshot(&self) -> Vec<Event> {
        self.inner.state().events.iter().cloned().collect()
    }

    /// Delay the next retry would use.
    pub fn backoff(&self) -> Duration {
        self.inner.state().backoff.current()
    }

    pub fn phase(&self) -> FlushPhase {
        let flushing = self.inner.flushing.load(Ordering::SeqCst);
        FlushPhase::derive(flushing, self.inner.pending_timer())
    }

    pub fn is_online(&self) -> bool {
        self.inner.online.load(Ordering::SeqCst)
    }

    pub fn is_initialized(&self) -> bool {
        self.inner.state().initialized
    }

    pub fn session_id(&self) -> Option<String> {
        self.inner.state().session_id.clone()
    }

    pub fn base_context(&self) -> Attributes {
        self.inner.state().base_context.clone()
    }

    pub fn metrics(&self) -> QueueMetricsSnapshot {
        self.inner.metrics.snapshot()
    }

    pub fn settings(&self) -> &QueueSettings {
        &self.inner.settings
    }
}

impl std::fmt::Debug for DurableEventQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DurableEventQueue")
            .field("len", &self.len())
            .field("phase", &self.phase())
            .field("online", &self.is_online())
            .finish()
    }
}

impl Inner {
    /// Poisoning is ignored: the queue must keep working after a panic
    /// elsewhere, and its state is valid between statements.
    fn state(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Mirror the pending events to the store. Failures are absorbed.
    fn persist(&self, state: &QueueState) {
        let encoded = match state.encode_snapshot() {
            Ok(encoded) => encoded,
            Err(err) => {
                self.metrics.record_persist_failure();
                events::persistence_failed("encode", &err.to_string());
                return;
            }
        };
        if let Err(err) = self.store.set(&self.settings.storage_key, &encoded) {
            self.metrics.record_persist_failure();
            events::persistence_failed("write", &err.to_string());
        }
    }

    /// Read the persisted snapshot. Missing, unreadable, or corrupt
    /// snapshots all yield an empty queue.
    fn load_snapshot(&self) -> (Vec<Event>, usize) {
        match self.store.get(&self.settings.storage_key) {
            Ok(Some(raw)) => decode_snapshot(&raw),
            Ok(None) => (Vec::new(), 0),
            Err(err) => {
                self.metrics.record_load_failure();
                events::persistence_failed("read", &err.to_string());
                (Vec::new(), 0)
            }
        }
    }
}
