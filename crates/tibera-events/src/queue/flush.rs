//! Timer scheduling and the flush loop.
//!
//! At most one timer is armed at a time: arming a new one aborts the old.
//! A timer task releases its slot before it starts flushing, so aborting a
//! timer can only ever cancel a sleep, never an in-flight request.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::Instrument;

use tibera_observability::tracing_setup::events;
use tibera_observability::{batch_span, flush_span};

use crate::phase::TimerKind;

use super::Inner;

struct PendingFlush {
    kind: TimerKind,
    generation: u64,
    handle: JoinHandle<()>,
}

#[derive(Default)]
pub(crate) struct TimerSlot {
    pending: Option<PendingFlush>,
    generation: u64,
}

/// Owns the flushing flag for the duration of one flush, including when
/// the flush future is dropped midway.
struct FlushGuard<'a>(&'a AtomicBool);

impl<'a> FlushGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for FlushGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl Inner {
    fn timer(&self) -> MutexGuard<'_, TimerSlot> {
        self.timer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Arm the flush timer, replacing any pending one.
    pub(super) fn schedule(self: &Arc<Self>, delay: Duration, kind: TimerKind) {
        let Ok(runtime) = Handle::try_current() else {
            return;
        };

        let mut slot = self.timer();
        if let Some(previous) = slot.pending.take() {
            previous.handle.abort();
        }
        slot.generation = slot.generation.wrapping_add(1);
        let generation = slot.generation;

        let inner = Arc::clone(self);
        let handle = runtime.spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            if inner.claim_timer(generation) {
                inner.flush().await;
            }
        });
        slot.pending = Some(PendingFlush {
            kind,
            generation,
            handle,
        });
    }

    /// Release the slot if it still belongs to `generation`.
    fn claim_timer(&self, generation: u64) -> bool {
        let mut slot = self.timer();
        let current = slot.pending.as_ref().map(|p| p.generation);
        if current != Some(generation) {
            return false;
        }
        slot.pending = None;
        true
    }

    pub(super) fn cancel_timer(&self) {
        if let Some(previous) = self.timer().pending.take() {
            previous.handle.abort();
        }
    }

    pub(super) fn pending_timer(&self) -> Option<TimerKind> {
        self.timer().pending.as_ref().map(|p| p.kind)
    }

    /// Deliver pending events in FIFO batches until the queue is empty or a
    /// batch fails.
    pub(super) async fn flush(self: Arc<Self>) {
        let Some(_guard) = FlushGuard::acquire(&self.flushing) else {
            // Never send concurrently; come back after the current delay.
            let retry_in = {
                let state = self.state();
                (!state.events.is_empty()).then(|| state.backoff.current())
            };
            if let Some(retry_in) = retry_in {
                self.schedule(retry_in, TimerKind::Backoff);
            }
            return;
        };

        if !self.online.load(Ordering::SeqCst) {
            tracing::debug!("events: offline, flush skipped");
            return;
        }
        let queued = self.state().events.len();
        if queued == 0 {
            return;
        }

        self.drain().instrument(flush_span!(queued)).await;
    }

    async fn drain(self: &Arc<Self>) {
        loop {
            let batch = {
                let state = self.state();
                state.front_batch(self.settings.batch_size)
            };
            if batch.is_empty() {
                break;
            }
            let size = batch.len();

            let result = self
                .transport
                .send(&batch)
                .instrument(batch_span!(size))
                .await;

            match result {
                Ok(()) => {
                    let remaining = {
                        let mut state = self.state();
                        state.remove_delivered(&batch);
                        state.backoff.reset();
                        self.persist(&state);
                        state.events.len()
                    };
                    self.metrics.record_batch_sent(size);
                    events::batch_delivered(size, remaining);
                }
                Err(err) => {
                    let retry_in = self.state().backoff.on_failure();
                    self.metrics.record_batch_failed();
                    events::batch_failed(size, &err.to_string(), retry_in);
                    self.schedule(retry_in, TimerKind::Backoff);
                    break;
                }
            }
        }
    }
}
