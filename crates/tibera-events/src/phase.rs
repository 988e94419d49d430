//! Flush status as an explicit state machine.
//!
//! The queue tracks two independent facts: whether a flush is in flight and
//! which kind of timer (if any) is pending. [`FlushPhase`] folds them into
//! one observable state, with an in-flight flush taking precedence.

/// Why a flush timer was armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Emit debounce, `flush_soon`, init, and lifecycle triggers.
    Debounce,
    /// Retry after a failed batch, or after colliding with an in-flight flush.
    Backoff,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushPhase {
    /// No flush in flight and no timer armed.
    Idle,
    /// A debounce timer is armed.
    Debounced,
    /// A flush is sending batches.
    Flushing,
    /// A retry timer is armed after a failure.
    BackingOff,
}

impl FlushPhase {
    pub fn derive(flushing: bool, pending: Option<TimerKind>) -> Self {
        if flushing {
            return FlushPhase::Flushing;
        }
        match pending {
            Some(TimerKind::Debounce) => FlushPhase::Debounced,
            Some(TimerKind::Backoff) => FlushPhase::BackingOff,
            None => FlushPhase::Idle,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FlushPhase::Idle => "idle",
            FlushPhase::Debounced => "debounced",
            FlushPhase::Flushing => "flushing",
            FlushPhase::BackingOff => "backing_off",
        }
    }
}
