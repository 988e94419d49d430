//! Span definitions for queue operations.

/// Create a flush span.
#[macro_export]
macro_rules! flush_span {
    ($queued:expr) => {
        tracing::info_span!("tibera.events.flush", queued = $queued)
    };
}

/// Create a span around a single batch POST.
#[macro_export]
macro_rules! batch_span {
    ($size:expr) => {
        tracing::debug_span!("tibera.events.batch", size = $size)
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const FLUSH: &str = "tibera.events.flush";
    pub const BATCH: &str = "tibera.events.batch";
}
