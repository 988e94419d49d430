//! Process-wide queue.
//!
//! The first queue passed to [`install`] becomes the global one for the
//! lifetime of the process; later installs hand back that same instance, so
//! repeated initialization never creates a second writer for the same store
//! key. The free functions forward to it and do nothing when no queue has
//! been installed.

use std::sync::OnceLock;

use serde_json::Value;

use tibera_core::{Attributes, EmitOptions};

use crate::queue::DurableEventQueue;

/// Global singleton.
static QUEUE: OnceLock<DurableEventQueue> = OnceLock::new();

/// Install `queue` as the global queue, or return the one already installed.
/// The returned queue has been initialized.
pub fn install(queue: DurableEventQueue) -> &'static DurableEventQueue {
    let installed = QUEUE.get_or_init(|| queue);
    installed.init();
    installed
}

/// The installed queue, if any.
pub fn get() -> Option<&'static DurableEventQueue> {
    QUEUE.get()
}

pub fn emit(event_type: &str, payload: Value, options: EmitOptions) {
    if let Some(queue) = get() {
        queue.emit(event_type, payload, options);
    }
}

pub fn flush_soon() {
    if let Some(queue) = get() {
        queue.flush_soon();
    }
}

pub fn set_session_id(session_id: Option<String>) {
    if let Some(queue) = get() {
        queue.set_session_id(session_id);
    }
}

pub fn set_base_context(context: Attributes) {
    if let Some(queue) = get() {
        queue.set_base_context(context);
    }
}

pub fn notify_online() {
    if let Some(queue) = get() {
        queue.notify_online();
    }
}

pub fn notify_offline() {
    if let Some(queue) = get() {
        queue.notify_offline();
    }
}

pub fn notify_hidden() {
    if let Some(queue) = get() {
        queue.notify_hidden();
    }
}
