use std::time::Duration;

use tibera_core::config::{defaults, EventsConfig};

use crate::backoff::BackoffPolicy;

/// Runtime parameters of a [`DurableEventQueue`](crate::DurableEventQueue).
#[derive(Debug, Clone)]
pub struct QueueSettings {
    /// Store key holding the JSON snapshot of pending events.
    pub storage_key: String,
    /// Pending events beyond this are evicted, oldest first.
    pub max_queue: usize,
    /// Maximum events per POST.
    pub batch_size: usize,
    /// Delay between an emit and its flush.
    pub debounce: Duration,
    /// Delay of the first flush after `init()`.
    pub init_flush_delay: Duration,
    pub backoff: BackoffPolicy,
}

impl Default for QueueSettings {
    fn default() -> Self {
        Self {
            storage_key: defaults::DEFAULT_STORAGE_KEY.to_string(),
            max_queue: defaults::DEFAULT_MAX_QUEUE,
            batch_size: defaults::DEFAULT_BATCH_SIZE,
            debounce: Duration::from_millis(defaults::DEFAULT_DEBOUNCE_MS),
            init_flush_delay: Duration::from_millis(defaults::DEFAULT_INIT_FLUSH_DELAY_MS),
            backoff: BackoffPolicy::default(),
        }
    }
}

impl From<&EventsConfig> for QueueSettings {
    fn from(config: &EventsConfig) -> Self {
        Self {
            storage_key: config.storage_key.clone(),
            max_queue: config.max_queue.max(1),
            batch_size: config.batch_size.max(1),
            debounce: Duration::from_millis(config.debounce_ms),
            init_flush_delay: Duration::from_millis(config.init_flush_delay_ms),
            backoff: BackoffPolicy::new(
                Duration::from_millis(config.backoff_base_ms),
                config.backoff_factor,
                Duration::from_millis(config.backoff_max_ms),
            ),
        }
    }
}
