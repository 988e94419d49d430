use serde::{Deserialize, Serialize};

use super::defaults;

/// Event queue configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EventsConfig {
    /// Base URL of the ingestion service. Empty means the path is used as-is.
    pub endpoint_url: String,
    /// Path of the batch ingestion route.
    pub ingest_path: String,
    /// Store key holding the persisted queue snapshot.
    pub storage_key: String,
    /// Maximum number of pending events before the oldest are evicted.
    pub max_queue: usize,
    /// Maximum events per POST.
    pub batch_size: usize,
    /// Delay between an emit and the flush it schedules.
    pub debounce_ms: u64,
    /// Delay of the first flush after `init()`.
    pub init_flush_delay_ms: u64,
    /// Backoff after a success, and the starting point for growth.
    pub backoff_base_ms: u64,
    /// Multiplier applied to the backoff on every failed batch.
    pub backoff_factor: f64,
    /// Ceiling for the backoff.
    pub backoff_max_ms: u64,
    /// Optional per-request deadline. Unset means the transport default.
    pub request_timeout_secs: Option<u64>,
}

impl EventsConfig {
    /// Full ingestion URL (base URL joined with the ingest path).
    pub fn ingest_url(&self) -> String {
        let base = self.endpoint_url.trim_end_matches('/');
        format!("{base}{}", self.ingest_path)
    }
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            endpoint_url: defaults::DEFAULT_ENDPOINT_URL.to_string(),
            ingest_path: defaults::DEFAULT_INGEST_PATH.to_string(),
            storage_key: defaults::DEFAULT_STORAGE_KEY.to_string(),
            max_queue: defaults::DEFAULT_MAX_QUEUE,
            batch_size: defaults::DEFAULT_BATCH_SIZE,
            debounce_ms: defaults::DEFAULT_DEBOUNCE_MS,
            init_flush_delay_ms: defaults::DEFAULT_INIT_FLUSH_DELAY_MS,
            backoff_base_ms: defaults::DEFAULT_BACKOFF_BASE_MS,
            backoff_factor: defaults::DEFAULT_BACKOFF_FACTOR,
            backoff_max_ms: defaults::DEFAULT_BACKOFF_MAX_MS,
            request_timeout_secs: None,
        }
    }
}
