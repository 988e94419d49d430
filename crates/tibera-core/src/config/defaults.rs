// Single source of truth for all default values.

// --- Events ---
pub const DEFAULT_ENDPOINT_URL: &str = "";
pub const DEFAULT_INGEST_PATH: &str = "/api/events";
pub const DEFAULT_STORAGE_KEY: &str = "tibera.events.queue.v1";
pub const DEFAULT_MAX_QUEUE: usize = 500;
pub const DEFAULT_BATCH_SIZE: usize = 25;
pub const DEFAULT_DEBOUNCE_MS: u64 = 250;
pub const DEFAULT_INIT_FLUSH_DELAY_MS: u64 = 1_000;
pub const DEFAULT_BACKOFF_BASE_MS: u64 = 400;
pub const DEFAULT_BACKOFF_FACTOR: f64 = 1.6;
pub const DEFAULT_BACKOFF_MAX_MS: u64 = 15_000;

// --- Storage ---
pub const DEFAULT_STORAGE_BACKEND: &str = "sqlite";
pub const DEFAULT_DB_FILENAME: &str = "tibera-events.db";

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = true;
