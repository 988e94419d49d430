use std::sync::Arc;

use tibera_core::errors::{TiberaError, TiberaResult};
use tibera_core::TiberaConfig;
use tibera_storage::{open_store, KeyValueStore, MemoryStore};

use crate::settings::QueueSettings;
use crate::transport::{HttpTransport, Transport};

use super::DurableEventQueue;

/// Assembles a [`DurableEventQueue`]. A transport is required; the store
/// defaults to an in-process [`MemoryStore`].
#[derive(Default)]
pub struct QueueBuilder {
    settings: QueueSettings,
    store: Option<Arc<dyn KeyValueStore>>,
    transport: Option<Arc<dyn Transport>>,
}

impl QueueBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn settings(mut self, settings: QueueSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn build(self) -> TiberaResult<DurableEventQueue> {
        let transport = self
            .transport
            .ok_or_else(|| TiberaError::ConfigError("event queue needs a transport".into()))?;
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(MemoryStore::new()) as Arc<dyn KeyValueStore>);
        Ok(DurableEventQueue::new(self.settings, store, transport))
    }

    /// Wire a queue from config: the configured store backend and an HTTP
    /// transport pointed at the ingest URL.
    pub fn build_from_config(config: &TiberaConfig) -> TiberaResult<DurableEventQueue> {
        let store = open_store(&config.storage)?;
        let transport = HttpTransport::from_config(&config.events)?;
        Self::new()
            .settings(QueueSettings::from(&config.events))
            .store(store)
            .transport(Arc::new(transport))
            .build()
    }
}
