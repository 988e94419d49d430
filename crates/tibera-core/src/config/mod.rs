//! Configuration, loaded from TOML. Every section falls back to its defaults.

pub mod defaults;
mod events_config;
mod observability_config;
mod storage_config;

use serde::{Deserialize, Serialize};

pub use events_config::EventsConfig;
pub use observability_config::ObservabilityConfig;
pub use storage_config::StorageConfig;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TiberaConfig {
    pub events: EventsConfig,
    pub storage: StorageConfig,
    pub observability: ObservabilityConfig,
}

impl TiberaConfig {
    /// Parse a TOML document. Missing sections and fields keep their defaults.
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }
}
