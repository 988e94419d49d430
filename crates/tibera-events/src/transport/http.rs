//! reqwest-backed transport. One POST per batch, no retries of its own:
//! retry policy belongs to the queue.

use std::time::Duration;

use async_trait::async_trait;

use tibera_core::config::EventsConfig;
use tibera_core::errors::{TiberaError, TiberaResult, TransportError};
use tibera_core::Event;

use super::protocol::IngestBatch;
use super::Transport;

/// Configuration for the HTTP transport.
#[derive(Debug, Clone)]
pub struct HttpTransportConfig {
    /// Absolute URL of the ingestion route.
    pub url: String,
    /// Request deadline. `None` leaves it to the client defaults.
    pub timeout: Option<Duration>,
}

impl From<&EventsConfig> for HttpTransportConfig {
    fn from(config: &EventsConfig) -> Self {
        Self {
            url: config.ingest_url(),
            timeout: config.request_timeout_secs.map(Duration::from_secs),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    url: reqwest::Url,
}

impl HttpTransport {
    /// Build the client. Fails on a relative or malformed URL, since such a
    /// transport could never deliver and would retry forever.
    pub fn new(config: HttpTransportConfig) -> TiberaResult<Self> {
        let url = reqwest::Url::parse(&config.url).map_err(|e| {
            TiberaError::ConfigError(format!("invalid ingest url {:?}: {e}", config.url))
        })?;

        let mut builder = reqwest::Client::builder().gzip(true);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| TransportError::ClientBuild {
            reason: e.to_string(),
        })?;

        Ok(Self { client, url })
    }

    pub fn from_config(config: &EventsConfig) -> TiberaResult<Self> {
        Self::new(HttpTransportConfig::from(config))
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, events: &[Event]) -> Result<(), TransportError> {
        let response = self
            .client
            .post(self.url.clone())
            .json(&IngestBatch { events })
            .send()
            .await
            .map_err(|e| TransportError::NetworkError {
                reason: e.to_string(),
            })?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(TransportError::HttpStatus {
                status: status.as_u16(),
            })
        }
    }
}
