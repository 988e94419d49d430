//! The telemetry event record and the defaults applied when one is composed.

mod options;
mod privacy;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::errors::{TiberaError, TiberaResult};

pub use options::EmitOptions;
pub use privacy::PrivacyLevel;

/// Free-form string-keyed mapping used for payloads and context.
pub type Attributes = serde_json::Map<String, Value>;

/// Source tag stamped on every event produced in-process.
pub const CLIENT_SOURCE: &str = "client";

/// Idempotency keys longer than this are truncated (in characters).
pub const MAX_IDEMPOTENCY_KEY_CHARS: usize = 220;

/// Schema version used when the caller does not pick one.
pub const DEFAULT_SCHEMA_VERSION: u32 = 1;

/// A single telemetry record, as persisted and as sent on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub event_id: String,
    pub event_type: String,
    #[serde(with = "iso_millis")]
    pub ts: DateTime<Utc>,
    #[serde(default = "default_source")]
    pub source: String,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub correlation_id: Option<String>,
    pub idempotency_key: String,
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    #[serde(default)]
    pub privacy_level: PrivacyLevel,
    #[serde(default)]
    pub payload: Attributes,
    #[serde(default)]
    pub context: Attributes,
}

impl Event {
    /// Compose a new client event.
    ///
    /// `base_context` is shallow-merged under `options.context`, and
    /// `session_id` is used unless the options carry their own.
    /// A `null` payload becomes an empty object; any other non-object
    /// payload is rejected, as is an empty `event_type`.
    pub fn compose(
        event_type: &str,
        payload: Value,
        options: EmitOptions,
        base_context: &Attributes,
        session_id: Option<&str>,
    ) -> TiberaResult<Self> {
        if event_type.is_empty() {
            return Err(TiberaError::InvalidEvent {
                reason: "event_type must be a non-empty string".to_string(),
            });
        }

        let payload = match payload {
            Value::Object(map) => map,
            Value::Null => Attributes::new(),
            other => {
                return Err(TiberaError::InvalidEvent {
                    reason: format!("payload must be a JSON object, got {}", json_kind(&other)),
                })
            }
        };

        let event_id = Uuid::new_v4().to_string();
        let idempotency_key = match options.idempotency_key.as_deref() {
            Some(key) if !key.is_empty() => truncate_key(key),
            _ => truncate_key(&event_id),
        };

        let mut context = base_context.clone();
        if let Some(overrides) = options.context {
            context.extend(overrides);
        }

        Ok(Self {
            event_id,
            event_type: event_type.to_string(),
            ts: Utc::now(),
            source: CLIENT_SOURCE.to_string(),
            session_id: options
                .session_id
                .or_else(|| session_id.map(str::to_string)),
            correlation_id: options.correlation_id,
            idempotency_key,
            schema_version: options.schema_version.unwrap_or(DEFAULT_SCHEMA_VERSION),
            privacy_level: options.privacy_level.unwrap_or_default(),
            payload,
            context,
        })
    }
}

/// Clip an idempotency key to [`MAX_IDEMPOTENCY_KEY_CHARS`] characters.
pub fn truncate_key(key: &str) -> String {
    key.chars().take(MAX_IDEMPOTENCY_KEY_CHARS).collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn default_source() -> String {
    CLIENT_SOURCE.to_string()
}

fn default_schema_version() -> u32 {
    DEFAULT_SCHEMA_VERSION
}

/// RFC 3339 with millisecond precision and a `Z` suffix.
mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
