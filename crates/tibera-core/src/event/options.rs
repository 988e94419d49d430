use super::{Attributes, PrivacyLevel};

/// Per-call overrides for an emitted event. Unset fields take the defaults.
#[derive(Debug, Clone, Default)]
pub struct EmitOptions {
    pub session_id: Option<String>,
    pub correlation_id: Option<String>,
    pub idempotency_key: Option<String>,
    pub schema_version: Option<u32>,
    pub privacy_level: Option<PrivacyLevel>,
    /// Merged over the queue's base context; these keys win.
    pub context: Option<Attributes>,
}

impl EmitOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session_id(mut self, id: impl Into<String>) -> Self {
        self.session_id = Some(id.into());
        self
    }

    pub fn correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    pub fn idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.idempotency_key = Some(key.into());
        self
    }

    pub fn schema_version(mut self, version: u32) -> Self {
        self.schema_version = Some(version);
        self
    }

    pub fn privacy_level(mut self, level: PrivacyLevel) -> Self {
        self.privacy_level = Some(level);
        self
    }

    pub fn context(mut self, context: Attributes) -> Self {
        self.context = Some(context);
        self
    }
}
