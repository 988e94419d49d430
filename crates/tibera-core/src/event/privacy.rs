use serde::{Deserialize, Serialize};

/// Handling class of an event's payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrivacyLevel {
    #[default]
    Standard,
    Sensitive,
    Redacted,
}

impl PrivacyLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrivacyLevel::Standard => "standard",
            PrivacyLevel::Sensitive => "sensitive",
            PrivacyLevel::Redacted => "redacted",
        }
    }
}
