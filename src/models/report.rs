use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::SdkResult;

/// Free-form report metadata, always a JSON object
pub type Metadata = serde_json::Map<String, Value>;

/// Action an agent reports to the proxy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionReport {
    pub agent_id: String,
    pub action: String,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reported_at: Option<DateTime<Utc>>,
}

impl ActionReport {
    pub fn new(agent_id: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
            action: action.into(),
            metadata: Metadata::new(),
            reported_at: None,
        }
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Record the current time as `reported_at`
    pub fn stamped(mut self) -> Self {
        self.reported_at = Some(Utc::now());
        self
    }

    pub fn to_json(&self) -> SdkResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(payload: &str) -> SdkResult<Self> {
        Ok(serde_json::from_str(payload)?)
    }
}

/// Serialize `{agent_id, action, metadata}` to text, metadata defaulting to `{}`
pub fn report(agent_id: &str, action: &str, metadata: Option<Metadata>) -> SdkResult<String> {
    ActionReport::new(agent_id, action)
        .with_metadata(metadata.unwrap_or_default())
        .to_json()
}
