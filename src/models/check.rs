use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{SdkError, SdkResult};

/// Decision attached to a check response.
///
/// The proxy forwards origin responses untouched, so a status code alone does
/// not say who refused. Only a refusal body carrying one of the proxy's
/// decision names counts as a proxy verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Allow,
    Block,
    RequireApproval,
    Throttle,
    Paused,
    ProxyError,
    /// Non-2xx status produced by the origin, not the proxy
    Upstream,
}

impl Verdict {
    /// Proxy decision named in a refusal body's `error` field
    pub fn from_decision(error: &str) -> Option<Self> {
        match error {
            "block" => Some(Verdict::Block),
            "require_approval" => Some(Verdict::RequireApproval),
            "throttle" => Some(Verdict::Throttle),
            "paused" => Some(Verdict::Paused),
            "proxy_error" => Some(Verdict::ProxyError),
            _ => None,
        }
    }

    pub fn is_allowed(self) -> bool {
        self == Verdict::Allow
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::Allow => "allow",
            Verdict::Block => "block",
            Verdict::RequireApproval => "require_approval",
            Verdict::Throttle => "throttle",
            Verdict::Paused => "paused",
            Verdict::ProxyError => "proxy_error",
            Verdict::Upstream => "upstream",
        }
    }

    /// Past-tense phrase for user-facing messages
    pub fn describe(self) -> &'static str {
        match self {
            Verdict::Allow => "allowed",
            Verdict::Block => "blocked",
            Verdict::RequireApproval => "held for approval",
            Verdict::Throttle => "throttled",
            Verdict::Paused => "refused while monitoring is paused",
            Verdict::ProxyError => "failed inside the proxy",
            Verdict::Upstream => "refused by the origin server",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JSON body the proxy sends with a refusal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockDetails {
    pub error: String,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub receipt_hash: Option<String>,
}

/// Outcome of a check request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResponse {
    pub status: u16,
    pub body: String,
}

impl CheckResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn verdict(&self) -> Verdict {
        if self.is_success() {
            return Verdict::Allow;
        }
        self.block_details()
            .and_then(|details| Verdict::from_decision(&details.error))
            .unwrap_or(Verdict::Upstream)
    }

    pub fn is_allowed(&self) -> bool {
        self.verdict().is_allowed()
    }

    /// Parsed refusal body, only when it names a proxy decision
    pub fn block_details(&self) -> Option<BlockDetails> {
        if self.is_success() {
            return None;
        }
        serde_json::from_str::<BlockDetails>(&self.body)
            .ok()
            .filter(|details| Verdict::from_decision(&details.error).is_some())
    }

    /// Turn any non-2xx status into `SdkError::Rejected`
    pub fn error_for_status(self) -> SdkResult<Self> {
        if self.is_success() {
            return Ok(self);
        }

        let verdict = self.verdict();
        let reason = self.block_details().and_then(|details| details.reason);
        Err(SdkError::Rejected {
            status: self.status,
            verdict,
            reason,
        })
    }
}
