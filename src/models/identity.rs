use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};

use crate::{SdkError, SdkResult};

pub const AGENT_ID_HEADER: &str = "x-rashomon-agent-id";
pub const AGENT_NAME_HEADER: &str = "x-rashomon-agent-name";
pub const PROCESS_NAME_HEADER: &str = "x-rashomon-process-name";
pub const AGENT_PID_HEADER: &str = "x-rashomon-agent-pid";

pub const DEFAULT_AGENT_ID: &str = "rust-sdk";
pub const DEFAULT_AGENT_NAME: &str = "rust-sdk";

/// Identity the proxy attributes intercepted traffic to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentIdentity {
    pub agent_id: String,
    pub agent_name: String,
    pub process_name: String,
    pub pid: u32,
}

impl Default for AgentIdentity {
    fn default() -> Self {
        Self {
            agent_id: DEFAULT_AGENT_ID.to_string(),
            agent_name: DEFAULT_AGENT_NAME.to_string(),
            process_name: current_process_name(),
            pid: std::process::id(),
        }
    }
}

impl AgentIdentity {
    /// Identity for the current process under the given agent id
    pub fn new(agent_id: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
            ..Self::default()
        }
    }

    pub fn with_agent_name(mut self, agent_name: impl Into<String>) -> Self {
        self.agent_name = agent_name.into();
        self
    }

    pub fn with_process_name(mut self, process_name: impl Into<String>) -> Self {
        self.process_name = process_name.into();
        self
    }

    pub fn with_pid(mut self, pid: u32) -> Self {
        self.pid = pid;
        self
    }

    /// Header pairs in the order the proxy documents them
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        vec![
            (AGENT_ID_HEADER, self.agent_id.clone()),
            (AGENT_NAME_HEADER, self.agent_name.clone()),
            (PROCESS_NAME_HEADER, self.process_name.clone()),
            (AGENT_PID_HEADER, self.pid.to_string()),
        ]
    }

    /// Headers ready to attach to a reqwest request or client
    pub fn header_map(&self) -> SdkResult<HeaderMap> {
        let mut map = HeaderMap::with_capacity(4);
        for (name, value) in self.headers() {
            let value = HeaderValue::from_str(&value).map_err(|e| {
                SdkError::configuration(format!("Invalid value for header {}: {}", name, e))
            })?;
            map.insert(HeaderName::from_static(name), value);
        }
        Ok(map)
    }
}

/// File stem of the running executable, "rust" when it cannot be determined
fn current_process_name() -> String {
    std::env::current_exe()
        .ok()
        .and_then(|path| {
            path.file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
        })
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "rust".to_string())
}
