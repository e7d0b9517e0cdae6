use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;
use validator::Validate;

use crate::client::proxy::{self, DEFAULT_PROXY_HOST, DEFAULT_PROXY_PORT};
use crate::models::identity::{AgentIdentity, DEFAULT_AGENT_ID, DEFAULT_AGENT_NAME};
use crate::{ResultExt, SdkError, SdkResult};

pub const CONFIG_PATH_ENV: &str = "RASHOMON_CONFIG_PATH";
pub const AGENT_ID_ENV: &str = "RASHOMON_AGENT_ID";
pub const AGENT_NAME_ENV: &str = "RASHOMON_AGENT_NAME";
pub const TIMEOUT_ENV: &str = "RASHOMON_TIMEOUT_SECS";

/// SDK settings: defaults, then the config file, then environment variables
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SdkSettings {
    #[validate(nested)]
    pub proxy: ProxySettings,
    #[validate(nested)]
    pub agent: AgentSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ProxySettings {
    #[validate(length(min = 1, message = "proxy host must not be empty"))]
    pub host: String,
    #[validate(range(min = 1, message = "proxy port must be greater than 0"))]
    pub port: u16,
    /// No timeout when unset
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct AgentSettings {
    #[validate(length(min = 1, message = "agent id must not be empty"))]
    pub agent_id: String,
    pub agent_name: String,
    /// Executable name when unset
    pub process_name: Option<String>,
}

impl Default for ProxySettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_PROXY_HOST.to_string(),
            port: DEFAULT_PROXY_PORT,
            timeout_secs: None,
        }
    }
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            agent_id: DEFAULT_AGENT_ID.to_string(),
            agent_name: DEFAULT_AGENT_NAME.to_string(),
            process_name: None,
        }
    }
}

impl SdkSettings {
    /// Load from the default config path and the process environment
    pub fn load() -> SdkResult<Self> {
        Self::load_from(Self::config_path())
    }

    /// Load from `path` if it exists, then apply environment overrides
    pub fn load_from(path: Option<PathBuf>) -> SdkResult<Self> {
        let mut settings = match path {
            Some(path) if path.exists() => {
                info!("Using config file: {}", path.display());
                Self::from_file(&path)?
            }
            Some(path) => {
                debug!("No config file at {}, using defaults", path.display());
                Self::default()
            }
            None => Self::default(),
        };

        settings.apply_env_overrides();
        settings.validate_settings()?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> SdkResult<Self> {
        let content = std::fs::read_to_string(path).with_config_context(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// `RASHOMON_CONFIG_PATH`, else `<config dir>/rashomon/sdk.toml`
    pub fn config_path() -> Option<PathBuf> {
        if let Ok(custom_path) = std::env::var(CONFIG_PATH_ENV) {
            return Some(PathBuf::from(custom_path));
        }
        dirs::config_dir().map(|dir| dir.join("rashomon").join("sdk.toml"))
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Apply overrides from any variable source
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup(proxy::PROXY_HOST_ENV).filter(|v| !v.trim().is_empty()) {
            self.proxy.host = val.trim().to_string();
        }

        if let Some(val) = lookup(proxy::PROXY_PORT_ENV) {
            self.proxy.port = proxy::parse_port(Some(&val));
        }

        if let Some(val) = lookup(TIMEOUT_ENV) {
            match val.trim().parse::<u64>() {
                Ok(secs) => self.proxy.timeout_secs = Some(secs),
                Err(_) => warn!(value = %val, "Ignoring invalid {}", TIMEOUT_ENV),
            }
        }

        if let Some(val) = lookup(AGENT_ID_ENV) {
            self.agent.agent_id = val;
        }

        if let Some(val) = lookup(AGENT_NAME_ENV) {
            self.agent.agent_name = val;
        }
    }

    pub fn validate_settings(&self) -> SdkResult<()> {
        self.validate()
            .map_err(|e| SdkError::configuration(e.to_string()))
    }

    pub fn proxy_url(&self) -> SdkResult<Url> {
        proxy::proxy_url(&self.proxy.host, self.proxy.port)
    }

    pub fn identity(&self) -> AgentIdentity {
        let identity = AgentIdentity::new(self.agent.agent_id.clone())
            .with_agent_name(self.agent.agent_name.clone());
        match &self.agent.process_name {
            Some(process_name) => identity.with_process_name(process_name.clone()),
            None => identity,
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.proxy.timeout_secs.map(Duration::from_secs)
    }

    pub fn to_toml(&self) -> SdkResult<String> {
        toml::to_string_pretty(self).map_err(|e| SdkError::configuration(e.to_string()))
    }
}
