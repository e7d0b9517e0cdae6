//! Proxy URL resolution and process-wide proxy configuration

use tracing::{debug, warn};
use url::Url;

use crate::config::SdkSettings;
use crate::models::AgentIdentity;
use crate::{SdkError, SdkResult};

pub const PROXY_HOST_ENV: &str = "RASHOMON_PROXY_HOST";
pub const PROXY_PORT_ENV: &str = "RASHOMON_PROXY_PORT";

pub const DEFAULT_PROXY_HOST: &str = "127.0.0.1";
pub const DEFAULT_PROXY_PORT: u16 = 8888;

/// Variables written by [`configure_proxy`]. Upper and lower case both, since
/// tools disagree on which one they read.
pub const PROXY_ENV_VARS: [&str; 4] = ["HTTP_PROXY", "HTTPS_PROXY", "http_proxy", "https_proxy"];

/// Proxy URL for the current environment, read on every call
pub fn default_proxy_url() -> SdkResult<Url> {
    let host = std::env::var(PROXY_HOST_ENV).ok();
    let port = std::env::var(PROXY_PORT_ENV).ok();
    resolve_proxy_url(host.as_deref(), port.as_deref())
}

/// Resolve raw host and port values, falling back to the defaults
pub fn resolve_proxy_url(host: Option<&str>, port: Option<&str>) -> SdkResult<Url> {
    let host = host
        .map(str::trim)
        .filter(|host| !host.is_empty())
        .unwrap_or(DEFAULT_PROXY_HOST);
    proxy_url(host, parse_port(port))
}

pub fn proxy_url(host: &str, port: u16) -> SdkResult<Url> {
    let raw = if host.contains(':') && !host.starts_with('[') {
        format!("http://[{}]:{}", host, port)
    } else {
        format!("http://{}:{}", host, port)
    };
    Url::parse(&raw).map_err(|e| SdkError::invalid_url(raw, e.to_string()))
}

/// Parse a port value; unset, empty, zero or garbage yields the default
pub fn parse_port(port: Option<&str>) -> u16 {
    match port.map(str::trim) {
        None | Some("") => DEFAULT_PROXY_PORT,
        Some(raw) => match raw.parse::<u16>() {
            Ok(port) if port != 0 => port,
            _ => {
                warn!(
                    value = raw,
                    "Invalid {}, falling back to port {}", PROXY_PORT_ENV, DEFAULT_PROXY_PORT
                );
                DEFAULT_PROXY_PORT
            }
        },
    }
}

/// URL as written into proxy variables, without the root path slash
pub fn proxy_env_value(url: &Url) -> String {
    let value = url.as_str();
    if url.path() == "/" && url.query().is_none() && url.fragment().is_none() {
        value.trim_end_matches('/').to_string()
    } else {
        value.to_string()
    }
}

/// Proxy endpoint plus the identity to present to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfiguration {
    pub proxy_url: Url,
    pub identity: AgentIdentity,
}

impl ProxyConfiguration {
    pub fn new(proxy_url: Url, identity: AgentIdentity) -> Self {
        Self {
            proxy_url,
            identity,
        }
    }

    /// Point the process proxy variables at this proxy.
    ///
    /// The environment is process-global: concurrent callers on other threads
    /// observe the change immediately.
    pub fn apply(&self) {
        let value = proxy_env_value(&self.proxy_url);
        for name in PROXY_ENV_VARS {
            std::env::set_var(name, &value);
        }
        debug!(proxy_url = %value, "Configured process proxy environment");
    }

    /// Identity headers to attach to outgoing requests
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        self.identity.headers()
    }

    /// Client that sends everything through the proxy with identity headers set
    pub fn http_client(&self) -> SdkResult<reqwest::Client> {
        let proxy = reqwest::Proxy::all(self.proxy_url.clone()).inspect_err(|error| {
            warn!(proxy_url = %self.proxy_url, %error, "Failed to configure proxy");
        })?;

        let client = reqwest::Client::builder()
            .proxy(proxy)
            .default_headers(self.identity.header_map()?)
            .build()?;
        Ok(client)
    }
}

/// Set `HTTP_PROXY` and `HTTPS_PROXY` to `proxy_url`, or to the configured
/// proxy when none is given. The identity comes from the same settings.
pub fn configure_proxy(proxy_url: Option<Url>) -> SdkResult<ProxyConfiguration> {
    let settings = SdkSettings::load()?;
    let proxy_url = match proxy_url {
        Some(url) => url,
        None => settings.proxy_url()?,
    };

    let configuration = ProxyConfiguration::new(proxy_url, settings.identity());
    configuration.apply();
    Ok(configuration)
}
