//! HTTP transport for check requests sent to the Rashomon proxy

use reqwest::header::{CONTENT_TYPE, HOST};
use std::time::Duration;
use tracing::{debug, trace};
use url::Url;

use crate::config::settings::SdkSettings;
use crate::models::{AgentIdentity, CheckResponse};
use crate::{SdkError, SdkResult};

/// Client for the proxy's own endpoint.
///
/// Requests go straight to the proxy address, never through a proxy, so that
/// `HTTP_PROXY` set by `configure_proxy` does not loop them back.
pub struct RashomonClient {
    proxy_url: Url,
    identity: AgentIdentity,
    http: reqwest::Client,
}

impl RashomonClient {
    /// Create a client without a request timeout
    pub fn new(proxy_url: Url, identity: AgentIdentity) -> SdkResult<Self> {
        Self::with_timeout(proxy_url, identity, None)
    }

    pub fn with_timeout(
        proxy_url: Url,
        identity: AgentIdentity,
        timeout: Option<Duration>,
    ) -> SdkResult<Self> {
        let mut builder = reqwest::Client::builder().no_proxy();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            proxy_url,
            identity,
            http: builder.build()?,
        })
    }

    /// Client configured from the settings file and `RASHOMON_*` variables
    pub fn from_env() -> SdkResult<Self> {
        Self::from_settings(&SdkSettings::load()?)
    }

    pub fn from_settings(settings: &SdkSettings) -> SdkResult<Self> {
        Self::with_timeout(settings.proxy_url()?, settings.identity(), settings.timeout())
    }

    /// Send a check for `url`; any non-2xx status is `SdkError::Rejected`
    pub async fn check(&self, url: &str, body: &str) -> SdkResult<CheckResponse> {
        self.check_response(url, body).await?.error_for_status()
    }

    /// Like [`check`](Self::check) with the agent id replaced by `agent_id`
    pub async fn check_as(&self, url: &str, body: &str, agent_id: &str) -> SdkResult<CheckResponse> {
        self.check_response_as(url, body, agent_id)
            .await?
            .error_for_status()
    }

    /// Send a check and return the response whatever its status
    pub async fn check_response(&self, url: &str, body: &str) -> SdkResult<CheckResponse> {
        self.send_check(url, body, &self.identity).await
    }

    pub async fn check_response_as(
        &self,
        url: &str,
        body: &str,
        agent_id: &str,
    ) -> SdkResult<CheckResponse> {
        let identity = AgentIdentity {
            agent_id: agent_id.to_string(),
            ..self.identity.clone()
        };
        self.send_check(url, body, &identity).await
    }

    async fn send_check(
        &self,
        url: &str,
        body: &str,
        identity: &AgentIdentity,
    ) -> SdkResult<CheckResponse> {
        let host = target_host(url)?;

        debug!(
            proxy_url = %self.proxy_url,
            target_host = %host,
            agent_id = %identity.agent_id,
            body_bytes = body.len(),
            "Sending check request"
        );

        let response = self
            .http
            .post(self.proxy_url.clone())
            .header(HOST, host)
            .header(CONTENT_TYPE, "text/plain")
            .headers(identity.header_map()?)
            .body(body.to_owned())
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        trace!(status, body = %body, "Received check response");

        let response = CheckResponse::new(status, body);
        debug!(status, verdict = %response.verdict(), "Check completed");
        Ok(response)
    }

    pub fn proxy_url(&self) -> &Url {
        &self.proxy_url
    }

    pub fn identity(&self) -> &AgentIdentity {
        &self.identity
    }
}

/// Host header value for a target URL: host plus any non-default port
pub fn target_host(url: &str) -> SdkResult<String> {
    let parsed = Url::parse(url).map_err(|e| SdkError::invalid_url(url, e.to_string()))?;
    let host = parsed
        .host_str()
        .ok_or_else(|| SdkError::invalid_url(url, "URL has no host"))?;

    Ok(match parsed.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

/// One-shot check through the configured proxy.
///
/// `agent_id` defaults to the configured agent when `None`. Non-2xx statuses
/// are returned as `SdkError::Rejected`.
pub async fn check(url: &str, body: &str, agent_id: Option<&str>) -> SdkResult<CheckResponse> {
    let client = RashomonClient::from_env()?;
    match agent_id {
        Some(agent_id) => client.check_as(url, body, agent_id).await,
        None => client.check(url, body).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_host_without_port() {
        assert_eq!(target_host("https://api.openai.com/v1/chat").unwrap(), "api.openai.com");
    }

    #[test]
    fn test_target_host_keeps_explicit_port() {
        assert_eq!(target_host("http://localhost:3000/x").unwrap(), "localhost:3000");
        // Default ports are normalized away by the URL parser
        assert_eq!(target_host("https://example.com:443/").unwrap(), "example.com");
    }

    #[test]
    fn test_target_host_rejects_bad_urls() {
        assert!(matches!(
            target_host("not a url"),
            Err(SdkError::InvalidUrl { .. })
        ));
        assert!(matches!(
            target_host("mailto:someone@example.com"),
            Err(SdkError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_client_keeps_identity() {
        let client = RashomonClient::new(
            Url::parse("http://127.0.0.1:8888").unwrap(),
            AgentIdentity::new("transport-test"),
        )
        .unwrap();

        assert_eq!(client.identity().agent_id, "transport-test");
        assert_eq!(client.proxy_url().port(), Some(8888));
    }
}
