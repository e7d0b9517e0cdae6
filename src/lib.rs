//! Rashomon SDK
//!
//! Client helper for agents running behind the Rashomon intercepting proxy.
//! Points process-wide proxy variables at Rashomon, sends diagnostic check
//! requests tagged with the agent identity, and builds action report payloads.

pub mod cli;
pub mod client;
pub mod config;
pub mod models;

pub use client::{check, configure_proxy, default_proxy_url, ProxyConfiguration, RashomonClient};
pub use models::{report, ActionReport, AgentIdentity, CheckResponse, Metadata, Verdict};

/// Errors surfaced by the SDK
#[derive(Debug, thiserror::Error)]
pub enum SdkError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("HTTP error: {source}")]
    Http {
        #[from]
        source: reqwest::Error,
    },

    #[error("Check refused with status {status} ({verdict})")]
    Rejected {
        status: u16,
        verdict: Verdict,
        reason: Option<String>,
    },

    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },

    #[error("Config file error: {source}")]
    ConfigFile {
        #[from]
        source: toml::de::Error,
    },
}

impl SdkError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an invalid URL error
    pub fn invalid_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Whether the proxy was reached and answered with a refusal
    pub fn is_rejection(&self) -> bool {
        matches!(self, SdkError::Rejected { .. })
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            SdkError::Configuration { message } => {
                format!("Configuration issue: {}", message)
            }
            SdkError::InvalidUrl { url, reason } => {
                format!("Invalid URL '{}': {}", url, reason)
            }
            SdkError::Http { source } => {
                if source.is_connect() {
                    format!("Could not reach the Rashomon proxy: {}", source)
                } else if source.is_timeout() {
                    format!("Request to the Rashomon proxy timed out: {}", source)
                } else {
                    format!("Communication error: {}", source)
                }
            }
            SdkError::Rejected {
                status,
                verdict,
                reason,
            } => {
                if let Some(reason) = reason {
                    format!("Request {} ({}): {}", verdict.describe(), status, reason)
                } else {
                    format!("Request {} ({})", verdict.describe(), status)
                }
            }
            SdkError::Io { source } => {
                format!("File system error: {}", source)
            }
            SdkError::Serialization { source } => {
                format!("Data format error: {}", source)
            }
            SdkError::ConfigFile { source } => {
                format!("Invalid configuration file: {}", source)
            }
        }
    }
}

/// Convenience type alias for Results
pub type SdkResult<T> = Result<T, SdkError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    fn with_config_context(self, path: &std::path::Path) -> SdkResult<T>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: std::fmt::Display,
{
    fn with_config_context(self, path: &std::path::Path) -> SdkResult<T> {
        self.map_err(|e| SdkError::configuration(format!("{}: {}", path.display(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = SdkError::configuration("Invalid config");
        assert!(err.user_message().contains("Configuration issue"));
        assert!(!err.is_rejection());
    }

    #[test]
    fn test_rejection_message_includes_reason() {
        let err = SdkError::Rejected {
            status: 403,
            verdict: Verdict::Block,
            reason: Some("domain denied".to_string()),
        };
        assert!(err.is_rejection());
        let message = err.user_message();
        assert!(message.contains("blocked"));
        assert!(message.contains("domain denied"));
    }

    #[test]
    fn test_result_extension() {
        let result: Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "File not found",
        ));

        let sdk_result = result.with_config_context(std::path::Path::new("/etc/rashomon/sdk.toml"));

        if let Err(SdkError::Configuration { message }) = sdk_result {
            assert!(message.contains("/etc/rashomon/sdk.toml"));
            assert!(message.contains("File not found"));
        } else {
            panic!("Expected Configuration error");
        }
    }
}
