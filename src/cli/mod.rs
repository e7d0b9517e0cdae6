//! CLI interface for the Rashomon SDK.
//!
//! Exposes proxy configuration, check requests and report payloads to shell scripts.

mod commands;
mod utils;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use commands::*;
pub use utils::*;

#[derive(Parser, Debug)]
#[command(name = "rashomon")]
#[command(about = "Route agent traffic through the Rashomon proxy and report agent actions")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Configuration file path (a missing file falls back to defaults)
    #[arg(long, global = true, env = "RASHOMON_CONFIG_PATH")]
    pub config: Option<PathBuf>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print shell exports that route traffic through the proxy
    Env {
        /// Proxy URL (defaults to the configured proxy)
        #[arg(long, short = 'p')]
        proxy_url: Option<String>,
    },

    /// Send a diagnostic check request for a target URL through the proxy
    Check {
        url: String,

        /// Request body to submit for inspection
        #[arg(long, short = 'b', default_value = "")]
        body: String,

        /// Agent id to present (defaults to the configured agent)
        #[arg(long, short = 'a')]
        agent_id: Option<String>,

        /// Exit with an error unless the proxy allows the request
        #[arg(long)]
        fail_on_block: bool,
    },

    /// Print an action report payload
    Report {
        agent_id: String,

        action: String,

        /// Metadata as an inline JSON object
        #[arg(long, short = 'm', conflicts_with = "metadata_file")]
        metadata: Option<String>,

        /// Metadata read from a JSON file
        #[arg(long, short = 'f', conflicts_with = "metadata")]
        metadata_file: Option<PathBuf>,

        /// Stamp the report with the current time
        #[arg(long)]
        timestamp: bool,
    },

    /// Manage SDK configuration
    Config {
        #[arg(long)]
        show: bool,

        /// Write default settings to the config path
        #[arg(long)]
        init: bool,

        #[arg(long, requires = "init")]
        force: bool,
    },

    /// Show version information
    Version,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Run the CLI command
    pub async fn run(self) -> Result<()> {
        let config_path = self.config;
        match self.command {
            Commands::Env { proxy_url } => env(config_path, proxy_url).await,

            Commands::Check {
                url,
                body,
                agent_id,
                fail_on_block,
            } => check(config_path, url, body, agent_id, fail_on_block).await,

            Commands::Report {
                agent_id,
                action,
                metadata,
                metadata_file,
                timestamp,
            } => report(agent_id, action, metadata, metadata_file, timestamp).await,

            Commands::Config { show, init, force } => config(config_path, show, init, force).await,

            Commands::Version => version().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_check_defaults() {
        let cli = Cli::try_parse_from(["rashomon", "check", "https://example.com"]).unwrap();
        match cli.command {
            Commands::Check {
                url,
                body,
                agent_id,
                fail_on_block,
            } => {
                assert_eq!(url, "https://example.com");
                assert!(body.is_empty());
                assert!(agent_id.is_none());
                assert!(!fail_on_block);
            }
            other => panic!("Expected check command, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_report_with_metadata() {
        let cli = Cli::try_parse_from([
            "rashomon",
            "--log-level",
            "debug",
            "report",
            "agent-1",
            "file_write",
            "--metadata",
            r#"{"path":"/tmp/a"}"#,
        ])
        .unwrap();

        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert!(matches!(
            cli.command,
            Commands::Report { ref agent_id, ref metadata, .. }
                if agent_id == "agent-1" && metadata.is_some()
        ));
    }

    #[test]
    fn test_metadata_sources_conflict() {
        let result = Cli::try_parse_from([
            "rashomon",
            "report",
            "agent-1",
            "file_write",
            "--metadata",
            "{}",
            "--metadata-file",
            "meta.json",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_force_requires_init() {
        assert!(Cli::try_parse_from(["rashomon", "config", "--force"]).is_err());
        assert!(Cli::try_parse_from(["rashomon", "config", "--init", "--force"]).is_ok());
    }
}
