//! CLI command implementations.

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;
use url::Url;

use crate::client::{ProxyConfiguration, RashomonClient};
use crate::config::SdkSettings;
use crate::models::ActionReport;

use super::utils::{load_metadata, load_settings, print_check_response, shell_exports};

/// Configure the proxy variables and print matching shell exports
pub async fn env(config_path: Option<PathBuf>, proxy_url: Option<String>) -> Result<()> {
    let settings = load_settings(config_path)?;

    let proxy_url = match proxy_url {
        Some(raw) => Url::parse(&raw).with_context(|| format!("Invalid proxy URL: {}", raw))?,
        None => settings.proxy_url()?,
    };

    let configuration = ProxyConfiguration::new(proxy_url, settings.identity());
    configuration.apply();

    for line in shell_exports(&configuration) {
        println!("{}", line);
    }

    Ok(())
}

/// Send a check request and print the proxy's answer
pub async fn check(
    config_path: Option<PathBuf>,
    url: String,
    body: String,
    agent_id: Option<String>,
    fail_on_block: bool,
) -> Result<()> {
    let settings = load_settings(config_path)?;
    let client = RashomonClient::from_settings(&settings)?;

    info!("Sending check for {} via {}", url, client.proxy_url());

    let response = match agent_id {
        Some(agent_id) => client.check_response_as(&url, &body, &agent_id).await?,
        None => client.check_response(&url, &body).await?,
    };

    print_check_response(&response)?;

    if fail_on_block {
        response
            .error_for_status()
            .map_err(|e| anyhow::anyhow!(e.user_message()))?;
    }

    Ok(())
}

/// Print an action report payload
pub async fn report(
    agent_id: String,
    action: String,
    metadata: Option<String>,
    metadata_file: Option<PathBuf>,
    timestamp: bool,
) -> Result<()> {
    let metadata = load_metadata(metadata_file, metadata)?;

    let mut report = ActionReport::new(agent_id, action).with_metadata(metadata.unwrap_or_default());
    if timestamp {
        report = report.stamped();
    }

    println!("{}", report.to_json()?);
    Ok(())
}

/// Manage configuration (show, init)
pub async fn config(config_path: Option<PathBuf>, show: bool, init: bool, force: bool) -> Result<()> {
    let path = config_path
        .or_else(SdkSettings::config_path)
        .ok_or_else(|| anyhow::anyhow!("Unable to determine configuration directory"))?;

    if init {
        if path.exists() && !force {
            anyhow::bail!(
                "Configuration file already exists at {:?}. Use --force to overwrite.",
                path
            );
        }

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&path, SdkSettings::default().to_toml()?)?;
        println!("✓ Configuration initialized at {:?}", path);
    }

    if show {
        let settings = SdkSettings::load_from(Some(path))?;
        println!("{}", settings.to_toml()?);
    }

    Ok(())
}

/// Show version information
pub async fn version() -> Result<()> {
    println!("rashomon-sdk {}", env!("CARGO_PKG_VERSION"));
    println!("Built with Rust {}", rustc_version::version()?);
    Ok(())
}
