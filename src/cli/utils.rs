//! CLI utility functions.

use anyhow::Result;
use serde_json::{json, Value};
use std::path::PathBuf;
use tracing::{info, warn};

use crate::client::proxy::{proxy_env_value, PROXY_ENV_VARS};
use crate::client::ProxyConfiguration;
use crate::config::SdkSettings;
use crate::models::{CheckResponse, Metadata};

/// Load settings with hierarchy (env > file > defaults).
///
/// A missing file falls back to defaults, the same as the library does.
pub fn load_settings(config_path: Option<PathBuf>) -> Result<SdkSettings> {
    let path = match config_path {
        Some(path) => {
            if path.exists() {
                info!("Using custom config file: {}", path.display());
            } else {
                warn!("Config file not found: {}, using defaults", path.display());
            }
            Some(path)
        }
        None => SdkSettings::config_path(),
    };

    Ok(SdkSettings::load_from(path)?)
}

/// Load report metadata from file or inline JSON; it must be a JSON object
pub fn load_metadata(
    metadata_file: Option<PathBuf>,
    metadata_json: Option<String>,
) -> Result<Option<Metadata>> {
    let (raw, source) = match (metadata_file, metadata_json) {
        (Some(path), None) => {
            if !path.exists() {
                anyhow::bail!("Metadata file not found: {}", path.display());
            }
            (std::fs::read_to_string(&path)?, path.display().to_string())
        }
        (None, Some(json_str)) => (json_str, "inline JSON".to_string()),
        (None, None) => return Ok(None),
        (Some(_), Some(_)) => {
            anyhow::bail!("Cannot use both --metadata-file and --metadata");
        }
    };

    let value: Value = serde_json::from_str(&raw)
        .map_err(|e| anyhow::anyhow!("Failed to parse metadata from {}: {}", source, e))?;

    match value {
        Value::Object(map) => Ok(Some(map)),
        Value::Null => Ok(None),
        other => anyhow::bail!("Metadata must be a JSON object, got: {}", other),
    }
}

/// `export` lines for every proxy variable, plus the identity headers as comments
pub fn shell_exports(configuration: &ProxyConfiguration) -> Vec<String> {
    let value = proxy_env_value(&configuration.proxy_url);

    let mut lines: Vec<String> = PROXY_ENV_VARS
        .iter()
        .map(|name| format!("export {}={}", name, value))
        .collect();

    lines.extend(
        configuration
            .headers()
            .into_iter()
            .map(|(name, value)| format!("# {}: {}", name, value)),
    );
    lines
}

/// Print a check response to stdout
pub fn print_check_response(response: &CheckResponse) -> Result<()> {
    let mut output = json!({
        "status": response.status,
        "verdict": response.verdict(),
        "body": response.body,
    });

    if let Some(details) = response.block_details() {
        output["details"] = serde_json::to_value(details)?;
    }

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
