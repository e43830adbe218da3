use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// File name looked up in the working directory when no config path is given.
pub const DEFAULT_CONFIG_FILE: &str = "hashcheck.json";

/// How check results are rendered.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Serializable configuration for the check frontend.
///
/// This covers presentation and exit-status policy only. The rule itself has
/// no options and its severity mapping is fixed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckConfig {
    /// Schema/config version. This is about the config format, not the tool version.
    #[serde(default = "default_config_version")]
    pub config_version: String,
    #[serde(default)]
    pub format: OutputFormat,
    /// Treat warning-level findings as a failing exit status.
    #[serde(default)]
    pub fail_on_warnings: bool,
}

fn default_config_version() -> String {
    "0.1.0".to_string()
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            config_version: default_config_version(),
            format: OutputFormat::Text,
            fail_on_warnings: false,
        }
    }
}

/// Load the check config JSON from disk.
pub fn load_check_config(path: &Path) -> Result<CheckConfig> {
    let body = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read check config at {}", path.display()))?;
    let config: CheckConfig =
        serde_json::from_str(&body).context("Failed to parse check config JSON")?;
    Ok(config)
}

/// Load `explicit` if given, else `DEFAULT_CONFIG_FILE` under `dir` if present,
/// else defaults.
pub fn resolve_check_config(explicit: Option<&Path>, dir: &Path) -> Result<CheckConfig> {
    if let Some(path) = explicit {
        return load_check_config(path);
    }
    let fallback = dir.join(DEFAULT_CONFIG_FILE);
    if fallback.is_file() {
        load_check_config(&fallback)
    } else {
        Ok(CheckConfig::default())
    }
}
