use std::env;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use hashcheck_core::config::{resolve_check_config, CheckConfig};
use hashcheck_core::model::BinaryKind;

/// Parse a `--kind` value.
pub fn validate_binary_kind(kind: &str) -> Result<BinaryKind> {
    BinaryKind::parse(kind)
        .ok_or_else(|| anyhow!("Invalid kind '{}'. Allowed: native, managed, mixed", kind))
}

/// Resolve a user-supplied path against the current working directory.
pub fn absolute_path(path: &str) -> Result<PathBuf> {
    let path = Path::new(path);
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        let cwd = env::current_dir().context("Failed to get current directory")?;
        Ok(cwd.join(path))
    }
}

/// Load the explicit config, or `hashcheck.json` from the working directory, or defaults.
pub fn load_cli_config(config: Option<&str>) -> Result<CheckConfig> {
    let cwd = env::current_dir().context("Failed to get current directory")?;
    let explicit = config.map(absolute_path).transpose()?;
    resolve_check_config(explicit.as_deref(), &cwd)
}
