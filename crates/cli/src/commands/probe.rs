use anyhow::{anyhow, Context, Result};
use hashcheck_core::services::probe_binary_kind;
use serde::Serialize;

use crate::commands::absolute_path;

#[derive(Debug, Serialize)]
pub struct ProbeInfo {
    pub path: String,
    pub kind: String,
    /// Whether the check judges this binary by its managed checksum header.
    pub uses_managed_checksum: bool,
}

/// Detect and print whether a PE image is native, managed, or mixed-mode.
pub fn probe_command(binary: &str, json: bool) -> Result<()> {
    let path = absolute_path(binary)?;
    if !path.is_file() {
        return Err(anyhow!("Binary file does not exist: {}", path.display()));
    }
    let bytes =
        std::fs::read(&path).with_context(|| format!("Failed to read binary: {}", path.display()))?;
    let kind = probe_binary_kind(&bytes)
        .with_context(|| format!("Failed to detect binary kind: {}", path.display()))?;

    let info = ProbeInfo {
        path: path.display().to_string(),
        kind: kind.as_str().to_string(),
        uses_managed_checksum: kind.uses_managed_checksum(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("Binary: {}", info.path);
    println!("Kind: {}", info.kind);
    Ok(())
}
