use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{
    BinaryKind, CompilandProvenance, CompiledModule, CompilerIdentity, Language,
    ManagedBinaryInfo, SourceFile,
};

/// Debug-info facts for one binary, as produced by a [`DebugInfoSource`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BinaryDebugInfo {
    /// Display name of the analyzed binary.
    pub binary: String,
    /// Binary kind if the source knows it; otherwise resolved by the runner.
    pub kind: Option<BinaryKind>,
    pub managed: Option<ManagedBinaryInfo>,
    /// Compilands in the order the debug-info reader yielded them.
    pub modules: Vec<CompiledModule>,
}

#[derive(Debug, Error)]
pub enum DebugInfoError {
    #[error("Debug info not found at {0}")]
    Missing(PathBuf),
    #[error("Failed to read debug info at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse debug info at {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Trait implemented by debug-info readers (PDB dumpers, manifest files, ...).
pub trait DebugInfoSource: Send + Sync {
    fn load(&self, path: &Path) -> Result<BinaryDebugInfo, DebugInfoError>;
    fn name(&self) -> &'static str;
}

/// On-disk manifest emitted by an external debug-info dumper.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DebugInfoManifest {
    pub binary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<BinaryKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub managed: Option<ManagedBinaryInfo>,
    #[serde(default)]
    pub modules: Vec<ModuleEntry>,
}

/// One compiland as written in a manifest.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModuleEntry {
    pub name: String,
    /// Owning static library; absent for directly linked objects.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub library: Option<String>,
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub has_debug_info: bool,
    #[serde(default)]
    pub compiler: CompilerIdentity,
    #[serde(default)]
    pub source_files: Vec<SourceFile>,
}

impl From<ModuleEntry> for CompiledModule {
    fn from(entry: ModuleEntry) -> Self {
        CompiledModule {
            name: entry.name,
            language: entry.language,
            has_debug_info: entry.has_debug_info,
            source_files: entry.source_files,
            provenance: CompilandProvenance::from_library(entry.library),
            compiler: entry.compiler,
        }
    }
}

impl From<DebugInfoManifest> for BinaryDebugInfo {
    fn from(manifest: DebugInfoManifest) -> Self {
        BinaryDebugInfo {
            binary: manifest.binary,
            kind: manifest.kind,
            managed: manifest.managed,
            modules: manifest.modules.into_iter().map(CompiledModule::from).collect(),
        }
    }
}

/// Reads a debug-info manifest; `.json` files as JSON, everything else as YAML.
pub struct ManifestSource;

impl ManifestSource {
    /// Parse manifest text. `path` is only used for format selection and errors.
    pub fn parse(path: &Path, body: &str) -> Result<DebugInfoManifest, DebugInfoError> {
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        let parsed: Result<DebugInfoManifest, String> = if is_json {
            serde_json::from_str(body).map_err(|e| e.to_string())
        } else {
            serde_yaml::from_str(body).map_err(|e| e.to_string())
        };
        parsed.map_err(|message| DebugInfoError::Parse { path: path.to_path_buf(), message })
    }
}

impl DebugInfoSource for ManifestSource {
    fn load(&self, path: &Path) -> Result<BinaryDebugInfo, DebugInfoError> {
        if !path.is_file() {
            return Err(DebugInfoError::Missing(path.to_path_buf()));
        }
        let body = std::fs::read_to_string(path)
            .map_err(|source| DebugInfoError::Io { path: path.to_path_buf(), source })?;
        let manifest = Self::parse(path, &body)?;
        Ok(manifest.into())
    }

    fn name(&self) -> &'static str {
        "manifest"
    }
}
