use std::path::PathBuf;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::analysis::classify;
use crate::model::BinaryKind;
use crate::report::{findings_for, Finding, Level, RULE_ID, RULE_NAME};
use crate::services::debug_info::{BinaryDebugInfo, DebugInfoError, DebugInfoSource};

/// Request to run the hashing check against one binary.
#[derive(Debug, Clone, Default)]
pub struct CheckRequest {
    /// Path handed to the debug-info source (e.g. a manifest file).
    pub debug_info_path: PathBuf,
    /// Optional on-disk image, used to detect the binary kind.
    pub binary_path: Option<PathBuf>,
    /// Explicit kind; wins over anything the debug info or image says.
    pub kind: Option<BinaryKind>,
    /// Optional content fingerprint of the binary, echoed into the report.
    pub binary_hash: Option<String>,
}

#[derive(Debug, Error)]
pub enum CheckError {
    #[error(transparent)]
    DebugInfo(#[from] DebugInfoError),
    #[error("Binary not found at {0}")]
    MissingBinary(PathBuf),
    #[error("Failed to read binary at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[cfg(feature = "pe-probe")]
    #[error("Failed to detect binary kind: {0}")]
    Probe(#[from] crate::services::probe::ProbeError),
}

/// Findings for one binary plus the context needed to report them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckReport {
    pub rule_id: String,
    pub rule_name: String,
    pub target: String,
    pub kind: BinaryKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binary_hash: Option<String>,
    pub generated_at: String,
    pub findings: Vec<Finding>,
}

impl CheckReport {
    pub fn has_errors(&self) -> bool {
        self.findings.iter().any(|f| f.level == Level::Error)
    }

    pub fn has_warnings(&self) -> bool {
        self.findings.iter().any(|f| f.level == Level::Warning)
    }

    /// Highest level among the findings (`Pass` when there are none).
    pub fn worst_level(&self) -> Level {
        self.findings.iter().map(|f| f.level).max().unwrap_or(Level::Pass)
    }
}

/// Coordinator tying a debug-info source to classification and reporting.
pub struct CheckRunner<'a> {
    pub source: &'a dyn DebugInfoSource,
}

impl<'a> CheckRunner<'a> {
    pub fn run(&self, request: &CheckRequest) -> Result<CheckReport, CheckError> {
        let info = self.source.load(&request.debug_info_path)?;
        debug!(
            source = self.source.name(),
            binary = %info.binary,
            modules = info.modules.len(),
            "loaded debug info"
        );

        let kind = self.resolve_kind(request, &info)?;
        let verdict = classify(kind, info.managed.as_ref(), &info.modules);
        let findings = findings_for(&info.binary, &verdict);

        info!(
            binary = %info.binary,
            kind = kind.as_str(),
            pass = verdict.is_pass(),
            findings = findings.len(),
            "source hashing check complete"
        );

        Ok(CheckReport {
            rule_id: RULE_ID.to_string(),
            rule_name: RULE_NAME.to_string(),
            target: info.binary,
            kind,
            binary_hash: request.binary_hash.clone(),
            generated_at: Utc::now().to_rfc3339(),
            findings,
        })
    }

    /// Explicit request kind, then the debug info's own claim, then the image
    /// itself; a binary we cannot look at is treated as native.
    fn resolve_kind(
        &self,
        request: &CheckRequest,
        info: &BinaryDebugInfo,
    ) -> Result<BinaryKind, CheckError> {
        if let Some(kind) = request.kind.or(info.kind) {
            return Ok(kind);
        }
        match &request.binary_path {
            Some(path) => probe_path(path),
            None => Ok(BinaryKind::Native),
        }
    }
}

#[cfg(feature = "pe-probe")]
fn probe_path(path: &std::path::Path) -> Result<BinaryKind, CheckError> {
    if !path.is_file() {
        return Err(CheckError::MissingBinary(path.to_path_buf()));
    }
    let bytes =
        std::fs::read(path).map_err(|source| CheckError::Io { path: path.to_path_buf(), source })?;
    let kind = crate::services::probe::probe_binary_kind(&bytes)?;
    debug!(path = %path.display(), kind = kind.as_str(), "probed binary kind");
    Ok(kind)
}

#[cfg(not(feature = "pe-probe"))]
fn probe_path(path: &std::path::Path) -> Result<BinaryKind, CheckError> {
    if !path.is_file() {
        return Err(CheckError::MissingBinary(path.to_path_buf()));
    }
    debug!(path = %path.display(), "binary kind probing disabled; assuming native");
    Ok(BinaryKind::Native)
}
