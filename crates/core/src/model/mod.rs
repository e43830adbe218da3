//! Core data model for debug-info facts consumed by the hashing check.
//!
//! These types describe what the debug-info collaborator has already parsed out
//! of a binary: per-compiland language, debug-info presence, source-file hash
//! algorithms, and whether the compiland came from a static library or was
//! linked as a standalone object file.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Source language recorded for a compiland.
///
/// Only `C` and `Cxx` compilands are inspected for native binaries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    C,
    Cxx,
    CSharp,
    Other,
    #[default]
    #[serde(other)]
    Unknown,
}

impl Language {
    /// Languages whose compilands carry per-source-file checksums we can judge.
    pub fn is_native_c_family(self) -> bool {
        matches!(self, Language::C | Language::Cxx)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Language::C => "c",
            Language::Cxx => "cxx",
            Language::CSharp => "csharp",
            Language::Other => "other",
            Language::Unknown => "unknown",
        }
    }
}

/// Digest function recorded as having fingerprinted a source file at compile time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    Sha256,
    Sha1,
    Md5,
    #[default]
    #[serde(other)]
    Unknown,
}

impl HashAlgorithm {
    /// SHA-256 is the only accepted algorithm. `Unknown` never passes.
    pub fn is_secure(self) -> bool {
        self == HashAlgorithm::Sha256
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            HashAlgorithm::Sha256 => "SHA-256",
            HashAlgorithm::Sha1 => "SHA-1",
            HashAlgorithm::Md5 => "MD5",
            HashAlgorithm::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

/// One source file listed for a compiland, with its recorded checksum algorithm.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceFile {
    pub path: String,
    #[serde(default)]
    pub hash: HashAlgorithm,
}

impl SourceFile {
    pub fn new(path: impl Into<String>, hash: HashAlgorithm) -> Self {
        Self { path: path.into(), hash }
    }
}

/// Whether a compiland was pulled in from a static library or linked directly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CompilandProvenance {
    DirectObject,
    StaticLibrary(String),
}

impl CompilandProvenance {
    /// Build provenance from an optional library name (absent means direct object).
    pub fn from_library(library: Option<String>) -> Self {
        match library {
            Some(name) => CompilandProvenance::StaticLibrary(name),
            None => CompilandProvenance::DirectObject,
        }
    }

    pub fn library(&self) -> Option<&str> {
        match self {
            CompilandProvenance::DirectObject => None,
            CompilandProvenance::StaticLibrary(name) => Some(name.as_str()),
        }
    }
}

/// Toolchain identity used purely as a grouping key in reports.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CompilerIdentity {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl CompilerIdentity {
    pub fn new(name: impl Into<String>, version: Option<String>) -> Self {
        Self { name: name.into(), version }
    }
}

impl Default for CompilerIdentity {
    fn default() -> Self {
        Self { name: "Unknown compiler".to_string(), version: None }
    }
}

impl fmt::Display for CompilerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{} ({})", self.name, version),
            None => f.write_str(&self.name),
        }
    }
}

/// One compiled module (compiland) as exposed by the debug-info reader.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompiledModule {
    /// Object module name (e.g. `main.obj`).
    pub name: String,
    pub language: Language,
    pub has_debug_info: bool,
    /// Ordered as recorded in the debug info.
    pub source_files: Vec<SourceFile>,
    pub provenance: CompilandProvenance,
    pub compiler: CompilerIdentity,
}

impl CompiledModule {
    pub fn new(name: impl Into<String>, language: Language) -> Self {
        Self {
            name: name.into(),
            language,
            has_debug_info: true,
            source_files: Vec::new(),
            provenance: CompilandProvenance::DirectObject,
            compiler: CompilerIdentity::default(),
        }
    }

    /// Builder-style helper to append a source file.
    pub fn with_source(mut self, path: impl Into<String>, hash: HashAlgorithm) -> Self {
        self.source_files.push(SourceFile::new(path, hash));
        self
    }

    pub fn with_library(mut self, library: impl Into<String>) -> Self {
        self.provenance = CompilandProvenance::StaticLibrary(library.into());
        self
    }

    pub fn with_compiler(mut self, compiler: CompilerIdentity) -> Self {
        self.compiler = compiler;
        self
    }

    pub fn with_debug_info(mut self, has_debug_info: bool) -> Self {
        self.has_debug_info = has_debug_info;
        self
    }

    /// Hash algorithm of the first listed source file, if any.
    pub fn first_source_hash(&self) -> Option<HashAlgorithm> {
        self.source_files.first().map(|file| file.hash)
    }
}

/// The single, binary-wide checksum algorithm recorded for a managed assembly.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ManagedBinaryInfo {
    #[serde(default)]
    pub checksum_algorithm: HashAlgorithm,
}

impl ManagedBinaryInfo {
    pub fn new(checksum_algorithm: HashAlgorithm) -> Self {
        Self { checksum_algorithm }
    }
}

/// How a binary was produced, which decides the classification path.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BinaryKind {
    Native,
    /// IL-only managed assembly.
    Managed,
    /// Managed assembly that also carries native-compiled code.
    Mixed,
}

impl BinaryKind {
    /// Only pure managed assemblies are judged by their header checksum.
    pub fn uses_managed_checksum(self) -> bool {
        self == BinaryKind::Managed
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BinaryKind::Native => "native",
            BinaryKind::Managed => "managed",
            BinaryKind::Mixed => "mixed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "native" => Some(BinaryKind::Native),
            "managed" => Some(BinaryKind::Managed),
            "mixed" => Some(BinaryKind::Mixed),
            _ => None,
        }
    }
}
