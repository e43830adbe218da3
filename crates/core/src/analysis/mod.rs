//! Classification of a binary's recorded source hashing algorithms.
//!
//! Both entry points are pure: they take already-parsed debug-info facts and
//! return a [`Verdict`] without touching any reporting sink.

use serde::Serialize;
use tracing::debug;

use crate::model::{
    BinaryKind, CompilandProvenance, CompiledModule, HashAlgorithm, ManagedBinaryInfo,
};

/// Which classification path produced a pass.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PassKind {
    Managed,
    Native,
}

impl PassKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PassKind::Managed => "managed",
            PassKind::Native => "native",
        }
    }
}

/// Severity bucket an offending compiland lands in.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    /// Compiland came from a static library.
    Warn,
    /// Compiland was linked as a standalone object.
    Error,
}

impl Bucket {
    pub fn for_provenance(provenance: &CompilandProvenance) -> Self {
        match provenance {
            CompilandProvenance::StaticLibrary(_) => Bucket::Warn,
            CompilandProvenance::DirectObject => Bucket::Error,
        }
    }
}

/// Offending native compilands, partitioned by provenance in encounter order.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct NativeBuckets {
    pub warn: Vec<CompiledModule>,
    pub error: Vec<CompiledModule>,
}

impl NativeBuckets {
    pub fn is_empty(&self) -> bool {
        self.warn.is_empty() && self.error.is_empty()
    }

    fn push(&mut self, module: &CompiledModule) {
        match Bucket::for_provenance(&module.provenance) {
            Bucket::Warn => self.warn.push(module.clone()),
            Bucket::Error => self.error.push(module.clone()),
        }
    }
}

/// Outcome of the hashing check for one binary.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    Pass { kind: PassKind },
    /// Managed assembly recorded something other than SHA-256.
    Fail { algorithm: HashAlgorithm },
    /// At least one native compiland is out of policy.
    NativeResult { buckets: NativeBuckets },
}

impl Verdict {
    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass { .. })
    }
}

/// Judge a managed assembly by its single, binary-wide checksum algorithm.
pub fn classify_managed(info: &ManagedBinaryInfo) -> Verdict {
    if info.checksum_algorithm.is_secure() {
        Verdict::Pass { kind: PassKind::Managed }
    } else {
        Verdict::Fail { algorithm: info.checksum_algorithm }
    }
}

/// Judge a native (or mixed-mode) binary by its C/C++ compilands.
///
/// Only the first source file of each compiland is inspected; compiler flags
/// apply to a whole translation unit. An empty module list passes.
pub fn classify_native(modules: &[CompiledModule]) -> Verdict {
    let mut buckets = NativeBuckets::default();

    for module in modules {
        if !module.language.is_native_c_family() {
            debug!(
                module = %module.name,
                language = module.language.as_str(),
                "skipping non C/C++ compiland"
            );
            continue;
        }
        if !module.has_debug_info {
            debug!(module = %module.name, "skipping compiland without debug info");
            continue;
        }
        let Some(hash) = module.first_source_hash() else {
            debug!(module = %module.name, "skipping compiland with no source files");
            continue;
        };
        if hash.is_secure() {
            continue;
        }

        debug!(
            module = %module.name,
            library = module.provenance.library().unwrap_or("-"),
            %hash,
            "compiland uses insecure source hashing"
        );
        buckets.push(module);
    }

    if buckets.is_empty() {
        Verdict::Pass { kind: PassKind::Native }
    } else {
        Verdict::NativeResult { buckets }
    }
}

/// Dispatch on binary kind: IL-only assemblies use the managed checksum, all
/// others (native and mixed-mode) are judged compiland by compiland.
///
/// A managed assembly with no recorded checksum is treated as `Unknown`.
pub fn classify(
    kind: BinaryKind,
    managed: Option<&ManagedBinaryInfo>,
    modules: &[CompiledModule],
) -> Verdict {
    if kind.uses_managed_checksum() {
        classify_managed(&managed.copied().unwrap_or_default())
    } else {
        classify_native(modules)
    }
}
