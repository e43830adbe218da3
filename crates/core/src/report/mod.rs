//! Report shaping: coalescing offending compilands and mapping verdicts to findings.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::analysis::{PassKind, Verdict};
use crate::model::{CompiledModule, CompilerIdentity};

pub const RULE_ID: &str = "BA2004";
pub const RULE_NAME: &str = "EnableSecureSourceCodeHashing";

const RULE_DESCRIPTION: &str = "Compilers can generate and store checksums of source files in \
order to provide linkage between binaries, PDBs, and associated source code. This information is \
typically used to resolve source file when debugging but it can also be used to verify that a \
specific body of source code is, in fact, the code that was used to produce a specific set of \
binary and symbols. This validation is helpful in verifying supply chain integrity. Due to this \
security focus, it is important that the hashing algorithm used to produce checksums is secure. \
Legacy hashing algorithms, such as MD5 and SHA-1, have been demonstrated to be broken by modern \
hardware (that is, it is computationally feasible to force hash collisions, in which a common hash \
is generated from distinct files). Using a secure hashing algorithm, such as SHA-256, prevents the \
possibility of collision attacks, in which the checksum of a malicious file is used to produce a \
hash that satisfies the system that it is, in fact, the original file processed by the compiler. \
For managed binaries, pass '-checksumalgorithm:SHA256' on the csc.exe command-line or populate \
the '<ChecksumAlgorithm>' project property with 'SHA256' to enable secure source code hashing. \
For native binaries, pass '/ZH:SHA_256' on the cl.exe command-line to enable secure source code \
hashing.";

/// Static description of the check. The option list is always empty.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RuleDescriptor {
    pub id: String,
    pub name: String,
    pub description: String,
    pub options: Vec<String>,
}

impl RuleDescriptor {
    pub fn current() -> Self {
        Self {
            id: RULE_ID.to_string(),
            name: RULE_NAME.to_string(),
            description: RULE_DESCRIPTION.to_string(),
            options: Vec::new(),
        }
    }
}

/// Result level of a single finding.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Pass,
    Warning,
    Error,
}

impl Level {
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Pass => "pass",
            Level::Warning => "warning",
            Level::Error => "error",
        }
    }
}

/// One record handed to the reporting sink.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Finding {
    pub rule_id: String,
    pub level: Level,
    pub target: String,
    pub message: String,
}

impl Finding {
    fn new(level: Level, target: &str, message: String) -> Self {
        Self { rule_id: RULE_ID.to_string(), level, target: target.to_string(), message }
    }
}

/// Render offending compilands grouped under the compiler that produced them.
///
/// Groups and their members keep first-seen order. A compiland is identified
/// by its object name plus owning library, so repeats collapse to one entry.
/// Each group renders as one line: `<compiler> : <module>, <module> (<library>)`.
pub fn coalesce(modules: &[CompiledModule]) -> String {
    let mut groups: Vec<(&CompilerIdentity, Vec<&CompiledModule>)> = Vec::new();
    let mut group_index: HashMap<&CompilerIdentity, usize> = HashMap::new();
    let mut seen: HashSet<(&CompilerIdentity, Option<&str>, &str)> = HashSet::new();

    for module in modules {
        let key = (&module.compiler, module.provenance.library(), module.name.as_str());
        if !seen.insert(key) {
            continue;
        }
        let idx = *group_index.entry(&module.compiler).or_insert_with(|| {
            groups.push((&module.compiler, Vec::new()));
            groups.len() - 1
        });
        groups[idx].1.push(module);
    }

    groups
        .iter()
        .map(|(compiler, members)| {
            let names: Vec<String> = members.iter().map(|m| module_label(m)).collect();
            format!("{} : {}", compiler, names.join(", "))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn module_label(module: &CompiledModule) -> String {
    match module.provenance.library() {
        Some(library) => format!("{} ({})", module.name, library),
        None => module.name.clone(),
    }
}

/// Map a verdict to the records the reporting sink should emit.
///
/// Native results yield a warning for library-sourced compilands and an error
/// for directly linked ones, in that order; either may be absent.
pub fn findings_for(target: &str, verdict: &Verdict) -> Vec<Finding> {
    match verdict {
        Verdict::Pass { kind } => {
            vec![Finding::new(Level::Pass, target, pass_message(target, *kind))]
        }
        Verdict::Fail { algorithm } => vec![Finding::new(
            Level::Error,
            target,
            format!(
                "'{target}' is a managed binary that was compiled with an insecure ({algorithm}) \
                 source code hashing algorithm. Insecure checksum algorithms are subject to \
                 collision attacks and their use can compromise supply chain integrity. Pass \
                 '-checksumalgorithm:SHA256' on the csc.exe command-line or populate the \
                 '<ChecksumAlgorithm>' project property with 'SHA256' to enable secure source \
                 code hashing."
            ),
        )],
        Verdict::NativeResult { buckets } => {
            let mut findings = Vec::new();
            if !buckets.warn.is_empty() {
                findings.push(Finding::new(
                    Level::Warning,
                    target,
                    format!(
                        "'{target}' is a native binary that links one or more static libraries \
                         that include object files which were hashed using an insecure checksum \
                         algorithm. Insecure checksum algorithms are subject to collision attacks \
                         and their use can compromise supply chain integrity. Pass '/ZH:SHA_256' \
                         on the cl.exe command-line to enable secure source code hashing. The \
                         following modules are out of policy:\n{}",
                        coalesce(&buckets.warn)
                    ),
                ));
            }
            if !buckets.error.is_empty() {
                findings.push(Finding::new(
                    Level::Error,
                    target,
                    format!(
                        "'{target}' is a native binary that directly compiles and links one or \
                         more object files which were hashed using an insecure checksum \
                         algorithm. Insecure checksum algorithms are subject to collision attacks \
                         and their use can compromise supply chain integrity. Pass '/ZH:SHA_256' \
                         on the cl.exe command-line to enable secure source code hashing. The \
                         following modules are out of policy:\n{}",
                        coalesce(&buckets.error)
                    ),
                ));
            }
            findings
        }
    }
}

fn pass_message(target: &str, kind: PassKind) -> String {
    format!(
        "'{target}' is a {} binary that was compiled with a secure (SHA-256) source code hashing \
         algorithm.",
        kind.as_str()
    )
}
