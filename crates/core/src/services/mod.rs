pub mod check;
pub mod debug_info;
#[cfg(feature = "pe-probe")]
pub mod probe;

pub use check::{CheckError, CheckReport, CheckRequest, CheckRunner};
pub use debug_info::{BinaryDebugInfo, DebugInfoError, DebugInfoSource, ManifestSource};
#[cfg(feature = "pe-probe")]
pub use probe::{probe_binary_kind, ProbeError};
