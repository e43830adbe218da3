//! hashcheck-core
//!
//! Core library for checking that the source files compiled into a binary were
//! fingerprinted with a secure hashing algorithm (SHA-256), as recorded in the
//! binary's debug information.
//!
//! This crate defines the debug-info data model, the pure classification and
//! report-shaping logic, the seam for debug-info readers, and binary-kind
//! detection. Parsing PDBs and emitting results are left to collaborators so
//! the decision logic stays fully testable and reusable from multiple frontends.

pub mod analysis;
pub mod config;
pub mod model;
pub mod report;
pub mod services;

/// Returns the library version as encoded at compile time.
///
/// Useful for tests and for frontends to report consistent version info.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
