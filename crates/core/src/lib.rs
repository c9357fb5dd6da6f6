//! juliet-core
//!
//! Core library for scoring vulnerability detectors against the Juliet CWE
//! binary test suite.
//!
//! This crate defines the function model, the analysis-engine capability
//! interface (plus a goblin-backed engine), the ground-truth naming
//! heuristic, the detector contract, and the evaluation driver that tallies
//! matches, misses, and false positives into a report.
//!
//! The goal is to keep all substantive logic here so it is fully testable
//! with in-memory fakes and reusable from multiple frontends.

pub mod config;
pub mod detectors;
pub mod engine;
pub mod evaluation;
pub mod ground_truth;
pub mod model;
pub mod report;

/// Returns the library version as encoded at compile time.
///
/// Useful for tests and for frontends to report consistent version info.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
