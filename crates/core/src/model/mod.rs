//! Core data model shared by engines, detectors, and the evaluation driver.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single function discovered in an analyzed binary.
///
/// Ordering is by start address first, then by name, so sorting a list of
/// references yields address order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FunctionRef {
    pub start: u64,
    pub name: String,
}

impl FunctionRef {
    pub fn new(name: impl Into<String>, start: u64) -> Self {
        Self { start, name: name.into() }
    }
}

impl fmt::Display for FunctionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{:#x}", self.name, self.start)
    }
}
