//! Binary analysis engines.
//!
//! An engine turns a file on disk into a [`BinaryView`]: the list of
//! functions it discovered plus the capability check used to exclude C++
//! binaries from scoring. The evaluation driver only talks to these traits,
//! so it can be exercised with in-memory fakes.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::model::FunctionRef;

#[cfg(feature = "goblin-engine")]
pub mod goblin;

#[cfg(feature = "goblin-engine")]
pub use self::goblin::GoblinEngine;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Binary not found at {0}")]
    MissingBinary(PathBuf),
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("Unsupported binary format: {0}")]
    Unsupported(PathBuf),
}

/// One loaded and analyzed binary.
///
/// Whatever the engine holds for the binary is released when the view is
/// dropped.
pub trait BinaryView {
    fn path(&self) -> &Path;

    /// Functions discovered in the binary, sorted by start address.
    fn functions(&self) -> &[FunctionRef];

    /// Whether the binary was built from C++ (excluded from scoring).
    fn is_cpp(&self) -> bool;

    /// File name used as the key in reports.
    fn file_name(&self) -> String {
        display_name(self.path())
    }
}

/// Trait implemented by analysis engines.
pub trait AnalysisEngine: Send + Sync {
    fn load(&self, path: &Path) -> Result<Box<dyn BinaryView>, EngineError>;
    fn name(&self) -> &'static str;
}

/// Final path component, falling back to the full path when there is none.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Registry for analysis engines; callers select by name.
#[derive(Default)]
pub struct EngineRegistry {
    engines: HashMap<String, Box<dyn AnalysisEngine>>,
}

impl EngineRegistry {
    pub fn new() -> Self {
        Self { engines: HashMap::new() }
    }

    pub fn register<E: AnalysisEngine + 'static>(&mut self, engine: E) -> &mut Self {
        self.engines.insert(engine.name().to_string(), Box::new(engine));
        self
    }

    pub fn get(&self, name: &str) -> Option<&dyn AnalysisEngine> {
        self.engines.get(name).map(|e| &**e)
    }

    /// Return a sorted list of registered engine names for error messages/help.
    pub fn names(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.engines.keys().cloned().collect();
        keys.sort();
        keys
    }
}

/// Name of the engine used when none is requested.
pub const DEFAULT_ENGINE: &str = "goblin";

/// Registry populated with every engine compiled into this build.
pub fn default_engine_registry() -> EngineRegistry {
    #[allow(unused_mut)]
    let mut registry = EngineRegistry::new();
    #[cfg(feature = "goblin-engine")]
    {
        registry.register(GoblinEngine);
    }
    registry
}
