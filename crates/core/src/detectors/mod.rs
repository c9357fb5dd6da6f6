//! Detector contract and built-in detectors.
//!
//! A detector inspects a [`BinaryView`] and reports the functions it believes
//! are vulnerable. It must not depend on evaluation state; the driver only
//! compares its output against the ground truth.

use std::collections::HashMap;

use regex::Regex;
use thiserror::Error;

use crate::engine::BinaryView;
use crate::ground_truth::ground_truth;
use crate::model::FunctionRef;

#[derive(Debug, Error)]
pub enum DetectorError {
    #[error("Invalid detector pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("Detector failed: {0}")]
    Failed(String),
}

/// Trait implemented by vulnerability detectors under evaluation.
pub trait Detector: Send + Sync {
    fn detect(&self, view: &dyn BinaryView) -> Result<Vec<FunctionRef>, DetectorError>;
    fn name(&self) -> &str;
}

/// Adapts a plain function or closure into a [`Detector`].
pub struct FnDetector<F> {
    name: String,
    func: F,
}

impl<F> FnDetector<F>
where
    F: Fn(&dyn BinaryView) -> Result<Vec<FunctionRef>, DetectorError> + Send + Sync,
{
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self { name: name.into(), func }
    }
}

impl<F> Detector for FnDetector<F>
where
    F: Fn(&dyn BinaryView) -> Result<Vec<FunctionRef>, DetectorError> + Send + Sync,
{
    fn detect(&self, view: &dyn BinaryView) -> Result<Vec<FunctionRef>, DetectorError> {
        (self.func)(view)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Reports nothing. Baseline: every labeled binary becomes a miss.
pub struct NullDetector;

impl Detector for NullDetector {
    fn detect(&self, _view: &dyn BinaryView) -> Result<Vec<FunctionRef>, DetectorError> {
        Ok(Vec::new())
    }

    fn name(&self) -> &str {
        "none"
    }
}

/// Reports the ground truth itself; a pipeline sanity check.
pub struct OracleDetector;

impl Detector for OracleDetector {
    fn detect(&self, view: &dyn BinaryView) -> Result<Vec<FunctionRef>, DetectorError> {
        Ok(ground_truth(view))
    }

    fn name(&self) -> &str {
        "oracle"
    }
}

/// Reports every function whose name matches a regular expression.
pub struct NamePatternDetector {
    pattern: Regex,
}

impl NamePatternDetector {
    pub fn new(pattern: &str) -> Result<Self, DetectorError> {
        let pattern = Regex::new(pattern).map_err(|source| DetectorError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self { pattern })
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

impl Detector for NamePatternDetector {
    fn detect(&self, view: &dyn BinaryView) -> Result<Vec<FunctionRef>, DetectorError> {
        Ok(view.functions().iter().filter(|f| self.pattern.is_match(&f.name)).cloned().collect())
    }

    fn name(&self) -> &str {
        "name-pattern"
    }
}

/// Registry for detectors; callers select by name.
#[derive(Default)]
pub struct DetectorRegistry {
    detectors: HashMap<String, Box<dyn Detector>>,
}

impl DetectorRegistry {
    pub fn new() -> Self {
        Self { detectors: HashMap::new() }
    }

    pub fn register<D: Detector + 'static>(&mut self, detector: D) -> &mut Self {
        self.detectors.insert(detector.name().to_string(), Box::new(detector));
        self
    }

    pub fn get(&self, name: &str) -> Option<&dyn Detector> {
        self.detectors.get(name).map(|d| &**d)
    }

    /// Return a sorted list of registered detector names for error messages/help.
    pub fn names(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.detectors.keys().cloned().collect();
        keys.sort();
        keys
    }
}

/// Registry with the detectors that need no configuration.
///
/// `name-pattern` is registered by frontends once a pattern is known.
pub fn default_detector_registry() -> DetectorRegistry {
    let mut registry = DetectorRegistry::new();
    registry.register(NullDetector);
    registry.register(OracleDetector);
    registry
}
