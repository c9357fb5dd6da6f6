use std::path::{Path, PathBuf};

use juliet_core::detectors::{
    default_detector_registry, Detector, DetectorError, DetectorRegistry, NamePatternDetector,
};
use juliet_core::engine::BinaryView;
use juliet_core::model::FunctionRef;

struct StaticView {
    path: PathBuf,
    functions: Vec<FunctionRef>,
}

impl BinaryView for StaticView {
    fn path(&self) -> &Path {
        &self.path
    }

    fn functions(&self) -> &[FunctionRef] {
        &self.functions
    }

    fn is_cpp(&self) -> bool {
        false
    }
}

fn sample_view() -> StaticView {
    StaticView {
        path: PathBuf::from("/corpus/CWE121_01.out"),
        functions: vec![
            FunctionRef::new("main", 0x1000),
            FunctionRef::new("CWE121_Stack__char_01_bad", 0x1100),
            FunctionRef::new("CWE121_Stack__char_01_good", 0x1200),
            FunctionRef::new("goodG2B", 0x1300),
        ],
    }
}

#[test]
fn default_registry_lists_builtin_detectors() {
    let registry = default_detector_registry();
    assert_eq!(registry.names(), vec!["none".to_string(), "oracle".to_string()]);
    assert!(registry.get("name-pattern").is_none());
}

#[test]
fn registry_accepts_name_pattern_detector() {
    let mut registry = DetectorRegistry::new();
    registry.register(NamePatternDetector::new("bad").unwrap());
    assert!(registry.get("name-pattern").is_some());
}

#[test]
fn null_detector_reports_nothing() {
    let registry = default_detector_registry();
    let none = registry.get("none").unwrap();
    assert!(none.detect(&sample_view()).unwrap().is_empty());
}

#[test]
fn oracle_reports_ground_truth() {
    let registry = default_detector_registry();
    let oracle = registry.get("oracle").unwrap();
    assert_eq!(
        oracle.detect(&sample_view()).unwrap(),
        vec![FunctionRef::new("CWE121_Stack__char_01_bad", 0x1100)]
    );
}

#[test]
fn name_pattern_matches_anywhere_in_the_name() {
    let detector = NamePatternDetector::new("good").unwrap();
    let found = detector.detect(&sample_view()).unwrap();
    let names: Vec<&str> = found.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["CWE121_Stack__char_01_good", "goodG2B"]);
    assert_eq!(detector.pattern(), "good");
}

#[test]
fn invalid_pattern_is_a_detector_error() {
    let err = NamePatternDetector::new("(unclosed").err().expect("error");
    assert!(matches!(err, DetectorError::InvalidPattern { .. }));
    assert!(err.to_string().contains("(unclosed"));
}
