use std::path::PathBuf;

use juliet_core::config::EvalConfig;
use juliet_core::evaluation::{FileOutcome, MissPolicy, Verdict};
use juliet_core::model::FunctionRef;
use juliet_eval::commands::{
    check_detector, detector_registry, outcome_lines, select_detector_name, RunOptions,
    RunSettings,
};

#[test]
fn flags_override_config_values() {
    let config = EvalConfig {
        engine: Some("goblin".into()),
        detector: Some("none".into()),
        pattern: None,
        paths: vec![PathBuf::from("/corpus")],
        extensions: vec!["out".into()],
        miss_policy: Some(MissPolicy::All),
    };
    let opts = RunOptions {
        paths: vec![PathBuf::from("/other")],
        detector: Some("oracle".into()),
        ..Default::default()
    };

    let settings = RunSettings::resolve(&opts, config);
    assert_eq!(settings.paths, vec![PathBuf::from("/other")]);
    assert_eq!(settings.detector.as_deref(), Some("oracle"));
    assert_eq!(settings.engine, "goblin");
    assert_eq!(settings.extensions, vec!["out".to_string()]);
    assert_eq!(settings.miss_policy, MissPolicy::All);
}

#[test]
fn defaults_apply_without_config() {
    let settings = RunSettings::resolve(&RunOptions::default(), EvalConfig::default());
    assert_eq!(settings.engine, "goblin");
    assert!(settings.detector.is_none());
    assert_eq!(settings.miss_policy, MissPolicy::FirstOnly);
}

#[test]
fn all_misses_flag_wins() {
    let opts = RunOptions { all_misses: true, ..Default::default() };
    let settings = RunSettings::resolve(&opts, EvalConfig::default());
    assert_eq!(settings.miss_policy, MissPolicy::All);
}

#[test]
fn pattern_implies_name_pattern_detector() {
    assert_eq!(select_detector_name(None, Some("bad")).as_deref(), Some("name-pattern"));
    assert_eq!(select_detector_name(Some("oracle".into()), Some("bad")).as_deref(), Some("oracle"));
    assert_eq!(select_detector_name(None, None), None);
}

#[test]
fn detector_checks_explain_failures() {
    let registry = detector_registry(None).unwrap();
    assert!(check_detector(&registry, "oracle").is_ok());
    let err = check_detector(&registry, "name-pattern").unwrap_err();
    assert!(err.to_string().contains("--pattern"));
    let err = check_detector(&registry, "magic").unwrap_err();
    assert!(err.to_string().contains("Unknown detector 'magic'"));

    let registry = detector_registry(Some("_bad$")).unwrap();
    assert!(check_detector(&registry, "name-pattern").is_ok());
    assert!(detector_registry(Some("(")).is_err());
}

#[test]
fn outcome_lines_describe_each_verdict() {
    let outcome = FileOutcome {
        file: "CWE476_01.out".into(),
        path: PathBuf::from("CWE476_01.out"),
        verdict: Verdict::Missed(vec![FunctionRef::new("CWE476_bad", 0x400100)]),
    };
    let lines = outcome_lines(&outcome);
    assert_eq!(lines[0], "CWE476_01.out is running... ");
    assert!(lines[1].contains("you cant detect the bad function at 0x400100"));

    let outcome = FileOutcome {
        verdict: Verdict::FalsePositive(vec![
            FunctionRef::new("main", 0x1000),
            FunctionRef::new("helper", 0x1100),
        ]),
        ..outcome
    };
    let lines = outcome_lines(&outcome);
    assert_eq!(lines.len(), 3);
    assert!(lines[2].contains("false positive at 0x1100"));
}
