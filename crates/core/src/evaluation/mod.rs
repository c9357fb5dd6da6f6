//! Evaluation driver: load each binary, run the detector, compare against
//! ground truth, and fold the per-file verdicts into a [`Report`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::detectors::Detector;
use crate::engine::{display_name, AnalysisEngine, BinaryView};
use crate::ground_truth::ground_truth;
use crate::model::FunctionRef;
use crate::report::Report;

/// Configuration errors caught before any file is loaded.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EvalError {
    #[error("run with a detector: none was supplied")]
    MissingDetector,
    #[error("run with a file list: no files to evaluate")]
    EmptyFileList,
}

/// How many missed ground-truth functions are recorded per file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissPolicy {
    /// Stop at the first missing function.
    #[default]
    FirstOnly,
    /// Record every missing function.
    All,
}

/// Classification of a single file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", content = "detail", rename_all = "snake_case")]
pub enum Verdict {
    /// Detector output equals the ground truth.
    Good(Vec<FunctionRef>),
    /// Ground-truth functions the detector did not report.
    Missed(Vec<FunctionRef>),
    /// Reported functions that are not ground truth.
    FalsePositive(Vec<FunctionRef>),
    /// Output differs from the ground truth only by repeated entries.
    Unmatched,
    /// C++ binary; never handed to the detector.
    Excluded,
    /// Engine or detector failure.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileOutcome {
    pub file: String,
    pub path: PathBuf,
    pub verdict: Verdict,
}

/// Compare detector output against the ground truth.
///
/// Both lists are sorted by address first. A miss takes precedence over
/// false positives: once a ground-truth function is missing, extra results
/// for that file are not recorded.
pub fn classify(
    mut result: Vec<FunctionRef>,
    mut answer: Vec<FunctionRef>,
    policy: MissPolicy,
) -> Verdict {
    result.sort();
    answer.sort();

    if result == answer {
        return Verdict::Good(result);
    }

    let mut missing = answer.iter().filter(|f| !result.contains(f));
    let missed: Vec<FunctionRef> = match policy {
        MissPolicy::FirstOnly => missing.next().cloned().into_iter().collect(),
        MissPolicy::All => missing.cloned().collect(),
    };
    if !missed.is_empty() {
        return Verdict::Missed(missed);
    }

    let extra: Vec<FunctionRef> = result.iter().filter(|f| !answer.contains(f)).cloned().collect();
    if !extra.is_empty() {
        return Verdict::FalsePositive(extra);
    }

    Verdict::Unmatched
}

/// Drives a detector over a batch of binaries, one file at a time.
pub struct Evaluator<'a> {
    engine: &'a dyn AnalysisEngine,
    detector: &'a dyn Detector,
    files: Vec<PathBuf>,
    miss_policy: MissPolicy,
}

impl<'a> Evaluator<'a> {
    /// Validate inputs; both a detector and at least one file are required.
    pub fn new(
        engine: &'a dyn AnalysisEngine,
        detector: Option<&'a dyn Detector>,
        files: Vec<PathBuf>,
    ) -> Result<Self, EvalError> {
        let detector = detector.ok_or(EvalError::MissingDetector)?;
        if files.is_empty() {
            return Err(EvalError::EmptyFileList);
        }
        Ok(Self { engine, detector, files, miss_policy: MissPolicy::default() })
    }

    pub fn with_miss_policy(mut self, miss_policy: MissPolicy) -> Self {
        self.miss_policy = miss_policy;
        self
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn miss_policy(&self) -> MissPolicy {
        self.miss_policy
    }

    /// Evaluate every file and return the accumulated report.
    pub fn run(&self) -> Report {
        self.run_with(|_| {})
    }

    /// Like [`Evaluator::run`], calling `observe` after each file is scored.
    pub fn run_with<F: FnMut(&FileOutcome)>(&self, mut observe: F) -> Report {
        let mut report = Report::new();
        for path in &self.files {
            info!(file = %path.display(), detector = self.detector.name(), "evaluating");
            let outcome = self.evaluate_file(path);
            observe(&outcome);
            report.record(outcome);
        }
        report
    }

    /// Load, score, and release a single binary.
    pub fn evaluate_file(&self, path: &Path) -> FileOutcome {
        let view = match self.engine.load(path) {
            Ok(view) => view,
            Err(err) => {
                warn!(file = %path.display(), error = %err, "failed to load binary");
                return FileOutcome {
                    file: display_name(path),
                    path: path.to_path_buf(),
                    verdict: Verdict::Failed(err.to_string()),
                };
            }
        };

        let file = view.file_name();
        let verdict = self.score(view.as_ref());
        drop(view);

        FileOutcome { file, path: path.to_path_buf(), verdict }
    }

    fn score(&self, view: &dyn BinaryView) -> Verdict {
        if view.is_cpp() {
            debug!(file = %view.path().display(), "excluding c++ binary");
            return Verdict::Excluded;
        }

        let result = match self.detector.detect(view) {
            Ok(result) => result,
            Err(err) => {
                warn!(file = %view.path().display(), error = %err, "detector failed");
                return Verdict::Failed(err.to_string());
            }
        };
        let answer = ground_truth(view);
        debug!(result = result.len(), answer = answer.len(), "classifying");

        classify(result, answer, self.miss_policy)
    }
}
