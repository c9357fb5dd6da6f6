//! Result accumulation and the aggregate summary.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::evaluation::{FileOutcome, Verdict};
use crate::model::FunctionRef;

/// Per-file result buckets, keyed by file name.
///
/// A file lands in at most one scoring bucket. Excluded files never appear
/// anywhere but `excluded`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub good: BTreeMap<String, Vec<FunctionRef>>,
    pub missed: BTreeMap<String, Vec<FunctionRef>>,
    pub false_positive: BTreeMap<String, Vec<FunctionRef>>,
    pub excluded: Vec<String>,
    pub failed: BTreeMap<String, String>,
    pub unmatched: Vec<String>,
    pub files_total: usize,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one file's outcome into the buckets.
    pub fn record(&mut self, outcome: FileOutcome) {
        self.files_total += 1;
        let FileOutcome { file, verdict, .. } = outcome;
        match verdict {
            Verdict::Good(found) => {
                self.good.insert(file, found);
            }
            Verdict::Missed(missing) => self.missed.entry(file).or_default().extend(missing),
            Verdict::FalsePositive(extra) => {
                self.false_positive.entry(file).or_default().extend(extra)
            }
            Verdict::Unmatched => self.unmatched.push(file),
            Verdict::Excluded => self.excluded.push(file),
            Verdict::Failed(reason) => {
                self.failed.insert(file, reason);
            }
        }
    }

    pub fn summary(&self) -> Summary {
        let excluded = self.excluded.len();
        let good = self.good.len();
        let false_positive = self.false_positive.len();
        Summary {
            excluded,
            total: self.files_total.saturating_sub(excluded),
            detected: good + false_positive,
            good,
            false_positive,
            missed: self.missed.len(),
            failed: self.failed.len(),
        }
    }
}

impl Extend<FileOutcome> for Report {
    fn extend<T: IntoIterator<Item = FileOutcome>>(&mut self, iter: T) {
        for outcome in iter {
            self.record(outcome);
        }
    }
}

/// File-level counts derived from a [`Report`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub excluded: usize,
    /// Files handed to the driver minus excluded ones.
    pub total: usize,
    pub detected: usize,
    pub good: usize,
    pub false_positive: usize,
    pub missed: usize,
    pub failed: usize,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "c++ binaries: {}", self.excluded)?;
        writeln!(f, "result [File]:")?;
        write!(
            f,
            "detect: {}/{} (good: {}|false positive: {}) missed: {}/{}",
            self.detected, self.total, self.good, self.false_positive, self.missed, self.total
        )?;
        if self.failed > 0 {
            write!(f, "\nfailed: {}/{}", self.failed, self.total)?;
        }
        Ok(())
    }
}
