use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use colored::Colorize;
use serde::Serialize;

use juliet_core::config::EvalConfig;
use juliet_core::detectors::Detector;
use juliet_core::engine::{default_engine_registry, AnalysisEngine, DEFAULT_ENGINE};
use juliet_core::evaluation::{Evaluator, FileOutcome, MissPolicy, Verdict};
use juliet_core::report::{Report, Summary};

use crate::collect_binaries;
use crate::commands::detectors::{check_detector, detector_registry, select_detector_name};
use crate::commands::engines::resolve_engine;

/// Options for `run`, as parsed from the command line.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub paths: Vec<PathBuf>,
    pub config: Option<PathBuf>,
    pub engine: Option<String>,
    pub detector: Option<String>,
    pub pattern: Option<String>,
    pub extensions: Vec<String>,
    pub all_misses: bool,
    pub json: bool,
}

/// Effective settings after layering flags over the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    pub paths: Vec<PathBuf>,
    pub engine: String,
    pub detector: Option<String>,
    pub pattern: Option<String>,
    pub extensions: Vec<String>,
    pub miss_policy: MissPolicy,
}

impl RunSettings {
    pub fn resolve(opts: &RunOptions, config: EvalConfig) -> Self {
        let pattern = opts.pattern.clone().or(config.pattern);
        let detector =
            select_detector_name(opts.detector.clone().or(config.detector), pattern.as_deref());
        let miss_policy = if opts.all_misses {
            MissPolicy::All
        } else {
            config.miss_policy.unwrap_or_default()
        };
        Self {
            paths: if opts.paths.is_empty() { config.paths } else { opts.paths.clone() },
            engine: opts
                .engine
                .clone()
                .or(config.engine)
                .unwrap_or_else(|| DEFAULT_ENGINE.to_string()),
            detector,
            pattern,
            extensions: if opts.extensions.is_empty() {
                config.extensions
            } else {
                opts.extensions.clone()
            },
            miss_policy,
        }
    }
}

/// JSON document emitted by `run --json`.
#[derive(Debug, Serialize)]
pub struct RunReport<'a> {
    pub started_at: String,
    pub finished_at: String,
    pub engine: &'a str,
    pub detector: &'a str,
    pub miss_policy: MissPolicy,
    pub summary: Summary,
    pub report: &'a Report,
}

/// Console line(s) for one scored file.
pub fn outcome_lines(outcome: &FileOutcome) -> Vec<String> {
    let mut lines = vec![format!("{} is running... ", outcome.file)];
    match &outcome.verdict {
        Verdict::Good(_) => lines.push("    good!".green().to_string()),
        Verdict::Missed(missing) => {
            for func in missing {
                lines.push(
                    format!("    you cant detect the bad function at {:#x}", func.start)
                        .red()
                        .bold()
                        .to_string(),
                );
            }
        }
        Verdict::FalsePositive(extra) => {
            for func in extra {
                lines.push(format!("    false positive at {:#x}", func.start));
            }
        }
        Verdict::Unmatched => {
            lines.push("    result differs from ground truth only by duplicates".to_string())
        }
        Verdict::Excluded => lines.push("    c++ binary, skipped".dimmed().to_string()),
        Verdict::Failed(reason) => lines.push(format!("    error: {reason}").yellow().to_string()),
    }
    lines
}

/// Evaluate a detector over a corpus and print the report.
pub fn run_command(opts: RunOptions) -> Result<Report> {
    let config = match &opts.config {
        Some(path) => EvalConfig::load(path)
            .with_context(|| format!("Failed to load run config {}", path.display()))?,
        None => EvalConfig::default(),
    };
    let settings = RunSettings::resolve(&opts, config);

    let engines = default_engine_registry();
    let engine = resolve_engine(&engines, &settings.engine)?;

    let detectors = detector_registry(settings.pattern.as_deref())?;
    if let Some(name) = &settings.detector {
        check_detector(&detectors, name)?;
    }
    let detector = settings.detector.as_deref().and_then(|name| detectors.get(name));

    let files = collect_binaries(&settings.paths, &settings.extensions)?;
    let evaluator =
        Evaluator::new(engine, detector, files)?.with_miss_policy(settings.miss_policy);

    let started_at = Utc::now().to_rfc3339();
    let report = evaluator.run_with(|outcome| {
        if !opts.json {
            for line in outcome_lines(outcome) {
                println!("{line}");
            }
        }
    });
    let finished_at = Utc::now().to_rfc3339();

    if opts.json {
        let doc = RunReport {
            started_at,
            finished_at,
            engine: engine.name(),
            detector: detector.map(|d| d.name()).unwrap_or_default(),
            miss_policy: settings.miss_policy,
            summary: report.summary(),
            report: &report,
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&doc).context("Failed to serialize report to JSON")?
        );
    } else {
        println!("{}", report.summary());
    }

    Ok(report)
}
