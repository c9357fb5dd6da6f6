use std::path::PathBuf;

use anyhow::{bail, Result};
use serde::Serialize;
use tracing::warn;

use juliet_core::engine::{
    default_engine_registry, display_name, AnalysisEngine, BinaryView,
};
use juliet_core::ground_truth::ground_truth;
use juliet_core::model::FunctionRef;

use crate::collect_binaries;
use crate::commands::engines::resolve_engine;

#[derive(Debug, Serialize)]
pub struct GroundTruthEntry {
    pub file: String,
    pub path: PathBuf,
    pub cpp: bool,
    pub functions: Vec<FunctionRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Derive the ground truth for each binary without running a detector.
pub fn ground_truth_entries(
    paths: &[PathBuf],
    extensions: &[String],
    engine: &str,
) -> Result<Vec<GroundTruthEntry>> {
    let engines = default_engine_registry();
    let engine = resolve_engine(&engines, engine)?;
    let files = collect_binaries(paths, extensions)?;
    if files.is_empty() {
        bail!("No files to inspect");
    }

    let mut entries = Vec::with_capacity(files.len());
    for path in files {
        let entry = match engine.load(&path) {
            Ok(view) => GroundTruthEntry {
                file: view.file_name(),
                cpp: view.is_cpp(),
                functions: ground_truth(view.as_ref()),
                error: None,
                path,
            },
            Err(err) => {
                warn!(file = %path.display(), error = %err, "failed to load binary");
                GroundTruthEntry {
                    file: display_name(&path),
                    cpp: false,
                    functions: Vec::new(),
                    error: Some(err.to_string()),
                    path,
                }
            }
        };
        entries.push(entry);
    }
    Ok(entries)
}

/// Print the ground-truth functions of each binary.
pub fn ground_truth_command(
    paths: &[PathBuf],
    extensions: &[String],
    engine: &str,
    json: bool,
) -> Result<()> {
    let entries = ground_truth_entries(paths, extensions, engine)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    for entry in entries {
        let tag = if entry.cpp { " [c++]" } else { "" };
        println!("{}{}:", entry.file, tag);
        if let Some(err) = entry.error {
            println!("  error: {err}");
            continue;
        }
        if entry.functions.is_empty() {
            println!("  (none)");
        }
        for func in entry.functions {
            println!("  - {} @ {:#x}", func.name, func.start);
        }
    }

    Ok(())
}
