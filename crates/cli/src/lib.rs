use std::path::{Path, PathBuf};
use std::sync::Once;

use anyhow::{bail, Context, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use walkdir::{DirEntry, WalkDir};

pub mod commands;

/// Environment variable holding the tracing filter.
pub const LOG_ENV: &str = "JULIET_EVAL_LOG";

static INIT: Once = Once::new();

/// Install the stderr tracing subscriber. Safe to call more than once.
///
/// Reads `JULIET_EVAL_LOG` (e.g. `juliet_core=debug`); defaults to `warn`.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .with(filter)
            .init();
    });
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_str().map(|s| s.starts_with('.')).unwrap_or(false)
}

/// Whether `path` has one of `extensions` (case-insensitive, leading dot
/// optional). An empty filter accepts everything.
pub fn matches_extension(path: &Path, extensions: &[String]) -> bool {
    if extensions.is_empty() {
        return true;
    }
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    extensions.iter().any(|want| want.trim_start_matches('.').eq_ignore_ascii_case(ext))
}

/// Expand files and directories into the list of binaries to evaluate.
///
/// Files named explicitly are always kept. Directories are walked
/// recursively in file-name order, skipping hidden entries and applying the
/// extension filter.
pub fn collect_binaries(paths: &[PathBuf], extensions: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for root in paths {
        if root.is_file() {
            files.push(root.clone());
            continue;
        }
        if !root.is_dir() {
            bail!("Path does not exist: {}", root.display());
        }
        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e));
        for entry in walker {
            let entry = entry.with_context(|| format!("Failed to walk {}", root.display()))?;
            if entry.file_type().is_file() && matches_extension(entry.path(), extensions) {
                files.push(entry.into_path());
            }
        }
    }
    Ok(files)
}
