use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use juliet_core::engine::DEFAULT_ENGINE;
use juliet_eval::commands::{
    ground_truth_command, list_detectors_command, list_engines_command, run_command, RunOptions,
};
use juliet_eval::init_tracing;

/// Score vulnerability detectors against labeled Juliet binaries.
///
/// This CLI is a thin wrapper around `juliet-core` (exposed in code as
/// `juliet_core`). Logs go to stderr and are filtered by `JULIET_EVAL_LOG`.
#[derive(Parser, Debug)]
#[command(
    name = "juliet-eval",
    version,
    about = "Score vulnerability detectors against labeled Juliet binaries",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a detector over binaries and report good / missed / false-positive files.
    ///
    /// Directories are walked recursively. C++ binaries are excluded from
    /// scoring and counted separately.
    Run {
        /// Binaries or directories to evaluate (overrides `paths` in --config).
        paths: Vec<PathBuf>,

        /// Optional YAML or JSON run config.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Analysis engine (see `list-engines`).
        #[arg(long)]
        engine: Option<String>,

        /// Detector to evaluate (see `list-detectors`).
        #[arg(long)]
        detector: Option<String>,

        /// Regex for the `name-pattern` detector; implies it when --detector is omitted.
        #[arg(long)]
        pattern: Option<String>,

        /// Only evaluate files with this extension (repeatable).
        #[arg(long = "extension")]
        extensions: Vec<String>,

        /// Record every missed ground-truth function instead of only the first.
        #[arg(long, default_value_t = false)]
        all_misses: bool,

        /// Emit a JSON report instead of console text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Print the ground-truth vulnerable functions of each binary.
    GroundTruth {
        /// Binaries or directories to inspect.
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Analysis engine (see `list-engines`).
        #[arg(long, default_value = DEFAULT_ENGINE)]
        engine: String,

        /// Only inspect files with this extension (repeatable).
        #[arg(long = "extension")]
        extensions: Vec<String>,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// List available detectors.
    ListDetectors {
        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// List available analysis engines.
    ListEngines {
        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Run {
            paths,
            config,
            engine,
            detector,
            pattern,
            extensions,
            all_misses,
            json,
        } => {
            run_command(RunOptions {
                paths,
                config,
                engine,
                detector,
                pattern,
                extensions,
                all_misses,
                json,
            })?;
        }
        Command::GroundTruth { paths, engine, extensions, json } => {
            ground_truth_command(&paths, &extensions, &engine, json)?
        }
        Command::ListDetectors { json } => list_detectors_command(json)?,
        Command::ListEngines { json } => list_engines_command(json)?,
    }

    Ok(())
}
