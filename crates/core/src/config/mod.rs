//! Optional run configuration, read from YAML or JSON.
//!
//! Every field is optional; frontends layer command-line flags on top.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::evaluation::MissPolicy;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config JSON {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to parse config YAML {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EvalConfig {
    /// Analysis engine name (defaults to goblin).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine: Option<String>,
    /// Detector name from the registry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detector: Option<String>,
    /// Regex for the `name-pattern` detector.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Files or directories to evaluate. Relative paths resolve against the
    /// config file's directory.
    #[serde(default)]
    pub paths: Vec<PathBuf>,
    /// Only evaluate files with these extensions (without the dot).
    #[serde(default)]
    pub extensions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub miss_policy: Option<MissPolicy>,
}

impl EvalConfig {
    /// Load a config file; `.json` is parsed as JSON, anything else as YAML.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let body = fs::read(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        let mut config: EvalConfig = if path.extension().and_then(|e| e.to_str()) == Some("json") {
            serde_json::from_slice(&body)
                .map_err(|source| ConfigError::Json { path: path.to_path_buf(), source })?
        } else {
            serde_yaml::from_slice(&body)
                .map_err(|source| ConfigError::Yaml { path: path.to_path_buf(), source })?
        };

        if let Some(base) = path.parent() {
            config.paths = config
                .paths
                .into_iter()
                .map(|p| if p.is_absolute() { p } else { base.join(p) })
                .collect();
        }
        Ok(config)
    }
}
