use anyhow::{anyhow, bail, Result};
use serde::Serialize;

use juliet_core::detectors::{default_detector_registry, DetectorRegistry, NamePatternDetector};

pub const NAME_PATTERN: &str = "name-pattern";

#[derive(Debug, Serialize)]
pub struct DetectorInfo {
    pub name: String,
    pub description: String,
}

/// Built-in detectors plus `name-pattern` when a pattern is supplied.
pub fn detector_registry(pattern: Option<&str>) -> Result<DetectorRegistry> {
    let mut registry = default_detector_registry();
    if let Some(pattern) = pattern {
        registry.register(NamePatternDetector::new(pattern)?);
    }
    Ok(registry)
}

/// Pick the detector name to run. A pattern without an explicit detector
/// implies `name-pattern`.
pub fn select_detector_name(detector: Option<String>, pattern: Option<&str>) -> Option<String> {
    detector.or_else(|| pattern.map(|_| NAME_PATTERN.to_string()))
}

/// Check that a requested detector exists in the registry.
pub fn check_detector(registry: &DetectorRegistry, name: &str) -> Result<()> {
    if registry.get(name).is_some() {
        return Ok(());
    }
    if name == NAME_PATTERN {
        bail!("Detector '{NAME_PATTERN}' requires --pattern");
    }
    Err(anyhow!(
        "Unknown detector '{}'. Available: {}, {}",
        name,
        registry.names().join(", "),
        NAME_PATTERN
    ))
}

/// List detectors known to this binary.
pub fn list_detectors_command(json: bool) -> Result<()> {
    let mut names = default_detector_registry().names();
    names.push(NAME_PATTERN.to_string());
    names.sort();

    let entries: Vec<DetectorInfo> = names
        .into_iter()
        .map(|name| {
            let description = match name.as_str() {
                "none" => "Reports nothing; every labeled binary counts as missed".to_string(),
                "oracle" => "Reports the ground truth; checks the evaluation pipeline".to_string(),
                NAME_PATTERN => "Reports functions whose name matches --pattern".to_string(),
                other => format!("Detector '{}'", other),
            };
            DetectorInfo { name, description }
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!("Detectors:");
    for entry in entries {
        println!("- {}: {}", entry.name, entry.description);
    }

    Ok(())
}
