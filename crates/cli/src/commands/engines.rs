use anyhow::{anyhow, Result};
use serde::Serialize;

use juliet_core::engine::{default_engine_registry, AnalysisEngine, EngineRegistry};

#[derive(Debug, Serialize)]
pub struct EngineInfo {
    pub name: String,
    pub description: String,
}

/// Resolve an engine by name, listing the alternatives on failure.
pub fn resolve_engine<'r>(
    registry: &'r EngineRegistry,
    name: &str,
) -> Result<&'r dyn AnalysisEngine> {
    registry.get(name).ok_or_else(|| {
        anyhow!("Unknown engine '{}'. Available: {}", name, registry.names().join(", "))
    })
}

/// List analysis engines compiled into this binary.
pub fn list_engines_command(json: bool) -> Result<()> {
    let registry = default_engine_registry();
    let entries: Vec<EngineInfo> = registry
        .names()
        .into_iter()
        .map(|name| {
            let description = match name.as_str() {
                "goblin" => "ELF/PE/Mach-O symbol tables via goblin".to_string(),
                other => format!("Engine '{}'", other),
            };
            EngineInfo { name, description }
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("Engines: (none)");
        return Ok(());
    }

    println!("Engines:");
    for entry in entries {
        println!("- {}: {}", entry.name, entry.description);
    }

    Ok(())
}
