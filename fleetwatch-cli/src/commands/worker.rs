//! Worker command handlers
//!
//! Environment updates and build dispatch, both followed by a restage.

use anyhow::{Context, Result};
use colored::*;
use fleetwatch_core::domain::build::{BuildJob, BuildParams};
use fleetwatch_core::domain::worker::UpdatedWorker;
use std::collections::HashMap;
use std::path::Path;

use crate::config::Config;
use crate::resolver::resolve_worker;
use crate::types::{EnvAssignment, into_patch};

/// Patch a worker's environment with the given assignments and restage it
pub async fn update(config: &Config, name: &str, env: Vec<EnvAssignment>) -> Result<()> {
    apply(config, name, &into_patch(env)).await
}

/// Turn a build message into a build job and apply it to a worker
pub async fn dispatch(config: &Config, name: &str, params_path: &Path) -> Result<()> {
    let raw = std::fs::read_to_string(params_path)
        .with_context(|| format!("Failed to read {}", params_path.display()))?;
    let params: BuildParams = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid build message in {}", params_path.display()))?;

    let build = BuildJob::new(params, &config.builder_callback);
    println!("Build {}", build.build_id.bold());

    apply(config, name, &build.container_environment).await
}

async fn apply(config: &Config, name: &str, patch: &HashMap<String, String>) -> Result<()> {
    let client = config.client();
    let worker = resolve_worker(&client, &config.build_container_base_name, name).await?;

    println!("Updating {} ({} variable(s))...", worker.name.bold(), patch.len());

    let updated = client
        .update_worker(&worker, patch)
        .await
        .with_context(|| format!("Failed to update {}", worker.name))?;

    print_updated(&updated, patch);
    Ok(())
}

fn print_updated(updated: &UpdatedWorker, patch: &HashMap<String, String>) {
    println!("{} {} restaged", "✓".green(), updated.name.bold());

    let mut keys: Vec<&String> = patch.keys().collect();
    keys.sort();
    for key in keys {
        let applied = updated.environment.get(key).and_then(|value| value.as_str());
        match applied {
            Some(value) if value == patch[key] => println!("    {} = {}", key, value.dimmed()),
            _ => println!("    {} {}", key, "not reflected in platform response".yellow()),
        }
    }
}
