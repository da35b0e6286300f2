//! Worker resolver module
//!
//! Resolves a worker name, or an unambiguous prefix of one, to the worker
//! it names within the fleet.

use anyhow::{Context, Result, anyhow};
use fleetwatch_client::FleetClient;
use fleetwatch_core::domain::worker::WorkerRef;

/// Resolve a worker name or prefix within the fleet
///
/// An exact name match wins over prefix matches.
///
/// # Errors
/// Returns an error if:
/// - No worker matches
/// - Multiple workers match the prefix (ambiguous)
/// - API call fails
pub async fn resolve_worker(client: &FleetClient, base_name: &str, name: &str) -> Result<WorkerRef> {
    let workers = client
        .list_workers(base_name)
        .await
        .context("Failed to list workers for name resolution")?;

    pick_worker(workers, name)
}

fn pick_worker(workers: Vec<WorkerRef>, name: &str) -> Result<WorkerRef> {
    if let Some(exact) = workers.iter().find(|w| w.name == name) {
        return Ok(exact.clone());
    }

    let mut matches: Vec<WorkerRef> = workers
        .into_iter()
        .filter(|w| w.name.starts_with(name))
        .collect();

    match matches.len() {
        0 => Err(anyhow!("No worker found with name starting with '{}'", name)),
        1 => Ok(matches.remove(0)),
        _ => {
            let names: Vec<&str> = matches.iter().map(|w| w.name.as_str()).collect();
            Err(anyhow!(
                "Ambiguous name '{}' matches multiple workers: {}",
                name,
                names.join(", ")
            ))
        }
    }
}
