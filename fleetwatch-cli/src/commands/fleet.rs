//! Fleet command handlers
//!
//! Health verdict and worker listing.

use anyhow::{Result, bail};
use colored::*;
use fleetwatch_core::domain::verdict::FleetVerdict;
use fleetwatch_core::domain::worker::{AppState, WorkerRef};

use crate::config::Config;

/// Print the fleet verdict; fails when the fleet is unhealthy
pub async fn show_state(config: &Config) -> Result<()> {
    let client = config.client();
    let verdict = client
        .get_fleet_state(
            &config.build_container_base_name,
            config.num_build_containers,
        )
        .await?;

    match &verdict {
        FleetVerdict::Healthy {
            expected,
            found,
            started,
        } => {
            println!("{}", "Fleet healthy".green().bold());
            println!("  Expected: {}", expected);
            println!("  Found:    {}", found);
            println!("  Started:  {}", started);
            Ok(())
        }
        FleetVerdict::Unhealthy { error } => {
            println!("{}", "Fleet unhealthy".red().bold());
            for line in error.lines() {
                println!("  {} {}", "✗".red(), line);
            }
            bail!("build containers are unhealthy")
        }
    }
}

/// List the workers matching the configured base name
pub async fn list_workers(config: &Config) -> Result<()> {
    let client = config.client();
    let workers = client.list_workers(&config.build_container_base_name).await?;

    if workers.is_empty() {
        println!(
            "{}",
            format!(
                "No workers named '{}*' found.",
                config.build_container_base_name
            )
            .yellow()
        );
        return Ok(());
    }

    println!(
        "{}",
        format!("Found {} worker(s):", workers.len()).bold()
    );
    println!();
    for worker in &workers {
        print_worker(worker);
    }

    Ok(())
}

fn print_worker(worker: &WorkerRef) {
    println!("  {} {}", "▸".cyan(), worker.name.bold());
    println!("    State: {}", colorize_state(&worker.state));
    println!("    Id:    {}", worker.id.dimmed());
}

/// Colorize app state for display
fn colorize_state(state: &AppState) -> ColoredString {
    match state {
        AppState::Started => state.to_string().green(),
        AppState::Stopped => state.to_string().red(),
        AppState::Other(_) => state.to_string().yellow(),
    }
}
