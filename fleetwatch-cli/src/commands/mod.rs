//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod fleet;
mod worker;

use anyhow::Result;
use clap::Subcommand;
use std::path::PathBuf;

use crate::config::Config;
use crate::types::EnvAssignment;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Report the fleet health verdict
    State,
    /// List the workers of the fleet
    Workers,
    /// Patch a worker's environment and restage it
    Update {
        /// Worker name or unambiguous prefix
        worker: String,

        /// Environment assignment, repeatable
        #[arg(short, long = "env", value_name = "KEY=VALUE", value_parser = EnvAssignment::parse, required = true)]
        env: Vec<EnvAssignment>,
    },
    /// Apply a queued build message to a worker and restage it
    Dispatch {
        /// Worker name or unambiguous prefix
        worker: String,

        /// JSON build message (`{"name": ..., "environment": [{"name", "value"}]}`)
        #[arg(long)]
        params: PathBuf,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::State => fleet::show_state(config).await,
        Commands::Workers => fleet::list_workers(config).await,
        Commands::Update { worker, env } => worker::update(config, &worker, env).await,
        Commands::Dispatch { worker, params } => worker::dispatch(config, &worker, &params).await,
    }
}
