//! Fleetwatch CLI
//!
//! Command-line interface for inspecting and updating the build-worker fleet.

mod commands;
mod config;
mod resolver;
mod types;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use fleetwatch_client::AuthConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "fleetwatch")]
#[command(about = "Build worker fleet supervisor", long_about = None)]
struct Cli {
    /// OAuth2 token endpoint
    #[arg(long, env = "CLOUD_FOUNDRY_OAUTH_TOKEN_URL")]
    token_url: String,

    /// Platform API URL
    #[arg(long, env = "CLOUD_FOUNDRY_API_HOST")]
    api_url: String,

    /// Deploy user name
    #[arg(long, env = "DEPLOY_USER_USERNAME")]
    username: String,

    /// Deploy user password
    #[arg(long, env = "DEPLOY_USER_PASSWORD", hide_env_values = true)]
    password: String,

    /// Common base name of the worker apps
    #[arg(long, env = "BUILD_CONTAINER_BASE_NAME")]
    base_name: String,

    /// Number of workers the fleet should have
    #[arg(long, env = "NUM_BUILD_CONTAINERS", default_value_t = 1)]
    num_containers: usize,

    /// Base URL workers report build results to
    #[arg(long, env = "BUILDER_CALLBACK", default_value = "http://localhost:3000")]
    builder_callback: String,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config {
        auth: AuthConfig {
            token_url: cli.token_url,
            username: cli.username,
            password: cli.password,
        },
        api_url: cli.api_url,
        build_container_base_name: cli.base_name,
        num_build_containers: cli.num_containers,
        builder_callback: cli.builder_callback,
    };

    handle_command(cli.command, &config).await
}
