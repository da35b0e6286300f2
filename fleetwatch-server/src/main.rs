//! Fleetwatch Server
//!
//! Exposes a liveness probe and a health endpoint reporting the state of the
//! build-worker fleet.

use anyhow::{Context, Result};
use fleetwatch_client::{FleetClient, TokenCache};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod api;
pub mod config;
pub mod service;

use crate::api::AppState;
use crate::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fleetwatch_server=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Fleetwatch Server...");

    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate()?;

    tracing::info!(
        "Watching {} build container(s) named '{}*' on {}",
        config.num_build_containers,
        config.build_container_base_name,
        config.api_url
    );

    // One token cache for the whole process
    let http = reqwest::Client::new();
    let tokens = Arc::new(TokenCache::new(config.auth.clone(), http.clone()));
    let client = FleetClient::with_client(config.api_url.clone(), http, tokens);

    let app = api::create_router(AppState {
        fleet: Arc::new(client),
        build_container_base_name: config.build_container_base_name.clone(),
        num_build_containers: config.num_build_containers,
        healthcheck_timeout: config.healthcheck_timeout,
    });

    let addr = format!("0.0.0.0:{}", config.port);

    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    axum::serve(listener, app)
        .await
        .context("Failed to start server")?;

    Ok(())
}
