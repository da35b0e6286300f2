//! API Module
//!
//! HTTP API layer for the server.

pub mod error;
pub mod health;

use axum::{Router, routing::get};
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;

use crate::service::fleet_service::FleetStateSource;

/// State shared by all handlers
#[derive(Clone)]
pub struct AppState {
    /// Where fleet verdicts come from
    pub fleet: Arc<dyn FleetStateSource>,
    /// Common base name of the worker apps
    pub build_container_base_name: String,
    /// Number of workers the fleet should have
    pub num_build_containers: usize,
    /// Deadline for one health check
    pub healthcheck_timeout: Duration,
}

/// Create the main API router with all endpoints
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Liveness probe
        .route("/", get(health::index))
        // Fleet health
        .route("/healthcheck", get(health::healthcheck))
        // Add state and middleware
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
