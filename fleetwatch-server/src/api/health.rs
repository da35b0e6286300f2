//! Health Check API Handlers
//!
//! Liveness probe and fleet health endpoint for monitoring.

use axum::{Json, extract::State, http::StatusCode, http::header, response::IntoResponse};
use fleetwatch_core::domain::verdict::FleetVerdict;
use serde::{Deserialize, Serialize};

use crate::api::AppState;
use crate::api::error::ApiResult;
use crate::service::fleet_service;

/// Body of `GET /healthcheck`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub ok: bool,
    pub build_containers: FleetVerdict,
}

/// GET /
/// Liveness probe
pub async fn index() -> impl IntoResponse {
    tracing::info!("GET / - 200");
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain")],
        "Server running",
    )
}

/// GET /healthcheck
/// Report build container health; 503 when the fleet is unhealthy or unreachable
pub async fn healthcheck(State(state): State<AppState>) -> ApiResult<(StatusCode, Json<HealthReport>)> {
    let verdict = fleet_service::check_build_containers(
        state.fleet.as_ref(),
        &state.build_container_base_name,
        state.num_build_containers,
        state.healthcheck_timeout,
    )
    .await?;

    let ok = verdict.is_healthy();
    let status = if ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    tracing::info!("GET /healthcheck - {}", status.as_u16());

    Ok((
        status,
        Json(HealthReport {
            ok,
            build_containers: verdict,
        }),
    ))
}
