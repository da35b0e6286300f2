//! API Error Handling
//!
//! Converts failed fleet checks into a degraded health response.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::service::fleet_service::FleetError;

/// API error type
#[derive(Debug)]
pub enum ApiError {
    /// The fleet could not be checked
    FleetUnavailable(FleetError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::FleetUnavailable(err) => {
                if err.is_auth_failure() {
                    tracing::error!("Fleet check failed, check deploy user credentials: {}", err);
                } else if err.is_platform_fault() {
                    tracing::warn!("Fleet check failed, platform unavailable: {}", err);
                } else {
                    tracing::error!("Fleet check failed: {}", err);
                }
                (StatusCode::SERVICE_UNAVAILABLE, err.to_string())
            }
        };

        (
            status,
            Json(serde_json::json!({
                "ok": false,
                "build_containers": { "error": message },
            })),
        )
            .into_response()
    }
}

impl From<FleetError> for ApiError {
    fn from(err: FleetError) -> Self {
        ApiError::FleetUnavailable(err)
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
