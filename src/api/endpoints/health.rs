//! Health check endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub triage_enabled: bool,
    pub version: &'static str,
}

/// `GET /api/health` — liveness check, reports whether AI triage is armed.
pub async fn check(State(ctx): State<ApiContext>) -> Result<Json<HealthResponse>, ApiError> {
    Ok(Json(HealthResponse {
        status: "ok",
        triage_enabled: ctx.state.triage.is_enabled(),
        version: crate::config::APP_VERSION,
    }))
}
