//! Health check endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::types::ApiContext;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub assistant_configured: bool,
    pub uptime_seconds: i64,
}

/// `GET /api/health` — liveness check for deploy probes.
pub async fn check(State(ctx): State<ApiContext>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: crate::config::APP_VERSION,
        assistant_configured: ctx.assistant.is_some(),
        uptime_seconds: ctx.uptime_seconds(),
    })
}
