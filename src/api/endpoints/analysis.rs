//! Analysis endpoint. The dashboard posts its user data here and gets
//! a [`DashboardResult`] back on every outcome.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::Value;

use crate::analysis::run_analysis;
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::assistant::PollPolicy;
use crate::dashboard::DashboardResult;

/// `POST /api/analysis` — run the posted user data through the
/// assistant pipeline.
///
/// A malformed JSON body is the only 400 here. Every pipeline outcome,
/// cached included, is a 200 with the result body.
pub async fn run(
    State(ctx): State<ApiContext>,
    body: Bytes,
) -> Result<Json<DashboardResult>, ApiError> {
    let user_data: Value = serde_json::from_slice(&body)
        .map_err(|e| ApiError::BadRequest(format!("Malformed JSON body: {e}")))?;

    let result = run_analysis(
        ctx.assistant.as_deref(),
        &ctx.config.assistant_id,
        &user_data,
        PollPolicy::default(),
    )
    .await;

    Ok(Json(result))
}

/// `OPTIONS /api/analysis` — empty preflight response. The router's
/// header layers attach the access-control headers, so a bare 204 is
/// all a browser preflight needs.
pub async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}
