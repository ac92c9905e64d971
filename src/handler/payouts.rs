use std::sync::Arc;

use axum::{extract::Query, http::HeaderMap, response::IntoResponse, Extension, Json};
use chrono::Utc;
use subtle::ConstantTimeEq;

use crate::{
    dtos::payoutdtos::{BatchRunResponseDto, RunPayoutsQuery},
    error::HttpError,
    AppState,
};

/// Trigger a payout settlement batch. Reachable over the network for
/// external schedulers, so it is gated by a shared secret carried in the
/// `x-cron-secret` header or a `secret` query parameter.
pub async fn run_payouts(
    Extension(app_state): Extension<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<RunPayoutsQuery>,
) -> Result<impl IntoResponse, HttpError> {
    let provided = headers
        .get("x-cron-secret")
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string())
        .or(query.secret);

    let provided = provided.ok_or_else(|| HttpError::unauthorized("Unauthorized"))?;

    let matches: bool = provided
        .as_bytes()
        .ct_eq(app_state.env.cron_secret.as_bytes())
        .into();
    if !matches {
        return Err(HttpError::unauthorized("Unauthorized"));
    }

    let result = app_state
        .settlement_service
        .run_payout_batch(Utc::now(), app_state.env.payout_batch_limit)
        .await?;

    let response: BatchRunResponseDto = result.into();
    Ok(Json(response))
}
