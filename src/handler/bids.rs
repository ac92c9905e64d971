use std::sync::Arc;

use axum::{response::IntoResponse, Extension, Json};
use validator::Validate;

use crate::{
    db::{biddb::BidExt, jobdb::JobExt},
    dtos::{
        biddtos::{BidListResponseDto, BidResponseDto, PlaceBidDto, WithdrawBidDto},
        ApiResponse,
    },
    error::HttpError,
    middleware::{ensure_approved_driver, JWTAuthMiddleware},
    models::jobmodel::JobStatus,
    service::error::ServiceError,
    utils::money::{parse_money, pounds_to_pence},
    AppState,
};

/// Place a bid, or update the caller's existing bid on the same job.
pub async fn place_or_update_bid(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Json(body): Json<PlaceBidDto>,
) -> Result<impl IntoResponse, HttpError> {
    ensure_approved_driver(&auth.user)?;

    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let amount = parse_money(&body.amount)
        .ok_or_else(|| HttpError::bad_request("Enter a valid bid amount"))?;
    let amount_pence = pounds_to_pence(amount);

    let job = app_state
        .db_client
        .get_job(body.job_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found(ServiceError::JobNotFound(body.job_id).to_string()))?;

    if job.status != JobStatus::Bidding {
        return Err(ServiceError::JobNotBidding(job.id).into());
    }

    let note = body
        .note
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());

    let bid = app_state
        .db_client
        .upsert_bid(job.id, auth.user.id, amount_pence, note)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::conflict("Your bid on this job has already been decided"))?;

    let response: BidResponseDto = bid.into();
    Ok(Json(ApiResponse::success("Bid placed", response)))
}

/// Soft-withdraw the caller's pending bid; the row stays for history.
pub async fn withdraw_bid(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Json(body): Json<WithdrawBidDto>,
) -> Result<impl IntoResponse, HttpError> {
    ensure_approved_driver(&auth.user)?;

    let withdrawn = app_state
        .db_client
        .withdraw_bid(body.job_id, auth.user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    if !withdrawn {
        return Err(HttpError::not_found("No pending bid to withdraw"));
    }

    Ok(Json(ApiResponse::success("Bid withdrawn", ())))
}

/// All of the calling driver's bids, newest first.
pub async fn get_my_bids(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    ensure_approved_driver(&auth.user)?;

    let bids = app_state
        .db_client
        .get_driver_bids(auth.user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let bids: Vec<BidResponseDto> = bids.into_iter().map(Into::into).collect();
    let response = BidListResponseDto {
        results: bids.len(),
        bids,
    };
    Ok(Json(ApiResponse::success("Bids retrieved", response)))
}
