use std::sync::Arc;

use axum::{http::HeaderMap, response::IntoResponse, Extension, Json};
use chrono::Utc;

use crate::{
    db::jobdb::JobExt,
    dtos::{
        paymentdtos::{CheckoutResponseDto, CreateCheckoutDto},
        ApiResponse,
    },
    error::HttpError,
    middleware::{ensure_role, JWTAuthMiddleware},
    models::{
        jobmodel::{JobStatus, PaymentStatus},
        usermodel::UserRole,
    },
    service::{error::ServiceError, stripe::verify_webhook_signature},
    utils::money::format_pence_as_pounds,
    AppState,
};

/// Create a hosted checkout session for an assigned job and hand the URL
/// back to the client for redirection.
pub async fn create_checkout(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Json(body): Json<CreateCheckoutDto>,
) -> Result<impl IntoResponse, HttpError> {
    ensure_role(&auth.user, UserRole::Customer)?;

    let job = app_state
        .db_client
        .get_job(body.job_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found(ServiceError::JobNotFound(body.job_id).to_string()))?;

    if job.customer_id != auth.user.id {
        return Err(ServiceError::NotYourJob(job.id).into());
    }

    // Payment follows assignment; a job still in bidding has no amount yet.
    if !matches!(
        job.status,
        JobStatus::Assigned | JobStatus::InTransit | JobStatus::Delivered
    ) {
        return Err(HttpError::conflict(format!(
            "Job must be assigned before payment (currently {})",
            job.status.to_str()
        )));
    }

    if job.payment_status == PaymentStatus::Paid {
        return Err(HttpError::conflict("Job has already been paid"));
    }

    let amount_pence = match job.winning_bid_pence {
        Some(amount) if amount > 0 => amount,
        _ => {
            return Err(
                ServiceError::InvalidAmount("winning bid amount not set on job".to_string()).into(),
            )
        }
    };

    let description = format!(
        "{} to {}, winning bid {}",
        job.pickup_postcode,
        job.dropoff_postcode,
        format_pence_as_pounds(amount_pence)
    );
    let success_url = format!("{}/customer/jobs/{}?paid=1", app_state.env.app_url, job.id);
    let cancel_url = format!("{}/customer/jobs/{}?pay=cancel", app_state.env.app_url, job.id);

    let session = app_state
        .stripe_service
        .create_checkout_session(
            job.id,
            auth.user.id,
            amount_pence,
            &description,
            &success_url,
            &cancel_url,
        )
        .await?;

    let response = CheckoutResponseDto {
        checkout_url: session.url,
        session_id: session.id,
    };
    Ok(Json(ApiResponse::success("Checkout session created", response)))
}

/// Payment confirmation webhook. Takes the raw body because the signature
/// covers the exact bytes Stripe sent.
///
/// Responses follow Stripe's retry contract: 200 for handled events and
/// idempotent no-ops, 400 for events we will never be able to process,
/// 500 when a store write failed and redelivery should be attempted.
pub async fn stripe_webhook(
    Extension(app_state): Extension<Arc<AppState>>,
    headers: HeaderMap,
    body: String,
) -> Result<impl IntoResponse, HttpError> {
    let signature = headers
        .get("stripe-signature")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| HttpError::bad_request("Missing stripe-signature header"))?;

    verify_webhook_signature(
        &body,
        signature,
        &app_state.env.stripe_webhook_secret,
        Utc::now().timestamp(),
    )?;

    let event: serde_json::Value = serde_json::from_str(&body)
        .map_err(|e| HttpError::bad_request(format!("Invalid webhook payload: {}", e)))?;

    app_state.payment_service.handle_event(&event).await?;

    Ok(Json(serde_json::json!({ "received": true })))
}
