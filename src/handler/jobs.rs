use std::sync::Arc;

use axum::{extract::Path, response::IntoResponse, Extension, Json};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::{biddb::BidExt, jobdb::{JobExt, NewJob}},
    dtos::{
        biddtos::{AcceptBidDto, BidResponseDto},
        jobdtos::{CreateJobDto, JobDetailResponseDto, JobListResponseDto, JobResponseDto},
        ApiResponse,
    },
    error::HttpError,
    middleware::{ensure_approved_driver, ensure_role, JWTAuthMiddleware},
    models::usermodel::UserRole,
    service::error::ServiceError,
    AppState,
};

pub async fn create_job(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Json(body): Json<CreateJobDto>,
) -> Result<impl IntoResponse, HttpError> {
    ensure_role(&auth.user, UserRole::Customer)?;

    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let new_job = NewJob {
        pickup_postcode: body.pickup_postcode,
        pickup_address: body.pickup_address,
        dropoff_postcode: body.dropoff_postcode,
        dropoff_address: body.dropoff_address,
        vehicle_type: body.vehicle_type,
        pickup_date: body.pickup_date,
        items: body.items,
        weight_kg: body.weight_kg,
        fragile: body.fragile,
        special_instructions: body.special_instructions,
    };

    let job = app_state
        .db_client
        .save_job(auth.user.id, new_job)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let response: JobResponseDto = job.into();
    Ok(Json(ApiResponse::success("Job created", response)))
}

/// The customer's own jobs, newest first.
pub async fn get_my_jobs(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    ensure_role(&auth.user, UserRole::Customer)?;

    let jobs = app_state
        .db_client
        .get_customer_jobs(auth.user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let jobs: Vec<JobResponseDto> = jobs.into_iter().map(Into::into).collect();
    let response = JobListResponseDto {
        results: jobs.len(),
        jobs,
    };
    Ok(Json(ApiResponse::success("Jobs retrieved", response)))
}

/// Jobs still open to bids, for the driver job board.
pub async fn get_open_jobs(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    ensure_role(&auth.user, UserRole::Driver)?;

    let jobs = app_state
        .db_client
        .get_open_jobs()
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let jobs: Vec<JobResponseDto> = jobs.into_iter().map(Into::into).collect();
    let response = JobListResponseDto {
        results: jobs.len(),
        jobs,
    };
    Ok(Json(ApiResponse::success("Open jobs retrieved", response)))
}

/// Jobs assigned to the calling driver.
pub async fn get_assigned_jobs(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    ensure_role(&auth.user, UserRole::Driver)?;

    let jobs = app_state
        .db_client
        .get_driver_jobs(auth.user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let jobs: Vec<JobResponseDto> = jobs.into_iter().map(Into::into).collect();
    let response = JobListResponseDto {
        results: jobs.len(),
        jobs,
    };
    Ok(Json(ApiResponse::success("Assigned jobs retrieved", response)))
}

/// One job with its bids. The owning customer sees every bid; a driver sees
/// only their own.
pub async fn get_job(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let job = app_state
        .db_client
        .get_job(job_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found(ServiceError::JobNotFound(job_id).to_string()))?;

    let bids: Vec<BidResponseDto> = if job.customer_id == auth.user.id {
        app_state
            .db_client
            .get_job_bids(job_id)
            .await
            .map_err(|e| HttpError::server_error(e.to_string()))?
            .into_iter()
            .map(Into::into)
            .collect()
    } else if auth.user.role == UserRole::Driver {
        app_state
            .db_client
            .get_driver_bid(job_id, auth.user.id)
            .await
            .map_err(|e| HttpError::server_error(e.to_string()))?
            .map(Into::into)
            .into_iter()
            .collect()
    } else {
        return Err(ServiceError::NotYourJob(job_id).into());
    };

    let response = JobDetailResponseDto {
        job: job.into(),
        bids,
    };
    Ok(Json(ApiResponse::success("Job retrieved", response)))
}

/// Accept one bid and settle the rest. Conflicts (job already assigned, bid
/// already decided) come back as 409 and leave state untouched.
pub async fn accept_bid(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Json(body): Json<AcceptBidDto>,
) -> Result<impl IntoResponse, HttpError> {
    ensure_role(&auth.user, UserRole::Customer)?;

    app_state
        .acceptance_service
        .accept_bid(body.job_id, body.bid_id, auth.user.id)
        .await?;

    Ok(Json(ApiResponse::success("Bid accepted", ())))
}

/// Assigned driver picks the goods up: `assigned -> in_transit`.
pub async fn start_job(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    ensure_approved_driver(&auth.user)?;

    let transitioned = app_state
        .db_client
        .start_job(job_id, auth.user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    if !transitioned {
        return Err(ServiceError::InvalidTransition.into());
    }

    Ok(Json(ApiResponse::success("Job started", ())))
}

/// Assigned driver completes delivery: `in_transit -> delivered`.
pub async fn deliver_job(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    ensure_approved_driver(&auth.user)?;

    let transitioned = app_state
        .db_client
        .deliver_job(job_id, auth.user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    if !transitioned {
        return Err(ServiceError::InvalidTransition.into());
    }

    Ok(Json(ApiResponse::success("Marked delivered", ())))
}
