use axum::http::StatusCode;
use thiserror::Error;
use uuid::Uuid;

use crate::error::HttpError;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Job {0} not found")]
    JobNotFound(Uuid),

    #[error("Bid {0} not found")]
    BidNotFound(Uuid),

    #[error("Job {0} does not belong to you")]
    NotYourJob(Uuid),

    #[error("Job {0} is not accepting bids")]
    JobNotBidding(Uuid),

    #[error("Job {0} has already been assigned")]
    AlreadyAssigned(Uuid),

    #[error("Bid {0} has already been decided")]
    BidNotPending(Uuid),

    #[error("Invalid job status transition")]
    InvalidTransition,

    #[error("Job {0} has no assigned driver")]
    DriverNotAssigned(Uuid),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Event metadata carries no job reference")]
    MissingJobReference,

    #[error("Webhook signature verification failed: {0}")]
    InvalidSignature(String),

    #[error("Stripe error: {0}")]
    Stripe(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::JobNotFound(_) | ServiceError::BidNotFound(_) => StatusCode::NOT_FOUND,

            ServiceError::NotYourJob(_) => StatusCode::FORBIDDEN,

            // User-facing conflicts: the caller should reload state, not
            // blindly retry the same request.
            ServiceError::JobNotBidding(_)
            | ServiceError::AlreadyAssigned(_)
            | ServiceError::BidNotPending(_)
            | ServiceError::InvalidTransition => StatusCode::CONFLICT,

            ServiceError::DriverNotAssigned(_)
            | ServiceError::InvalidAmount(_)
            | ServiceError::MissingJobReference
            | ServiceError::InvalidSignature(_) => StatusCode::BAD_REQUEST,

            ServiceError::Stripe(_) | ServiceError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<ServiceError> for HttpError {
    fn from(error: ServiceError) -> Self {
        let status = error.status_code();
        HttpError::new(error.to_string(), status)
    }
}
