use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dtos::biddtos::BidResponseDto,
    models::jobmodel::{Job, JobStatus, PaymentStatus, PayoutStatus},
    utils::money::pence_to_pounds,
};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateJobDto {
    #[validate(length(min = 1, message = "Pickup postcode is required"))]
    pub pickup_postcode: String,
    pub pickup_address: Option<String>,
    #[validate(length(min = 1, message = "Dropoff postcode is required"))]
    pub dropoff_postcode: String,
    pub dropoff_address: Option<String>,
    #[validate(length(min = 1, message = "Vehicle type is required"))]
    pub vehicle_type: String,
    pub pickup_date: NaiveDate,
    #[validate(length(min = 1, message = "Items description is required"))]
    pub items: String,
    #[validate(range(min = 0, message = "Weight cannot be negative"))]
    pub weight_kg: Option<i32>,
    #[serde(default)]
    pub fragile: bool,
    pub special_instructions: Option<String>,
}

/// Job as it crosses the API: money re-expressed in decimal pounds.
#[derive(Debug, Serialize, Deserialize)]
pub struct JobResponseDto {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub status: JobStatus,
    pub pickup_postcode: String,
    pub pickup_address: Option<String>,
    pub dropoff_postcode: String,
    pub dropoff_address: Option<String>,
    pub vehicle_type: String,
    pub pickup_date: NaiveDate,
    pub items: String,
    pub weight_kg: Option<i32>,
    pub fragile: bool,
    pub special_instructions: Option<String>,
    pub assigned_driver_id: Option<Uuid>,
    pub winning_bid_amount: Option<f64>,
    pub platform_fee: Option<f64>,
    pub driver_payout_amount: Option<f64>,
    pub payment_status: PaymentStatus,
    pub payout_status: PayoutStatus,
    pub payout_due_at: Option<DateTime<Utc>>,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<Job> for JobResponseDto {
    fn from(job: Job) -> Self {
        JobResponseDto {
            id: job.id,
            customer_id: job.customer_id,
            status: job.status,
            pickup_postcode: job.pickup_postcode,
            pickup_address: job.pickup_address,
            dropoff_postcode: job.dropoff_postcode,
            dropoff_address: job.dropoff_address,
            vehicle_type: job.vehicle_type,
            pickup_date: job.pickup_date,
            items: job.items,
            weight_kg: job.weight_kg,
            fragile: job.fragile,
            special_instructions: job.special_instructions,
            assigned_driver_id: job.assigned_driver_id,
            winning_bid_amount: job.winning_bid_pence.map(pence_to_pounds),
            platform_fee: job.platform_fee_pence.map(pence_to_pounds),
            driver_payout_amount: job.driver_payout_pence.map(pence_to_pounds),
            payment_status: job.payment_status,
            payout_status: job.payout_status,
            payout_due_at: job.payout_due_at,
            paid_at: job.paid_at,
            created_at: job.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct JobListResponseDto {
    pub jobs: Vec<JobResponseDto>,
    pub results: usize,
}

/// One job with its bids, as the customer's job page shows it.
#[derive(Debug, Serialize)]
pub struct JobDetailResponseDto {
    pub job: JobResponseDto,
    pub bids: Vec<BidResponseDto>,
}
