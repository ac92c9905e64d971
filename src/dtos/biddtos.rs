use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    models::bidmodel::{Bid, BidStatus},
    utils::money::pence_to_pounds,
};

/// Bid submission. The amount arrives as a string straight from a form
/// field ("45", "£45.00") and is parsed by the money utilities.
#[derive(Debug, Deserialize, Validate)]
pub struct PlaceBidDto {
    pub job_id: Uuid,
    #[validate(length(min = 1, message = "Bid amount is required"))]
    pub amount: String,
    #[validate(length(max = 500, message = "Note must be at most 500 characters"))]
    pub note: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WithdrawBidDto {
    pub job_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct AcceptBidDto {
    pub job_id: Uuid,
    pub bid_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BidResponseDto {
    pub id: Uuid,
    pub job_id: Uuid,
    pub driver_id: Uuid,
    pub amount: f64,
    pub note: Option<String>,
    pub status: BidStatus,
    pub created_at: DateTime<Utc>,
}

impl From<Bid> for BidResponseDto {
    fn from(bid: Bid) -> Self {
        BidResponseDto {
            id: bid.id,
            job_id: bid.job_id,
            driver_id: bid.driver_id,
            amount: pence_to_pounds(bid.amount_pence),
            note: bid.note,
            status: bid.status,
            created_at: bid.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BidListResponseDto {
    pub bids: Vec<BidResponseDto>,
    pub results: usize,
}
