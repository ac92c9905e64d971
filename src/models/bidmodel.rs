use chrono::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "bid_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BidStatus {
    Pending,
    Withdrawn,
    Won,
    Lost,
}

/// A driver's priced offer on a job. One row per (job, driver); re-bidding
/// updates the row, withdrawal flips the status and keeps the history.
#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct Bid {
    pub id: Uuid,
    pub job_id: Uuid,
    pub driver_id: Uuid,
    pub amount_pence: i64,
    pub note: Option<String>,
    pub status: BidStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
