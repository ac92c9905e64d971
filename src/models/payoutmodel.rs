use chrono::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "payout_state", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PayoutState {
    Scheduled,
    Paid,
    Failed,
}

/// Ledger entry for money owed to a driver for a paid job. At most one row
/// per job (unique on job_id). Created by payment intake, mutated only by
/// the settlement runner.
#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct Payout {
    pub id: Uuid,
    pub job_id: Uuid,
    pub driver_id: Uuid,
    pub amount_pence: i64,
    pub due_at: DateTime<Utc>,
    pub status: PayoutState,
    pub stripe_transfer_id: Option<String>,
    pub last_error: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}
