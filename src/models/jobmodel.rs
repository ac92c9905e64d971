use chrono::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "job_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Bidding,
    Assigned,
    InTransit,
    Delivered,
    Cancelled,
}

impl JobStatus {
    pub fn to_str(&self) -> &str {
        match self {
            JobStatus::Bidding => "bidding",
            JobStatus::Assigned => "assigned",
            JobStatus::InTransit => "in_transit",
            JobStatus::Delivered => "delivered",
            JobStatus::Cancelled => "cancelled",
        }
    }

    /// The lifecycle is a straight line: bidding -> assigned -> in_transit
    /// -> delivered. Every edge is one-way and no edge skips a state.
    /// `bidding -> assigned` happens only inside bid acceptance.
    pub fn can_transition_to(&self, next: JobStatus) -> bool {
        matches!(
            (self, next),
            (JobStatus::Bidding, JobStatus::Assigned)
                | (JobStatus::Assigned, JobStatus::InTransit)
                | (JobStatus::InTransit, JobStatus::Delivered)
        )
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "payment_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Unpaid,
    Paid,
    Failed,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "payout_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PayoutStatus {
    NotDue,
    Scheduled,
    Paid,
    Failed,
}

/// A delivery request posted by a customer. Money columns are stored in
/// pence and stay NULL until a bid is accepted.
#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct Job {
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
    pub winning_bid_pence: Option<i64>,
    pub platform_fee_pence: Option<i64>,
    pub driver_payout_pence: Option<i64>,
    pub payment_status: PaymentStatus,
    pub payout_status: PayoutStatus,
    pub payout_due_at: Option<DateTime<Utc>>,
    pub assigned_at: Option<DateTime<Utc>>,
    pub paid_at: Option<DateTime<Utc>>,
    pub stripe_checkout_session_id: Option<String>,
    pub stripe_payment_intent_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_edges_are_allowed() {
        assert!(JobStatus::Bidding.can_transition_to(JobStatus::Assigned));
        assert!(JobStatus::Assigned.can_transition_to(JobStatus::InTransit));
        assert!(JobStatus::InTransit.can_transition_to(JobStatus::Delivered));
    }

    #[test]
    fn test_no_edge_skips_a_state() {
        assert!(!JobStatus::Bidding.can_transition_to(JobStatus::InTransit));
        assert!(!JobStatus::Bidding.can_transition_to(JobStatus::Delivered));
        assert!(!JobStatus::Assigned.can_transition_to(JobStatus::Delivered));
    }

    #[test]
    fn test_edges_are_one_way() {
        assert!(!JobStatus::Assigned.can_transition_to(JobStatus::Bidding));
        assert!(!JobStatus::InTransit.can_transition_to(JobStatus::Assigned));
        assert!(!JobStatus::Delivered.can_transition_to(JobStatus::InTransit));
    }

    #[test]
    fn test_delivered_is_terminal() {
        for next in [
            JobStatus::Bidding,
            JobStatus::Assigned,
            JobStatus::InTransit,
            JobStatus::Delivered,
            JobStatus::Cancelled,
        ] {
            assert!(!JobStatus::Delivered.can_transition_to(next));
        }
    }
}
