use std::sync::Arc;

use uuid::Uuid;

use crate::{
    db::db::DBClient,
    models::{
        bidmodel::{Bid, BidStatus},
        jobmodel::{Job, JobStatus},
    },
    service::error::ServiceError,
};

/// Coordinates bid acceptance: assigns the job to the winning driver and
/// settles every sibling bid, all inside one database transaction. This is
/// the only code path that moves a job out of `bidding`, and it guarantees
/// at most one bid per job ever becomes `won`.
#[derive(Debug, Clone)]
pub struct AcceptanceService {
    db_client: Arc<DBClient>,
}

impl AcceptanceService {
    pub fn new(db_client: Arc<DBClient>) -> Self {
        Self { db_client }
    }

    pub async fn accept_bid(
        &self,
        job_id: Uuid,
        bid_id: Uuid,
        caller_customer_id: Uuid,
    ) -> Result<(), ServiceError> {
        let mut tx = self.db_client.pool.begin().await?;

        // Lock the job row for the duration of the transaction so two
        // concurrent acceptances serialize instead of both reading
        // status = bidding.
        let job = sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE id = $1 FOR UPDATE")
            .bind(job_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(ServiceError::JobNotFound(job_id))?;

        if job.customer_id != caller_customer_id {
            return Err(ServiceError::NotYourJob(job_id));
        }

        match job.status {
            JobStatus::Bidding => {}
            JobStatus::Assigned | JobStatus::InTransit | JobStatus::Delivered => {
                return Err(ServiceError::AlreadyAssigned(job_id));
            }
            JobStatus::Cancelled => {
                return Err(ServiceError::JobNotBidding(job_id));
            }
        }

        let bid = sqlx::query_as::<_, Bid>("SELECT * FROM bids WHERE id = $1 AND job_id = $2")
            .bind(bid_id)
            .bind(job_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(ServiceError::BidNotFound(bid_id))?;

        if bid.status != BidStatus::Pending {
            return Err(ServiceError::BidNotPending(bid_id));
        }

        // Assign the job. Conditioned on the current status even though the
        // row is locked; zero rows affected means someone else won the race.
        let assigned = sqlx::query(
            r#"
            UPDATE jobs
            SET status = 'assigned',
                assigned_driver_id = $2,
                winning_bid_pence = $3,
                assigned_at = NOW(),
                updated_at = NOW()
            WHERE id = $1
              AND status = 'bidding'
            "#,
        )
        .bind(job_id)
        .bind(bid.driver_id)
        .bind(bid.amount_pence)
        .execute(&mut *tx)
        .await?;

        if assigned.rows_affected() == 0 {
            return Err(ServiceError::AlreadyAssigned(job_id));
        }

        let won = sqlx::query(
            "UPDATE bids SET status = 'won', updated_at = NOW() WHERE id = $1 AND status = 'pending'",
        )
        .bind(bid_id)
        .execute(&mut *tx)
        .await?;

        if won.rows_affected() == 0 {
            return Err(ServiceError::BidNotPending(bid_id));
        }

        // Every other still-pending bid loses. Withdrawn bids keep their
        // status.
        sqlx::query(
            r#"
            UPDATE bids
            SET status = 'lost', updated_at = NOW()
            WHERE job_id = $1
              AND status = 'pending'
              AND id <> $2
            "#,
        )
        .bind(job_id)
        .bind(bid_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            job_id = %job_id,
            bid_id = %bid_id,
            driver_id = %bid.driver_id,
            amount_pence = bid.amount_pence,
            "bid accepted, job assigned"
        );

        Ok(())
    }
}
