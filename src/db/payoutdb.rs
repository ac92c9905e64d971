use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::db::DBClient;
use crate::models::payoutmodel::Payout;

#[async_trait]
pub trait PayoutExt {
    /// Schedule a payout for a job. Keyed on the unique job_id constraint:
    /// if a row already exists (a replayed webhook), this is a no-op.
    async fn upsert_payout(
        &self,
        job_id: Uuid,
        driver_id: Uuid,
        amount_pence: i64,
        due_at: DateTime<Utc>,
    ) -> Result<(), sqlx::Error>;

    /// Scheduled payouts whose due date has passed, oldest first, capped at
    /// `limit` to bound the work per batch run.
    async fn get_due_payouts(
        &self,
        now: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<Payout>, sqlx::Error>;

    async fn mark_payout_paid(
        &self,
        payout_id: Uuid,
        stripe_transfer_id: &str,
        paid_at: DateTime<Utc>,
    ) -> Result<(), sqlx::Error>;

    async fn mark_payout_failed(&self, payout_id: Uuid, error: &str) -> Result<(), sqlx::Error>;
}

#[async_trait]
impl PayoutExt for DBClient {
    async fn upsert_payout(
        &self,
        job_id: Uuid,
        driver_id: Uuid,
        amount_pence: i64,
        due_at: DateTime<Utc>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO payouts (job_id, driver_id, amount_pence, due_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (job_id) DO NOTHING
            "#,
        )
        .bind(job_id)
        .bind(driver_id)
        .bind(amount_pence)
        .bind(due_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_due_payouts(
        &self,
        now: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<Payout>, sqlx::Error> {
        let payouts = sqlx::query_as::<_, Payout>(
            r#"
            SELECT *
            FROM payouts
            WHERE status = 'scheduled'
              AND due_at <= $1
            ORDER BY due_at ASC
            LIMIT $2
            "#,
        )
        .bind(now)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(payouts)
    }

    async fn mark_payout_paid(
        &self,
        payout_id: Uuid,
        stripe_transfer_id: &str,
        paid_at: DateTime<Utc>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE payouts
            SET status = 'paid',
                stripe_transfer_id = $2,
                paid_at = $3,
                last_error = NULL
            WHERE id = $1
            "#,
        )
        .bind(payout_id)
        .bind(stripe_transfer_id)
        .bind(paid_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn mark_payout_failed(&self, payout_id: Uuid, error: &str) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE payouts
            SET status = 'failed',
                last_error = $2
            WHERE id = $1
            "#,
        )
        .bind(payout_id)
        .bind(error)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
