use async_trait::async_trait;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::bidmodel::Bid;

#[async_trait]
pub trait BidExt {
    /// The one bid row a driver has on a job, whatever its status.
    async fn get_driver_bid(
        &self,
        job_id: Uuid,
        driver_id: Uuid,
    ) -> Result<Option<Bid>, sqlx::Error>;

    /// Create-or-update semantics: a driver has one bid row per job. A
    /// second submission replaces amount and note and resets the status to
    /// pending, so a withdrawn bid can be re-placed. Decided bids (won or
    /// lost) are never resurrected; `None` signals the update was refused.
    async fn upsert_bid(
        &self,
        job_id: Uuid,
        driver_id: Uuid,
        amount_pence: i64,
        note: Option<String>,
    ) -> Result<Option<Bid>, sqlx::Error>;

    /// Soft-withdraw the driver's pending bid. Returns false when there was
    /// no pending bid to withdraw.
    async fn withdraw_bid(&self, job_id: Uuid, driver_id: Uuid) -> Result<bool, sqlx::Error>;

    async fn get_job_bids(&self, job_id: Uuid) -> Result<Vec<Bid>, sqlx::Error>;

    async fn get_driver_bids(&self, driver_id: Uuid) -> Result<Vec<Bid>, sqlx::Error>;
}

#[async_trait]
impl BidExt for DBClient {
    async fn get_driver_bid(
        &self,
        job_id: Uuid,
        driver_id: Uuid,
    ) -> Result<Option<Bid>, sqlx::Error> {
        let bid =
            sqlx::query_as::<_, Bid>("SELECT * FROM bids WHERE job_id = $1 AND driver_id = $2")
                .bind(job_id)
                .bind(driver_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(bid)
    }

    async fn upsert_bid(
        &self,
        job_id: Uuid,
        driver_id: Uuid,
        amount_pence: i64,
        note: Option<String>,
    ) -> Result<Option<Bid>, sqlx::Error> {
        // The conflict guard keeps a decided bid decided: once acceptance
        // marked it won or lost, a late re-submission must not flip it back
        // to pending.
        let bid = sqlx::query_as::<_, Bid>(
            r#"
            INSERT INTO bids (job_id, driver_id, amount_pence, note)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (job_id, driver_id) DO UPDATE
            SET amount_pence = EXCLUDED.amount_pence,
                note = EXCLUDED.note,
                status = 'pending',
                updated_at = NOW()
            WHERE bids.status IN ('pending', 'withdrawn')
            RETURNING *
            "#,
        )
        .bind(job_id)
        .bind(driver_id)
        .bind(amount_pence)
        .bind(note)
        .fetch_optional(&self.pool)
        .await?;

        Ok(bid)
    }

    async fn withdraw_bid(&self, job_id: Uuid, driver_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE bids
            SET status = 'withdrawn', updated_at = NOW()
            WHERE job_id = $1
              AND driver_id = $2
              AND status = 'pending'
            "#,
        )
        .bind(job_id)
        .bind(driver_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn get_job_bids(&self, job_id: Uuid) -> Result<Vec<Bid>, sqlx::Error> {
        let bids =
            sqlx::query_as::<_, Bid>("SELECT * FROM bids WHERE job_id = $1 ORDER BY created_at ASC")
                .bind(job_id)
                .fetch_all(&self.pool)
                .await?;

        Ok(bids)
    }

    async fn get_driver_bids(&self, driver_id: Uuid) -> Result<Vec<Bid>, sqlx::Error> {
        let bids = sqlx::query_as::<_, Bid>(
            "SELECT * FROM bids WHERE driver_id = $1 ORDER BY created_at DESC",
        )
        .bind(driver_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(bids)
    }
}
