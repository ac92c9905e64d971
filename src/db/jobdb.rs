use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::db::DBClient;
use crate::models::jobmodel::{Job, PayoutStatus};

/// Everything a new job needs from the posting form. Status, payment and
/// payout columns start at their defaults.
#[derive(Debug, Clone)]
pub struct NewJob {
    pub pickup_postcode: String,
    pub pickup_address: Option<String>,
    pub dropoff_postcode: String,
    pub dropoff_address: Option<String>,
    pub vehicle_type: String,
    pub pickup_date: chrono::NaiveDate,
    pub items: String,
    pub weight_kg: Option<i32>,
    pub fragile: bool,
    pub special_instructions: Option<String>,
}

#[async_trait]
pub trait JobExt {
    async fn save_job(&self, customer_id: Uuid, new_job: NewJob) -> Result<Job, sqlx::Error>;

    async fn get_job(&self, job_id: Uuid) -> Result<Option<Job>, sqlx::Error>;

    async fn get_customer_jobs(&self, customer_id: Uuid) -> Result<Vec<Job>, sqlx::Error>;

    /// Jobs still open to bids, newest first.
    async fn get_open_jobs(&self) -> Result<Vec<Job>, sqlx::Error>;

    /// Jobs assigned to the given driver, newest first.
    async fn get_driver_jobs(&self, driver_id: Uuid) -> Result<Vec<Job>, sqlx::Error>;

    /// Compare-and-swap `assigned -> in_transit`, keyed on the assigned
    /// driver. Returns false when no row matched (wrong state, wrong driver
    /// or a concurrent request got there first).
    async fn start_job(&self, job_id: Uuid, driver_id: Uuid) -> Result<bool, sqlx::Error>;

    /// Compare-and-swap `in_transit -> delivered`, same keying as start_job.
    async fn deliver_job(&self, job_id: Uuid, driver_id: Uuid) -> Result<bool, sqlx::Error>;

    /// Single conditional update that marks a job paid and schedules its
    /// payout. Returns false when the job was already paid, which is the
    /// idempotent no-op path for webhook redeliveries.
    #[allow(clippy::too_many_arguments)]
    async fn mark_job_paid(
        &self,
        job_id: Uuid,
        platform_fee_pence: i64,
        driver_payout_pence: i64,
        paid_at: DateTime<Utc>,
        payout_due_at: DateTime<Utc>,
        checkout_session_id: &str,
        payment_intent_id: Option<&str>,
    ) -> Result<bool, sqlx::Error>;

    async fn set_job_payout_status(
        &self,
        job_id: Uuid,
        payout_status: PayoutStatus,
    ) -> Result<(), sqlx::Error>;
}

#[async_trait]
impl JobExt for DBClient {
    async fn save_job(&self, customer_id: Uuid, new_job: NewJob) -> Result<Job, sqlx::Error> {
        let job = sqlx::query_as::<_, Job>(
            r#"
            INSERT INTO jobs (
                customer_id, pickup_postcode, pickup_address,
                dropoff_postcode, dropoff_address, vehicle_type,
                pickup_date, items, weight_kg, fragile, special_instructions
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(customer_id)
        .bind(new_job.pickup_postcode)
        .bind(new_job.pickup_address)
        .bind(new_job.dropoff_postcode)
        .bind(new_job.dropoff_address)
        .bind(new_job.vehicle_type)
        .bind(new_job.pickup_date)
        .bind(new_job.items)
        .bind(new_job.weight_kg)
        .bind(new_job.fragile)
        .bind(new_job.special_instructions)
        .fetch_one(&self.pool)
        .await?;

        Ok(job)
    }

    async fn get_job(&self, job_id: Uuid) -> Result<Option<Job>, sqlx::Error> {
        let job = sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE id = $1")
            .bind(job_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(job)
    }

    async fn get_customer_jobs(&self, customer_id: Uuid) -> Result<Vec<Job>, sqlx::Error> {
        let jobs = sqlx::query_as::<_, Job>(
            "SELECT * FROM jobs WHERE customer_id = $1 ORDER BY created_at DESC",
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(jobs)
    }

    async fn get_open_jobs(&self) -> Result<Vec<Job>, sqlx::Error> {
        let jobs = sqlx::query_as::<_, Job>(
            "SELECT * FROM jobs WHERE status = 'bidding' ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(jobs)
    }

    async fn get_driver_jobs(&self, driver_id: Uuid) -> Result<Vec<Job>, sqlx::Error> {
        let jobs = sqlx::query_as::<_, Job>(
            "SELECT * FROM jobs WHERE assigned_driver_id = $1 ORDER BY created_at DESC",
        )
        .bind(driver_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(jobs)
    }

    async fn start_job(&self, job_id: Uuid, driver_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE jobs
            SET status = 'in_transit', updated_at = NOW()
            WHERE id = $1
              AND assigned_driver_id = $2
              AND status = 'assigned'
            "#,
        )
        .bind(job_id)
        .bind(driver_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn deliver_job(&self, job_id: Uuid, driver_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE jobs
            SET status = 'delivered', updated_at = NOW()
            WHERE id = $1
              AND assigned_driver_id = $2
              AND status = 'in_transit'
            "#,
        )
        .bind(job_id)
        .bind(driver_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    #[allow(clippy::too_many_arguments)]
    async fn mark_job_paid(
        &self,
        job_id: Uuid,
        platform_fee_pence: i64,
        driver_payout_pence: i64,
        paid_at: DateTime<Utc>,
        payout_due_at: DateTime<Utc>,
        checkout_session_id: &str,
        payment_intent_id: Option<&str>,
    ) -> Result<bool, sqlx::Error> {
        // The WHERE clause is what makes duplicate webhook deliveries safe:
        // the second delivery matches zero rows.
        let result = sqlx::query(
            r#"
            UPDATE jobs
            SET payment_status = 'paid',
                paid_at = $2,
                platform_fee_pence = $3,
                driver_payout_pence = $4,
                payout_status = 'scheduled',
                payout_due_at = $5,
                stripe_checkout_session_id = $6,
                stripe_payment_intent_id = $7,
                updated_at = NOW()
            WHERE id = $1
              AND payment_status <> 'paid'
            "#,
        )
        .bind(job_id)
        .bind(paid_at)
        .bind(platform_fee_pence)
        .bind(driver_payout_pence)
        .bind(payout_due_at)
        .bind(checkout_session_id)
        .bind(payment_intent_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn set_job_payout_status(
        &self,
        job_id: Uuid,
        payout_status: PayoutStatus,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE jobs SET payout_status = $2, updated_at = NOW() WHERE id = $1")
            .bind(job_id)
            .bind(payout_status)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
