use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    db::{db::DBClient, jobdb::JobExt, payoutdb::PayoutExt, userdb::UserExt},
    models::{jobmodel::PayoutStatus, payoutmodel::Payout},
    service::{error::ServiceError, stripe::StripeService},
};

const MISSING_ACCOUNT_ERROR: &str = "missing driver stripe_account_id";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum SettlementOutcome {
    Paid,
    Failed,
}

/// Aggregate counts for one batch run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize)]
pub struct BatchResult {
    pub processed: u32,
    pub paid: u32,
    pub failed: u32,
}

impl BatchResult {
    pub fn record(&mut self, outcome: SettlementOutcome) {
        self.processed += 1;
        match outcome {
            SettlementOutcome::Paid => self.paid += 1,
            SettlementOutcome::Failed => self.failed += 1,
        }
    }
}

/// Executes due payouts: finds scheduled payouts past their due date and
/// transfers each driver's amount to their connected account. Records are
/// settled sequentially and independently; one failing transfer never stops
/// the rest of the batch.
#[derive(Debug, Clone)]
pub struct SettlementService {
    db_client: Arc<DBClient>,
    stripe: StripeService,
}

impl SettlementService {
    pub fn new(db_client: Arc<DBClient>, stripe: StripeService) -> Self {
        Self { db_client, stripe }
    }

    pub async fn run_payout_batch(
        &self,
        now: DateTime<Utc>,
        limit: i64,
    ) -> Result<BatchResult, ServiceError> {
        let due = self.db_client.get_due_payouts(now, limit).await?;

        let mut result = BatchResult::default();

        for payout in due {
            let outcome = match self.settle_one(&payout).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    // Bookkeeping itself failed. The payout is still in
                    // `scheduled`, so the next run picks it up again.
                    tracing::error!(payout_id = %payout.id, error = %e, "payout settlement errored");
                    SettlementOutcome::Failed
                }
            };
            result.record(outcome);
        }

        tracing::info!(
            processed = result.processed,
            paid = result.paid,
            failed = result.failed,
            "payout batch finished"
        );

        Ok(result)
    }

    async fn settle_one(&self, payout: &Payout) -> Result<SettlementOutcome, ServiceError> {
        let account = self
            .db_client
            .get_stripe_account_id(payout.driver_id)
            .await?;

        let Some(account) = account else {
            self.db_client
                .mark_payout_failed(payout.id, MISSING_ACCOUNT_ERROR)
                .await?;
            self.db_client
                .set_job_payout_status(payout.job_id, PayoutStatus::Failed)
                .await?;

            tracing::warn!(
                payout_id = %payout.id,
                driver_id = %payout.driver_id,
                "driver has no payout account"
            );
            return Ok(SettlementOutcome::Failed);
        };

        match self
            .stripe
            .create_transfer(payout.amount_pence, &account, payout.job_id, payout.id)
            .await
        {
            Ok(transfer) => {
                self.db_client
                    .mark_payout_paid(payout.id, &transfer.id, Utc::now())
                    .await?;
                self.db_client
                    .set_job_payout_status(payout.job_id, PayoutStatus::Paid)
                    .await?;

                tracing::info!(
                    payout_id = %payout.id,
                    transfer_id = %transfer.id,
                    amount_pence = payout.amount_pence,
                    "payout transferred"
                );
                Ok(SettlementOutcome::Paid)
            }
            Err(e) => {
                // No in-run retry: the payout stays failed until an operator
                // re-schedules it.
                self.db_client
                    .mark_payout_failed(payout.id, &e.to_string())
                    .await?;
                self.db_client
                    .set_job_payout_status(payout.job_id, PayoutStatus::Failed)
                    .await?;

                tracing::warn!(payout_id = %payout.id, error = %e, "payout transfer failed");
                Ok(SettlementOutcome::Failed)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_result_tally() {
        // Three due payouts, the middle one fails: counts must still cover
        // all three.
        let mut result = BatchResult::default();
        result.record(SettlementOutcome::Paid);
        result.record(SettlementOutcome::Failed);
        result.record(SettlementOutcome::Paid);

        assert_eq!(
            result,
            BatchResult {
                processed: 3,
                paid: 2,
                failed: 1,
            }
        );
    }

    #[test]
    fn test_empty_batch() {
        let result = BatchResult::default();
        assert_eq!(result.processed, 0);
        assert_eq!(result.paid, 0);
        assert_eq!(result.failed, 0);
    }
}
