use std::sync::Arc;

use chrono::{Duration, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::{
    config::Config,
    db::{db::DBClient, jobdb::JobExt, payoutdb::PayoutExt},
    service::error::ServiceError,
    utils::money::fee_split,
};

/// The fields payment intake needs out of a `checkout.session.completed`
/// event.
#[derive(Debug, PartialEq)]
pub struct CheckoutMetadata {
    pub job_id: Uuid,
    pub session_id: String,
    pub payment_intent_id: Option<String>,
}

/// Pull the job reference out of a checkout event. The session carries
/// `metadata.job_id` because checkout creation put it there; an event
/// without it cannot be correlated to anything and is rejected.
pub fn extract_checkout_metadata(event: &Value) -> Result<CheckoutMetadata, ServiceError> {
    let session = &event["data"]["object"];

    let session_id = session["id"]
        .as_str()
        .ok_or(ServiceError::MissingJobReference)?
        .to_string();

    let job_id = session["metadata"]["job_id"]
        .as_str()
        .and_then(|raw| Uuid::parse_str(raw).ok())
        .ok_or(ServiceError::MissingJobReference)?;

    // Expanded events carry the payment intent as an object, thin ones as a
    // plain id string.
    let payment_intent_id = match &session["payment_intent"] {
        Value::String(id) => Some(id.clone()),
        Value::Object(obj) => obj.get("id").and_then(|v| v.as_str()).map(String::from),
        _ => None,
    };

    Ok(CheckoutMetadata {
        job_id,
        session_id,
        payment_intent_id,
    })
}

/// Processes payment confirmations from the webhook: marks the job paid
/// exactly once, computes the fee split and schedules the driver payout.
/// Never initiates the transfer itself; that is the settlement runner's job
/// 30 days later.
#[derive(Debug, Clone)]
pub struct PaymentService {
    db_client: Arc<DBClient>,
    platform_fee_percent: i64,
    payout_delay_days: i64,
}

impl PaymentService {
    pub fn new(db_client: Arc<DBClient>, config: &Config) -> Self {
        Self {
            db_client,
            platform_fee_percent: config.platform_fee_percent,
            payout_delay_days: config.payout_delay_days,
        }
    }

    /// Route a verified webhook event. Event types this service does not
    /// care about are acknowledged without any state change.
    pub async fn handle_event(&self, event: &Value) -> Result<(), ServiceError> {
        let event_type = event["type"].as_str().unwrap_or_default();

        match event_type {
            "checkout.session.completed" | "checkout.session.async_payment_succeeded" => {
                let metadata = extract_checkout_metadata(event)?;
                self.handle_payment_confirmed(metadata).await
            }
            other => {
                tracing::debug!(event_type = other, "ignoring unhandled Stripe event");
                Ok(())
            }
        }
    }

    pub async fn handle_payment_confirmed(
        &self,
        metadata: CheckoutMetadata,
    ) -> Result<(), ServiceError> {
        let job = self
            .db_client
            .get_job(metadata.job_id)
            .await?
            .ok_or(ServiceError::JobNotFound(metadata.job_id))?;

        let driver_id = job
            .assigned_driver_id
            .ok_or(ServiceError::DriverNotAssigned(job.id))?;

        let winning_bid_pence = match job.winning_bid_pence {
            Some(amount) if amount > 0 => amount,
            _ => {
                return Err(ServiceError::InvalidAmount(
                    "job has no positive winning bid amount".to_string(),
                ))
            }
        };

        let (platform_fee_pence, driver_payout_pence) =
            fee_split(winning_bid_pence, self.platform_fee_percent);

        let paid_at = Utc::now();
        let payout_due_at = paid_at + Duration::days(self.payout_delay_days);

        let updated = self
            .db_client
            .mark_job_paid(
                job.id,
                platform_fee_pence,
                driver_payout_pence,
                paid_at,
                payout_due_at,
                &metadata.session_id,
                metadata.payment_intent_id.as_deref(),
            )
            .await?;

        if !updated {
            // Webhooks are at-least-once; a redelivered event finds the job
            // already paid and that is a success, not an error.
            tracing::info!(job_id = %job.id, "payment already recorded, skipping");
            return Ok(());
        }

        self.db_client
            .upsert_payout(job.id, driver_id, driver_payout_pence, payout_due_at)
            .await?;

        tracing::info!(
            job_id = %job.id,
            driver_id = %driver_id,
            platform_fee_pence,
            driver_payout_pence,
            payout_due_at = %payout_due_at,
            "job paid, payout scheduled"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extracts_job_and_session_ids() {
        let job_id = Uuid::new_v4();
        let event = json!({
            "type": "checkout.session.completed",
            "data": { "object": {
                "id": "cs_test_123",
                "payment_intent": "pi_test_456",
                "metadata": { "job_id": job_id.to_string() }
            }}
        });

        let metadata = extract_checkout_metadata(&event).unwrap();
        assert_eq!(metadata.job_id, job_id);
        assert_eq!(metadata.session_id, "cs_test_123");
        assert_eq!(metadata.payment_intent_id.as_deref(), Some("pi_test_456"));
    }

    #[test]
    fn test_expanded_payment_intent_object() {
        let job_id = Uuid::new_v4();
        let event = json!({
            "data": { "object": {
                "id": "cs_test_123",
                "payment_intent": { "id": "pi_test_789", "status": "succeeded" },
                "metadata": { "job_id": job_id.to_string() }
            }}
        });

        let metadata = extract_checkout_metadata(&event).unwrap();
        assert_eq!(metadata.payment_intent_id.as_deref(), Some("pi_test_789"));
    }

    #[test]
    fn test_missing_payment_intent_is_allowed() {
        let job_id = Uuid::new_v4();
        let event = json!({
            "data": { "object": {
                "id": "cs_test_123",
                "payment_intent": null,
                "metadata": { "job_id": job_id.to_string() }
            }}
        });

        let metadata = extract_checkout_metadata(&event).unwrap();
        assert_eq!(metadata.payment_intent_id, None);
    }

    #[test]
    fn test_missing_job_id_is_rejected() {
        let event = json!({
            "data": { "object": {
                "id": "cs_test_123",
                "metadata": {}
            }}
        });

        let result = extract_checkout_metadata(&event);
        assert!(matches!(result, Err(ServiceError::MissingJobReference)));
    }

    #[test]
    fn test_malformed_job_id_is_rejected() {
        let event = json!({
            "data": { "object": {
                "id": "cs_test_123",
                "metadata": { "job_id": "not-a-uuid" }
            }}
        });

        let result = extract_checkout_metadata(&event);
        assert!(matches!(result, Err(ServiceError::MissingJobReference)));
    }
}
