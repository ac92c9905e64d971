use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use uuid::Uuid;

use crate::{config::Config, service::error::ServiceError};

const STRIPE_API_BASE: &str = "https://api.stripe.com/v1";

/// How far a webhook timestamp may lag before the event is treated as a
/// replay. Stripe's own SDKs default to five minutes.
pub const SIGNATURE_TOLERANCE_SECS: i64 = 300;

#[derive(Debug, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Transfer {
    pub id: String,
}

/// Thin client for the two Stripe endpoints this service calls: hosted
/// checkout session creation and connected-account transfers. Requests are
/// form-encoded, responses are JSON.
#[derive(Debug, Clone)]
pub struct StripeService {
    secret_key: String,
    client: reqwest::Client,
}

impl StripeService {
    pub fn new(config: &Config) -> Self {
        Self {
            secret_key: config.stripe_secret_key.clone(),
            client: reqwest::Client::new(),
        }
    }

    /// Create a hosted checkout session for a job. The job and customer ids
    /// ride along as metadata so the webhook can correlate the payment back
    /// to the job.
    pub async fn create_checkout_session(
        &self,
        job_id: Uuid,
        customer_id: Uuid,
        amount_pence: i64,
        description: &str,
        success_url: &str,
        cancel_url: &str,
    ) -> Result<CheckoutSession, ServiceError> {
        let amount = amount_pence.to_string();
        let job_id = job_id.to_string();
        let customer_id = customer_id.to_string();

        let params: Vec<(&str, &str)> = vec![
            ("mode", "payment"),
            ("success_url", success_url),
            ("cancel_url", cancel_url),
            ("line_items[0][quantity]", "1"),
            ("line_items[0][price_data][currency]", "gbp"),
            ("line_items[0][price_data][unit_amount]", &amount),
            (
                "line_items[0][price_data][product_data][name]",
                "Courier Job Payment",
            ),
            (
                "line_items[0][price_data][product_data][description]",
                description,
            ),
            ("metadata[job_id]", &job_id),
            ("metadata[customer_id]", &customer_id),
        ];

        let response = self
            .client
            .post(format!("{}/checkout/sessions", STRIPE_API_BASE))
            .basic_auth(&self.secret_key, Option::<&str>::None)
            .form(&params)
            .send()
            .await
            .map_err(|e| ServiceError::Stripe(e.to_string()))?;

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ServiceError::Stripe(e.to_string()))?;

        if let Some(error) = body.get("error") {
            let message = error["message"].as_str().unwrap_or("checkout session failed");
            return Err(ServiceError::Stripe(message.to_string()));
        }

        let id = body["id"]
            .as_str()
            .ok_or_else(|| ServiceError::Stripe("checkout session missing id".to_string()))?;
        let url = body["url"]
            .as_str()
            .ok_or_else(|| ServiceError::Stripe("checkout session missing url".to_string()))?;

        Ok(CheckoutSession {
            id: id.to_string(),
            url: url.to_string(),
        })
    }

    /// Transfer funds to a driver's connected account. Tagged with job and
    /// payout ids for reconciliation.
    pub async fn create_transfer(
        &self,
        amount_pence: i64,
        destination_account: &str,
        job_id: Uuid,
        payout_id: Uuid,
    ) -> Result<Transfer, ServiceError> {
        let amount = amount_pence.to_string();
        let job_id = job_id.to_string();
        let payout_id = payout_id.to_string();

        let params: Vec<(&str, &str)> = vec![
            ("amount", &amount),
            ("currency", "gbp"),
            ("destination", destination_account),
            ("metadata[job_id]", &job_id),
            ("metadata[payout_id]", &payout_id),
        ];

        let response = self
            .client
            .post(format!("{}/transfers", STRIPE_API_BASE))
            .basic_auth(&self.secret_key, Option::<&str>::None)
            .form(&params)
            .send()
            .await
            .map_err(|e| ServiceError::Stripe(e.to_string()))?;

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ServiceError::Stripe(e.to_string()))?;

        if let Some(error) = body.get("error") {
            let message = error["message"].as_str().unwrap_or("transfer failed");
            return Err(ServiceError::Stripe(message.to_string()));
        }

        let id = body["id"]
            .as_str()
            .ok_or_else(|| ServiceError::Stripe("transfer missing id".to_string()))?;

        Ok(Transfer { id: id.to_string() })
    }
}

/// Verify a `Stripe-Signature` header against the raw request body.
///
/// The header carries a unix timestamp and one or more `v1` signatures; the
/// expected signature is HMAC-SHA256 over `"{timestamp}.{body}"` with the
/// webhook secret. Comparison is constant-time and the timestamp must be
/// within the replay tolerance of `now`.
pub fn verify_webhook_signature(
    payload: &str,
    signature_header: &str,
    secret: &str,
    now_unix: i64,
) -> Result<(), ServiceError> {
    let (timestamp, candidates) = parse_signature_header(signature_header)?;

    if (now_unix - timestamp).abs() > SIGNATURE_TOLERANCE_SECS {
        return Err(ServiceError::InvalidSignature(
            "timestamp outside tolerance".to_string(),
        ));
    }

    let signed_payload = format!("{}.{}", timestamp, payload);
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
        .map_err(|e| ServiceError::InvalidSignature(e.to_string()))?;
    mac.update(signed_payload.as_bytes());
    let expected = hex::encode(mac.finalize().into_bytes());

    let matched = candidates.iter().any(|candidate| {
        candidate.as_bytes().ct_eq(expected.as_bytes()).into()
    });

    if matched {
        Ok(())
    } else {
        Err(ServiceError::InvalidSignature(
            "no matching v1 signature".to_string(),
        ))
    }
}

/// Split `t=1492774577,v1=5257a86...,v1=...` into the timestamp and the v1
/// signature candidates.
fn parse_signature_header(header: &str) -> Result<(i64, Vec<String>), ServiceError> {
    let mut timestamp: Option<i64> = None;
    let mut candidates: Vec<String> = Vec::new();

    for part in header.split(',') {
        let mut kv = part.trim().splitn(2, '=');
        match (kv.next(), kv.next()) {
            (Some("t"), Some(value)) => {
                timestamp = value.parse::<i64>().ok();
            }
            (Some("v1"), Some(value)) => {
                candidates.push(value.to_string());
            }
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or_else(|| {
        ServiceError::InvalidSignature("missing timestamp".to_string())
    })?;

    if candidates.is_empty() {
        return Err(ServiceError::InvalidSignature(
            "missing v1 signature".to_string(),
        ));
    }

    Ok((timestamp, candidates))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign(payload: &str, timestamp: i64, secret: &str) -> String {
        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(format!("{}.{}", timestamp, payload).as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn test_valid_signature_is_accepted() {
        let payload = r#"{"type":"checkout.session.completed"}"#;
        let secret = "whsec_test";
        let now = 1_700_000_000;

        let header = format!("t={},v1={}", now, sign(payload, now, secret));
        assert!(verify_webhook_signature(payload, &header, secret, now).is_ok());
    }

    #[test]
    fn test_tampered_payload_is_rejected() {
        let secret = "whsec_test";
        let now = 1_700_000_000;

        let header = format!("t={},v1={}", now, sign("original body", now, secret));
        let result = verify_webhook_signature("tampered body", &header, secret, now);
        assert!(matches!(result, Err(ServiceError::InvalidSignature(_))));
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let payload = "body";
        let now = 1_700_000_000;

        let header = format!("t={},v1={}", now, sign(payload, now, "whsec_a"));
        let result = verify_webhook_signature(payload, &header, "whsec_b", now);
        assert!(matches!(result, Err(ServiceError::InvalidSignature(_))));
    }

    #[test]
    fn test_stale_timestamp_is_rejected() {
        let payload = "body";
        let secret = "whsec_test";
        let signed_at = 1_700_000_000;
        let now = signed_at + SIGNATURE_TOLERANCE_SECS + 1;

        let header = format!("t={},v1={}", signed_at, sign(payload, signed_at, secret));
        let result = verify_webhook_signature(payload, &header, secret, now);
        assert!(matches!(result, Err(ServiceError::InvalidSignature(_))));
    }

    #[test]
    fn test_second_v1_candidate_is_accepted() {
        // Stripe sends multiple v1 entries during secret rotation.
        let payload = "body";
        let secret = "whsec_new";
        let now = 1_700_000_000;

        let header = format!(
            "t={},v1={},v1={}",
            now,
            sign(payload, now, "whsec_old"),
            sign(payload, now, secret)
        );
        assert!(verify_webhook_signature(payload, &header, secret, now).is_ok());
    }

    #[test]
    fn test_malformed_header_is_rejected() {
        for header in ["", "t=abc,v1=00", "v1=00", "t=123"] {
            let result = verify_webhook_signature("body", header, "secret", 123);
            assert!(matches!(result, Err(ServiceError::InvalidSignature(_))));
        }
    }
}
