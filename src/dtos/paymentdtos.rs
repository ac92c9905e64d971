use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CreateCheckoutDto {
    pub job_id: Uuid,
}

/// The hosted checkout URL the client redirects the customer to.
#[derive(Debug, Serialize)]
pub struct CheckoutResponseDto {
    pub checkout_url: String,
    pub session_id: String,
}
