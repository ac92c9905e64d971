use serde::{Deserialize, Serialize};

pub mod biddtos;
pub mod jobdtos;
pub mod paymentdtos;
pub mod payoutdtos;

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: String,
    pub message: String,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        ApiResponse {
            status: "success".to_string(),
            message: message.into(),
            data,
        }
    }
}
