use serde::{Deserialize, Serialize};

use crate::service::settlement::BatchResult;

/// Query-string fallback for the batch secret; the header takes precedence.
#[derive(Debug, Deserialize)]
pub struct RunPayoutsQuery {
    pub secret: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BatchRunResponseDto {
    pub ok: bool,
    pub processed: u32,
    pub paid: u32,
    pub failed: u32,
}

impl From<BatchResult> for BatchRunResponseDto {
    fn from(result: BatchResult) -> Self {
        BatchRunResponseDto {
            ok: true,
            processed: result.processed,
            paid: result.paid,
            failed: result.failed,
        }
    }
}
