use std::sync::Arc;

use chrono::Utc;
use tokio::time::{interval, Duration};

use crate::AppState;

/// Periodic payout settlement. The same batch logic is reachable over HTTP
/// for external schedulers; this in-process loop covers deployments without
/// one.
pub async fn start_payout_settlement_job(app_state: Arc<AppState>) {
    let mut interval = interval(Duration::from_secs(3600)); // Run every hour

    loop {
        interval.tick().await;

        tracing::info!("Running payout settlement job at {}", Utc::now());

        match app_state
            .settlement_service
            .run_payout_batch(Utc::now(), app_state.env.payout_batch_limit)
            .await
        {
            Ok(result) => tracing::info!(
                "Payout settlement job completed: {} processed, {} paid, {} failed",
                result.processed,
                result.paid,
                result.failed
            ),
            Err(e) => tracing::error!("Payout settlement job failed: {}", e),
        }
    }
}
