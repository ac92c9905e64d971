use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Extension, Json, Router,
};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::{
    handler::{bids, jobs, payments, payouts},
    middleware::auth,
    AppState,
};

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "message": "Server is running"
    }))
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    // Everything a logged-in customer or driver touches.
    let protected_routes = Router::new()
        .route("/jobs", post(jobs::create_job).get(jobs::get_my_jobs))
        .route("/jobs/open", get(jobs::get_open_jobs))
        .route("/jobs/assigned", get(jobs::get_assigned_jobs))
        .route("/jobs/accept", post(jobs::accept_bid))
        .route("/jobs/:job_id", get(jobs::get_job))
        .route("/jobs/:job_id/start", post(jobs::start_job))
        .route("/jobs/:job_id/deliver", post(jobs::deliver_job))
        .route("/bids", post(bids::place_or_update_bid).get(bids::get_my_bids))
        .route("/bids/withdraw", post(bids::withdraw_bid))
        .route("/payments/checkout", post(payments::create_checkout))
        .layer(middleware::from_fn(auth));

    // Public but secret-gated: the processor signs the webhook, the batch
    // endpoint checks the cron secret itself.
    let public_routes = Router::new()
        .route("/stripe/webhook", post(payments::stripe_webhook))
        .route(
            "/payouts/run",
            post(payouts::run_payouts).get(payouts::run_payouts),
        );

    let api_route = Router::new()
        .merge(protected_routes)
        .merge(public_routes)
        .layer(TraceLayer::new_for_http())
        .layer(Extension(app_state));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_route)
}
