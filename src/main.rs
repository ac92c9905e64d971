mod config;
mod db;
mod dtos;
mod error;
mod handler;
mod middleware;
mod models;
mod routes;
mod service;
mod utils;

use std::sync::Arc;

use axum::http::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    HeaderValue, Method,
};
use config::Config;
use dotenv::dotenv;
use routes::create_router;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing_subscriber::EnvFilter;

use crate::db::db::DBClient;
use service::{
    acceptance::AcceptanceService, payment::PaymentService, settlement::SettlementService,
    stripe::StripeService,
};

#[derive(Debug, Clone)]
pub struct AppState {
    pub env: Config,
    pub db_client: Arc<DBClient>,
    pub stripe_service: StripeService,
    pub acceptance_service: AcceptanceService,
    pub payment_service: PaymentService,
    pub settlement_service: SettlementService,
}

impl AppState {
    pub fn new(db_client: DBClient, config: Config) -> Self {
        let db_client = Arc::new(db_client);

        let stripe_service = StripeService::new(&config);
        let acceptance_service = AcceptanceService::new(db_client.clone());
        let payment_service = PaymentService::new(db_client.clone(), &config);
        let settlement_service =
            SettlementService::new(db_client.clone(), stripe_service.clone());

        Self {
            env: config,
            db_client,
            stripe_service,
            acceptance_service,
            payment_service,
            settlement_service,
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    dotenv().ok();

    let config = Config::init();

    let pool = match PgPoolOptions::new()
        .max_connections(20)
        .min_connections(5)
        .connect(&config.database_url)
        .await
    {
        Ok(pool) => {
            tracing::info!("Connection to the database is successful");
            pool
        }
        Err(err) => {
            tracing::error!("Failed to connect to the database: {:?}", err);
            std::process::exit(1);
        }
    };

    let db_client = DBClient::new(pool);

    let allowed_origins = vec![config
        .app_url
        .parse::<HeaderValue>()
        .expect("APP_URL must be a valid origin")];

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_headers([AUTHORIZATION, ACCEPT, CONTENT_TYPE])
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE]);

    let app_state = Arc::new(AppState::new(db_client, config.clone()));

    let app = create_router(app_state.clone()).layer(cors);

    tracing::info!("Server is running on http://localhost:{}", config.port);

    // In-process settlement schedule; the HTTP endpoint stays available for
    // external cron triggers.
    let app_state_clone = app_state.clone();
    tokio::spawn(async move {
        service::background_jobs::start_payout_settlement_job(app_state_clone).await;
    });

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", &config.port))
        .await
        .unwrap();

    axum::serve(listener, app).await.unwrap();
}
