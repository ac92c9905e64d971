#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub app_url: String,
    pub jwt_secret: String,
    pub port: u16,
    // Stripe configuration
    pub stripe_secret_key: String,
    pub stripe_webhook_secret: String,
    // Shared secret protecting the payout batch endpoint
    pub cron_secret: String,
    // Settlement policy
    pub platform_fee_percent: i64,
    pub payout_delay_days: i64,
    pub payout_batch_limit: i64,
}

impl Config {
    pub fn init() -> Config {
        let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let jwt_secret = std::env::var("JWT_SECRET_KEY").expect("JWT_SECRET_KEY must be set");
        let app_url = std::env::var("APP_URL").expect("APP_URL must be set");

        let stripe_secret_key =
            std::env::var("STRIPE_SECRET_KEY").expect("STRIPE_SECRET_KEY must be set");
        let stripe_webhook_secret =
            std::env::var("STRIPE_WEBHOOK_SECRET").expect("STRIPE_WEBHOOK_SECRET must be set");
        let cron_secret = std::env::var("CRON_SECRET").expect("CRON_SECRET must be set");

        let platform_fee_percent = std::env::var("PLATFORM_FEE_PERCENT")
            .unwrap_or_else(|_| "20".to_string())
            .parse::<i64>()
            .expect("PLATFORM_FEE_PERCENT must be an integer");
        let payout_delay_days = std::env::var("PAYOUT_DELAY_DAYS")
            .unwrap_or_else(|_| "30".to_string())
            .parse::<i64>()
            .expect("PAYOUT_DELAY_DAYS must be an integer");
        let payout_batch_limit = std::env::var("PAYOUT_BATCH_LIMIT")
            .unwrap_or_else(|_| "50".to_string())
            .parse::<i64>()
            .expect("PAYOUT_BATCH_LIMIT must be an integer");

        Config {
            database_url,
            app_url,
            jwt_secret,
            port: 8000,
            stripe_secret_key,
            stripe_webhook_secret,
            cron_secret,
            platform_fee_percent,
            payout_delay_days,
            payout_batch_limit,
        }
    }
}
