use std::env;

/// Process configuration, read once at startup. Secrets come exclusively
/// from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Base public URL used to build checkout redirect links.
    pub public_url: String,
    pub stripe_secret_key: String,
    pub stripe_webhook_secret: String,
    pub shiprocket_email: String,
    pub shiprocket_password: String,
    /// Prefix for generated order numbers, e.g. `MT-20250314-123456`.
    pub order_prefix: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("PORT must be a valid number"),
            public_url: env::var("PUBLIC_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            stripe_secret_key: env::var("STRIPE_SECRET_KEY")
                .expect("STRIPE_SECRET_KEY must be set"),
            stripe_webhook_secret: env::var("STRIPE_WEBHOOK_SECRET")
                .expect("STRIPE_WEBHOOK_SECRET must be set"),
            shiprocket_email: env::var("SHIPROCKET_EMAIL")
                .expect("SHIPROCKET_EMAIL must be set"),
            shiprocket_password: env::var("SHIPROCKET_PASSWORD")
                .expect("SHIPROCKET_PASSWORD must be set"),
            order_prefix: env::var("ORDER_PREFIX").unwrap_or_else(|_| "MT".to_string()),
        }
    }
}
