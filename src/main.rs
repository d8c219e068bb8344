use std::sync::Arc;

use dotenvy::dotenv;

use storefront_orders::application::checkout::CheckoutService;
use storefront_orders::application::shipping::ShippingDispatcher;
use storefront_orders::application::webhook::WebhookProcessor;
use storefront_orders::config::AppConfig;
use storefront_orders::domain::ports::OrderStore;
use storefront_orders::infrastructure::customer_store::DieselCustomerStore;
use storefront_orders::infrastructure::order_store::DieselOrderStore;
use storefront_orders::infrastructure::shiprocket::ShiprocketClient;
use storefront_orders::infrastructure::stripe::StripeClient;
use storefront_orders::{build_server, create_pool, run_migrations, AppState};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = AppConfig::from_env();

    let pool = create_pool(&config.database_url);
    run_migrations(&pool);

    let orders: Arc<dyn OrderStore> = Arc::new(DieselOrderStore::new(
        pool.clone(),
        config.order_prefix.clone(),
    ));
    let customers = Arc::new(DieselCustomerStore::new(pool));
    let gateway = Arc::new(StripeClient::new(config.stripe_secret_key.clone()));
    let logistics = Arc::new(ShiprocketClient::new(
        config.shiprocket_email.clone(),
        config.shiprocket_password.clone(),
    ));

    let state = AppState {
        checkout: CheckoutService::new(gateway, config.public_url.clone()),
        webhooks: WebhookProcessor::new(orders.clone()),
        dispatcher: ShippingDispatcher::new(orders.clone(), customers, logistics),
        orders,
        webhook_secret: config.stripe_webhook_secret.clone(),
    };

    log::info!("Starting server at http://{}:{}", config.host, config.port);

    build_server(state, &config.host, config.port)?.await
}
