pub mod application;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod schema;

use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use application::checkout::CheckoutService;
use application::shipping::ShippingDispatcher;
use application::webhook::WebhookProcessor;
use domain::ports::OrderStore;

pub use db::{create_pool, DbPool};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) {
    let mut conn = pool.get().expect("Failed to get DB connection for migrations");
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Failed to run database migrations");
}

/// Everything the HTTP handlers need, wired once at startup. Collaborators
/// sit behind trait objects so tests can swap in fakes.
#[derive(Clone)]
pub struct AppState {
    pub checkout: CheckoutService,
    pub webhooks: WebhookProcessor,
    pub dispatcher: ShippingDispatcher,
    pub orders: Arc<dyn OrderStore>,
    pub webhook_secret: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::checkout::create_payment_session,
        handlers::webhook::stripe_webhook,
        handlers::shipping::ship_order,
        handlers::orders::get_order,
        handlers::orders::list_orders,
        handlers::orders::update_order,
    ),
    components(schemas(
        handlers::checkout::CheckoutRequest,
        handlers::checkout::CheckoutItemRequest,
        handlers::checkout::CheckoutCustomerRequest,
        handlers::checkout::CheckoutResponse,
        handlers::shipping::ShipOrderRequest,
        handlers::shipping::ShipOrderResponse,
        handlers::orders::OrderResponse,
        handlers::orders::OrderItemResponse,
        handlers::orders::TransactionResponse,
        handlers::orders::ShippingDetailsResponse,
        handlers::orders::ListOrdersResponse,
        handlers::orders::UpdateOrderRequest,
        handlers::orders::UpdateOrderItemRequest,
        handlers::orders::CustomizationDto,
        domain::cart::CustomizationKind,
    )),
    tags(
        (name = "checkout", description = "Checkout session initiation"),
        (name = "webhook", description = "Payment provider webhook ingestion"),
        (name = "shipping", description = "Shipping dispatch"),
        (name = "orders", description = "Order reads and administrative updates"),
    )
)]
pub struct ApiDoc;

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    state: AppState,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    Ok(HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(Logger::default())
            .service(
                web::scope("/api")
                    .route("/payment", web::post().to(handlers::checkout::create_payment_session))
                    .route("/webhook/stripe", web::post().to(handlers::webhook::stripe_webhook))
                    .route("/shipping", web::post().to(handlers::shipping::ship_order))
                    .route("/orders", web::get().to(handlers::orders::list_orders))
                    .route("/orders/{id}", web::get().to(handlers::orders::get_order))
                    .route("/orders/{id}", web::patch().to(handlers::orders::update_order)),
            )
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
