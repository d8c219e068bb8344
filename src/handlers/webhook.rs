use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::json;

use crate::errors::AppError;
use crate::infrastructure::stripe::construct_event;
use crate::AppState;

/// POST /api/webhook/stripe
///
/// Receives payment-provider webhook deliveries. The raw body is verified
/// against the `stripe-signature` header before any parsing; a bad signature
/// is a 400 and leaves no trace in the database. Every verified delivery is
/// acknowledged with `{"received": true}`, including duplicates and event
/// kinds this service ignores, so the provider stops retrying.
#[utoipa::path(
    post,
    path = "/api/webhook/stripe",
    request_body(content = String, content_type = "application/json"),
    responses(
        (status = 200, description = "Event received"),
        (status = 400, description = "Invalid signature or malformed payload"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "webhook"
)]
pub async fn stripe_webhook(
    state: web::Data<AppState>,
    request: HttpRequest,
    payload: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let signature = request
        .headers()
        .get("stripe-signature")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("");

    let event = construct_event(&payload, signature, &state.webhook_secret)?;
    state.webhooks.process(event).await?;

    Ok(HttpResponse::Ok().json(json!({ "received": true })))
}
