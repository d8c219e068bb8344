use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

use crate::application::checkout::{CheckoutInput, CheckoutItemInput};
use crate::errors::AppError;
use crate::AppState;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutItemRequest {
    /// Unit price in major currency units. Defaults to 0.
    #[serde(default)]
    pub price: f64,
    /// Defaults to 1.
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub product_id: String,
}

fn default_quantity() -> u32 {
    1
}

fn default_title() -> String {
    "Product".to_string()
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckoutCustomerRequest {
    pub id: String,
    pub email: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckoutRequest {
    pub items: Vec<CheckoutItemRequest>,
    pub customer: CheckoutCustomerRequest,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub session_id: String,
    pub url: String,
}

// ── Handler ──────────────────────────────────────────────────────────────────

/// POST /api/payment
///
/// Creates a hosted checkout session for the submitted cart items and returns
/// the redirect URL. The session metadata carries the customer id so that the
/// completion webhook can attribute the resulting order.
#[utoipa::path(
    post,
    path = "/api/payment",
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Checkout session created", body = CheckoutResponse),
        (status = 400, description = "Empty or invalid cart"),
        (status = 500, description = "Payment provider error"),
    ),
    tag = "checkout"
)]
pub async fn create_payment_session(
    state: web::Data<AppState>,
    body: web::Json<CheckoutRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();

    let input = CheckoutInput {
        items: body
            .items
            .into_iter()
            .map(|item| CheckoutItemInput {
                price: item.price,
                quantity: item.quantity,
                title: item.title,
                size: item.size,
                color: item.color,
                product_id: item.product_id,
            })
            .collect(),
        customer_id: body.customer.id,
        customer_email: body.customer.email,
        metadata: body.metadata,
    };

    let session = state.checkout.create_session(input).await?;

    Ok(HttpResponse::Ok().json(CheckoutResponse {
        session_id: session.id,
        url: session.url,
    }))
}
