use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::errors::AppError;
use crate::AppState;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShipOrderRequest {
    pub order_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShipOrderResponse {
    pub success: bool,
    pub shiprocket_order_id: String,
    pub tracking_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carrier: Option<String>,
}

/// POST /api/shipping
///
/// Books a shipment for a paid order: creates the remote logistics order,
/// assigns a tracking number, and marks the order shipped. If either provider
/// call fails the order is left untouched so the dispatch can be retried.
#[utoipa::path(
    post,
    path = "/api/shipping",
    request_body = ShipOrderRequest,
    responses(
        (status = 200, description = "Shipment booked", body = ShipOrderResponse),
        (status = 404, description = "Order or customer not found"),
        (status = 500, description = "Logistics provider error"),
    ),
    tag = "shipping"
)]
pub async fn ship_order(
    state: web::Data<AppState>,
    body: web::Json<ShipOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let receipt = state.dispatcher.dispatch(body.order_id).await?;

    Ok(HttpResponse::Ok().json(ShipOrderResponse {
        success: true,
        shiprocket_order_id: receipt.logistics_order_id,
        tracking_number: receipt.tracking_number,
        carrier: receipt.carrier,
    }))
}
