use std::str::FromStr;

use actix_web::{web, HttpResponse};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::cart::{Customization, CustomizationKind};
use crate::domain::order::{AdminOrderUpdate, Order, OrderItem, OrderStatus};
use crate::errors::AppError;
use crate::AppState;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomizationDto {
    #[serde(rename = "type")]
    pub kind: CustomizationKind,
    pub design_file: Option<String>,
    pub notes: Option<String>,
    /// Decimal amount as a string to avoid floating-point issues, e.g. "50.00"
    pub additional_cost: String,
}

impl CustomizationDto {
    fn from_domain(customization: &Customization) -> Self {
        Self {
            kind: customization.kind.clone(),
            design_file: customization.design_file.clone(),
            notes: customization.notes.clone(),
            additional_cost: customization.additional_cost.to_string(),
        }
    }

    fn into_domain(self) -> Result<Customization, AppError> {
        let additional_cost = BigDecimal::from_str(&self.additional_cost).map_err(|e| {
            AppError::Validation(format!(
                "Invalid additionalCost '{}': {}",
                self.additional_cost, e
            ))
        })?;
        Ok(Customization {
            kind: self.kind,
            design_file: self.design_file,
            notes: self.notes,
            additional_cost,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemResponse {
    pub product_id: String,
    pub title: String,
    pub quantity: i32,
    pub unit_price: String,
    pub size: Option<String>,
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customization: Option<CustomizationDto>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    pub transaction_id: String,
    pub amount: String,
    pub method: String,
    pub status: String,
    pub date: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShippingDetailsResponse {
    pub tracking_number: Option<String>,
    pub carrier: Option<String>,
    pub logistics_order_id: Option<String>,
    pub estimated_delivery: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: Uuid,
    pub order_number: String,
    pub customer_id: Uuid,
    pub items: Vec<OrderItemResponse>,
    pub subtotal: String,
    pub tax: String,
    pub shipping: String,
    pub discount: String,
    pub total: String,
    pub status: String,
    pub payment_method: Option<String>,
    pub payment_status: String,
    pub payment_terms: String,
    pub transactions: Vec<TransactionResponse>,
    pub shipping_details: ShippingDetailsResponse,
    pub notes: Option<String>,
    pub customer_notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl OrderResponse {
    fn from_domain(order: Order) -> Self {
        Self {
            id: order.id,
            order_number: order.order_number,
            customer_id: order.customer_id,
            items: order
                .items
                .iter()
                .map(|item| OrderItemResponse {
                    product_id: item.product_id.clone(),
                    title: item.title.clone(),
                    quantity: item.quantity,
                    unit_price: item.unit_price.to_string(),
                    size: item.size.clone(),
                    color: item.color.clone(),
                    customization: item.customization.as_ref().map(CustomizationDto::from_domain),
                })
                .collect(),
            subtotal: order.subtotal.to_string(),
            tax: order.tax.to_string(),
            shipping: order.shipping.to_string(),
            discount: order.discount.to_string(),
            total: order.total.to_string(),
            status: order.status.to_string(),
            payment_method: order.payment_method.map(|m| m.to_string()),
            payment_status: order.payment_status.to_string(),
            payment_terms: order.payment_terms.to_string(),
            transactions: order
                .transactions
                .iter()
                .map(|t| TransactionResponse {
                    transaction_id: t.transaction_id.clone(),
                    amount: t.amount.to_string(),
                    method: t.method.to_string(),
                    status: t.status.to_string(),
                    date: t.date.to_rfc3339(),
                })
                .collect(),
            shipping_details: ShippingDetailsResponse {
                tracking_number: order.shipping_details.tracking_number,
                carrier: order.shipping_details.carrier,
                logistics_order_id: order.shipping_details.logistics_order_id,
                estimated_delivery: order
                    .shipping_details
                    .estimated_delivery
                    .map(|d| d.to_rfc3339()),
            },
            notes: order.notes,
            customer_notes: order.customer_notes,
            created_at: order.created_at.to_rfc3339(),
            updated_at: order.updated_at.to_rfc3339(),
        }
    }
}

// ── Pagination ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct ListOrdersParams {
    /// Page number (1-based). Defaults to 1.
    #[serde(default = "default_page")]
    pub page: i64,
    /// Number of items per page. Defaults to 20, maximum 100.
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    20
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListOrdersResponse {
    pub items: Vec<OrderResponse>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

// ── Admin update ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderItemRequest {
    pub product_id: String,
    pub title: String,
    pub quantity: i32,
    /// Decimal price as a string to avoid floating-point issues, e.g. "9.99"
    pub unit_price: String,
    pub size: Option<String>,
    pub color: Option<String>,
    pub customization: Option<CustomizationDto>,
}

impl UpdateOrderItemRequest {
    fn into_domain(self) -> Result<OrderItem, AppError> {
        let unit_price = BigDecimal::from_str(&self.unit_price).map_err(|e| {
            AppError::Validation(format!("Invalid unitPrice '{}': {}", self.unit_price, e))
        })?;
        Ok(OrderItem {
            product_id: self.product_id,
            title: self.title,
            quantity: self.quantity,
            unit_price,
            size: self.size,
            color: self.color,
            customization: self.customization.map(CustomizationDto::into_domain).transpose()?,
        })
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderRequest {
    /// Replaces the full item list when present; the webhook creates orders
    /// without items, so this is how they get backfilled.
    pub items: Option<Vec<UpdateOrderItemRequest>>,
    pub status: Option<String>,
    pub notes: Option<String>,
    pub customer_notes: Option<String>,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /api/orders/{id}
///
/// Returns the order together with its items and payment transactions.
#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order = state
        .orders
        .find_by_id(path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Order".to_string()))?;

    Ok(HttpResponse::Ok().json(OrderResponse::from_domain(order)))
}

/// GET /api/orders
///
/// Returns a paginated list of orders (without items or transactions).
/// Use `page` (1-based) and `limit` to control pagination.
#[utoipa::path(
    get,
    path = "/api/orders",
    params(
        ("page" = Option<i64>, Query, description = "Page number (1-based, default 1)"),
        ("limit" = Option<i64>, Query, description = "Items per page (default 20, max 100)"),
    ),
    responses(
        (status = 200, description = "Paginated list of orders", body = ListOrdersResponse),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn list_orders(
    state: web::Data<AppState>,
    query: web::Query<ListOrdersParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let page = params.page.max(1);
    let limit = params.limit.clamp(1, 100);

    let result = state.orders.list(page, limit).await?;

    Ok(HttpResponse::Ok().json(ListOrdersResponse {
        items: result.items.into_iter().map(OrderResponse::from_domain).collect(),
        total: result.total,
        page,
        limit,
    }))
}

/// PATCH /api/orders/{id}
///
/// Administrative update: item backfill, status corrections, notes. Only the
/// fields present in the body are applied.
#[utoipa::path(
    patch,
    path = "/api/orders/{id}",
    request_body = UpdateOrderRequest,
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    responses(
        (status = 200, description = "Updated order", body = OrderResponse),
        (status = 400, description = "Invalid field value"),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn update_order(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();

    let status = body
        .status
        .as_deref()
        .map(|s| {
            OrderStatus::from_str(s)
                .map_err(|_| AppError::Validation(format!("Invalid status '{}'", s)))
        })
        .transpose()?;

    let items = body
        .items
        .map(|items| {
            items
                .into_iter()
                .map(UpdateOrderItemRequest::into_domain)
                .collect::<Result<Vec<_>, _>>()
        })
        .transpose()?;

    let update = AdminOrderUpdate {
        items,
        status,
        notes: body.notes,
        customer_notes: body.customer_notes,
    };

    let order = state
        .orders
        .apply_admin_update(path.into_inner(), update)
        .await?;

    Ok(HttpResponse::Ok().json(OrderResponse::from_domain(order)))
}
