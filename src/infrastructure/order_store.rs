use actix_web::web;
use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::{
    generate_order_number, AdminOrderUpdate, NewOrder, Order, OrderPage, TrackingUpdate,
};
use crate::domain::ports::OrderStore;
use crate::schema::{order_items, order_transactions, orders};

use super::models::{
    assemble_order, customization_kind_str, NewOrderItemRow, NewOrderRow, NewTransactionRow,
    OrderItemRow, OrderRow, TransactionRow,
};

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<diesel::result::Error> for DomainError {
    fn from(e: diesel::result::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

// ── Store ────────────────────────────────────────────────────────────────────

/// Postgres-backed order store. Blocking Diesel work runs on the actix
/// blocking pool so handler threads are never tied up.
pub struct DieselOrderStore {
    pool: DbPool,
    order_prefix: String,
}

impl DieselOrderStore {
    pub fn new(pool: DbPool, order_prefix: String) -> Self {
        Self { pool, order_prefix }
    }
}

fn item_rows(order_id: Uuid, items: &[crate::domain::order::OrderItem]) -> Vec<NewOrderItemRow> {
    items
        .iter()
        .map(|item| NewOrderItemRow {
            id: Uuid::new_v4(),
            order_id,
            product_id: item.product_id.clone(),
            title: item.title.clone(),
            quantity: item.quantity,
            unit_price: item.unit_price.clone(),
            size: item.size.clone(),
            color: item.color.clone(),
            customization_type: item
                .customization
                .as_ref()
                .map(|c| customization_kind_str(&c.kind).to_string()),
            customization_design_file: item
                .customization
                .as_ref()
                .and_then(|c| c.design_file.clone()),
            customization_notes: item.customization.as_ref().and_then(|c| c.notes.clone()),
            customization_cost: item
                .customization
                .as_ref()
                .map(|c| c.additional_cost.clone()),
        })
        .collect()
}

fn load_order(conn: &mut PgConnection, id: Uuid) -> Result<Option<Order>, DomainError> {
    let row = orders::table
        .filter(orders::id.eq(id))
        .select(OrderRow::as_select())
        .first(conn)
        .optional()?;

    let Some(row) = row else {
        return Ok(None);
    };

    let items = order_items::table
        .filter(order_items::order_id.eq(row.id))
        .order(order_items::created_at.asc())
        .select(OrderItemRow::as_select())
        .load(conn)?;

    let transactions = order_transactions::table
        .filter(order_transactions::order_id.eq(row.id))
        .order(order_transactions::occurred_at.asc())
        .select(TransactionRow::as_select())
        .load(conn)?;

    assemble_order(row, items, transactions).map(Some)
}

#[async_trait]
impl OrderStore for DieselOrderStore {
    async fn insert(&self, order: NewOrder) -> Result<Order, DomainError> {
        let pool = self.pool.clone();
        let prefix = self.order_prefix.clone();

        web::block(move || {
            let mut conn = pool.get()?;

            conn.transaction::<_, DomainError, _>(|conn| {
                let order_id = Uuid::new_v4();
                let order_number = order
                    .order_number
                    .clone()
                    .unwrap_or_else(|| generate_order_number(&prefix, Utc::now()));
                let address = order.shipping_details.address.clone();

                let row: OrderRow = diesel::insert_into(orders::table)
                    .values(&NewOrderRow {
                        id: order_id,
                        order_number,
                        customer_id: order.customer_id,
                        subtotal: order.subtotal.clone(),
                        tax: order.tax.clone(),
                        shipping: order.shipping.clone(),
                        discount: order.discount.clone(),
                        total: order.total.clone(),
                        status: order.status.as_str().to_string(),
                        payment_method: order
                            .payment_method
                            .map(|m| m.as_str().to_string()),
                        payment_status: order.payment_status.as_str().to_string(),
                        payment_terms: order.payment_terms.as_str().to_string(),
                        shipping_line1: address.as_ref().map(|a| a.line1.clone()),
                        shipping_line2: address.as_ref().and_then(|a| a.line2.clone()),
                        shipping_city: address.as_ref().map(|a| a.city.clone()),
                        shipping_state: address.as_ref().map(|a| a.state.clone()),
                        shipping_postal_code: address
                            .as_ref()
                            .map(|a| a.postal_code.clone()),
                        shipping_country: address.as_ref().map(|a| a.country.clone()),
                        notes: order.notes.clone(),
                        customer_notes: order.customer_notes.clone(),
                    })
                    .get_result(conn)?;

                let new_items = item_rows(order_id, &order.items);
                if !new_items.is_empty() {
                    diesel::insert_into(order_items::table)
                        .values(&new_items)
                        .execute(conn)?;
                }

                let new_transactions: Vec<NewTransactionRow> = order
                    .transactions
                    .iter()
                    .map(|t| NewTransactionRow {
                        id: Uuid::new_v4(),
                        order_id,
                        transaction_id: t.transaction_id.clone(),
                        amount: t.amount.clone(),
                        method: t.method.as_str().to_string(),
                        status: t.status.as_str().to_string(),
                        occurred_at: t.date,
                    })
                    .collect();
                if !new_transactions.is_empty() {
                    diesel::insert_into(order_transactions::table)
                        .values(&new_transactions)
                        .execute(conn)?;
                }

                Ok(Order {
                    id: row.id,
                    order_number: row.order_number,
                    customer_id: row.customer_id,
                    items: order.items,
                    subtotal: order.subtotal,
                    tax: order.tax,
                    shipping: order.shipping,
                    discount: order.discount,
                    total: order.total,
                    status: order.status,
                    payment_method: order.payment_method,
                    payment_status: order.payment_status,
                    payment_terms: order.payment_terms,
                    transactions: order.transactions,
                    shipping_details: order.shipping_details,
                    notes: order.notes,
                    customer_notes: order.customer_notes,
                    created_at: row.created_at,
                    updated_at: row.updated_at,
                })
            })
        })
        .await
        .map_err(|e| DomainError::Internal(e.to_string()))?
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, DomainError> {
        let pool = self.pool.clone();
        web::block(move || {
            let mut conn = pool.get()?;
            load_order(&mut conn, id)
        })
        .await
        .map_err(|e| DomainError::Internal(e.to_string()))?
    }

    async fn find_by_transaction(
        &self,
        transaction_id: &str,
    ) -> Result<Option<Order>, DomainError> {
        let pool = self.pool.clone();
        let transaction_id = transaction_id.to_string();
        web::block(move || {
            let mut conn = pool.get()?;

            let order_id: Option<Uuid> = order_transactions::table
                .filter(order_transactions::transaction_id.eq(&transaction_id))
                .select(order_transactions::order_id)
                .first(&mut conn)
                .optional()?;

            match order_id {
                Some(order_id) => load_order(&mut conn, order_id),
                None => Ok(None),
            }
        })
        .await
        .map_err(|e| DomainError::Internal(e.to_string()))?
    }

    async fn list(&self, page: i64, limit: i64) -> Result<OrderPage, DomainError> {
        let pool = self.pool.clone();
        let offset = (page - 1) * limit;

        web::block(move || {
            let mut conn = pool.get()?;

            conn.transaction::<_, DomainError, _>(|conn| {
                let total: i64 = orders::table.count().get_result(conn)?;

                let rows = orders::table
                    .select(OrderRow::as_select())
                    .order(orders::created_at.desc())
                    .limit(limit)
                    .offset(offset)
                    .load(conn)?;

                // Listing omits items and transactions; fetch an order by id
                // for the full record.
                let items = rows
                    .into_iter()
                    .map(|row| assemble_order(row, vec![], vec![]))
                    .collect::<Result<Vec<_>, _>>()?;

                Ok(OrderPage { items, total })
            })
        })
        .await
        .map_err(|e| DomainError::Internal(e.to_string()))?
    }

    async fn mark_shipped(&self, id: Uuid, update: TrackingUpdate) -> Result<(), DomainError> {
        let pool = self.pool.clone();
        web::block(move || {
            let mut conn = pool.get()?;
            let now = Utc::now();

            let target = diesel::update(orders::table.filter(orders::id.eq(id)));
            // Carrier is merged, not cleared, when the provider did not name one.
            let updated = match update.carrier {
                Some(carrier) => target
                    .set((
                        orders::status.eq("shipped"),
                        orders::tracking_number.eq(&update.tracking_number),
                        orders::logistics_order_id.eq(&update.logistics_order_id),
                        orders::carrier.eq(carrier),
                        orders::updated_at.eq(now),
                    ))
                    .execute(&mut conn)?,
                None => target
                    .set((
                        orders::status.eq("shipped"),
                        orders::tracking_number.eq(&update.tracking_number),
                        orders::logistics_order_id.eq(&update.logistics_order_id),
                        orders::updated_at.eq(now),
                    ))
                    .execute(&mut conn)?,
            };

            if updated == 0 {
                return Err(DomainError::NotFound("Order".to_string()));
            }
            Ok(())
        })
        .await
        .map_err(|e| DomainError::Internal(e.to_string()))?
    }

    async fn apply_admin_update(
        &self,
        id: Uuid,
        update: AdminOrderUpdate,
    ) -> Result<Order, DomainError> {
        let pool = self.pool.clone();
        web::block(move || {
            let mut conn = pool.get()?;

            conn.transaction::<_, DomainError, _>(|conn| {
                let exists: Option<Uuid> = orders::table
                    .filter(orders::id.eq(id))
                    .select(orders::id)
                    .first(conn)
                    .optional()?;
                if exists.is_none() {
                    return Err(DomainError::NotFound("Order".to_string()));
                }

                if let Some(items) = &update.items {
                    diesel::delete(order_items::table.filter(order_items::order_id.eq(id)))
                        .execute(conn)?;
                    let new_items = item_rows(id, items);
                    if !new_items.is_empty() {
                        diesel::insert_into(order_items::table)
                            .values(&new_items)
                            .execute(conn)?;
                    }
                }
                if let Some(status) = update.status {
                    diesel::update(orders::table.filter(orders::id.eq(id)))
                        .set(orders::status.eq(status.as_str()))
                        .execute(conn)?;
                }
                if let Some(notes) = &update.notes {
                    diesel::update(orders::table.filter(orders::id.eq(id)))
                        .set(orders::notes.eq(notes))
                        .execute(conn)?;
                }
                if let Some(customer_notes) = &update.customer_notes {
                    diesel::update(orders::table.filter(orders::id.eq(id)))
                        .set(orders::customer_notes.eq(customer_notes))
                        .execute(conn)?;
                }
                diesel::update(orders::table.filter(orders::id.eq(id)))
                    .set(orders::updated_at.eq(Utc::now()))
                    .execute(conn)?;

                load_order(conn, id)?
                    .ok_or_else(|| DomainError::Internal("order vanished mid-update".to_string()))
            })
        })
        .await
        .map_err(|e| DomainError::Internal(e.to_string()))?
    }
}
