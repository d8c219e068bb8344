use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::cart::{Customization, CustomizationKind};
use crate::domain::customer::{Address, Customer, CustomerType, ShippingAddress};
use crate::domain::errors::DomainError;
use crate::domain::order::{Order, OrderItem, ShippingDetails, Transaction};
use crate::schema::{customers, order_items, order_transactions, orders};

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    pub id: Uuid,
    pub order_number: String,
    pub customer_id: Uuid,
    pub subtotal: BigDecimal,
    pub tax: BigDecimal,
    pub shipping: BigDecimal,
    pub discount: BigDecimal,
    pub total: BigDecimal,
    pub status: String,
    pub payment_method: Option<String>,
    pub payment_status: String,
    pub payment_terms: String,
    pub shipping_line1: Option<String>,
    pub shipping_line2: Option<String>,
    pub shipping_city: Option<String>,
    pub shipping_state: Option<String>,
    pub shipping_postal_code: Option<String>,
    pub shipping_country: Option<String>,
    pub tracking_number: Option<String>,
    pub carrier: Option<String>,
    pub estimated_delivery: Option<DateTime<Utc>>,
    pub logistics_order_id: Option<String>,
    pub notes: Option<String>,
    pub customer_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrderRow {
    pub id: Uuid,
    pub order_number: String,
    pub customer_id: Uuid,
    pub subtotal: BigDecimal,
    pub tax: BigDecimal,
    pub shipping: BigDecimal,
    pub discount: BigDecimal,
    pub total: BigDecimal,
    pub status: String,
    pub payment_method: Option<String>,
    pub payment_status: String,
    pub payment_terms: String,
    pub shipping_line1: Option<String>,
    pub shipping_line2: Option<String>,
    pub shipping_city: Option<String>,
    pub shipping_state: Option<String>,
    pub shipping_postal_code: Option<String>,
    pub shipping_country: Option<String>,
    pub notes: Option<String>,
    pub customer_notes: Option<String>,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = order_items)]
#[diesel(belongs_to(OrderRow, foreign_key = order_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderItemRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: String,
    pub title: String,
    pub quantity: i32,
    pub unit_price: BigDecimal,
    pub size: Option<String>,
    pub color: Option<String>,
    pub customization_type: Option<String>,
    pub customization_design_file: Option<String>,
    pub customization_notes: Option<String>,
    pub customization_cost: Option<BigDecimal>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = order_items)]
pub struct NewOrderItemRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: String,
    pub title: String,
    pub quantity: i32,
    pub unit_price: BigDecimal,
    pub size: Option<String>,
    pub color: Option<String>,
    pub customization_type: Option<String>,
    pub customization_design_file: Option<String>,
    pub customization_notes: Option<String>,
    pub customization_cost: Option<BigDecimal>,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = order_transactions)]
#[diesel(belongs_to(OrderRow, foreign_key = order_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TransactionRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub transaction_id: String,
    pub amount: BigDecimal,
    pub method: String,
    pub status: String,
    pub occurred_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = order_transactions)]
pub struct NewTransactionRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub transaction_id: String,
    pub amount: BigDecimal,
    pub method: String,
    pub status: String,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = customers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CustomerRow {
    pub id: Uuid,
    pub company_name: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub gstin: Option<String>,
    pub customer_type: String,
    pub billing_line1: String,
    pub billing_line2: Option<String>,
    pub billing_city: String,
    pub billing_state: String,
    pub billing_postal_code: String,
    pub billing_country: String,
    pub shipping_same_as_billing: bool,
    pub shipping_line1: Option<String>,
    pub shipping_line2: Option<String>,
    pub shipping_city: Option<String>,
    pub shipping_state: Option<String>,
    pub shipping_postal_code: Option<String>,
    pub shipping_country: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ── Row → domain conversions ─────────────────────────────────────────────────

fn parse_customization_kind(value: &str) -> Result<CustomizationKind, DomainError> {
    match value {
        "none" => Ok(CustomizationKind::None),
        "dtf" => Ok(CustomizationKind::Dtf),
        "custom" => Ok(CustomizationKind::Custom),
        other => Err(DomainError::Internal(format!(
            "unknown customization type: {}",
            other
        ))),
    }
}

pub fn customization_kind_str(kind: &CustomizationKind) -> &'static str {
    match kind {
        CustomizationKind::None => "none",
        CustomizationKind::Dtf => "dtf",
        CustomizationKind::Custom => "custom",
    }
}

impl OrderItemRow {
    pub fn into_domain(self) -> Result<OrderItem, DomainError> {
        let customization = match self.customization_type {
            Some(kind) => Some(Customization {
                kind: parse_customization_kind(&kind)?,
                design_file: self.customization_design_file,
                notes: self.customization_notes,
                additional_cost: self.customization_cost.unwrap_or_else(|| 0.into()),
            }),
            None => None,
        };
        Ok(OrderItem {
            product_id: self.product_id,
            title: self.title,
            quantity: self.quantity,
            unit_price: self.unit_price,
            size: self.size,
            color: self.color,
            customization,
        })
    }
}

impl TransactionRow {
    pub fn into_domain(self) -> Result<Transaction, DomainError> {
        Ok(Transaction {
            transaction_id: self.transaction_id,
            amount: self.amount,
            method: self.method.parse()?,
            status: self.status.parse()?,
            date: self.occurred_at,
        })
    }
}

/// Assemble a full domain order from its row plus pre-loaded child rows.
pub fn assemble_order(
    row: OrderRow,
    item_rows: Vec<OrderItemRow>,
    transaction_rows: Vec<TransactionRow>,
) -> Result<Order, DomainError> {
    let items = item_rows
        .into_iter()
        .map(OrderItemRow::into_domain)
        .collect::<Result<Vec<_>, _>>()?;
    let transactions = transaction_rows
        .into_iter()
        .map(TransactionRow::into_domain)
        .collect::<Result<Vec<_>, _>>()?;

    let address = match (row.shipping_line1, row.shipping_city) {
        (Some(line1), Some(city)) => Some(Address {
            line1,
            line2: row.shipping_line2,
            city,
            state: row.shipping_state.unwrap_or_default(),
            postal_code: row.shipping_postal_code.unwrap_or_default(),
            country: row.shipping_country.unwrap_or_default(),
        }),
        _ => None,
    };

    Ok(Order {
        id: row.id,
        order_number: row.order_number,
        customer_id: row.customer_id,
        items,
        subtotal: row.subtotal,
        tax: row.tax,
        shipping: row.shipping,
        discount: row.discount,
        total: row.total,
        status: row.status.parse()?,
        payment_method: row
            .payment_method
            .as_deref()
            .map(|m| m.parse())
            .transpose()?,
        payment_status: row.payment_status.parse()?,
        payment_terms: row.payment_terms.parse()?,
        transactions,
        shipping_details: ShippingDetails {
            address,
            tracking_number: row.tracking_number,
            carrier: row.carrier,
            estimated_delivery: row.estimated_delivery,
            logistics_order_id: row.logistics_order_id,
        },
        notes: row.notes,
        customer_notes: row.customer_notes,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

impl CustomerRow {
    pub fn into_domain(self) -> Result<Customer, DomainError> {
        let customer_type = match self.customer_type.as_str() {
            "retail" => CustomerType::Retail,
            "wholesale" => CustomerType::Wholesale,
            other => {
                return Err(DomainError::Internal(format!(
                    "unknown customer type: {}",
                    other
                )))
            }
        };
        let shipping_address = if self.shipping_same_as_billing {
            ShippingAddress::SameAsBilling
        } else {
            match (self.shipping_line1, self.shipping_city) {
                (Some(line1), Some(city)) => ShippingAddress::Separate(Address {
                    line1,
                    line2: self.shipping_line2,
                    city,
                    state: self.shipping_state.unwrap_or_default(),
                    postal_code: self.shipping_postal_code.unwrap_or_default(),
                    country: self.shipping_country.unwrap_or_default(),
                }),
                _ => {
                    return Err(DomainError::Internal(format!(
                        "customer {} has a separate shipping address with missing fields",
                        self.id
                    )))
                }
            }
        };
        Ok(Customer {
            id: self.id,
            company_name: self.company_name,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            phone: self.phone,
            gstin: self.gstin,
            customer_type,
            billing_address: Address {
                line1: self.billing_line1,
                line2: self.billing_line2,
                city: self.billing_city,
                state: self.billing_state,
                postal_code: self.billing_postal_code,
                country: self.billing_country,
            },
            shipping_address,
        })
    }
}
