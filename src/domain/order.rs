//! The durable order entity and its satellite types.
//!
//! An order is created exactly once by the webhook processor when a checkout
//! completes, and afterwards mutated only by the shipping dispatcher or an
//! administrative update.

use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::cart::Customization;
use super::customer::Address;
use super::errors::DomainError;

macro_rules! string_enum {
    ($name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    other => Err(DomainError::Internal(format!(
                        concat!("unknown ", stringify!($name), " value: {}"),
                        other
                    ))),
                }
            }
        }
    };
}

string_enum!(OrderStatus {
    Pending => "pending",
    Processing => "processing",
    PartiallyPaid => "partially_paid",
    Paid => "paid",
    Shipped => "shipped",
    Delivered => "delivered",
    Cancelled => "cancelled",
    Refunded => "refunded",
});

string_enum!(PaymentStatus {
    Pending => "pending",
    PartiallyPaid => "partially_paid",
    Paid => "paid",
    Failed => "failed",
    Refunded => "refunded",
});

string_enum!(PaymentMethod {
    Razorpay => "razorpay",
    BankTransfer => "bank_transfer",
    Cod => "cod",
});

string_enum!(PaymentTerms {
    FullUpfront => "full_upfront",
    SplitPayment => "split_payment",
});

string_enum!(TransactionStatus {
    Success => "success",
    Failed => "failed",
    Pending => "pending",
});

#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem {
    pub product_id: String,
    pub title: String,
    pub quantity: i32,
    pub unit_price: BigDecimal,
    pub size: Option<String>,
    pub color: Option<String>,
    pub customization: Option<Customization>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub transaction_id: String,
    pub amount: BigDecimal,
    pub method: PaymentMethod,
    pub status: TransactionStatus,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ShippingDetails {
    pub address: Option<Address>,
    pub tracking_number: Option<String>,
    pub carrier: Option<String>,
    pub estimated_delivery: Option<DateTime<Utc>>,
    pub logistics_order_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: Uuid,
    pub order_number: String,
    pub customer_id: Uuid,
    pub items: Vec<OrderItem>,
    pub subtotal: BigDecimal,
    pub tax: BigDecimal,
    pub shipping: BigDecimal,
    pub discount: BigDecimal,
    pub total: BigDecimal,
    pub status: OrderStatus,
    pub payment_method: Option<PaymentMethod>,
    pub payment_status: PaymentStatus,
    pub payment_terms: PaymentTerms,
    pub transactions: Vec<Transaction>,
    pub shipping_details: ShippingDetails,
    pub notes: Option<String>,
    pub customer_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input to `OrderStore::insert`. When `order_number` is `None` the store
/// generates one; a supplied number is used verbatim.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub order_number: Option<String>,
    pub customer_id: Uuid,
    pub items: Vec<OrderItem>,
    pub subtotal: BigDecimal,
    pub tax: BigDecimal,
    pub shipping: BigDecimal,
    pub discount: BigDecimal,
    pub total: BigDecimal,
    pub status: OrderStatus,
    pub payment_method: Option<PaymentMethod>,
    pub payment_status: PaymentStatus,
    pub payment_terms: PaymentTerms,
    pub transactions: Vec<Transaction>,
    pub shipping_details: ShippingDetails,
    pub notes: Option<String>,
    pub customer_notes: Option<String>,
}

/// Tracking fields merged onto an order once a shipment is booked. Fields
/// not covered here keep their existing values.
#[derive(Debug, Clone)]
pub struct TrackingUpdate {
    pub logistics_order_id: String,
    pub tracking_number: String,
    pub carrier: Option<String>,
}

/// Administrative mutation: item backfill, status corrections, notes. Only
/// `Some` fields are applied.
#[derive(Debug, Clone, Default)]
pub struct AdminOrderUpdate {
    pub items: Option<Vec<OrderItem>>,
    pub status: Option<OrderStatus>,
    pub notes: Option<String>,
    pub customer_notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct OrderPage {
    pub items: Vec<Order>,
    pub total: i64,
}

/// Generate an order number of the form `PREFIX-YYYYMMDD-NNNNNN`, where the
/// suffix is the last six digits of the epoch-millisecond timestamp.
pub fn generate_order_number(prefix: &str, now: DateTime<Utc>) -> String {
    let millis = now.timestamp_millis().to_string();
    let suffix = &millis[millis.len().saturating_sub(6)..];
    format!("{}-{}-{}", prefix, now.format("%Y%m%d"), suffix)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn order_number_has_prefix_date_and_six_digit_suffix() {
        let now = Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap();
        let number = generate_order_number("MT", now);

        let parts: Vec<&str> = number.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "MT");
        assert_eq!(parts[1], "20250314");
        assert_eq!(parts[2].len(), 6);
        assert!(parts[2].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn order_number_suffix_comes_from_epoch_millis() {
        let now = Utc.timestamp_millis_opt(1_741_000_123_456).unwrap();
        let number = generate_order_number("MT", now);
        assert!(number.ends_with("123456"));
    }

    #[test]
    fn status_round_trips_through_text() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Processing,
            OrderStatus::PartiallyPaid,
            OrderStatus::Paid,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
            OrderStatus::Refunded,
        ] {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }
    }

    #[test]
    fn unknown_status_text_is_rejected() {
        assert!("lost_in_transit".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn payment_enums_round_trip_through_text() {
        assert_eq!("razorpay".parse::<PaymentMethod>().unwrap(), PaymentMethod::Razorpay);
        assert_eq!("bank_transfer".parse::<PaymentMethod>().unwrap(), PaymentMethod::BankTransfer);
        assert_eq!("full_upfront".parse::<PaymentTerms>().unwrap(), PaymentTerms::FullUpfront);
        assert_eq!("success".parse::<TransactionStatus>().unwrap(), TransactionStatus::Success);
        assert_eq!("paid".parse::<PaymentStatus>().unwrap(), PaymentStatus::Paid);
    }
}
