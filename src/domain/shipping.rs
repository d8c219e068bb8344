//! Logistics-provider payload shapes and the mapping from an order plus its
//! customer onto the provider's adhoc-order request.

use bigdecimal::{BigDecimal, ToPrimitive};
use serde::Serialize;

use super::customer::Customer;
use super::order::Order;

/// HSN classification for printed apparel, fixed for every line.
const APPAREL_HSN_CODE: u32 = 6109;

/// Placeholder parcel dimensions (cm) and weight (kg); not derived from the
/// actual items.
const PACKAGE_LENGTH_CM: f64 = 10.0;
const PACKAGE_BREADTH_CM: f64 = 10.0;
const PACKAGE_HEIGHT_CM: f64 = 5.0;
const PACKAGE_WEIGHT_KG: f64 = 0.5;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LogisticsOrderItem {
    pub name: String,
    pub sku: String,
    pub units: i32,
    pub selling_price: f64,
    pub discount: f64,
    pub tax: f64,
    pub hsn: u32,
}

/// The provider infers billing = shipping from `shipping_is_billing`; when it
/// is set, every `shipping_*` field must be absent from the JSON body, not
/// null.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LogisticsOrderRequest {
    pub order_id: String,
    pub order_date: String,
    pub pickup_location: String,
    pub channel_id: String,
    pub comment: String,
    pub billing_customer_name: String,
    pub billing_last_name: String,
    pub billing_address: String,
    pub billing_address_2: String,
    pub billing_city: String,
    pub billing_pincode: String,
    pub billing_state: String,
    pub billing_country: String,
    pub billing_email: String,
    pub billing_phone: String,
    pub shipping_is_billing: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_address_2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_pincode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_phone: Option<String>,
    pub order_items: Vec<LogisticsOrderItem>,
    pub payment_method: String,
    pub shipping_charges: f64,
    pub giftwrap_charges: f64,
    pub transaction_charges: f64,
    pub total_discount: f64,
    pub sub_total: f64,
    pub length: f64,
    pub breadth: f64,
    pub height: f64,
    pub weight: f64,
}

impl LogisticsOrderRequest {
    /// Map an order and its customer onto the provider payload. Only prepaid
    /// shipments go through this path; cash-on-delivery is out of scope.
    pub fn from_order(order: &Order, customer: &Customer) -> Self {
        let billing = &customer.billing_address;
        let ships_to_billing = customer.ships_to_billing();
        let shipping = customer.effective_shipping_address();

        let order_items = order
            .items
            .iter()
            .map(|item| LogisticsOrderItem {
                name: item.title.clone(),
                sku: item.product_id.clone(),
                units: item.quantity,
                selling_price: as_f64(&item.unit_price),
                discount: 0.0,
                tax: 0.0,
                hsn: APPAREL_HSN_CODE,
            })
            .collect();

        let only_when_separate =
            |value: &str| (!ships_to_billing).then(|| value.to_string());

        Self {
            order_id: order.order_number.clone(),
            order_date: order.created_at.format("%Y-%m-%d").to_string(),
            pickup_location: "Primary".to_string(),
            channel_id: String::new(),
            comment: order.customer_notes.clone().unwrap_or_default(),
            billing_customer_name: customer.first_name.clone(),
            billing_last_name: customer.last_name.clone(),
            billing_address: billing.line1.clone(),
            billing_address_2: billing.line2.clone().unwrap_or_default(),
            billing_city: billing.city.clone(),
            billing_pincode: billing.postal_code.clone(),
            billing_state: billing.state.clone(),
            billing_country: billing.country.clone(),
            billing_email: customer.email.clone(),
            billing_phone: customer.phone.clone(),
            shipping_is_billing: ships_to_billing,
            shipping_customer_name: only_when_separate(&customer.first_name),
            shipping_last_name: only_when_separate(&customer.last_name),
            shipping_address: only_when_separate(&shipping.line1),
            shipping_address_2: only_when_separate(
                shipping.line2.as_deref().unwrap_or(""),
            ),
            shipping_city: only_when_separate(&shipping.city),
            shipping_pincode: only_when_separate(&shipping.postal_code),
            shipping_state: only_when_separate(&shipping.state),
            shipping_country: only_when_separate(&shipping.country),
            shipping_email: only_when_separate(&customer.email),
            shipping_phone: only_when_separate(&customer.phone),
            order_items,
            payment_method: "prepaid".to_string(),
            shipping_charges: as_f64(&order.shipping),
            giftwrap_charges: 0.0,
            transaction_charges: 0.0,
            total_discount: as_f64(&order.discount),
            sub_total: as_f64(&order.subtotal),
            length: PACKAGE_LENGTH_CM,
            breadth: PACKAGE_BREADTH_CM,
            height: PACKAGE_HEIGHT_CM,
            weight: PACKAGE_WEIGHT_KG,
        }
    }
}

fn as_f64(amount: &BigDecimal) -> f64 {
    amount.to_f64().unwrap_or(0.0)
}

/// The provider's handle on a freshly created remote order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogisticsOrder {
    pub order_id: String,
    pub shipment_id: String,
    pub courier_id: Option<String>,
    pub courier_name: Option<String>,
}

/// Result of AWB (air-waybill) assignment: the tracking number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwbAssignment {
    pub awb_code: String,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    use super::*;
    use crate::domain::customer::{Address, CustomerType, ShippingAddress};
    use crate::domain::order::{
        OrderItem, OrderStatus, PaymentStatus, PaymentTerms, ShippingDetails,
    };

    fn decimal(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).expect("valid decimal")
    }

    fn sample_customer(shipping: ShippingAddress) -> Customer {
        Customer {
            id: Uuid::new_v4(),
            company_name: "Acme Prints".to_string(),
            email: "asha@acme.example".to_string(),
            first_name: "Asha".to_string(),
            last_name: "Rao".to_string(),
            phone: "+919800000000".to_string(),
            gstin: None,
            customer_type: CustomerType::Retail,
            billing_address: Address {
                line1: "12 MG Road".to_string(),
                line2: Some("2nd Floor".to_string()),
                city: "Bengaluru".to_string(),
                state: "Karnataka".to_string(),
                postal_code: "560001".to_string(),
                country: "India".to_string(),
            },
            shipping_address: shipping,
        }
    }

    fn sample_order(customer_id: Uuid) -> Order {
        let created_at = Utc.with_ymd_and_hms(2025, 3, 14, 9, 0, 0).unwrap();
        Order {
            id: Uuid::new_v4(),
            order_number: "MT-20250314-123456".to_string(),
            customer_id,
            items: vec![OrderItem {
                product_id: "prod-42".to_string(),
                title: "Crew Neck Tee".to_string(),
                quantity: 3,
                unit_price: decimal("250.00"),
                size: Some("M".to_string()),
                color: Some("black".to_string()),
                customization: None,
            }],
            subtotal: decimal("750.00"),
            tax: decimal("135.00"),
            shipping: decimal("60.00"),
            discount: decimal("0"),
            total: decimal("945.00"),
            status: OrderStatus::Processing,
            payment_method: None,
            payment_status: PaymentStatus::Paid,
            payment_terms: PaymentTerms::FullUpfront,
            transactions: vec![],
            shipping_details: ShippingDetails::default(),
            notes: None,
            customer_notes: Some("leave at reception".to_string()),
            created_at,
            updated_at: created_at,
        }
    }

    #[test]
    fn same_as_billing_omits_all_shipping_fields() {
        let customer = sample_customer(ShippingAddress::SameAsBilling);
        let order = sample_order(customer.id);

        let request = LogisticsOrderRequest::from_order(&order, &customer);
        let json = serde_json::to_value(&request).expect("serializable");
        let object = json.as_object().expect("json object");

        assert_eq!(object["shipping_is_billing"], serde_json::json!(true));
        for key in object.keys() {
            assert!(
                key == "shipping_is_billing"
                    || key == "shipping_charges"
                    || !key.starts_with("shipping_"),
                "unexpected shipping field in payload: {}",
                key
            );
        }
    }

    #[test]
    fn separate_address_fills_shipping_fields() {
        let customer = sample_customer(ShippingAddress::Separate(Address {
            line1: "Plot 4, Industrial Area".to_string(),
            line2: None,
            city: "Pune".to_string(),
            state: "Maharashtra".to_string(),
            postal_code: "411001".to_string(),
            country: "India".to_string(),
        }));
        let order = sample_order(customer.id);

        let request = LogisticsOrderRequest::from_order(&order, &customer);

        assert!(!request.shipping_is_billing);
        assert_eq!(request.shipping_address.as_deref(), Some("Plot 4, Industrial Area"));
        assert_eq!(request.shipping_city.as_deref(), Some("Pune"));
        assert_eq!(request.shipping_pincode.as_deref(), Some("411001"));
        assert_eq!(request.shipping_email.as_deref(), Some("asha@acme.example"));
    }

    #[test]
    fn items_map_with_fixed_hsn_and_zero_tax() {
        let customer = sample_customer(ShippingAddress::SameAsBilling);
        let order = sample_order(customer.id);

        let request = LogisticsOrderRequest::from_order(&order, &customer);

        assert_eq!(request.order_items.len(), 1);
        let item = &request.order_items[0];
        assert_eq!(item.sku, "prod-42");
        assert_eq!(item.units, 3);
        assert_eq!(item.selling_price, 250.0);
        assert_eq!(item.tax, 0.0);
        assert_eq!(item.discount, 0.0);
        assert_eq!(item.hsn, 6109);
    }

    #[test]
    fn fixed_package_dimensions_and_prepaid_method() {
        let customer = sample_customer(ShippingAddress::SameAsBilling);
        let order = sample_order(customer.id);

        let request = LogisticsOrderRequest::from_order(&order, &customer);

        assert_eq!(request.payment_method, "prepaid");
        assert_eq!((request.length, request.breadth, request.height), (10.0, 10.0, 5.0));
        assert_eq!(request.weight, 0.5);
        assert_eq!(request.order_id, "MT-20250314-123456");
        assert_eq!(request.order_date, "2025-03-14");
        assert_eq!(request.comment, "leave at reception");
    }
}
