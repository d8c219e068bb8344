//! Request/response shapes for the hosted-checkout gateway port.

use std::collections::BTreeMap;

/// One price line of a checkout session. `unit_amount` is already in the
/// provider's minor units and never negative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionLineItem {
    pub name: String,
    pub description: String,
    pub product_id: String,
    pub unit_amount: i64,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSessionRequest {
    pub line_items: Vec<SessionLineItem>,
    pub customer_email: Option<String>,
    pub metadata: BTreeMap<String, String>,
    pub success_url: String,
    pub cancel_url: String,
}

/// The provider's handle on a created session: its id plus the hosted
/// payment page the browser is redirected to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSession {
    pub id: String,
    pub url: String,
}
