//! Checkout initiation: turn validated cart items into a hosted-checkout
//! session request and hand it to the payment gateway.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::checkout::{CheckoutSession, CheckoutSessionRequest, SessionLineItem};
use crate::domain::errors::DomainError;
use crate::domain::money::to_minor_units;
use crate::domain::ports::PaymentGateway;

#[derive(Debug, Clone)]
pub struct CheckoutItemInput {
    pub price: f64,
    pub quantity: u32,
    pub title: String,
    pub size: String,
    pub color: String,
    pub product_id: String,
}

#[derive(Debug, Clone)]
pub struct CheckoutInput {
    pub items: Vec<CheckoutItemInput>,
    pub customer_id: String,
    pub customer_email: Option<String>,
    pub metadata: BTreeMap<String, String>,
}

#[derive(Clone)]
pub struct CheckoutService {
    gateway: Arc<dyn PaymentGateway>,
    public_url: String,
}

impl CheckoutService {
    pub fn new(gateway: Arc<dyn PaymentGateway>, public_url: String) -> Self {
        Self {
            gateway,
            public_url,
        }
    }

    /// One price line per cart item; amounts converted to minor units.
    fn build_line_items(items: &[CheckoutItemInput]) -> Vec<SessionLineItem> {
        items
            .iter()
            .map(|item| SessionLineItem {
                name: item.title.clone(),
                description: format!("{} {}", item.size, item.color).trim().to_string(),
                product_id: item.product_id.clone(),
                unit_amount: to_minor_units(item.price),
                quantity: item.quantity,
            })
            .collect()
    }

    /// Create a hosted checkout session. The success URL carries the
    /// provider's session-id placeholder; the metadata bag always includes
    /// the customer id. No retry on gateway failure; the browser simply
    /// re-initiates checkout.
    pub async fn create_session(
        &self,
        input: CheckoutInput,
    ) -> Result<CheckoutSession, DomainError> {
        if input.items.is_empty() {
            return Err(DomainError::InvalidInput("No items provided".to_string()));
        }

        let line_items = Self::build_line_items(&input.items);
        let mut metadata = input.metadata;
        metadata.insert("customerId".to_string(), input.customer_id);

        let request = CheckoutSessionRequest {
            line_items,
            customer_email: input.customer_email,
            metadata,
            success_url: format!(
                "{}/checkout/success?session_id={{CHECKOUT_SESSION_ID}}",
                self.public_url
            ),
            cancel_url: format!("{}/checkout/cancel", self.public_url),
        };

        self.gateway.create_checkout_session(request).await
    }
}
