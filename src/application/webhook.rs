//! Webhook event processing. Signature verification happens at the HTTP
//! boundary; by the time an event reaches this processor it is authentic.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::errors::DomainError;
use crate::domain::events::{CompletedSession, WebhookEvent};
use crate::domain::money::from_minor_units;
use crate::domain::order::{
    NewOrder, OrderStatus, PaymentMethod, PaymentStatus, PaymentTerms, ShippingDetails,
    Transaction, TransactionStatus,
};
use crate::domain::ports::OrderStore;

/// What a delivery amounted to. The HTTP handler acknowledges with 200 in
/// every case; the distinction is for logging and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// A new order was created; carries its order number.
    OrderCreated(String),
    /// The payment intent already has an order; redelivery was a no-op.
    Duplicate(String),
    /// Logged and ignored.
    Ignored,
}

#[derive(Clone)]
pub struct WebhookProcessor {
    orders: Arc<dyn OrderStore>,
}

impl WebhookProcessor {
    pub fn new(orders: Arc<dyn OrderStore>) -> Self {
        Self { orders }
    }

    pub async fn process(&self, event: WebhookEvent) -> Result<WebhookOutcome, DomainError> {
        match event {
            WebhookEvent::CheckoutSessionCompleted(session) => {
                self.handle_completed_session(session).await
            }
            WebhookEvent::PaymentIntentFailed { payment_intent_id } => {
                // Observability only: no order mutation, no customer
                // notification from this path.
                log::warn!("payment failed: {}", payment_intent_id);
                Ok(WebhookOutcome::Ignored)
            }
            WebhookEvent::Other { kind } => {
                log::info!("unhandled event type: {}", kind);
                Ok(WebhookOutcome::Ignored)
            }
        }
    }

    /// Create the durable order for a completed checkout. Creation is keyed
    /// on the payment-intent id so a redelivered event cannot produce a
    /// second order.
    async fn handle_completed_session(
        &self,
        session: CompletedSession,
    ) -> Result<WebhookOutcome, DomainError> {
        let payment_intent = session.payment_intent.clone().ok_or_else(|| {
            DomainError::InvalidInput(
                "completed session carries no payment intent".to_string(),
            )
        })?;

        if let Some(existing) = self.orders.find_by_transaction(&payment_intent).await? {
            log::info!(
                "checkout session {} redelivered; order {} already exists for {}",
                session.session_id,
                existing.order_number,
                payment_intent
            );
            return Ok(WebhookOutcome::Duplicate(existing.order_number));
        }

        let customer_id = session
            .customer_id
            .as_deref()
            .unwrap_or_default()
            .parse()
            .map_err(|_| {
                DomainError::InvalidInput(
                    "session metadata carries no usable customerId".to_string(),
                )
            })?;

        let total = from_minor_units(session.amount_total.unwrap_or(0));
        let now = Utc::now();

        let order = self
            .orders
            .insert(NewOrder {
                order_number: None,
                customer_id,
                // The event payload carries no cart contents; items are
                // backfilled via administrative update.
                items: vec![],
                subtotal: from_minor_units(session.amount_subtotal.unwrap_or(0)),
                tax: from_minor_units(session.amount_tax.unwrap_or(0)),
                shipping: from_minor_units(session.amount_shipping.unwrap_or(0)),
                discount: from_minor_units(session.amount_discount.unwrap_or(0)),
                total: total.clone(),
                status: OrderStatus::Processing,
                payment_method: Some(PaymentMethod::Razorpay),
                payment_status: PaymentStatus::Paid,
                payment_terms: PaymentTerms::FullUpfront,
                transactions: vec![Transaction {
                    transaction_id: payment_intent,
                    amount: total,
                    method: PaymentMethod::Razorpay,
                    status: TransactionStatus::Success,
                    date: now,
                }],
                shipping_details: ShippingDetails::default(),
                notes: None,
                customer_notes: None,
            })
            .await?;

        log::info!(
            "created order {} from checkout session {}",
            order.order_number,
            session.session_id
        );
        Ok(WebhookOutcome::OrderCreated(order.order_number))
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use bigdecimal::BigDecimal;
    use uuid::Uuid;

    use super::*;
    use crate::domain::order::{
        generate_order_number, AdminOrderUpdate, Order, OrderPage, TrackingUpdate,
    };

    /// Minimal in-memory order store covering what the processor touches.
    #[derive(Default)]
    struct InMemoryOrders {
        orders: Mutex<Vec<Order>>,
    }

    #[async_trait]
    impl OrderStore for InMemoryOrders {
        async fn insert(&self, order: NewOrder) -> Result<Order, DomainError> {
            let now = Utc::now();
            let stored = Order {
                id: Uuid::new_v4(),
                order_number: order
                    .order_number
                    .unwrap_or_else(|| generate_order_number("MT", now)),
                customer_id: order.customer_id,
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
                created_at: now,
                updated_at: now,
            };
            self.orders.lock().unwrap().push(stored.clone());
            Ok(stored)
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, DomainError> {
            Ok(self.orders.lock().unwrap().iter().find(|o| o.id == id).cloned())
        }

        async fn find_by_transaction(
            &self,
            transaction_id: &str,
        ) -> Result<Option<Order>, DomainError> {
            Ok(self
                .orders
                .lock()
                .unwrap()
                .iter()
                .find(|o| o.transactions.iter().any(|t| t.transaction_id == transaction_id))
                .cloned())
        }

        async fn list(&self, _page: i64, _limit: i64) -> Result<OrderPage, DomainError> {
            let orders = self.orders.lock().unwrap();
            Ok(OrderPage {
                items: orders.clone(),
                total: orders.len() as i64,
            })
        }

        async fn mark_shipped(
            &self,
            _id: Uuid,
            _update: TrackingUpdate,
        ) -> Result<(), DomainError> {
            unimplemented!("not used by the webhook processor")
        }

        async fn apply_admin_update(
            &self,
            _id: Uuid,
            _update: AdminOrderUpdate,
        ) -> Result<Order, DomainError> {
            unimplemented!("not used by the webhook processor")
        }
    }

    fn completed_session(payment_intent: &str, customer_id: Uuid) -> CompletedSession {
        CompletedSession {
            session_id: "cs_test_123".to_string(),
            payment_intent: Some(payment_intent.to_string()),
            customer_id: Some(customer_id.to_string()),
            amount_subtotal: Some(10000),
            amount_total: Some(11800),
            amount_tax: Some(1800),
            amount_shipping: Some(0),
            amount_discount: Some(0),
        }
    }

    fn decimal(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).expect("valid decimal")
    }

    #[tokio::test]
    async fn completed_session_creates_a_processing_paid_order() {
        let store = Arc::new(InMemoryOrders::default());
        let processor = WebhookProcessor::new(store.clone());
        let customer_id = Uuid::new_v4();

        let outcome = processor
            .process(WebhookEvent::CheckoutSessionCompleted(completed_session(
                "pi_123",
                customer_id,
            )))
            .await
            .expect("processed");

        assert!(matches!(outcome, WebhookOutcome::OrderCreated(_)));
        let orders = store.orders.lock().unwrap();
        assert_eq!(orders.len(), 1);
        let order = &orders[0];
        assert_eq!(order.customer_id, customer_id);
        assert_eq!(order.total, decimal("118.00"));
        assert_eq!(order.tax, decimal("18.00"));
        assert_eq!(order.subtotal, decimal("100.00"));
        assert_eq!(order.status, OrderStatus::Processing);
        assert_eq!(order.payment_status, PaymentStatus::Paid);
        assert_eq!(order.payment_terms, PaymentTerms::FullUpfront);
        assert!(order.items.is_empty());
        assert_eq!(order.transactions.len(), 1);
        assert_eq!(order.transactions[0].transaction_id, "pi_123");
        assert_eq!(order.transactions[0].amount, decimal("118.00"));
        assert_eq!(order.transactions[0].status, TransactionStatus::Success);
    }

    #[tokio::test]
    async fn absent_amounts_default_to_zero() {
        let store = Arc::new(InMemoryOrders::default());
        let processor = WebhookProcessor::new(store.clone());

        let session = CompletedSession {
            session_id: "cs_sparse".to_string(),
            payment_intent: Some("pi_sparse".to_string()),
            customer_id: Some(Uuid::new_v4().to_string()),
            ..Default::default()
        };
        processor
            .process(WebhookEvent::CheckoutSessionCompleted(session))
            .await
            .expect("processed");

        let orders = store.orders.lock().unwrap();
        assert_eq!(orders[0].total, decimal("0.00"));
        assert_eq!(orders[0].subtotal, decimal("0.00"));
    }

    #[tokio::test]
    async fn redelivery_does_not_create_a_second_order() {
        let store = Arc::new(InMemoryOrders::default());
        let processor = WebhookProcessor::new(store.clone());
        let customer_id = Uuid::new_v4();

        let first = processor
            .process(WebhookEvent::CheckoutSessionCompleted(completed_session(
                "pi_dup",
                customer_id,
            )))
            .await
            .expect("processed");
        let WebhookOutcome::OrderCreated(order_number) = first else {
            panic!("first delivery should create the order");
        };

        let second = processor
            .process(WebhookEvent::CheckoutSessionCompleted(completed_session(
                "pi_dup",
                customer_id,
            )))
            .await
            .expect("processed");

        assert_eq!(second, WebhookOutcome::Duplicate(order_number));
        assert_eq!(store.orders.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn failed_payment_is_acknowledged_without_mutation() {
        let store = Arc::new(InMemoryOrders::default());
        let processor = WebhookProcessor::new(store.clone());

        let outcome = processor
            .process(WebhookEvent::PaymentIntentFailed {
                payment_intent_id: "pi_failed".to_string(),
            })
            .await
            .expect("processed");

        assert_eq!(outcome, WebhookOutcome::Ignored);
        assert!(store.orders.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_event_kinds_are_ignored() {
        let store = Arc::new(InMemoryOrders::default());
        let processor = WebhookProcessor::new(store.clone());

        let outcome = processor
            .process(WebhookEvent::Other {
                kind: "invoice.created".to_string(),
            })
            .await
            .expect("processed");

        assert_eq!(outcome, WebhookOutcome::Ignored);
        assert!(store.orders.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn session_without_payment_intent_is_rejected() {
        let store = Arc::new(InMemoryOrders::default());
        let processor = WebhookProcessor::new(store.clone());

        let mut session = completed_session("pi_x", Uuid::new_v4());
        session.payment_intent = None;
        let err = processor
            .process(WebhookEvent::CheckoutSessionCompleted(session))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::InvalidInput(_)));
        assert!(store.orders.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn session_without_customer_id_is_rejected() {
        let store = Arc::new(InMemoryOrders::default());
        let processor = WebhookProcessor::new(store.clone());

        let mut session = completed_session("pi_y", Uuid::new_v4());
        session.customer_id = None;
        let err = processor
            .process(WebhookEvent::CheckoutSessionCompleted(session))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::InvalidInput(_)));
        assert!(store.orders.lock().unwrap().is_empty());
    }
}
