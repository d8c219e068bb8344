//! Payment-provider webhook events after signature verification and parsing.

/// A verified webhook delivery, reduced to the cases this service reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum WebhookEvent {
    CheckoutSessionCompleted(CompletedSession),
    PaymentIntentFailed { payment_intent_id: String },
    Other { kind: String },
}

/// The slice of a completed checkout session the order record is built from.
/// All amounts are provider minor units; absent amounts are treated as zero.
/// The session payload carries no cart contents, so order items must be
/// backfilled administratively.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompletedSession {
    pub session_id: String,
    pub payment_intent: Option<String>,
    pub customer_id: Option<String>,
    pub amount_subtotal: Option<i64>,
    pub amount_total: Option<i64>,
    pub amount_tax: Option<i64>,
    pub amount_shipping: Option<i64>,
    pub amount_discount: Option<i64>,
}
