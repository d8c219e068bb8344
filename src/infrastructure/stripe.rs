//! Stripe integration: hosted-checkout session creation over the REST API
//! and webhook signature verification / event parsing.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use thiserror::Error;

use crate::domain::checkout::{CheckoutSession, CheckoutSessionRequest};
use crate::domain::errors::DomainError;
use crate::domain::events::{CompletedSession, WebhookEvent};
use crate::domain::ports::PaymentGateway;

pub const DEFAULT_API_BASE: &str = "https://api.stripe.com/v1";

/// Webhook deliveries older than this (per the signed timestamp) are
/// rejected to limit replay.
pub const SIGNATURE_TOLERANCE_SECS: i64 = 300;

type HmacSha256 = Hmac<Sha256>;

// ── Checkout session client ──────────────────────────────────────────────────

pub struct StripeClient {
    http: reqwest::Client,
    base_url: String,
    secret_key: String,
}

impl StripeClient {
    pub fn new(secret_key: String) -> Self {
        Self::with_base_url(secret_key, DEFAULT_API_BASE.to_string())
    }

    pub fn with_base_url(secret_key: String, base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            secret_key,
        }
    }
}

/// Flatten a session request into Stripe's bracketed form encoding.
fn session_form(request: &CheckoutSessionRequest) -> Vec<(String, String)> {
    let mut form = vec![
        ("mode".to_string(), "payment".to_string()),
        ("payment_method_types[0]".to_string(), "card".to_string()),
        ("success_url".to_string(), request.success_url.clone()),
        ("cancel_url".to_string(), request.cancel_url.clone()),
    ];
    if let Some(email) = &request.customer_email {
        form.push(("customer_email".to_string(), email.clone()));
    }
    for (i, item) in request.line_items.iter().enumerate() {
        form.push((
            format!("line_items[{i}][price_data][currency]"),
            "inr".to_string(),
        ));
        form.push((
            format!("line_items[{i}][price_data][product_data][name]"),
            item.name.clone(),
        ));
        if !item.description.is_empty() {
            form.push((
                format!("line_items[{i}][price_data][product_data][description]"),
                item.description.clone(),
            ));
        }
        form.push((
            format!("line_items[{i}][price_data][product_data][metadata][productId]"),
            item.product_id.clone(),
        ));
        form.push((
            format!("line_items[{i}][price_data][unit_amount]"),
            item.unit_amount.to_string(),
        ));
        form.push((format!("line_items[{i}][quantity]"), item.quantity.to_string()));
    }
    for (key, value) in &request.metadata {
        form.push((format!("metadata[{key}]"), value.clone()));
    }
    form
}

#[async_trait]
impl PaymentGateway for StripeClient {
    async fn create_checkout_session(
        &self,
        request: CheckoutSessionRequest,
    ) -> Result<CheckoutSession, DomainError> {
        #[derive(Deserialize)]
        struct SessionResponse {
            id: String,
            url: Option<String>,
        }

        let response = self
            .http
            .post(format!("{}/checkout/sessions", self.base_url))
            .bearer_auth(&self.secret_key)
            .form(&session_form(&request))
            .send()
            .await
            .map_err(|e| DomainError::Provider(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::Provider(format!(
                "checkout session creation failed ({status}): {body}"
            )));
        }

        let session: SessionResponse = response
            .json()
            .await
            .map_err(|e| DomainError::Provider(e.to_string()))?;

        Ok(CheckoutSession {
            id: session.id,
            url: session.url.unwrap_or_default(),
        })
    }
}

// ── Webhook verification and parsing ─────────────────────────────────────────

#[derive(Debug, Error)]
pub enum WebhookParseError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("malformed event payload: {0}")]
    Malformed(String),
}

/// Verify the `stripe-signature` header against the raw body and parse the
/// event. Fails closed: nothing is parsed unless the signature checks out.
pub fn construct_event(
    payload: &[u8],
    signature_header: &str,
    secret: &str,
) -> Result<WebhookEvent, WebhookParseError> {
    verify_signature(payload, signature_header, secret, Utc::now().timestamp())?;
    parse_event(payload)
}

/// The header carries `t=<unix>,v1=<hex hmac>[,v1=…]`; the signed message is
/// `"{t}.{body}"` keyed with the endpoint secret. Comparison is constant
/// time via `Mac::verify_slice`.
pub(crate) fn verify_signature(
    payload: &[u8],
    signature_header: &str,
    secret: &str,
    now_unix: i64,
) -> Result<(), WebhookParseError> {
    let mut timestamp: Option<i64> = None;
    let mut candidates: Vec<&str> = Vec::new();
    for part in signature_header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => timestamp = value.parse().ok(),
            Some(("v1", value)) => candidates.push(value),
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or(WebhookParseError::InvalidSignature)?;
    if candidates.is_empty() {
        return Err(WebhookParseError::InvalidSignature);
    }
    if (now_unix - timestamp).abs() > SIGNATURE_TOLERANCE_SECS {
        return Err(WebhookParseError::InvalidSignature);
    }

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| WebhookParseError::InvalidSignature)?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);

    for candidate in candidates {
        let Ok(bytes) = hex::decode(candidate) else {
            continue;
        };
        if mac.clone().verify_slice(&bytes).is_ok() {
            return Ok(());
        }
    }
    Err(WebhookParseError::InvalidSignature)
}

#[derive(Debug, Deserialize)]
struct WireEvent {
    #[serde(rename = "type")]
    kind: String,
    data: WireData,
}

#[derive(Debug, Deserialize)]
struct WireData {
    object: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct WireSession {
    id: String,
    payment_intent: Option<String>,
    #[serde(default)]
    amount_subtotal: Option<i64>,
    #[serde(default)]
    amount_total: Option<i64>,
    #[serde(default)]
    total_details: Option<WireTotals>,
    #[serde(default)]
    metadata: Option<HashMap<String, String>>,
}

#[derive(Debug, Deserialize)]
struct WireTotals {
    #[serde(default)]
    amount_tax: Option<i64>,
    #[serde(default)]
    amount_shipping: Option<i64>,
    #[serde(default)]
    amount_discount: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct WirePaymentIntent {
    id: String,
}

pub(crate) fn parse_event(payload: &[u8]) -> Result<WebhookEvent, WebhookParseError> {
    let event: WireEvent = serde_json::from_slice(payload)
        .map_err(|e| WebhookParseError::Malformed(e.to_string()))?;

    match event.kind.as_str() {
        "checkout.session.completed" => {
            let session: WireSession = serde_json::from_value(event.data.object)
                .map_err(|e| WebhookParseError::Malformed(e.to_string()))?;
            let totals = session.total_details.unwrap_or(WireTotals {
                amount_tax: None,
                amount_shipping: None,
                amount_discount: None,
            });
            Ok(WebhookEvent::CheckoutSessionCompleted(CompletedSession {
                session_id: session.id,
                payment_intent: session.payment_intent,
                customer_id: session
                    .metadata
                    .and_then(|mut m| m.remove("customerId")),
                amount_subtotal: session.amount_subtotal,
                amount_total: session.amount_total,
                amount_tax: totals.amount_tax,
                amount_shipping: totals.amount_shipping,
                amount_discount: totals.amount_discount,
            }))
        }
        "payment_intent.payment_failed" => {
            let intent: WirePaymentIntent = serde_json::from_value(event.data.object)
                .map_err(|e| WebhookParseError::Malformed(e.to_string()))?;
            Ok(WebhookEvent::PaymentIntentFailed {
                payment_intent_id: intent.id,
            })
        }
        _ => Ok(WebhookEvent::Other { kind: event.kind }),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::checkout::SessionLineItem;

    const SECRET: &str = "whsec_test_secret";

    fn sign(payload: &[u8], secret: &str, timestamp: i64) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("hmac key");
        mac.update(timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);
        format!("t={},v1={}", timestamp, hex::encode(mac.finalize().into_bytes()))
    }

    // ── verify_signature ─────────────────────────────────────────────────────

    #[test]
    fn valid_signature_is_accepted() {
        let payload = br#"{"type":"ping"}"#;
        let header = sign(payload, SECRET, 1_700_000_000);
        assert!(verify_signature(payload, &header, SECRET, 1_700_000_000).is_ok());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let payload = br#"{"type":"ping"}"#;
        let header = sign(payload, "whsec_other", 1_700_000_000);
        assert!(verify_signature(payload, &header, SECRET, 1_700_000_000).is_err());
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let header = sign(br#"{"amount":1}"#, SECRET, 1_700_000_000);
        assert!(verify_signature(br#"{"amount":100}"#, &header, SECRET, 1_700_000_000).is_err());
    }

    #[test]
    fn stale_timestamp_is_rejected() {
        let payload = br#"{"type":"ping"}"#;
        let header = sign(payload, SECRET, 1_700_000_000);
        let later = 1_700_000_000 + SIGNATURE_TOLERANCE_SECS + 1;
        assert!(verify_signature(payload, &header, SECRET, later).is_err());
    }

    #[test]
    fn header_without_timestamp_is_rejected() {
        assert!(verify_signature(b"{}", "v1=deadbeef", SECRET, 0).is_err());
    }

    #[test]
    fn header_without_candidate_is_rejected() {
        assert!(verify_signature(b"{}", "t=0", SECRET, 0).is_err());
    }

    #[test]
    fn non_hex_candidate_is_rejected() {
        assert!(verify_signature(b"{}", "t=0,v1=not-hex", SECRET, 0).is_err());
    }

    #[test]
    fn extra_unknown_candidates_are_ignored() {
        let payload = br#"{"type":"ping"}"#;
        let valid = sign(payload, SECRET, 1_700_000_000);
        let header = format!("v0=00ff,{valid}");
        assert!(verify_signature(payload, &header, SECRET, 1_700_000_000).is_ok());
    }

    // ── parse_event ──────────────────────────────────────────────────────────

    #[test]
    fn parses_completed_checkout_session() {
        let payload = json!({
            "id": "evt_1",
            "type": "checkout.session.completed",
            "data": {
                "object": {
                    "id": "cs_test_123",
                    "payment_intent": "pi_123",
                    "amount_subtotal": 10000,
                    "amount_total": 11800,
                    "total_details": {
                        "amount_tax": 1800,
                        "amount_shipping": 0,
                        "amount_discount": 0
                    },
                    "metadata": {"customerId": "3f0f74f0-0000-0000-0000-000000000001"}
                }
            }
        });

        let event = parse_event(payload.to_string().as_bytes()).expect("parses");
        let WebhookEvent::CheckoutSessionCompleted(session) = event else {
            panic!("expected completed session");
        };
        assert_eq!(session.session_id, "cs_test_123");
        assert_eq!(session.payment_intent.as_deref(), Some("pi_123"));
        assert_eq!(session.amount_total, Some(11800));
        assert_eq!(session.amount_tax, Some(1800));
        assert_eq!(
            session.customer_id.as_deref(),
            Some("3f0f74f0-0000-0000-0000-000000000001")
        );
    }

    #[test]
    fn missing_amounts_parse_as_none() {
        let payload = json!({
            "type": "checkout.session.completed",
            "data": {"object": {"id": "cs_1", "payment_intent": "pi_1"}}
        });

        let event = parse_event(payload.to_string().as_bytes()).expect("parses");
        let WebhookEvent::CheckoutSessionCompleted(session) = event else {
            panic!("expected completed session");
        };
        assert_eq!(session.amount_total, None);
        assert_eq!(session.amount_tax, None);
        assert_eq!(session.customer_id, None);
    }

    #[test]
    fn parses_failed_payment_intent() {
        let payload = json!({
            "type": "payment_intent.payment_failed",
            "data": {"object": {"id": "pi_failed_1"}}
        });

        let event = parse_event(payload.to_string().as_bytes()).expect("parses");
        assert_eq!(
            event,
            WebhookEvent::PaymentIntentFailed {
                payment_intent_id: "pi_failed_1".to_string()
            }
        );
    }

    #[test]
    fn unrecognized_event_kind_is_passed_through() {
        let payload = json!({
            "type": "invoice.created",
            "data": {"object": {}}
        });

        let event = parse_event(payload.to_string().as_bytes()).expect("parses");
        assert_eq!(
            event,
            WebhookEvent::Other {
                kind: "invoice.created".to_string()
            }
        );
    }

    #[test]
    fn garbage_payload_is_malformed() {
        assert!(matches!(
            parse_event(b"not json"),
            Err(WebhookParseError::Malformed(_))
        ));
    }

    // ── session_form ─────────────────────────────────────────────────────────

    #[test]
    fn session_form_encodes_line_items_and_metadata() {
        let request = CheckoutSessionRequest {
            line_items: vec![SessionLineItem {
                name: "Crew Neck Tee".to_string(),
                description: "M black".to_string(),
                product_id: "prod-42".to_string(),
                unit_amount: 25000,
                quantity: 2,
            }],
            customer_email: Some("asha@acme.example".to_string()),
            metadata: [("customerId".to_string(), "cust-1".to_string())].into(),
            success_url: "https://shop.example/checkout/success?session_id={CHECKOUT_SESSION_ID}"
                .to_string(),
            cancel_url: "https://shop.example/checkout/cancel".to_string(),
        };

        let form = session_form(&request);
        let lookup = |key: &str| {
            form.iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };

        assert_eq!(lookup("mode"), Some("payment"));
        assert_eq!(lookup("line_items[0][price_data][currency]"), Some("inr"));
        assert_eq!(
            lookup("line_items[0][price_data][product_data][name]"),
            Some("Crew Neck Tee")
        );
        assert_eq!(lookup("line_items[0][price_data][unit_amount]"), Some("25000"));
        assert_eq!(lookup("line_items[0][quantity]"), Some("2"));
        assert_eq!(lookup("metadata[customerId]"), Some("cust-1"));
        assert_eq!(lookup("customer_email"), Some("asha@acme.example"));
        assert!(lookup("success_url")
            .is_some_and(|url| url.contains("{CHECKOUT_SESSION_ID}")));
    }

    #[test]
    fn session_form_omits_empty_description() {
        let request = CheckoutSessionRequest {
            line_items: vec![SessionLineItem {
                name: "Product".to_string(),
                description: String::new(),
                product_id: String::new(),
                unit_amount: 0,
                quantity: 1,
            }],
            customer_email: None,
            metadata: Default::default(),
            success_url: String::new(),
            cancel_url: String::new(),
        };

        let form = session_form(&request);
        assert!(!form
            .iter()
            .any(|(k, _)| k == "line_items[0][price_data][product_data][description]"));
        assert!(!form.iter().any(|(k, _)| k == "customer_email"));
    }
}
