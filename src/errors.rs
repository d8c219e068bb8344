use actix_web::HttpResponse;
use thiserror::Error;

use crate::domain::errors::DomainError;

/// Web-boundary error taxonomy. Responses carry only generic messages;
/// provider and internal details are logged, never returned to the caller.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("{0} not found")]
    NotFound(String),

    #[error("Payment provider error: {0}")]
    Provider(String),

    #[error("Shipping provider error: {0}")]
    Shipping(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound(what) => AppError::NotFound(what),
            DomainError::InvalidInput(msg) => AppError::Validation(msg),
            DomainError::Provider(msg) => AppError::Provider(msg),
            DomainError::Shipping(msg) => AppError::Shipping(msg),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<crate::infrastructure::stripe::WebhookParseError> for AppError {
    fn from(e: crate::infrastructure::stripe::WebhookParseError) -> Self {
        use crate::infrastructure::stripe::WebhookParseError;
        match e {
            WebhookParseError::InvalidSignature => AppError::InvalidSignature,
            WebhookParseError::Malformed(msg) => AppError::Validation(msg),
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Validation(msg) => HttpResponse::BadRequest().json(serde_json::json!({
                "error": msg
            })),
            AppError::InvalidSignature => HttpResponse::BadRequest().json(serde_json::json!({
                "error": "Invalid signature"
            })),
            AppError::NotFound(_) => HttpResponse::NotFound().json(serde_json::json!({
                "error": self.to_string()
            })),
            AppError::Provider(msg) => {
                log::error!("payment provider failure: {}", msg);
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "Error creating payment session"
                }))
            }
            AppError::Shipping(msg) => {
                log::error!("shipping provider failure: {}", msg);
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "Error creating shipment"
                }))
            }
            AppError::Internal(msg) => {
                log::error!("internal error: {}", msg);
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "Internal server error"
                }))
            }
        }
    }
}
