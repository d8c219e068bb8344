use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Payment provider error: {0}")]
    Provider(String),
    #[error("Shipping provider error: {0}")]
    Shipping(String),
    #[error("Internal error: {0}")]
    Internal(String),
}
