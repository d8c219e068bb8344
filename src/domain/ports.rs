//! Trait seams between the workflow and its collaborators: the order/customer
//! stores and the two remote providers. Handlers and services receive these
//! as `Arc<dyn …>` so tests can substitute fakes.

use async_trait::async_trait;
use uuid::Uuid;

use super::checkout::{CheckoutSession, CheckoutSessionRequest};
use super::customer::Customer;
use super::errors::DomainError;
use super::order::{AdminOrderUpdate, NewOrder, Order, OrderPage, TrackingUpdate};
use super::shipping::{AwbAssignment, LogisticsOrder, LogisticsOrderRequest};

#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persist a new order. Generates an order number when none is supplied.
    async fn insert(&self, order: NewOrder) -> Result<Order, DomainError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, DomainError>;

    /// Look up the order owning a payment transaction; the webhook processor
    /// uses this to deduplicate redelivered checkout events.
    async fn find_by_transaction(
        &self,
        transaction_id: &str,
    ) -> Result<Option<Order>, DomainError>;

    async fn list(&self, page: i64, limit: i64) -> Result<OrderPage, DomainError>;

    /// Set status to `shipped` and merge tracking details. Fields absent from
    /// the update keep their current values.
    async fn mark_shipped(&self, id: Uuid, update: TrackingUpdate) -> Result<(), DomainError>;

    async fn apply_admin_update(
        &self,
        id: Uuid,
        update: AdminOrderUpdate,
    ) -> Result<Order, DomainError>;
}

#[async_trait]
pub trait CustomerStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Customer>, DomainError>;
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_checkout_session(
        &self,
        request: CheckoutSessionRequest,
    ) -> Result<CheckoutSession, DomainError>;
}

#[async_trait]
pub trait LogisticsProvider: Send + Sync {
    async fn create_order(
        &self,
        request: LogisticsOrderRequest,
    ) -> Result<LogisticsOrder, DomainError>;

    async fn assign_awb(
        &self,
        shipment_id: &str,
        courier_id: Option<&str>,
    ) -> Result<AwbAssignment, DomainError>;
}
