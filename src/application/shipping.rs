//! Shipping dispatch: push a paid order to the logistics provider, assign a
//! tracking number, and record both against the order.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::ports::{CustomerStore, LogisticsProvider, OrderStore};
use crate::domain::order::TrackingUpdate;
use crate::domain::shipping::LogisticsOrderRequest;

/// What dispatch produced, echoed back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReceipt {
    pub logistics_order_id: String,
    pub tracking_number: String,
    pub carrier: Option<String>,
}

#[derive(Clone)]
pub struct ShippingDispatcher {
    orders: Arc<dyn OrderStore>,
    customers: Arc<dyn CustomerStore>,
    logistics: Arc<dyn LogisticsProvider>,
}

impl ShippingDispatcher {
    pub fn new(
        orders: Arc<dyn OrderStore>,
        customers: Arc<dyn CustomerStore>,
        logistics: Arc<dyn LogisticsProvider>,
    ) -> Self {
        Self {
            orders,
            customers,
            logistics,
        }
    }

    /// Create the remote shipment and assign its AWB, then mark the order
    /// shipped. The order is only touched after both provider calls succeed,
    /// so a failed dispatch leaves it eligible for retry.
    pub async fn dispatch(&self, order_id: Uuid) -> Result<DispatchReceipt, DomainError> {
        let order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Order".to_string()))?;
        let customer = self
            .customers
            .find_by_id(order.customer_id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Customer".to_string()))?;

        let request = LogisticsOrderRequest::from_order(&order, &customer);
        let remote = self.logistics.create_order(request).await?;
        let awb = self
            .logistics
            .assign_awb(&remote.shipment_id, remote.courier_id.as_deref())
            .await?;

        self.orders
            .mark_shipped(
                order.id,
                TrackingUpdate {
                    logistics_order_id: remote.order_id.clone(),
                    tracking_number: awb.awb_code.clone(),
                    carrier: remote.courier_name.clone(),
                },
            )
            .await?;

        log::info!(
            "order {} dispatched: shipment {} awb {}",
            order.order_number,
            remote.shipment_id,
            awb.awb_code
        );

        Ok(DispatchReceipt {
            logistics_order_id: remote.order_id,
            tracking_number: awb.awb_code,
            carrier: remote.courier_name,
        })
    }
}
