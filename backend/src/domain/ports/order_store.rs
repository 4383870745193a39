//! Driven port for the order persistence the storefront owns.

use async_trait::async_trait;

use crate::domain::Error;
use crate::domain::order::{Order, OrderId, OrderUpdate};
use crate::domain::parcel::TrackingNumber;

use super::define_port_error;

define_port_error! {
    /// Errors raised by order store adapters.
    pub enum OrderStoreError {
        /// Store connection could not be established.
        Connection { message: String } => "order store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "order store query failed: {message}",
        /// The order to update does not exist.
        Missing { order_id: String } => "order {order_id} does not exist",
    }
}

impl From<OrderStoreError> for Error {
    fn from(value: OrderStoreError) -> Self {
        match value {
            OrderStoreError::Missing { order_id } => {
                Self::not_found(format!("order {order_id} not found"))
            }
            OrderStoreError::Connection { message } => {
                Self::service_unavailable(format!("order store unavailable: {message}"))
            }
            OrderStoreError::Query { message } => {
                Self::internal(format!("order store error: {message}"))
            }
        }
    }
}

/// Port for reading and updating orders.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Fetch an order by identifier.
    async fn find_by_id(&self, order_id: &OrderId) -> Result<Option<Order>, OrderStoreError>;

    /// Fetch the order linked to a tracking number.
    async fn find_by_tracking_number(
        &self,
        tracking: &TrackingNumber,
    ) -> Result<Option<Order>, OrderStoreError>;

    /// Apply a partial update and return the stored result.
    async fn update_status(
        &self,
        order_id: &OrderId,
        update: &OrderUpdate,
    ) -> Result<Order, OrderStoreError>;
}
