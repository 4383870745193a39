//! In-memory [`OrderStore`].

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::order::{Order, OrderId, OrderUpdate};
use crate::domain::parcel::TrackingNumber;
use crate::domain::ports::{OrderStore, OrderStoreError};

/// Orders keyed by id.
#[derive(Debug, Default)]
pub struct InMemoryOrderStore {
    orders: Mutex<HashMap<OrderId, Order>>,
}

impl InMemoryOrderStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store with existing orders.
    #[must_use]
    pub fn with_orders(orders: impl IntoIterator<Item = Order>) -> Self {
        let store = Self::new();
        for order in orders {
            store.insert(order);
        }
        store
    }

    /// Insert or replace an order.
    pub fn insert(&self, order: Order) {
        self.orders().insert(order.id.clone(), order);
    }

    /// Snapshot of one order.
    #[must_use]
    pub fn get(&self, order_id: &OrderId) -> Option<Order> {
        self.orders().get(order_id).cloned()
    }

    fn orders(&self) -> MutexGuard<'_, HashMap<OrderId, Order>> {
        self.orders.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn find_by_id(&self, order_id: &OrderId) -> Result<Option<Order>, OrderStoreError> {
        Ok(self.get(order_id))
    }

    async fn find_by_tracking_number(
        &self,
        tracking: &TrackingNumber,
    ) -> Result<Option<Order>, OrderStoreError> {
        Ok(self
            .orders()
            .values()
            .find(|order| order.tracking_number.as_ref() == Some(tracking))
            .cloned())
    }

    async fn update_status(
        &self,
        order_id: &OrderId,
        update: &OrderUpdate,
    ) -> Result<Order, OrderStoreError> {
        let mut orders = self.orders();
        let order = orders
            .get_mut(order_id)
            .ok_or_else(|| OrderStoreError::missing(order_id.as_str()))?;
        update.apply_to(order);
        Ok(order.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::{CodStatus, OrderStatus, PaymentMethod, TrackingUpdate};

    fn cod_order(id: &str) -> Order {
        Order::new(OrderId::new(id), None, PaymentMethod::CashOnDelivery)
    }

    #[tokio::test]
    async fn updates_are_visible_by_tracking_number() {
        let store = InMemoryOrderStore::with_orders([cod_order("ord-1"), cod_order("ord-2")]);
        let tracking = TrackingNumber::new("yal-1");
        let mut update = OrderUpdate::transition(&cod_order("ord-2"), CodStatus::Submitted);
        update.tracking_number = Some(TrackingUpdate::Assign(tracking.clone()));

        let updated = store
            .update_status(&OrderId::new("ord-2"), &update)
            .await
            .expect("update");
        assert_eq!(updated.status, OrderStatus::Confirmed);

        let found = store
            .find_by_tracking_number(&tracking)
            .await
            .expect("lookup")
            .expect("order linked");
        assert_eq!(found.id, OrderId::new("ord-2"));
        assert_eq!(found.cod_status, Some(CodStatus::Submitted));
    }

    #[tokio::test]
    async fn updating_an_unknown_order_is_missing() {
        let store = InMemoryOrderStore::new();
        let error = store
            .update_status(&OrderId::new("ghost"), &OrderUpdate::default())
            .await
            .expect_err("missing");
        assert_eq!(error, OrderStoreError::missing("ghost"));
    }
}
