//! Order-linked parcel operations.
//!
//! Wraps the [`ParcelGateway`] with the bookkeeping an admin action needs:
//! one parcel per order, the tracking number written back to the order, and a
//! per-order lock so two operators cannot create two carrier parcels for the
//! same order.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use serde_json::json;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::{error, info, warn};

use crate::domain::Error;
use crate::domain::order::{CodStatus, Order, OrderId, OrderStatus, OrderUpdate, TrackingUpdate};
use crate::domain::ports::{OrderStore, ParcelGateway, ParcelGatewayError};

use super::{ParcelDraft, ParcelPatch, ParcelRecord, TrackingNumber};

/// Admin-facing parcel operations keyed by order.
#[derive(Clone)]
pub struct ParcelService {
    orders: Arc<dyn OrderStore>,
    gateway: Arc<dyn ParcelGateway>,
    locks: Arc<Mutex<HashMap<OrderId, Arc<AsyncMutex<()>>>>>,
}

impl ParcelService {
    /// Service over an order store and a carrier gateway.
    #[must_use]
    pub fn new(orders: Arc<dyn OrderStore>, gateway: Arc<dyn ParcelGateway>) -> Self {
        Self {
            orders,
            gateway,
            locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    async fn lock_order(&self, order_id: &OrderId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            // Drop locks nobody holds or waits on.
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(locks.entry(order_id.clone()).or_default())
        };
        lock.lock_owned().await
    }

    async fn load_order(&self, order_id: &OrderId) -> Result<Order, Error> {
        self.orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| Error::not_found(format!("order {order_id} not found")))
    }

    fn linked_tracking(order: &Order) -> Result<TrackingNumber, Error> {
        order
            .tracking_number
            .clone()
            .ok_or_else(|| Error::not_found(format!("order {} has no parcel", order.id)))
    }

    /// Create the carrier parcel for an order and link its tracking number.
    ///
    /// # Errors
    ///
    /// `not_found` for an unknown order, `conflict` when the order already
    /// has a parcel or is finished, `invalid_request` for an unusable draft,
    /// and the gateway's mapped error otherwise.
    pub async fn create(
        &self,
        order_id: &OrderId,
        draft: ParcelDraft,
    ) -> Result<ParcelRecord, Error> {
        let _guard = self.lock_order(order_id).await;
        let order = self.load_order(order_id).await?;
        if let Some(existing) = &order.tracking_number {
            return Err(Error::conflict(format!(
                "order {order_id} already has parcel {existing}"
            ))
            .with_details(json!({ "tracking": existing })));
        }
        if order.delivery_state().is_terminal() {
            return Err(Error::conflict(format!("order {order_id} is already closed")));
        }

        let linked = ParcelDraft {
            order_id: order_id.clone(),
            ..draft
        };
        linked.validate().map_err(Error::invalid_request)?;

        let record = self.gateway.create(&linked).await.map_err(map_gateway_error)?;

        let update = OrderUpdate {
            tracking_number: Some(TrackingUpdate::Assign(record.tracking.clone())),
            ..OrderUpdate::transition(&order, CodStatus::Submitted)
        };
        if let Err(store_error) = self.orders.update_status(order_id, &update).await {
            error!(
                order_id = %order_id,
                tracking = %record.tracking,
                error = %store_error,
                "parcel created but order could not be linked"
            );
            return Err(Error::internal("parcel created but order could not be updated")
                .with_details(json!({ "tracking": record.tracking })));
        }

        info!(
            order_id = %order_id,
            tracking = %record.tracking,
            origin = ?record.origin,
            "parcel created"
        );
        Ok(record)
    }

    /// Amend the parcel linked to an order.
    ///
    /// # Errors
    ///
    /// `invalid_request` for an empty patch, `not_found` when the order or its
    /// parcel is missing, and the gateway's mapped error otherwise.
    pub async fn update(
        &self,
        order_id: &OrderId,
        patch: &ParcelPatch,
    ) -> Result<ParcelRecord, Error> {
        if patch.is_empty() {
            return Err(Error::invalid_request("parcel patch changes nothing"));
        }
        let _guard = self.lock_order(order_id).await;
        let order = self.load_order(order_id).await?;
        let tracking = Self::linked_tracking(&order)?;

        let record = self
            .gateway
            .update(&tracking, patch)
            .await
            .map_err(map_gateway_error)?;
        info!(order_id = %order_id, tracking = %tracking, "parcel updated");
        Ok(record)
    }

    /// Delete the parcel linked to an order and unlink it.
    ///
    /// # Errors
    ///
    /// `not_found` when the order or its parcel is missing, `conflict` once
    /// the parcel reached a terminal state, and the gateway's mapped error
    /// otherwise.
    pub async fn delete(&self, order_id: &OrderId) -> Result<TrackingNumber, Error> {
        let _guard = self.lock_order(order_id).await;
        let order = self.load_order(order_id).await?;
        let tracking = Self::linked_tracking(&order)?;
        if order.delivery_state().is_terminal() {
            return Err(Error::conflict(format!(
                "parcel {tracking} already reached a final state"
            )));
        }

        self.gateway
            .delete(&tracking)
            .await
            .map_err(map_gateway_error)?;

        // The sale stands; only the shipment is undone.
        let update = OrderUpdate {
            status: Some(OrderStatus::Confirmed),
            cod_status: order.is_cash_on_delivery().then_some(CodStatus::Pending),
            tracking_number: Some(TrackingUpdate::Clear),
            ..OrderUpdate::default()
        };
        self.orders
            .update_status(order_id, &update)
            .await?;

        info!(order_id = %order_id, tracking = %tracking, "parcel deleted");
        Ok(tracking)
    }

    /// Fetch the carrier's view of a parcel.
    ///
    /// # Errors
    ///
    /// The gateway's mapped error.
    pub async fn get(&self, tracking: &TrackingNumber) -> Result<ParcelRecord, Error> {
        self.gateway.get(tracking).await.map_err(map_gateway_error)
    }
}

/// Map gateway failures onto domain errors, keeping the carrier's own text
/// for refusals.
pub(crate) fn map_gateway_error(error: ParcelGatewayError) -> Error {
    match error {
        ParcelGatewayError::NotConfigured => {
            warn!("parcel operation attempted without carrier credentials");
            Error::service_unavailable("carrier is not configured")
        }
        ParcelGatewayError::Transport { message } | ParcelGatewayError::Timeout { message } => {
            warn!(error = %message, "carrier unreachable");
            Error::service_unavailable(format!("carrier unreachable: {message}"))
        }
        ParcelGatewayError::ResponseShape { message, raw_body } => {
            warn!(error = %message, raw_body = %raw_body, "unexpected carrier response");
            Error::service_unavailable(format!("unexpected carrier response: {message}"))
        }
        ParcelGatewayError::Rejected { message } => Error::invalid_request(message),
        ParcelGatewayError::NotFound { tracking } => {
            Error::not_found(format!("parcel {tracking} not found"))
        }
        ParcelGatewayError::InvalidRequest { message } => Error::invalid_request(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::order::{PaymentMethod, UserId};
    use crate::domain::parcel::{Recipient, TrackingOrigin};
    use crate::domain::ports::{MockOrderStore, MockParcelGateway};
    use mockall::predicate::eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn draft() -> ParcelDraft {
        ParcelDraft {
            order_id: OrderId::new("ignored"),
            recipient: Recipient {
                first_name: "Amina".to_owned(),
                last_name: "Haddad".to_owned(),
                phone: "0555000000".to_owned(),
                address: "12 rue Larbi Ben M'hidi".to_owned(),
                region: "Oran".to_owned(),
                sub_region: "Oran".to_owned(),
            },
            product_list: "Starter kit".to_owned(),
            declared_price: 3_200,
            weight_kg: 1.0,
            dimensions: None,
            is_pickup_delivery: false,
            pickup_point_id: None,
            free_shipping: false,
            insured: false,
            has_exchange: false,
        }
    }

    fn cod_order(tracking: Option<&str>) -> Order {
        let mut order = Order::new(
            OrderId::new("ord-7"),
            Some(UserId::new("user-1")),
            PaymentMethod::CashOnDelivery,
        );
        order.tracking_number = tracking.map(TrackingNumber::new);
        order
    }

    fn record(tracking: &str) -> ParcelRecord {
        ParcelRecord {
            tracking: TrackingNumber::new(tracking),
            label_url: None,
            status: "pending".to_owned(),
            origin: TrackingOrigin::Carrier,
        }
    }

    fn store_returning(order: Order) -> MockOrderStore {
        let mut store = MockOrderStore::new();
        store
            .expect_find_by_id()
            .returning(move |_| Ok(Some(order.clone())));
        store
    }

    #[rstest]
    #[tokio::test]
    async fn create_links_tracking_and_submits_order(draft: ParcelDraft) {
        let mut store = store_returning(cod_order(None));
        store
            .expect_update_status()
            .withf(|order_id, update| {
                order_id.as_str() == "ord-7"
                    && update.cod_status == Some(CodStatus::Submitted)
                    && update.status == Some(OrderStatus::Confirmed)
                    && update.tracking_number
                        == Some(TrackingUpdate::Assign(TrackingNumber::new("YAL-1")))
            })
            .times(1)
            .returning(|_, _| Ok(cod_order(Some("YAL-1"))));
        let mut gateway = MockParcelGateway::new();
        gateway
            .expect_create()
            .withf(|draft| draft.order_id.as_str() == "ord-7")
            .times(1)
            .returning(|_| Ok(record("YAL-1")));
        let service = ParcelService::new(Arc::new(store), Arc::new(gateway));

        let created = service
            .create(&OrderId::new("ord-7"), draft)
            .await
            .expect("parcel created");
        assert_eq!(created.tracking.as_str(), "YAL-1");
    }

    #[rstest]
    #[tokio::test]
    async fn create_refuses_second_parcel_for_order(draft: ParcelDraft) {
        let store = store_returning(cod_order(Some("YAL-1")));
        let mut gateway = MockParcelGateway::new();
        gateway.expect_create().never();
        let service = ParcelService::new(Arc::new(store), Arc::new(gateway));

        let err = service
            .create(&OrderId::new("ord-7"), draft)
            .await
            .expect_err("duplicate parcel");
        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[rstest]
    #[tokio::test]
    async fn carrier_refusal_surfaces_carrier_text(draft: ParcelDraft) {
        let store = store_returning(cod_order(None));
        let mut gateway = MockParcelGateway::new();
        gateway
            .expect_create()
            .returning(|_| Err(ParcelGatewayError::rejected("commune introuvable")));
        let service = ParcelService::new(Arc::new(store), Arc::new(gateway));

        let err = service
            .create(&OrderId::new("ord-7"), draft)
            .await
            .expect_err("carrier refused");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.message(), "commune introuvable");
    }

    #[rstest]
    #[tokio::test]
    async fn invalid_draft_never_reaches_carrier(mut draft: ParcelDraft) {
        draft.weight_kg = 0.0;
        let store = store_returning(cod_order(None));
        let mut gateway = MockParcelGateway::new();
        gateway.expect_create().never();
        let service = ParcelService::new(Arc::new(store), Arc::new(gateway));

        let err = service
            .create(&OrderId::new("ord-7"), draft)
            .await
            .expect_err("invalid draft");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn empty_patch_is_rejected_before_any_lookup() {
        let mut store = MockOrderStore::new();
        store.expect_find_by_id().never();
        let service = ParcelService::new(Arc::new(store), Arc::new(MockParcelGateway::new()));

        let err = service
            .update(&OrderId::new("ord-7"), &ParcelPatch::default())
            .await
            .expect_err("empty patch");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn update_targets_linked_tracking() {
        let store = store_returning(cod_order(Some("YAL-1")));
        let mut gateway = MockParcelGateway::new();
        gateway
            .expect_update()
            .with(eq(TrackingNumber::new("YAL-1")), mockall::predicate::always())
            .times(1)
            .returning(|_, _| Ok(record("YAL-1")));
        let service = ParcelService::new(Arc::new(store), Arc::new(gateway));
        let patch = ParcelPatch {
            phone: Some("0666000000".to_owned()),
            ..ParcelPatch::default()
        };

        let updated = service
            .update(&OrderId::new("ord-7"), &patch)
            .await
            .expect("updated");
        assert_eq!(updated.tracking.as_str(), "YAL-1");
    }

    #[tokio::test]
    async fn delete_unlinks_tracking_and_reopens_order() {
        let mut store = store_returning(cod_order(Some("YAL-1")));
        store
            .expect_update_status()
            .withf(|_, update| {
                update.tracking_number == Some(TrackingUpdate::Clear)
                    && update.cod_status == Some(CodStatus::Pending)
            })
            .times(1)
            .returning(|_, _| Ok(cod_order(None)));
        let mut gateway = MockParcelGateway::new();
        gateway.expect_delete().times(1).returning(|_| Ok(()));
        let service = ParcelService::new(Arc::new(store), Arc::new(gateway));

        let tracking = service
            .delete(&OrderId::new("ord-7"))
            .await
            .expect("deleted");
        assert_eq!(tracking.as_str(), "YAL-1");
    }

    #[tokio::test]
    async fn delivered_parcel_cannot_be_deleted() {
        let mut order = cod_order(Some("YAL-1"));
        order.cod_status = Some(CodStatus::Delivered);
        let store = store_returning(order);
        let mut gateway = MockParcelGateway::new();
        gateway.expect_delete().never();
        let service = ParcelService::new(Arc::new(store), Arc::new(gateway));

        let err = service
            .delete(&OrderId::new("ord-7"))
            .await
            .expect_err("terminal parcel");
        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[rstest]
    #[case::not_configured(ParcelGatewayError::not_configured(), ErrorCode::ServiceUnavailable)]
    #[case::timeout(ParcelGatewayError::timeout("10s"), ErrorCode::ServiceUnavailable)]
    #[case::shape(
        ParcelGatewayError::response_shape("expected object", "<html>"),
        ErrorCode::ServiceUnavailable
    )]
    #[case::missing(ParcelGatewayError::not_found("YAL-9"), ErrorCode::NotFound)]
    fn gateway_errors_map_to_domain_codes(
        #[case] error: ParcelGatewayError,
        #[case] expected: ErrorCode,
    ) {
        assert_eq!(map_gateway_error(error).code(), expected);
    }
}
