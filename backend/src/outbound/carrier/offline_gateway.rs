//! Parcel gateway used when no carrier credentials are configured.
//!
//! Tracking numbers are `MOCK-` followed by the first 12 hex digits of the
//! SHA-256 of the order id, so they are stable across retries and never look
//! like carrier-issued ones. Parcels live in memory for the process lifetime.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tracing::warn;

use super::DEFAULT_PARCEL_STATUS;
use crate::domain::order::OrderId;
use crate::domain::parcel::{
    MOCK_TRACKING_PREFIX, ParcelDraft, ParcelPatch, ParcelRecord, TrackingNumber, TrackingOrigin,
};
use crate::domain::ports::{ParcelGateway, ParcelGatewayError};

const MOCK_DIGEST_HEX_LEN: usize = 12;

/// Deterministic offline tracking number for an order.
///
/// # Examples
/// ```
/// use shipping::domain::order::OrderId;
/// use shipping::outbound::carrier::mock_tracking_number;
///
/// let tracking = mock_tracking_number(&OrderId::new("ord-1"));
/// assert!(tracking.is_mock());
/// assert_eq!(tracking.as_str().len(), "MOCK-".len() + 12);
/// assert_eq!(tracking, mock_tracking_number(&OrderId::new("ord-1")));
/// ```
#[must_use]
pub fn mock_tracking_number(order_id: &OrderId) -> TrackingNumber {
    let digest: String = hex::encode(Sha256::digest(order_id.as_str().as_bytes()))
        .chars()
        .take(MOCK_DIGEST_HEX_LEN)
        .collect();
    TrackingNumber::new(format!("{MOCK_TRACKING_PREFIX}{digest}"))
}

/// In-memory stand-in for the carrier's parcel endpoints.
#[derive(Debug, Default)]
pub struct OfflineParcelGateway {
    parcels: Mutex<HashMap<TrackingNumber, ParcelRecord>>,
}

impl OfflineParcelGateway {
    /// Empty gateway.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn parcels(&self) -> MutexGuard<'_, HashMap<TrackingNumber, ParcelRecord>> {
        self.parcels.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl ParcelGateway for OfflineParcelGateway {
    async fn create(&self, draft: &ParcelDraft) -> Result<ParcelRecord, ParcelGatewayError> {
        draft
            .validate()
            .map_err(ParcelGatewayError::invalid_request)?;
        let record = ParcelRecord {
            tracking: mock_tracking_number(&draft.order_id),
            label_url: None,
            status: DEFAULT_PARCEL_STATUS.to_owned(),
            origin: TrackingOrigin::Mock,
        };
        warn!(
            order_id = %draft.order_id,
            tracking = %record.tracking,
            "carrier not configured; issued offline tracking number"
        );
        self.parcels()
            .insert(record.tracking.clone(), record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        tracking: &TrackingNumber,
        patch: &ParcelPatch,
    ) -> Result<ParcelRecord, ParcelGatewayError> {
        if patch.is_empty() {
            return Err(ParcelGatewayError::invalid_request(
                "patch does not change any field",
            ));
        }
        self.parcels()
            .get(tracking)
            .cloned()
            .ok_or_else(|| ParcelGatewayError::not_found(tracking.as_str()))
    }

    async fn delete(&self, tracking: &TrackingNumber) -> Result<(), ParcelGatewayError> {
        self.parcels()
            .remove(tracking)
            .map(|_| ())
            .ok_or_else(|| ParcelGatewayError::not_found(tracking.as_str()))
    }

    async fn get(&self, tracking: &TrackingNumber) -> Result<ParcelRecord, ParcelGatewayError> {
        self.parcels()
            .get(tracking)
            .cloned()
            .ok_or_else(|| ParcelGatewayError::not_found(tracking.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::parcel::Recipient;

    fn draft(order_id: &str) -> ParcelDraft {
        ParcelDraft {
            order_id: OrderId::new(order_id),
            recipient: Recipient {
                first_name: "Nadia".to_owned(),
                last_name: "Kaci".to_owned(),
                phone: "0550998877".to_owned(),
                address: "Rue Larbi Ben M'hidi".to_owned(),
                region: "Constantine".to_owned(),
                sub_region: "Constantine".to_owned(),
            },
            product_list: "Notebook".to_owned(),
            declared_price: 3_000,
            weight_kg: 0.5,
            dimensions: None,
            is_pickup_delivery: false,
            pickup_point_id: None,
            free_shipping: false,
            insured: false,
            has_exchange: false,
        }
    }

    #[tokio::test]
    async fn created_parcels_are_marked_as_mock_and_pending() {
        let gateway = OfflineParcelGateway::new();
        let record = gateway.create(&draft("ord-1")).await.expect("create");
        assert_eq!(record.origin, TrackingOrigin::Mock);
        assert_eq!(record.status, "pending");
        assert!(record.tracking.is_mock());
        assert_eq!(record.tracking, mock_tracking_number(&OrderId::new("ord-1")));
    }

    #[test]
    fn different_orders_get_different_numbers() {
        assert_ne!(
            mock_tracking_number(&OrderId::new("ord-1")),
            mock_tracking_number(&OrderId::new("ord-2"))
        );
    }

    #[tokio::test]
    async fn deleted_parcels_are_no_longer_found() {
        let gateway = OfflineParcelGateway::new();
        let record = gateway.create(&draft("ord-3")).await.expect("create");
        let patch = ParcelPatch {
            address: Some("Cité Boussouf".to_owned()),
            ..ParcelPatch::default()
        };
        gateway.update(&record.tracking, &patch).await.expect("update");
        gateway.delete(&record.tracking).await.expect("delete");
        assert_eq!(
            gateway.get(&record.tracking).await,
            Err(ParcelGatewayError::not_found(record.tracking.as_str()))
        );
        assert!(gateway.delete(&record.tracking).await.is_err());
    }
}
