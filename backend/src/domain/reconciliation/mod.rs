//! Carrier webhook reconciliation.
//!
//! A webhook is authenticated, parsed into a [`CarrierStatus`], mapped onto
//! the order's canonical delivery state, persisted, recorded as processed,
//! and only then fanned out as notifications. Transitions are monotonic:
//! terminal states absorb later events and lower-ranked targets are stale.

mod reconciler;
mod signature;
mod status;
mod templates;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

use super::order::{CodStatus, OrderId, OrderStatus};
use super::parcel::TrackingNumber;
use super::ports::WebhookEventKey;

pub use reconciler::StatusReconciler;
pub use signature::{SIGNATURE_HEADER, SignatureError, WebhookVerifier};
pub use status::{CarrierStatus, PARCEL_UPDATED_EVENT};
pub use templates::{admin_notification, customer_notification};

/// Parcel fields carried by a webhook. Other fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParcelSnapshot {
    /// Carrier tracking number.
    #[serde(rename = "trackingNumber", alias = "tracking", alias = "tracking_number")]
    pub tracking_number: TrackingNumber,
    /// Current carrier label.
    #[serde(default)]
    pub status: Option<String>,
    /// Previous carrier label, used when `status` is absent.
    #[serde(default, alias = "lastStatus")]
    pub last_status: Option<String>,
}

impl ParcelSnapshot {
    /// Carrier label describing the parcel's state, if any.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.status
            .as_deref()
            .or(self.last_status.as_deref())
            .map(str::trim)
            .filter(|label| !label.is_empty())
    }
}

/// Inbound carrier webhook payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookEvent {
    /// Event name, such as `parcel.delivered`.
    #[serde(alias = "eventType")]
    pub event: String,
    /// Parcel the event is about.
    pub parcel: ParcelSnapshot,
    /// Carrier timestamp, as a string or epoch number.
    #[serde(default)]
    pub timestamp: Option<Value>,
    /// Payload signature for senders that cannot set headers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

impl WebhookEvent {
    /// Status the event reports.
    #[must_use]
    pub fn carrier_status(&self) -> CarrierStatus {
        CarrierStatus::from_event(&self.event, self.parcel.label())
    }

    fn timestamp_text(&self) -> String {
        match &self.timestamp {
            Some(Value::String(text)) => text.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        }
    }

    /// Content covered by the in-payload signature.
    ///
    /// Every field that can influence the reconciled state is included:
    /// `event|tracking|status|last_status|timestamp`, absent fields empty.
    #[must_use]
    pub fn signed_content(&self) -> String {
        format!(
            "{}|{}|{}|{}|{}",
            self.event,
            self.parcel.tracking_number,
            self.parcel.status.as_deref().unwrap_or_default(),
            self.parcel.last_status.as_deref().unwrap_or_default(),
            self.timestamp_text()
        )
    }

    /// Idempotency key: SHA-256 of the signed content, hex encoded.
    ///
    /// Two deliveries share a key only when they report the same event, the
    /// same carrier labels and the same timestamp.
    ///
    /// # Examples
    /// ```
    /// use shipping::domain::reconciliation::WebhookEvent;
    ///
    /// let shipped: WebhookEvent = serde_json::from_str(
    ///     r#"{"event":"parcel.updated","parcel":{"trackingNumber":"T1","status":"Expédié"}}"#,
    /// )?;
    /// let out: WebhookEvent = serde_json::from_str(
    ///     r#"{"event":"parcel.updated","parcel":{"trackingNumber":"T1","status":"Sorti en livraison"}}"#,
    /// )?;
    /// assert_ne!(shipped.key(), out.key());
    /// assert_eq!(shipped.key().as_str().len(), 64);
    /// # Ok::<(), serde_json::Error>(())
    /// ```
    #[must_use]
    pub fn key(&self) -> WebhookEventKey {
        WebhookEventKey::new(hex::encode(Sha256::digest(self.signed_content().as_bytes())))
    }
}

/// Result of processing one webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ReconcileOutcome {
    /// The order was updated and notifications dispatched.
    Applied {
        /// Updated order.
        order_id: OrderId,
        /// New cash-on-delivery state.
        state: CodStatus,
        /// New order status.
        status: OrderStatus,
    },
    /// No order carries the tracking number; nothing changed.
    OrderNotFound {
        /// Tracking number from the event.
        tracking: TrackingNumber,
    },
    /// The event had already been processed; notifications were skipped.
    Duplicate {
        /// Order already reconciled for this event.
        order_id: OrderId,
    },
    /// The event would move the order backwards; it was ignored.
    Stale {
        /// Order left untouched.
        order_id: OrderId,
        /// State the order already holds.
        current: CodStatus,
        /// State the event asked for.
        ignored: CodStatus,
    },
}
