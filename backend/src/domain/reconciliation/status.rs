//! Carrier status vocabulary and the total maps onto order lifecycles.

use crate::domain::geography::normalise_name;
use crate::domain::order::{CodStatus, OrderStatus};

/// Status a carrier event reports for a parcel.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CarrierStatus {
    /// Parcel registered with the carrier.
    Created,
    /// Moving between hubs.
    InTransit,
    /// Left the origin hub.
    Dispatched,
    /// With the courier for the final leg.
    OutForDelivery,
    /// Handed to the customer.
    Delivered,
    /// Delivery attempt failed.
    DeliveryFailed,
    /// Sent back to the shop.
    Returned,
    /// Cancelled before delivery.
    Cancelled,
    /// Anything the vocabulary does not cover, kept verbatim for logs.
    Unknown(String),
}

/// Event name sent when the carrier changes a parcel without naming the new
/// state; the snapshot's status label carries it instead.
pub const PARCEL_UPDATED_EVENT: &str = "parcel.updated";

impl CarrierStatus {
    /// Interpret an event name, consulting the snapshot label for
    /// `parcel.updated`.
    ///
    /// # Examples
    /// ```
    /// use shipping::domain::reconciliation::CarrierStatus;
    ///
    /// assert_eq!(CarrierStatus::from_event("parcel.delivered", None), CarrierStatus::Delivered);
    /// assert_eq!(
    ///     CarrierStatus::from_event("parcel.updated", Some("Sorti en livraison")),
    ///     CarrierStatus::OutForDelivery
    /// );
    /// assert_eq!(
    ///     CarrierStatus::from_event("parcel.teleported", None),
    ///     CarrierStatus::Unknown("parcel.teleported".to_owned())
    /// );
    /// ```
    #[must_use]
    pub fn from_event(event: &str, snapshot_label: Option<&str>) -> Self {
        let name = event.trim();
        if name == PARCEL_UPDATED_EVENT {
            return snapshot_label.map_or_else(|| Self::Unknown(name.to_owned()), Self::from_label);
        }
        name.strip_prefix("parcel.")
            .and_then(Self::from_keyword)
            .unwrap_or_else(|| Self::Unknown(name.to_owned()))
    }

    fn from_keyword(keyword: &str) -> Option<Self> {
        let status = match keyword {
            "created" => Self::Created,
            "in_transit" => Self::InTransit,
            "dispatched" => Self::Dispatched,
            "out_for_delivery" => Self::OutForDelivery,
            "delivered" => Self::Delivered,
            "delivery_failed" | "failed" => Self::DeliveryFailed,
            "returned" => Self::Returned,
            "cancelled" => Self::Cancelled,
            _ => return None,
        };
        Some(status)
    }

    /// Interpret a carrier status label, French or keyword form.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        let normalised = normalise_name(label);
        if let Some(status) = Self::from_keyword(&normalised.replace(' ', "_")) {
            return status;
        }
        match normalised.as_str() {
            "en preparation" | "pret a expedier" | "en attente du ramassage" => Self::Created,
            "expedie" | "ramasse" => Self::Dispatched,
            "centre" | "transfert" | "vers wilaya" | "recu a wilaya" | "en localisation" => {
                Self::InTransit
            }
            "sorti en livraison" | "en attente du client" => Self::OutForDelivery,
            "livre" | "livre non encaisse" => Self::Delivered,
            "echec livraison" | "tentative echouee" => Self::DeliveryFailed,
            "retourne au vendeur" | "retour vers vendeur" | "retourne" => Self::Returned,
            "annule" | "supprime" => Self::Cancelled,
            _ => Self::Unknown(label.trim().to_owned()),
        }
    }

    /// Canonical delivery state. Unknown statuses fall back to `SUBMITTED`.
    #[must_use]
    pub fn cod_status(&self) -> CodStatus {
        match self {
            Self::Created | Self::Unknown(_) => CodStatus::Submitted,
            Self::InTransit | Self::Dispatched | Self::OutForDelivery => CodStatus::Dispatched,
            Self::Delivered => CodStatus::Delivered,
            Self::DeliveryFailed | Self::Returned => CodStatus::Failed,
            Self::Cancelled => CodStatus::Cancelled,
        }
    }

    /// Generic order status, always derived through [`Self::cod_status`].
    #[must_use]
    pub fn order_status(&self) -> OrderStatus {
        OrderStatus::from(self.cod_status())
    }

    /// Whether operators must be told about this status.
    #[must_use]
    pub fn needs_operator(&self) -> bool {
        matches!(
            self,
            Self::Delivered | Self::Returned | Self::DeliveryFailed
        )
    }

    /// Whether the status is outside the known vocabulary.
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown(_))
    }

    /// Stable short name for logs and notification payloads.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Created => "created",
            Self::InTransit => "in_transit",
            Self::Dispatched => "dispatched",
            Self::OutForDelivery => "out_for_delivery",
            Self::Delivered => "delivered",
            Self::DeliveryFailed => "delivery_failed",
            Self::Returned => "returned",
            Self::Cancelled => "cancelled",
            Self::Unknown(raw) => raw,
        }
    }
}

impl std::fmt::Display for CarrierStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
