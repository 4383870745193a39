//! The slice of an order that shipping reads and writes.
//!
//! Two lifecycles live side by side: the cash-on-delivery lifecycle
//! ([`CodStatus`]), only populated for COD orders, and the generic order
//! lifecycle ([`OrderStatus`]) which is always derived from the COD-shaped
//! canonical state through a total mapping.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::parcel::TrackingNumber;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw identifier. Surrounding whitespace is trimmed.
            #[must_use]
            pub fn new(raw: impl AsRef<str>) -> Self {
                Self(raw.as_ref().trim().to_owned())
            }

            /// Borrow the raw identifier.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id! {
    /// Store-side order identifier.
    OrderId
}

string_id! {
    /// Customer account identifier used for notifications.
    UserId
}

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    /// Cash collected by the carrier at delivery.
    CashOnDelivery,
    /// Paid before dispatch (card, transfer, ...).
    Prepaid,
}

/// Cash-on-delivery lifecycle. `Delivered`, `Failed`, `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CodStatus {
    /// Awaiting a parcel.
    Pending,
    /// Parcel registered with the carrier.
    Submitted,
    /// Picked up or moving through the network.
    Dispatched,
    /// Handed over and cash collected.
    Delivered,
    /// Delivery failed or the parcel was returned.
    Failed,
    /// Cancelled before delivery.
    Cancelled,
}

impl CodStatus {
    /// Whether no further transition is allowed.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Failed | Self::Cancelled)
    }

    /// Progress rank; terminal states share the highest rank.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::Submitted => 1,
            Self::Dispatched => 2,
            Self::Delivered | Self::Failed | Self::Cancelled => 3,
        }
    }
}

/// Generic order lifecycle shared with the rest of the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Placed, not yet handed to a carrier.
    Pending,
    /// Accepted and registered for shipping.
    Confirmed,
    /// On its way to the customer.
    Shipped,
    /// Received by the customer.
    Delivered,
    /// Abandoned; no delivery will happen.
    Cancelled,
    /// Payment returned to the customer.
    Refunded,
}

impl From<CodStatus> for OrderStatus {
    fn from(value: CodStatus) -> Self {
        match value {
            CodStatus::Pending => Self::Pending,
            CodStatus::Submitted => Self::Confirmed,
            CodStatus::Dispatched => Self::Shipped,
            CodStatus::Delivered => Self::Delivered,
            CodStatus::Failed | CodStatus::Cancelled => Self::Cancelled,
        }
    }
}

/// Order fields relevant to shipping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Store identifier.
    pub id: OrderId,
    /// Customer to notify, absent for guest checkouts.
    pub user_id: Option<UserId>,
    /// How the order is paid.
    pub payment_method: PaymentMethod,
    /// Generic lifecycle status.
    pub status: OrderStatus,
    /// Cash-on-delivery status; `None` for prepaid orders.
    pub cod_status: Option<CodStatus>,
    /// Carrier tracking number once a parcel exists.
    pub tracking_number: Option<TrackingNumber>,
    /// First time the parcel was seen moving.
    pub shipped_at: Option<DateTime<Utc>>,
    /// When the parcel was delivered.
    pub delivered_at: Option<DateTime<Utc>>,
    /// Delivery estimate stamped at dispatch.
    pub estimated_delivery: Option<DateTime<Utc>>,
}

impl Order {
    /// Fresh order awaiting shipment.
    #[must_use]
    pub const fn new(id: OrderId, user_id: Option<UserId>, payment_method: PaymentMethod) -> Self {
        Self {
            id,
            user_id,
            payment_method,
            status: OrderStatus::Pending,
            cod_status: Self::initial_cod_status(payment_method),
            tracking_number: None,
            shipped_at: None,
            delivered_at: None,
            estimated_delivery: None,
        }
    }

    const fn initial_cod_status(payment_method: PaymentMethod) -> Option<CodStatus> {
        match payment_method {
            PaymentMethod::CashOnDelivery => Some(CodStatus::Pending),
            PaymentMethod::Prepaid => None,
        }
    }

    /// Whether the order is paid at delivery.
    #[must_use]
    pub const fn is_cash_on_delivery(&self) -> bool {
        matches!(self.payment_method, PaymentMethod::CashOnDelivery)
    }

    /// Canonical delivery state, whatever the payment method.
    ///
    /// COD orders carry it explicitly; for other orders it is recovered from
    /// the generic status.
    #[must_use]
    pub const fn delivery_state(&self) -> CodStatus {
        if let Some(cod_status) = self.cod_status {
            return cod_status;
        }
        match self.status {
            OrderStatus::Pending => CodStatus::Pending,
            OrderStatus::Confirmed => CodStatus::Submitted,
            OrderStatus::Shipped => CodStatus::Dispatched,
            OrderStatus::Delivered => CodStatus::Delivered,
            OrderStatus::Cancelled | OrderStatus::Refunded => CodStatus::Cancelled,
        }
    }
}

/// Change to an order's tracking number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackingUpdate {
    /// Link the order to a parcel.
    Assign(TrackingNumber),
    /// Forget the parcel.
    Clear,
}

/// Partial order update written by shipping. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderUpdate {
    /// New generic status.
    pub status: Option<OrderStatus>,
    /// New COD status.
    pub cod_status: Option<CodStatus>,
    /// Tracking number change.
    pub tracking_number: Option<TrackingUpdate>,
    /// Dispatch timestamp.
    pub shipped_at: Option<DateTime<Utc>>,
    /// Delivery timestamp.
    pub delivered_at: Option<DateTime<Utc>>,
    /// Delivery estimate.
    pub estimated_delivery: Option<DateTime<Utc>>,
}

impl OrderUpdate {
    /// Move an order to `state`, writing the COD status only for COD orders.
    #[must_use]
    pub fn transition(order: &Order, state: CodStatus) -> Self {
        Self {
            status: Some(OrderStatus::from(state)),
            cod_status: order.is_cash_on_delivery().then_some(state),
            ..Self::default()
        }
    }

    /// Apply the update in place.
    pub fn apply_to(&self, order: &mut Order) {
        if let Some(status) = self.status {
            order.status = status;
        }
        if let Some(cod_status) = self.cod_status {
            order.cod_status = Some(cod_status);
        }
        match &self.tracking_number {
            Some(TrackingUpdate::Assign(tracking)) => {
                order.tracking_number = Some(tracking.clone());
            }
            Some(TrackingUpdate::Clear) => order.tracking_number = None,
            None => {}
        }
        if let Some(at) = self.shipped_at {
            order.shipped_at = Some(at);
        }
        if let Some(at) = self.delivered_at {
            order.delivered_at = Some(at);
        }
        if let Some(at) = self.estimated_delivery {
            order.estimated_delivery = Some(at);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(CodStatus::Pending, OrderStatus::Pending)]
    #[case(CodStatus::Submitted, OrderStatus::Confirmed)]
    #[case(CodStatus::Dispatched, OrderStatus::Shipped)]
    #[case(CodStatus::Delivered, OrderStatus::Delivered)]
    #[case(CodStatus::Failed, OrderStatus::Cancelled)]
    #[case(CodStatus::Cancelled, OrderStatus::Cancelled)]
    fn cod_status_maps_to_generic_status(#[case] cod: CodStatus, #[case] expected: OrderStatus) {
        assert_eq!(OrderStatus::from(cod), expected);
    }

    #[test]
    fn cod_status_is_only_populated_for_cash_on_delivery() {
        let cod = Order::new(OrderId::new("1"), None, PaymentMethod::CashOnDelivery);
        let prepaid = Order::new(OrderId::new("2"), None, PaymentMethod::Prepaid);
        assert_eq!(cod.cod_status, Some(CodStatus::Pending));
        assert_eq!(prepaid.cod_status, None);

        let update = OrderUpdate::transition(&prepaid, CodStatus::Dispatched);
        assert_eq!(update.cod_status, None);
        assert_eq!(update.status, Some(OrderStatus::Shipped));
    }

    #[test]
    fn prepaid_delivery_state_is_recovered_from_generic_status() {
        let mut order = Order::new(OrderId::new("3"), None, PaymentMethod::Prepaid);
        order.status = OrderStatus::Shipped;
        assert_eq!(order.delivery_state(), CodStatus::Dispatched);
    }

    #[test]
    fn apply_clears_tracking_number() {
        let mut order = Order::new(OrderId::new("4"), None, PaymentMethod::CashOnDelivery);
        order.tracking_number = Some(TrackingNumber::new("yal-1"));
        OrderUpdate {
            tracking_number: Some(TrackingUpdate::Clear),
            ..OrderUpdate::default()
        }
        .apply_to(&mut order);
        assert!(order.tracking_number.is_none());
    }
}
