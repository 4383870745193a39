//! Customer and operator notification texts per carrier status.

use serde_json::json;

use crate::domain::order::OrderId;
use crate::domain::parcel::TrackingNumber;
use crate::domain::ports::{Notification, NotificationKind};

use super::CarrierStatus;

fn payload(
    order_id: &OrderId,
    tracking: &TrackingNumber,
    status: &CarrierStatus,
) -> serde_json::Value {
    json!({
        "orderId": order_id,
        "trackingNumber": tracking,
        "status": status.as_str(),
    })
}

/// Message for the customer who placed the order.
#[must_use]
pub fn customer_notification(
    status: &CarrierStatus,
    order_id: &OrderId,
    tracking: &TrackingNumber,
) -> Notification {
    let (title, message) = match status {
        CarrierStatus::Created => (
            "Parcel registered".to_owned(),
            format!("Your order {order_id} has been handed to the carrier (tracking {tracking})."),
        ),
        CarrierStatus::Dispatched => (
            "Order shipped".to_owned(),
            format!("Your order {order_id} is on its way. Tracking number: {tracking}."),
        ),
        CarrierStatus::InTransit => (
            "Parcel in transit".to_owned(),
            format!("Your parcel {tracking} is moving through the carrier network."),
        ),
        CarrierStatus::OutForDelivery => (
            "Out for delivery".to_owned(),
            format!("Your parcel {tracking} will be delivered today. Please keep your phone nearby."),
        ),
        CarrierStatus::Delivered => (
            "Order delivered".to_owned(),
            format!("Your order {order_id} has been delivered. Thank you for your purchase!"),
        ),
        CarrierStatus::DeliveryFailed => (
            "Delivery attempt failed".to_owned(),
            format!("The carrier could not deliver parcel {tracking}. We will contact you shortly."),
        ),
        CarrierStatus::Returned => (
            "Parcel returned".to_owned(),
            format!("Parcel {tracking} for order {order_id} is being returned to us."),
        ),
        CarrierStatus::Cancelled => (
            "Shipment cancelled".to_owned(),
            format!("The shipment of order {order_id} has been cancelled."),
        ),
        CarrierStatus::Unknown(_) => (
            "Shipment update".to_owned(),
            format!("There is an update on your parcel {tracking}."),
        ),
    };
    Notification {
        kind: NotificationKind::Shipping,
        title,
        message,
        data: payload(order_id, tracking, status),
    }
}

/// Message for operators, only for statuses that may need follow-up.
#[must_use]
pub fn admin_notification(
    status: &CarrierStatus,
    order_id: &OrderId,
    tracking: &TrackingNumber,
) -> Option<Notification> {
    let (kind, title) = match status {
        CarrierStatus::Delivered => (NotificationKind::Shipping, "Parcel delivered"),
        CarrierStatus::Returned => (NotificationKind::Alert, "Parcel returned"),
        CarrierStatus::DeliveryFailed => (NotificationKind::Alert, "Delivery failed"),
        _ => return None,
    };
    Some(Notification {
        kind,
        title: title.to_owned(),
        message: format!("Order {order_id} (tracking {tracking}): {status}"),
        data: payload(order_id, tracking, status),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_status_has_a_customer_message() {
        let order_id = OrderId::new("ord-1");
        let tracking = TrackingNumber::new("YAL-1");
        for status in [
            CarrierStatus::Created,
            CarrierStatus::InTransit,
            CarrierStatus::Dispatched,
            CarrierStatus::OutForDelivery,
            CarrierStatus::Delivered,
            CarrierStatus::DeliveryFailed,
            CarrierStatus::Returned,
            CarrierStatus::Cancelled,
            CarrierStatus::Unknown("mystery".to_owned()),
        ] {
            let notification = customer_notification(&status, &order_id, &tracking);
            assert!(!notification.message.is_empty());
            assert_eq!(notification.data["trackingNumber"], "YAL-1");
            assert_eq!(
                admin_notification(&status, &order_id, &tracking).is_some(),
                status.needs_operator()
            );
        }
    }

    #[test]
    fn returned_parcels_raise_an_alert() {
        let notification = admin_notification(
            &CarrierStatus::Returned,
            &OrderId::new("ord-1"),
            &TrackingNumber::new("YAL-1"),
        )
        .expect("operators are told about returns");
        assert_eq!(notification.kind, NotificationKind::Alert);
    }
}
