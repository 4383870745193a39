//! Domain ports for the hexagonal boundary.
//!
//! Outbound adapters implement these traits; domain services depend only on
//! them.

mod macros;
pub(crate) use macros::define_port_error;

mod carrier_directory;
mod notifier;
mod order_store;
mod parcel_gateway;
mod webhook_receipts;

#[cfg(test)]
pub use carrier_directory::MockCarrierDirectory;
pub use carrier_directory::{
    CarrierDirectory, CarrierDirectoryError, FeeMatrix, UnconfiguredCarrierDirectory,
};
#[cfg(test)]
pub use notifier::MockNotifier;
pub use notifier::{Notification, NotificationKind, Notifier, NotifierError};
#[cfg(test)]
pub use order_store::MockOrderStore;
pub use order_store::{OrderStore, OrderStoreError};
#[cfg(test)]
pub use parcel_gateway::MockParcelGateway;
pub use parcel_gateway::{ParcelGateway, ParcelGatewayError};
#[cfg(test)]
pub use webhook_receipts::MockWebhookReceiptStore;
pub use webhook_receipts::{WebhookEventKey, WebhookReceiptStore, WebhookReceiptStoreError};
