//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use mockable::DefaultClock;
use zeroize::Zeroizing;

use crate::config::ShippingConfig;
use crate::domain::geography::resolve_region;
use crate::domain::pricing::ZoneFeeTable;
use crate::domain::reconciliation::WebhookVerifier;
use crate::outbound::carrier::OfflineParcelGateway;
use crate::outbound::memory::{InMemoryOrderStore, InMemoryWebhookReceipts};
use crate::outbound::notifier::TracingNotifier;

use super::state::{HttpState, HttpStatePorts};

/// Webhook signing secret used by the offline test configuration.
pub const TEST_WEBHOOK_SECRET: &str = "test-webhook-secret";

/// Configuration with no carrier credentials and a known webhook secret.
pub fn offline_config() -> ShippingConfig {
    ShippingConfig {
        credentials: None,
        carrier_base_url: url::Url::parse("https://carrier.invalid/v1/")
            .expect("static URL parses"),
        carrier_timeout: std::time::Duration::from_secs(1),
        origin_region: resolve_region("Alger").expect("Alger is in the catalog"),
        webhook_verifier: WebhookVerifier::new(Some(Zeroizing::new(
            TEST_WEBHOOK_SECRET.to_owned(),
        ))),
        estimated_delivery_days: 3,
        zone_table: Arc::new(ZoneFeeTable::default()),
        bind_addr: "127.0.0.1:0".parse().expect("static address parses"),
    }
}

/// State backed by the offline gateway and the given order store.
pub fn offline_state_with(orders: Arc<InMemoryOrderStore>) -> HttpState {
    HttpState::new(
        HttpStatePorts {
            directory: None,
            gateway: Arc::new(OfflineParcelGateway::new()),
            orders,
            receipts: Arc::new(InMemoryWebhookReceipts::new()),
            notifier: Arc::new(TracingNotifier),
            clock: Arc::new(DefaultClock),
        },
        &offline_config(),
    )
}

/// State with no carrier and no orders.
pub fn offline_state() -> HttpState {
    offline_state_with(Arc::new(InMemoryOrderStore::new()))
}
