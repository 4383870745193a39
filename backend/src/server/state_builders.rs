//! Adapter selection for the HTTP state.
//!
//! The carrier-backed or offline adapters are picked once here; nothing
//! downstream re-checks whether credentials exist.

use std::sync::Arc;

use mockable::DefaultClock;
use tracing::{info, warn};

use shipping::config::ShippingConfig;
use shipping::domain::ports::{CarrierDirectory, ParcelGateway};
use shipping::inbound::http::state::{HttpState, HttpStatePorts};
use shipping::outbound::carrier::{CarrierHttpClient, OfflineParcelGateway};
use shipping::outbound::memory::{InMemoryOrderStore, InMemoryWebhookReceipts};
use shipping::outbound::notifier::TracingNotifier;

type CarrierPorts = (Option<Arc<dyn CarrierDirectory>>, Arc<dyn ParcelGateway>);

/// Carrier client when credentials exist, offline gateway otherwise.
fn build_carrier_ports(config: &ShippingConfig) -> std::io::Result<CarrierPorts> {
    let Some(credentials) = config.credentials.clone() else {
        warn!("carrier credentials missing; using offline catalog and mock tracking numbers");
        return Ok((None, Arc::new(OfflineParcelGateway::new())));
    };
    let client = CarrierHttpClient::new(
        config.carrier_base_url.clone(),
        config.carrier_timeout,
        credentials,
        config.origin_region.name,
    )
    .map_err(|e| std::io::Error::other(format!("carrier client setup failed: {e}")))?;
    info!(base_url = %config.carrier_base_url, "carrier client configured");
    let client = Arc::new(client);
    Ok((Some(client.clone()), client))
}

/// Build the HTTP state from the resolved configuration.
///
/// # Errors
/// Returns [`std::io::Error`] when the carrier HTTP client cannot be built.
pub fn build_http_state(config: &ShippingConfig) -> std::io::Result<HttpState> {
    let (directory, gateway) = build_carrier_ports(config)?;
    if !config.webhook_verifier.is_configured() {
        warn!("webhook secret missing; carrier webhooks will be refused");
    }
    Ok(HttpState::new(
        HttpStatePorts {
            directory,
            gateway,
            orders: Arc::new(InMemoryOrderStore::new()),
            receipts: Arc::new(InMemoryWebhookReceipts::new()),
            notifier: Arc::new(TracingNotifier),
            clock: Arc::new(DefaultClock),
        },
        config,
    ))
}
