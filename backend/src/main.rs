//! Service entry-point: loads configuration, wires adapters, and serves the
//! REST API.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use shipping::config::ShippingSettings;
use shipping::inbound::http::health::HealthState;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ShippingSettings::load().map_err(|e| {
        error!(error = %e, "configuration could not be loaded");
        std::io::Error::other(format!("configuration could not be loaded: {e}"))
    })?;
    let config = settings.resolve().map_err(|e| {
        error!(error = %e, "configuration rejected");
        std::io::Error::other(e)
    })?;
    info!(
        bind_addr = %config.bind_addr,
        origin_region = config.origin_region.name,
        carrier_configured = config.credentials.is_some(),
        "starting shipping service"
    );

    let health_state = web::Data::new(HealthState::new());
    server::create_server(health_state, &config)?.await
}
