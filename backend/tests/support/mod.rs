//! Shared wiring for HTTP-level integration tests.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use zeroize::Zeroizing;

use shipping::config::ShippingConfig;
use shipping::domain::geography::resolve_region;
use shipping::domain::pricing::ZoneFeeTable;
use shipping::domain::reconciliation::WebhookVerifier;
use shipping::inbound::http::state::{HttpState, HttpStatePorts};
use shipping::outbound::carrier::OfflineParcelGateway;
use shipping::outbound::memory::{InMemoryOrderStore, InMemoryWebhookReceipts};
use shipping::test_support::{MutableClock, RecordingNotifier};

pub const WEBHOOK_SECRET: &str = "integration-secret";

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0)
        .single()
        .expect("valid fixture time")
}

/// Offline service with observable stores, notifier, and clock.
pub struct Harness {
    pub orders: Arc<InMemoryOrderStore>,
    pub receipts: Arc<InMemoryWebhookReceipts>,
    pub notifier: Arc<RecordingNotifier>,
    pub clock: Arc<MutableClock>,
    pub state: HttpState,
}

pub fn config() -> ShippingConfig {
    ShippingConfig {
        credentials: None,
        carrier_base_url: url::Url::parse("https://carrier.invalid/v1/").expect("static URL"),
        carrier_timeout: Duration::from_secs(1),
        origin_region: resolve_region("Alger").expect("Alger is in the catalog"),
        webhook_verifier: verifier(),
        estimated_delivery_days: 3,
        zone_table: Arc::new(ZoneFeeTable::default()),
        bind_addr: "127.0.0.1:0".parse().expect("static address"),
    }
}

pub fn verifier() -> WebhookVerifier {
    WebhookVerifier::new(Some(Zeroizing::new(WEBHOOK_SECRET.to_owned())))
}

impl Harness {
    pub fn offline() -> Self {
        let orders = Arc::new(InMemoryOrderStore::new());
        let receipts = Arc::new(InMemoryWebhookReceipts::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let clock = Arc::new(MutableClock::new(start_time()));
        let state = HttpState::new(
            HttpStatePorts {
                directory: None,
                gateway: Arc::new(OfflineParcelGateway::new()),
                orders: orders.clone(),
                receipts: receipts.clone(),
                notifier: notifier.clone(),
                clock: clock.clone(),
            },
            &config(),
        );
        Self {
            orders,
            receipts,
            notifier,
            clock,
            state,
        }
    }
}

/// Full API behind the trace middleware, serving `$harness.state`.
macro_rules! api_service {
    ($harness:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($harness.state.clone()))
                .wrap(shipping::Trace)
                .service(shipping::inbound::http::api_scope()),
        )
        .await
    };
}
