//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain services and remain testable without I/O.

use std::sync::Arc;

use mockable::Clock;

use crate::config::ShippingConfig;
use crate::domain::geography::{GeographyResolver, Region};
use crate::domain::parcel::ParcelService;
use crate::domain::ports::{
    CarrierDirectory, Notifier, OrderStore, ParcelGateway, UnconfiguredCarrierDirectory,
    WebhookReceiptStore,
};
use crate::domain::pricing::FeeCalculator;
use crate::domain::reconciliation::StatusReconciler;

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    /// `None` when the carrier is not configured.
    pub directory: Option<Arc<dyn CarrierDirectory>>,
    /// Parcel lifecycle gateway.
    pub gateway: Arc<dyn ParcelGateway>,
    /// Order persistence.
    pub orders: Arc<dyn OrderStore>,
    /// Processed webhook keys.
    pub receipts: Arc<dyn WebhookReceiptStore>,
    /// Customer and admin notifications.
    pub notifier: Arc<dyn Notifier>,
    /// Time source.
    pub clock: Arc<dyn Clock>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Region and desk lookups.
    pub geography: GeographyResolver,
    /// Fee quoting.
    pub pricing: FeeCalculator,
    /// Admin parcel actions.
    pub parcels: ParcelService,
    /// Webhook reconciliation.
    pub reconciler: StatusReconciler,
    /// Default quote origin.
    pub origin_region: &'static Region,
}

impl HttpState {
    /// Wire the domain services from their ports and the resolved config.
    #[must_use]
    pub fn new(ports: HttpStatePorts, config: &ShippingConfig) -> Self {
        let HttpStatePorts {
            directory,
            gateway,
            orders,
            receipts,
            notifier,
            clock,
        } = ports;
        let lookup = directory
            .clone()
            .unwrap_or_else(|| Arc::new(UnconfiguredCarrierDirectory));
        Self {
            geography: GeographyResolver::new(lookup),
            pricing: FeeCalculator::select(directory, Arc::clone(&config.zone_table)),
            parcels: ParcelService::new(Arc::clone(&orders), gateway),
            reconciler: StatusReconciler::new(
                orders,
                receipts,
                notifier,
                config.webhook_verifier.clone(),
                clock,
                config.estimated_delivery_days,
            ),
            origin_region: config.origin_region,
        }
    }
}
