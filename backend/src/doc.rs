//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! document for the REST API. It registers:
//!
//! - **Paths**: every HTTP endpoint from the inbound layer (geography,
//!   pricing, parcels, webhooks, health)
//! - **Schemas**: domain type wrappers ([`ErrorSchema`], [`FeeQuoteSchema`],
//!   ...) that provide OpenAPI definitions without coupling domain types to
//!   the utoipa framework
//! - **Security**: the webhook signature header
//!
//! The generated document is served at `/api-docs/openapi.json`.

use crate::inbound::http::geography::{
    PickupPointListResponse, RegionListResponse, SubRegionListResponse,
};
use crate::inbound::http::parcels::{
    CreateParcelRequest, DeletedParcelBody, ParcelBody, RecipientBody, UpdateParcelRequest,
};
use crate::inbound::http::quotes::{DimensionsBody, QuoteRequestBody};
use crate::inbound::http::schemas::{
    DataSourceSchema, DeliveryFeesSchema, DeliveryModeSchema, ErrorCodeSchema, ErrorSchema,
    FeeQuoteSchema, PickupPointSchema, ProvenanceSchema, QuoteBreakdownSchema,
    ReconcileOutcomeSchema, RegionSchema, SubRegionSchema,
};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the webhook signature scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "WebhookSignature",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                "X-Webhook-Signature",
                "Hex HMAC-SHA256 of the raw webhook body under the shared secret.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Shipping API",
        description = "Delivery fee quotes, carrier parcel lifecycle, and status webhooks."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::geography::list_regions,
        crate::inbound::http::geography::list_sub_regions,
        crate::inbound::http::geography::list_pickup_points,
        crate::inbound::http::quotes::create_quote,
        crate::inbound::http::parcels::create_parcel,
        crate::inbound::http::parcels::update_parcel,
        crate::inbound::http::parcels::delete_parcel,
        crate::inbound::http::parcels::get_parcel,
        crate::inbound::http::webhooks::receive_carrier_webhook,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        RegionSchema,
        DeliveryFeesSchema,
        SubRegionSchema,
        PickupPointSchema,
        DataSourceSchema,
        RegionListResponse,
        SubRegionListResponse,
        PickupPointListResponse,
        DeliveryModeSchema,
        ProvenanceSchema,
        QuoteBreakdownSchema,
        FeeQuoteSchema,
        DimensionsBody,
        QuoteRequestBody,
        RecipientBody,
        CreateParcelRequest,
        UpdateParcelRequest,
        ParcelBody,
        DeletedParcelBody,
        ReconcileOutcomeSchema,
    )),
    tags(
        (name = "geography", description = "Regions, communes, and pickup desks"),
        (name = "pricing", description = "Delivery fee quotes"),
        (name = "parcels", description = "Admin parcel lifecycle"),
        (name = "webhooks", description = "Carrier status events"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
