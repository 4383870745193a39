//! OpenAPI schema definitions for domain types.
//!
//! Domain types do not derive `ToSchema`. The wrappers here mirror their
//! serialised shape and register under the domain type's path.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Signature verification failed.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The request conflicts with the resource's current state.
    #[schema(rename = "conflict")]
    Conflict,
    /// The carrier or a store is unavailable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message.
    #[schema(example = "delivery pricing unavailable")]
    message: String,
    /// Correlation identifier echoed in the `trace-id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary details.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::pricing::DeliveryMode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::pricing::DeliveryMode)]
pub enum DeliveryModeSchema {
    /// Door-to-door delivery.
    #[schema(rename = "home")]
    Home,
    /// Pickup at a carrier desk.
    #[schema(rename = "desk")]
    Desk,
}

/// OpenAPI schema for [`crate::domain::pricing::Provenance`].
#[derive(ToSchema)]
#[schema(as = crate::domain::pricing::Provenance)]
pub enum ProvenanceSchema {
    /// Carrier fee API.
    #[schema(rename = "live")]
    Live,
    /// Versioned zone fee table.
    #[schema(rename = "cached-table")]
    CachedTable,
    /// Weight-bracket heuristic.
    #[schema(rename = "heuristic")]
    Heuristic,
}

/// OpenAPI schema for [`crate::domain::pricing::QuoteBreakdown`].
#[derive(ToSchema)]
#[schema(as = crate::domain::pricing::QuoteBreakdown, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct QuoteBreakdownSchema {
    #[schema(example = 6.0)]
    billable_weight_kg: f64,
    #[schema(example = 450)]
    base_fee: u32,
    #[schema(example = 50)]
    overweight_fee: u32,
    /// Carrier zone, live quotes only.
    zone: Option<u8>,
    /// Zone table version, cached-table quotes only.
    table_version: Option<String>,
}

/// OpenAPI schema for [`crate::domain::pricing::FeeQuote`].
#[derive(ToSchema)]
#[schema(as = crate::domain::pricing::FeeQuote, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct FeeQuoteSchema {
    #[schema(example = 500)]
    cost: u32,
    #[schema(example = "DZD")]
    currency: String,
    #[schema(example = 3)]
    estimated_days: u8,
    provenance: ProvenanceSchema,
    /// The named sub-region was not found; the first listed one was priced.
    degraded_match: bool,
    breakdown: QuoteBreakdownSchema,
}

/// OpenAPI schema for [`crate::domain::geography::Region`].
#[derive(ToSchema)]
#[schema(as = crate::domain::geography::Region)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct RegionSchema {
    #[schema(example = 16)]
    id: u16,
    #[schema(example = "Alger")]
    name: String,
    #[schema(example = "16")]
    code: String,
}

/// OpenAPI schema for [`crate::domain::geography::DeliveryFees`].
#[derive(ToSchema)]
#[schema(as = crate::domain::geography::DeliveryFees, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct DeliveryFeesSchema {
    express_home: Option<u32>,
    express_desk: Option<u32>,
    economic_home: Option<u32>,
    economic_desk: Option<u32>,
}

/// OpenAPI schema for [`crate::domain::geography::SubRegion`].
#[derive(ToSchema)]
#[schema(as = crate::domain::geography::SubRegion, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct SubRegionSchema {
    id: u32,
    #[schema(example = "Bir El Djir")]
    name: String,
    region_id: u16,
    has_pickup_point: bool,
    fees: DeliveryFeesSchema,
}

/// OpenAPI schema for [`crate::domain::geography::PickupPoint`].
#[derive(ToSchema)]
#[schema(as = crate::domain::geography::PickupPoint, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct PickupPointSchema {
    id: u32,
    #[schema(example = "Stopdesk Bir El Djir")]
    name: String,
    sub_region_id: u32,
    sub_region_name: String,
    region_id: u16,
}

/// OpenAPI schema for [`crate::domain::geography::DataSource`].
#[derive(ToSchema)]
#[schema(as = crate::domain::geography::DataSource)]
pub enum DataSourceSchema {
    /// Live carrier directory.
    #[schema(rename = "carrier")]
    Carrier,
    /// Compiled-in offline catalog.
    #[schema(rename = "offline-catalog")]
    OfflineCatalog,
}

/// OpenAPI schema for [`crate::domain::reconciliation::ReconcileOutcome`].
///
/// Flattened view of the tagged enum; which fields are present depends on
/// `outcome`.
#[derive(ToSchema)]
#[schema(as = crate::domain::reconciliation::ReconcileOutcome)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ReconcileOutcomeSchema {
    /// `applied`, `order_not_found`, `duplicate`, or `stale`.
    #[schema(example = "applied")]
    outcome: String,
    order_id: Option<String>,
    tracking: Option<String>,
    /// New cash-on-delivery state, `applied` only.
    #[schema(example = "DELIVERED")]
    state: Option<String>,
    /// New order status, `applied` only.
    #[schema(example = "DELIVERED")]
    status: Option<String>,
    current: Option<String>,
    ignored: Option<String>,
}
