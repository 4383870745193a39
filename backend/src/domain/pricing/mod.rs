//! Shipping fee calculation.
//!
//! A quote is produced by the first tier of an ordered chain that succeeds:
//! the live carrier fee matrix, then a versioned zone table, then a weight
//! bracket heuristic. The chain is chosen once when the calculator is built;
//! every quote records the tier that produced it in [`Provenance`].

mod calculator;
mod tiers;
mod weight;
mod zone_table;

use serde::{Deserialize, Serialize};

use super::parcel::Dimensions;

pub use calculator::FeeCalculator;
pub use tiers::{
    FeeTier, HEURISTIC_ESTIMATED_DAYS, HEURISTIC_HOME_PRICES, HeuristicTier, LiveFeeTier,
    PricingInput, TierFailure, ZoneTableTier,
};
pub use weight::{
    OVERWEIGHT_THRESHOLD_KG, VOLUMETRIC_FACTOR, WeightBracket, billable_weight, overweight_fee,
};
pub use zone_table::{ZoneBrackets, ZoneFeeTable, ZoneFeeTableError, ZoneRegion};

/// Currency of every quote.
pub const CURRENCY: &str = "DZD";

/// Where the parcel is handed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMode {
    /// Courier delivers to the recipient's address.
    Home,
    /// Recipient collects from a carrier desk (stopdesk).
    Desk,
}

impl std::fmt::Display for DeliveryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Home => f.write_str("home"),
            Self::Desk => f.write_str("desk"),
        }
    }
}

/// Which tier produced a quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Provenance {
    /// Priced from the carrier's live fee matrix.
    Live,
    /// Priced from the versioned zone table.
    CachedTable,
    /// Priced from weight brackets alone.
    Heuristic,
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Live => f.write_str("live"),
            Self::CachedTable => f.write_str("cached-table"),
            Self::Heuristic => f.write_str("heuristic"),
        }
    }
}

/// Caller-facing quote request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    /// Dispatch region name, id, or code.
    pub origin_region: String,
    /// Destination region name, id, or code.
    pub destination_region: String,
    /// Destination commune, when known.
    pub destination_sub_region: Option<String>,
    /// Actual weight in kilograms.
    pub weight_kg: f64,
    /// Outer dimensions for volumetric weight.
    pub dimensions: Option<Dimensions>,
    /// Home or desk delivery.
    pub mode: DeliveryMode,
}

/// How a quote's cost was composed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteBreakdown {
    /// Greater of actual and volumetric weight.
    pub billable_weight_kg: f64,
    /// Fee before the overweight surcharge.
    pub base_fee: u32,
    /// Surcharge above the overweight threshold.
    pub overweight_fee: u32,
    /// Carrier zone, when the tier knows it.
    pub zone: Option<u8>,
    /// Zone table version, for cached-table quotes.
    pub table_version: Option<String>,
}

/// A computed delivery price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeQuote {
    /// Total price in [`CURRENCY`] units.
    pub cost: u32,
    /// Always [`CURRENCY`].
    pub currency: String,
    /// Expected transit time in days.
    pub estimated_days: u8,
    /// Tier that produced the quote.
    pub provenance: Provenance,
    /// Set when the requested sub-region was not found and the first entry of
    /// the live fee matrix was used instead.
    pub degraded_match: bool,
    /// How the cost was composed.
    pub breakdown: QuoteBreakdown,
}

/// Reasons a quote cannot be produced.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PricingError {
    /// No tier could resolve the destination.
    #[error("no delivery available to {destination}")]
    NoDeliveryAvailable {
        /// Destination as the caller wrote it.
        destination: String,
    },
    /// The carrier does not offer the mode in that sub-region.
    #[error("{mode} delivery is not available in {sub_region}")]
    ModeUnavailable {
        /// Sub-region whose fee entry lacks the mode.
        sub_region: String,
        /// Requested mode.
        mode: DeliveryMode,
    },
    /// The origin region is not part of the catalog.
    #[error("unknown origin region: {origin}")]
    UnknownOrigin {
        /// Origin as configured or requested.
        origin: String,
    },
    /// Weight or dimensions are unusable.
    #[error("invalid parcel: {message}")]
    InvalidParcel {
        /// What is wrong with the parcel.
        message: String,
    },
    /// Every tier was unavailable.
    #[error("delivery pricing unavailable: {message}")]
    Unavailable {
        /// Why the last tier gave up.
        message: String,
    },
}

impl From<PricingError> for super::Error {
    fn from(value: PricingError) -> Self {
        use serde_json::json;

        match &value {
            PricingError::NoDeliveryAvailable { destination } => {
                Self::invalid_request(value.to_string()).with_details(json!({
                    "code": "no_delivery_available",
                    "destination": destination,
                }))
            }
            PricingError::ModeUnavailable { sub_region, mode } => {
                Self::invalid_request(value.to_string()).with_details(json!({
                    "code": "mode_unavailable",
                    "subRegion": sub_region,
                    "mode": mode,
                }))
            }
            PricingError::UnknownOrigin { .. } | PricingError::InvalidParcel { .. } => {
                Self::invalid_request(value.to_string())
            }
            PricingError::Unavailable { .. } => {
                Self::service_unavailable("delivery pricing unavailable")
            }
        }
    }
}
