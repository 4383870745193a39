//! Delivery fee quotes.
//!
//! ```text
//! POST /api/v1/shipping/quotes
//! ```
//!
//! When every pricing tier is down the response is 503 with the message
//! "delivery pricing unavailable" so checkout can carry on without a fee.

use actix_web::{post, web};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::Error;
use crate::domain::parcel::Dimensions;
use crate::domain::pricing::{DeliveryMode, FeeQuote, QuoteRequest};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{DeliveryModeSchema, ErrorSchema, FeeQuoteSchema};
use crate::inbound::http::state::HttpState;

/// Parcel size in centimetres.
#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DimensionsBody {
    /// Length.
    #[schema(example = 30.0)]
    pub length_cm: f64,
    /// Width.
    #[schema(example = 20.0)]
    pub width_cm: f64,
    /// Height.
    #[schema(example = 10.0)]
    pub height_cm: f64,
}

impl From<DimensionsBody> for Dimensions {
    fn from(value: DimensionsBody) -> Self {
        Self {
            length_cm: value.length_cm,
            width_cm: value.width_cm,
            height_cm: value.height_cm,
        }
    }
}

/// Quote request body. The origin defaults to the shop's dispatch region.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequestBody {
    /// Region the parcel ships from.
    #[schema(example = "Alger")]
    pub origin_region: Option<String>,
    /// Region the parcel ships to.
    #[schema(example = "Oran")]
    pub destination_region: String,
    /// Sub-region the parcel ships to.
    #[schema(example = "Bir El Djir")]
    pub destination_sub_region: Option<String>,
    /// Actual weight in kilograms.
    #[schema(example = 2.5)]
    pub weight_kg: f64,
    /// Package size, when known.
    pub dimensions: Option<DimensionsBody>,
    /// Home or desk delivery.
    #[schema(value_type = DeliveryModeSchema)]
    pub mode: DeliveryMode,
}

impl QuoteRequestBody {
    fn into_request(self, default_origin: &str) -> QuoteRequest {
        QuoteRequest {
            origin_region: self
                .origin_region
                .filter(|origin| !origin.trim().is_empty())
                .unwrap_or_else(|| default_origin.to_owned()),
            destination_region: self.destination_region,
            destination_sub_region: self.destination_sub_region,
            weight_kg: self.weight_kg,
            dimensions: self.dimensions.map(Dimensions::from),
            mode: self.mode,
        }
    }
}

/// Quote the delivery fee for a parcel.
#[utoipa::path(
    post,
    path = "/api/v1/shipping/quotes",
    tags = ["pricing"],
    request_body = QuoteRequestBody,
    responses(
        (status = 200, description = "Fee quote", body = FeeQuoteSchema),
        (status = 400, description = "Unusable parcel or unknown destination", body = ErrorSchema),
        (status = 503, description = "Delivery pricing unavailable", body = ErrorSchema)
    )
)]
#[post("/shipping/quotes")]
pub async fn create_quote(
    state: web::Data<HttpState>,
    payload: web::Json<QuoteRequestBody>,
) -> ApiResult<web::Json<FeeQuote>> {
    let request = payload.into_inner().into_request(state.origin_region.name);
    let quote = state.pricing.quote(&request).await.map_err(Error::from)?;
    Ok(web::Json(quote))
}
