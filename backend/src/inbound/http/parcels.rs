//! Admin parcel endpoints.
//!
//! ```text
//! POST   /api/v1/orders/{order_id}/parcel
//! PATCH  /api/v1/orders/{order_id}/parcel
//! DELETE /api/v1/orders/{order_id}/parcel
//! GET    /api/v1/parcels/{tracking}
//! ```
//!
//! Responses use the `{ ok, data?, error? }` envelope the admin dashboard
//! expects, with the HTTP status still derived from the error code.

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::order::OrderId;
use crate::domain::parcel::{
    ParcelDraft, ParcelPatch, ParcelRecord, Recipient, TrackingNumber, TrackingOrigin,
};
use crate::domain::{Error, TRACE_ID_HEADER};
use crate::inbound::http::error::{client_payload, status_for};
use crate::inbound::http::quotes::DimensionsBody;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Response envelope for admin parcel actions.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    /// Whether the action succeeded.
    pub ok: bool,
    /// Result on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Failure on error.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<ErrorSchema>)]
    pub error: Option<Error>,
}

fn respond<T: Serialize>(result: Result<T, Error>) -> HttpResponse {
    match result {
        Ok(data) => HttpResponse::Ok().json(Envelope {
            ok: true,
            data: Some(data),
            error: None,
        }),
        Err(error) => {
            let payload = client_payload(&error);
            let mut builder = HttpResponse::build(status_for(error.code()));
            if let Some(id) = payload.trace_id() {
                builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
            }
            builder.json(Envelope::<T> {
                ok: false,
                data: None,
                error: Some(payload),
            })
        }
    }
}

/// Parcel as seen by the admin dashboard.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParcelBody {
    /// Carrier tracking number.
    #[schema(example = "yal-123ABC")]
    pub tracking: String,
    /// Printable label, when issued.
    pub label_url: Option<String>,
    /// Carrier status label.
    #[schema(example = "pending")]
    pub status: String,
    /// `carrier` or `mock`.
    #[schema(example = "carrier")]
    pub origin: String,
}

impl From<ParcelRecord> for ParcelBody {
    fn from(record: ParcelRecord) -> Self {
        Self {
            tracking: record.tracking.as_str().to_owned(),
            label_url: record.label_url,
            status: record.status,
            origin: match record.origin {
                TrackingOrigin::Carrier => "carrier",
                TrackingOrigin::Mock => "mock",
            }
            .to_owned(),
        }
    }
}

/// Acknowledgement of a deleted parcel.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeletedParcelBody {
    /// Tracking number of the removed parcel.
    pub tracking: String,
    /// Always `true`.
    pub deleted: bool,
}

/// Recipient of a new parcel.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipientBody {
    /// Given name.
    #[schema(example = "Amina")]
    pub first_name: String,
    /// Family name.
    #[serde(default)]
    pub last_name: String,
    /// Contact phone number.
    #[schema(example = "0555000000")]
    pub phone: String,
    /// Street address.
    #[serde(default)]
    pub address: String,
    /// Region name.
    #[schema(example = "Oran")]
    pub region: String,
    /// Sub-region name.
    #[schema(example = "Bir El Djir")]
    pub sub_region: String,
}

impl From<RecipientBody> for Recipient {
    fn from(value: RecipientBody) -> Self {
        Self {
            first_name: value.first_name,
            last_name: value.last_name,
            phone: value.phone,
            address: value.address,
            region: value.region,
            sub_region: value.sub_region,
        }
    }
}

/// Body of `POST /orders/{order_id}/parcel`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateParcelRequest {
    /// Who receives the parcel.
    pub recipient: RecipientBody,
    /// Contents summary printed on the label.
    #[schema(example = "Starter kit x1")]
    pub product_list: String,
    /// Cash collected at delivery, in DZD.
    #[schema(example = 3200)]
    pub declared_price: u32,
    /// Actual weight in kilograms.
    #[schema(example = 1.5)]
    pub weight_kg: f64,
    /// Package size, when known.
    pub dimensions: Option<DimensionsBody>,
    /// Deliver to a pickup desk instead of the address.
    #[serde(default)]
    pub is_pickup_delivery: bool,
    /// Desk to deliver to.
    pub pickup_point_id: Option<u32>,
    /// The shop absorbs the delivery fee.
    #[serde(default)]
    pub free_shipping: bool,
    /// Declared value is insured.
    #[serde(default)]
    pub insured: bool,
    /// The courier collects an item in exchange.
    #[serde(default)]
    pub has_exchange: bool,
}

impl CreateParcelRequest {
    fn into_draft(self, order_id: OrderId) -> ParcelDraft {
        ParcelDraft {
            order_id,
            recipient: self.recipient.into(),
            product_list: self.product_list,
            declared_price: self.declared_price,
            weight_kg: self.weight_kg,
            dimensions: self.dimensions.map(Into::into),
            is_pickup_delivery: self.is_pickup_delivery,
            pickup_point_id: self.pickup_point_id,
            free_shipping: self.free_shipping,
            insured: self.insured,
            has_exchange: self.has_exchange,
        }
    }
}

/// Body of `PATCH /orders/{order_id}/parcel`. Absent fields stay unchanged.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateParcelRequest {
    /// Given name.
    pub first_name: Option<String>,
    /// Family name.
    pub last_name: Option<String>,
    /// Contact phone number.
    pub phone: Option<String>,
    /// Street address.
    pub address: Option<String>,
    /// Region name.
    pub region: Option<String>,
    /// Sub-region name.
    pub sub_region: Option<String>,
    /// Contents summary.
    pub product_list: Option<String>,
    /// Cash collected at delivery, in DZD.
    pub declared_price: Option<u32>,
    /// Actual weight in kilograms.
    pub weight_kg: Option<f64>,
    /// Length in centimetres.
    pub length_cm: Option<f64>,
    /// Width in centimetres.
    pub width_cm: Option<f64>,
    /// Height in centimetres.
    pub height_cm: Option<f64>,
    /// Deliver to a pickup desk.
    pub is_pickup_delivery: Option<bool>,
    /// Desk to deliver to.
    pub pickup_point_id: Option<u32>,
}

impl From<UpdateParcelRequest> for ParcelPatch {
    fn from(value: UpdateParcelRequest) -> Self {
        Self {
            first_name: value.first_name,
            last_name: value.last_name,
            phone: value.phone,
            address: value.address,
            region: value.region,
            sub_region: value.sub_region,
            product_list: value.product_list,
            declared_price: value.declared_price,
            weight_kg: value.weight_kg,
            length_cm: value.length_cm,
            width_cm: value.width_cm,
            height_cm: value.height_cm,
            is_pickup_delivery: value.is_pickup_delivery,
            pickup_point_id: value.pickup_point_id,
        }
    }
}

/// Create the carrier parcel for an order.
#[utoipa::path(
    post,
    path = "/api/v1/orders/{order_id}/parcel",
    tags = ["parcels"],
    params(("order_id" = String, Path, description = "Order identifier")),
    request_body = CreateParcelRequest,
    responses(
        (status = 200, description = "Parcel created", body = Envelope<ParcelBody>),
        (status = 400, description = "Invalid draft or carrier refusal", body = Envelope<ParcelBody>),
        (status = 404, description = "Unknown order", body = Envelope<ParcelBody>),
        (status = 409, description = "Order already has a parcel", body = Envelope<ParcelBody>),
        (status = 503, description = "Carrier unavailable", body = Envelope<ParcelBody>)
    )
)]
#[post("/orders/{order_id}/parcel")]
pub async fn create_parcel(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<CreateParcelRequest>,
) -> HttpResponse {
    let order_id = OrderId::new(path.into_inner());
    let draft = payload.into_inner().into_draft(order_id.clone());
    respond(
        state
            .parcels
            .create(&order_id, draft)
            .await
            .map(ParcelBody::from),
    )
}

/// Amend the parcel linked to an order.
#[utoipa::path(
    patch,
    path = "/api/v1/orders/{order_id}/parcel",
    tags = ["parcels"],
    params(("order_id" = String, Path, description = "Order identifier")),
    request_body = UpdateParcelRequest,
    responses(
        (status = 200, description = "Parcel updated", body = Envelope<ParcelBody>),
        (status = 400, description = "Empty patch or carrier refusal", body = Envelope<ParcelBody>),
        (status = 404, description = "Order or parcel not found", body = Envelope<ParcelBody>),
        (status = 503, description = "Carrier unavailable", body = Envelope<ParcelBody>)
    )
)]
#[patch("/orders/{order_id}/parcel")]
pub async fn update_parcel(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UpdateParcelRequest>,
) -> HttpResponse {
    let order_id = OrderId::new(path.into_inner());
    let patch = ParcelPatch::from(payload.into_inner());
    respond(
        state
            .parcels
            .update(&order_id, &patch)
            .await
            .map(ParcelBody::from),
    )
}

/// Delete the parcel linked to an order.
#[utoipa::path(
    delete,
    path = "/api/v1/orders/{order_id}/parcel",
    tags = ["parcels"],
    params(("order_id" = String, Path, description = "Order identifier")),
    responses(
        (status = 200, description = "Parcel deleted", body = Envelope<DeletedParcelBody>),
        (status = 404, description = "Order or parcel not found", body = Envelope<DeletedParcelBody>),
        (status = 409, description = "Parcel already final", body = Envelope<DeletedParcelBody>),
        (status = 503, description = "Carrier unavailable", body = Envelope<DeletedParcelBody>)
    )
)]
#[delete("/orders/{order_id}/parcel")]
pub async fn delete_parcel(state: web::Data<HttpState>, path: web::Path<String>) -> HttpResponse {
    let order_id = OrderId::new(path.into_inner());
    respond(
        state
            .parcels
            .delete(&order_id)
            .await
            .map(|tracking| DeletedParcelBody {
                tracking: tracking.as_str().to_owned(),
                deleted: true,
            }),
    )
}

/// Fetch the carrier's view of a parcel.
#[utoipa::path(
    get,
    path = "/api/v1/parcels/{tracking}",
    tags = ["parcels"],
    params(("tracking" = String, Path, description = "Tracking number")),
    responses(
        (status = 200, description = "Parcel", body = Envelope<ParcelBody>),
        (status = 404, description = "Unknown parcel", body = Envelope<ParcelBody>),
        (status = 503, description = "Carrier unavailable", body = Envelope<ParcelBody>)
    )
)]
#[get("/parcels/{tracking}")]
pub async fn get_parcel(state: web::Data<HttpState>, path: web::Path<String>) -> HttpResponse {
    let tracking = TrackingNumber::new(path.into_inner());
    respond(state.parcels.get(&tracking).await.map(ParcelBody::from))
}
