//! Carrier wire DTOs.
//!
//! Outgoing bodies are built from domain drafts and patches; incoming
//! reference data is decoded here and mapped into domain records in one pass.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::geography::{DeliveryFees, RegionId, SubRegion};
use crate::domain::parcel::{ParcelDraft, ParcelPatch};
use crate::domain::ports::FeeMatrix;

/// One element of the `POST /parcels` array body.
#[derive(Debug, Serialize)]
pub(super) struct CreateParcelDto<'a> {
    order_id: &'a str,
    from_wilaya_name: &'a str,
    firstname: &'a str,
    familyname: &'a str,
    contact_phone: &'a str,
    address: &'a str,
    to_commune_name: &'a str,
    to_wilaya_name: &'a str,
    product_list: &'a str,
    price: u32,
    do_insurance: bool,
    declared_value: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    length: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    height: Option<f64>,
    weight: f64,
    freeshipping: bool,
    is_stopdesk: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    stopdesk_id: Option<u32>,
    has_exchange: bool,
}

impl<'a> CreateParcelDto<'a> {
    pub(super) fn new(draft: &'a ParcelDraft, origin_region: &'a str) -> Self {
        let recipient = &draft.recipient;
        Self {
            order_id: draft.order_id.as_str(),
            from_wilaya_name: origin_region,
            firstname: &recipient.first_name,
            familyname: &recipient.last_name,
            contact_phone: &recipient.phone,
            address: &recipient.address,
            to_commune_name: &recipient.sub_region,
            to_wilaya_name: &recipient.region,
            product_list: &draft.product_list,
            price: draft.declared_price,
            do_insurance: draft.insured,
            declared_value: if draft.insured { draft.declared_price } else { 0 },
            length: draft.dimensions.map(|dims| dims.length_cm),
            width: draft.dimensions.map(|dims| dims.width_cm),
            height: draft.dimensions.map(|dims| dims.height_cm),
            weight: draft.weight_kg,
            freeshipping: draft.free_shipping,
            is_stopdesk: draft.is_pickup_delivery,
            stopdesk_id: draft.pickup_point_id.filter(|_| draft.is_pickup_delivery),
            has_exchange: draft.has_exchange,
        }
    }
}

/// `PATCH /parcels/{tracking}` body. Only fields the caller set are sent.
#[derive(Debug, Default, Serialize)]
pub(super) struct UpdateParcelDto<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    firstname: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    familyname: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    contact_phone: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    address: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    to_wilaya_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    to_commune_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    product_list: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    price: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    length: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    is_stopdesk: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stopdesk_id: Option<u32>,
}

impl<'a> From<&'a ParcelPatch> for UpdateParcelDto<'a> {
    fn from(patch: &'a ParcelPatch) -> Self {
        Self {
            firstname: patch.first_name.as_deref(),
            familyname: patch.last_name.as_deref(),
            contact_phone: patch.phone.as_deref(),
            address: patch.address.as_deref(),
            to_wilaya_name: patch.region.as_deref(),
            to_commune_name: patch.sub_region.as_deref(),
            product_list: patch.product_list.as_deref(),
            price: patch.declared_price,
            weight: patch.weight_kg,
            length: patch.length_cm,
            width: patch.width_cm,
            height: patch.height_cm,
            is_stopdesk: patch.is_pickup_delivery,
            stopdesk_id: patch.pickup_point_id,
        }
    }
}

/// Carrier booleans arrive as `true`/`false` or `0`/`1`.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
enum FlagDto {
    Bool(bool),
    Int(i64),
}

impl FlagDto {
    fn is_set(self) -> bool {
        match self {
            Self::Bool(value) => value,
            Self::Int(value) => value != 0,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct SubRegionDto {
    id: u32,
    name: String,
    #[serde(alias = "wilaya_id")]
    region_id: u16,
    #[serde(default, alias = "has_stop_desk", alias = "has_pickup_point")]
    has_pickup: Option<FlagDto>,
}

/// Listing endpoints answer with a bare array or a paginated `data` envelope.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum SubRegionListDto {
    Page { data: Vec<SubRegionDto> },
    Bare(Vec<SubRegionDto>),
}

impl SubRegionListDto {
    pub(super) fn into_domain(self) -> Vec<SubRegion> {
        let items = match self {
            Self::Page { data } => data,
            Self::Bare(items) => items,
        };
        items
            .into_iter()
            .map(|dto| SubRegion {
                id: dto.id,
                name: dto.name,
                region_id: RegionId(dto.region_id),
                has_pickup_point: dto.has_pickup.is_some_and(FlagDto::is_set),
                fees: DeliveryFees::default(),
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct CommuneFeeDto {
    commune_id: u32,
    commune_name: String,
    #[serde(default)]
    express_home: Option<u32>,
    #[serde(default)]
    express_desk: Option<u32>,
    #[serde(default)]
    economic_home: Option<u32>,
    #[serde(default)]
    economic_desk: Option<u32>,
}

/// `per_commune` is either a list or a map keyed by commune id.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PerCommuneDto {
    List(Vec<CommuneFeeDto>),
    Keyed(BTreeMap<String, CommuneFeeDto>),
}

/// `GET /fees/` response.
#[derive(Debug, Deserialize)]
pub(super) struct FeeMatrixDto {
    zone: u8,
    #[serde(default)]
    retour_fee: u32,
    #[serde(default)]
    cod_percentage: f64,
    #[serde(default)]
    insurance_percentage: f64,
    #[serde(default)]
    oversize_fee: u32,
    per_commune: PerCommuneDto,
}

impl FeeMatrixDto {
    pub(super) fn into_domain(self, destination: RegionId) -> FeeMatrix {
        let communes = match self.per_commune {
            PerCommuneDto::List(items) => items,
            PerCommuneDto::Keyed(map) => map.into_values().collect(),
        };
        let sub_regions = communes
            .into_iter()
            .map(|commune| {
                let fees = DeliveryFees {
                    express_home: commune.express_home,
                    express_desk: commune.express_desk,
                    economic_home: commune.economic_home,
                    economic_desk: commune.economic_desk,
                };
                SubRegion {
                    id: commune.commune_id,
                    name: commune.commune_name,
                    region_id: destination,
                    has_pickup_point: fees.express_desk.is_some() || fees.economic_desk.is_some(),
                    fees,
                }
            })
            .collect();
        FeeMatrix {
            zone: self.zone,
            return_fee: self.retour_fee,
            cod_percentage: self.cod_percentage,
            insurance_percentage: self.insurance_percentage,
            oversize_fee_per_kg: self.oversize_fee,
            sub_regions,
        }
    }
}
