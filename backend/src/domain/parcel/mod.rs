//! Carrier parcels: create drafts, partial patches, and the canonical record
//! every carrier response is normalised into.

mod service;

use serde::{Deserialize, Serialize};

use super::order::OrderId;

pub use service::ParcelService;

/// Prefix marking tracking numbers minted by the offline gateway.
pub const MOCK_TRACKING_PREFIX: &str = "MOCK-";

/// Carrier-assigned tracking number. Immutable once assigned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackingNumber(String);

impl TrackingNumber {
    /// Wrap a raw tracking number; surrounding whitespace is trimmed.
    #[must_use]
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_owned())
    }

    /// Borrow the raw value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the value was minted by the offline gateway.
    #[must_use]
    pub fn is_mock(&self) -> bool {
        self.0.starts_with(MOCK_TRACKING_PREFIX)
    }
}

impl std::fmt::Display for TrackingNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Who minted a tracking number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrackingOrigin {
    /// Real carrier parcel.
    Carrier,
    /// Offline stand-in; never shipped.
    Mock,
}

/// Canonical result of every parcel operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParcelRecord {
    /// Tracking number the parcel is addressed by.
    pub tracking: TrackingNumber,
    /// Printable label, when the carrier issued one.
    pub label_url: Option<String>,
    /// Carrier status label, `pending` when none was reported.
    pub status: String,
    /// Who minted the tracking number.
    pub origin: TrackingOrigin,
}

/// Physical size in centimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Length in centimetres.
    pub length_cm: f64,
    /// Width in centimetres.
    pub width_cm: f64,
    /// Height in centimetres.
    pub height_cm: f64,
}

impl Dimensions {
    /// Volume in cubic centimetres.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "sides are fractional centimetres")]
    pub fn volume_cm3(&self) -> f64 {
        self.length_cm * self.width_cm * self.height_cm
    }

    /// Whether every side is finite and non-negative.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        [self.length_cm, self.width_cm, self.height_cm]
            .into_iter()
            .all(|side| side.is_finite() && side >= 0.0)
    }
}

/// Recipient snapshot sent to the carrier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipient {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact phone number.
    pub phone: String,
    /// Street address.
    pub address: String,
    /// Destination region name.
    pub region: String,
    /// Destination commune name.
    pub sub_region: String,
}

/// Everything needed to create a carrier parcel for an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParcelDraft {
    /// Order the parcel ships.
    pub order_id: OrderId,
    /// Who receives it.
    pub recipient: Recipient,
    /// Free-text description of the contents.
    pub product_list: String,
    /// Cash the carrier collects at delivery.
    pub declared_price: u32,
    /// Actual weight in kilograms.
    pub weight_kg: f64,
    /// Outer dimensions, when measured.
    pub dimensions: Option<Dimensions>,
    /// Whether the recipient collects from a desk.
    pub is_pickup_delivery: bool,
    /// Desk for pickup delivery.
    pub pickup_point_id: Option<u32>,
    /// Whether the shop pays the delivery fee.
    #[serde(default)]
    pub free_shipping: bool,
    /// Whether the declared value is insured.
    #[serde(default)]
    pub insured: bool,
    /// Whether the courier collects an item in exchange.
    #[serde(default)]
    pub has_exchange: bool,
}

impl ParcelDraft {
    /// Validate the draft before it leaves the process.
    ///
    /// # Errors
    ///
    /// Returns a human-readable reason when a field is unusable.
    pub fn validate(&self) -> Result<(), String> {
        if self.order_id.as_str().is_empty() {
            return Err("order id must not be empty".to_owned());
        }
        let required = [
            ("recipient.firstName", &self.recipient.first_name),
            ("recipient.phone", &self.recipient.phone),
            ("recipient.region", &self.recipient.region),
            ("recipient.subRegion", &self.recipient.sub_region),
        ];
        if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(format!("{field} must not be blank"));
        }
        if !self.weight_kg.is_finite() || self.weight_kg <= 0.0 {
            return Err("weight must be a positive number of kilograms".to_owned());
        }
        if self.dimensions.is_some_and(|dims| !dims.is_valid()) {
            return Err("dimensions must be finite and non-negative".to_owned());
        }
        if self.is_pickup_delivery && self.pickup_point_id.is_none() {
            return Err("pickup delivery requires a pickup point".to_owned());
        }
        Ok(())
    }
}

/// Partial update accepted by the carrier's PATCH endpoint.
///
/// Create-only fields (order id, origin region, insurance) are not
/// representable; fields left `None` are never sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParcelPatch {
    /// New given name.
    pub first_name: Option<String>,
    /// New family name.
    pub last_name: Option<String>,
    /// New phone number.
    pub phone: Option<String>,
    /// New street address.
    pub address: Option<String>,
    /// New destination region.
    pub region: Option<String>,
    /// New destination commune.
    pub sub_region: Option<String>,
    /// New contents description.
    pub product_list: Option<String>,
    /// New cash amount to collect.
    pub declared_price: Option<u32>,
    /// New weight in kilograms.
    pub weight_kg: Option<f64>,
    /// New length in centimetres.
    pub length_cm: Option<f64>,
    /// New width in centimetres.
    pub width_cm: Option<f64>,
    /// New height in centimetres.
    pub height_cm: Option<f64>,
    /// Switch between home and desk delivery.
    pub is_pickup_delivery: Option<bool>,
    /// New pickup desk.
    pub pickup_point_id: Option<u32>,
}

impl ParcelPatch {
    /// Whether the patch would change nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> ParcelDraft {
        ParcelDraft {
            order_id: OrderId::new("ord-1"),
            recipient: Recipient {
                first_name: "Amina".to_owned(),
                last_name: "Haddad".to_owned(),
                phone: "0555000000".to_owned(),
                address: "12 rue Didouche Mourad".to_owned(),
                region: "Alger".to_owned(),
                sub_region: "Alger Centre".to_owned(),
            },
            product_list: "Course bundle".to_owned(),
            declared_price: 4_500,
            weight_kg: 1.2,
            dimensions: None,
            is_pickup_delivery: false,
            pickup_point_id: None,
            free_shipping: false,
            insured: false,
            has_exchange: false,
        }
    }

    #[test]
    fn valid_draft_passes() {
        assert_eq!(draft().validate(), Ok(()));
    }

    #[test]
    fn pickup_delivery_needs_a_pickup_point() {
        let mut draft = draft();
        draft.is_pickup_delivery = true;
        assert!(draft.validate().is_err());
        draft.pickup_point_id = Some(1601);
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_weight_and_negative_sides() {
        let mut zero = draft();
        zero.weight_kg = 0.0;
        assert!(zero.validate().is_err());

        let mut negative = draft();
        negative.dimensions = Some(Dimensions {
            length_cm: -1.0,
            width_cm: 10.0,
            height_cm: 10.0,
        });
        assert!(negative.validate().is_err());
    }

    #[test]
    fn mock_tracking_numbers_are_recognisable() {
        assert!(TrackingNumber::new("MOCK-abc").is_mock());
        assert!(!TrackingNumber::new("yal-ABC123").is_mock());
    }

    #[test]
    fn default_patch_is_empty() {
        assert!(ParcelPatch::default().is_empty());
        let patch = ParcelPatch {
            phone: Some("0666".to_owned()),
            ..ParcelPatch::default()
        };
        assert!(!patch.is_empty());
    }
}
