//! Normalisation of carrier parcel responses.
//!
//! The carrier answers parcel calls in one of several shapes:
//!
//! ```text
//! [ { "tracking": "yal-1", ... } ]                 array
//! { "ord-7": { "tracking": "yal-1", ... } }        keyed by our order id
//! { "data": [ { "tracking": "yal-1", ... } ] }     paginated envelope
//! { "tracking": "yal-1", "label": "...", ... }     flat object
//! ```
//!
//! [`normalize_parcel_response`] classifies the body and reduces it to one
//! [`ParcelRecord`]; anything else is a `ResponseShape` error carrying the raw
//! body.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::domain::parcel::{ParcelRecord, TrackingNumber, TrackingOrigin};
use crate::domain::ports::ParcelGatewayError;

/// Status reported when the carrier does not send one.
pub const DEFAULT_PARCEL_STATUS: &str = "pending";

/// Which shape a response body had.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// A JSON array of parcels.
    Array,
    /// An object keyed by order id.
    KeyedByOrderId,
    /// An object wrapping the parcel under `data`.
    Envelope,
    /// The parcel object itself.
    Flat,
}

/// A normalised response and the shape it came in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedParcel {
    /// Shape the body arrived in.
    pub shape: ResponseShape,
    /// Extracted parcel.
    pub record: ParcelRecord,
}

#[derive(Debug, Deserialize)]
struct ParcelEntryDto {
    #[serde(default, alias = "tracking_number", alias = "trackingNumber")]
    tracking: Option<String>,
    #[serde(default, alias = "label_url", alias = "labelUrl")]
    label: Option<String>,
    #[serde(default, alias = "last_status")]
    status: Option<String>,
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    message: Option<String>,
}

const ENTRY_MARKERS: [&str; 5] = [
    "tracking",
    "tracking_number",
    "trackingNumber",
    "success",
    "label",
];

/// Reduce a carrier parcel response to one record.
///
/// `order_id` selects the entry of a keyed response; `fallback_tracking` is
/// used when the carrier echoes a parcel without its tracking number (PATCH).
///
/// # Errors
///
/// `Rejected` when the entry reports `success: false`, `NotFound` for an
/// empty list answering a lookup, `ResponseShape` for anything unrecognised.
pub fn normalize_parcel_response(
    body: &[u8],
    order_id: Option<&str>,
    fallback_tracking: Option<&TrackingNumber>,
) -> Result<NormalizedParcel, ParcelGatewayError> {
    let raw = String::from_utf8_lossy(body);
    let shape_error = |message: &str| ParcelGatewayError::response_shape(message, raw.as_ref());

    let value: Value = serde_json::from_slice(body)
        .map_err(|error| shape_error(&format!("invalid JSON: {error}")))?;

    let (shape, entry) = match value {
        Value::Array(items) => (ResponseShape::Array, first_entry(items, fallback_tracking)?),
        Value::Object(mut map) => {
            if let Some(Value::Array(items)) = map.remove("data") {
                (
                    ResponseShape::Envelope,
                    first_entry(items, fallback_tracking)?,
                )
            } else if is_entry(&map) {
                (ResponseShape::Flat, Value::Object(map))
            } else {
                let keyed = order_id
                    .and_then(|id| map.remove(id))
                    .or_else(|| single_value(map))
                    .ok_or_else(|| shape_error("no parcel entry for this order"))?;
                (ResponseShape::KeyedByOrderId, keyed)
            }
        }
        _ => return Err(shape_error("expected a JSON array or object")),
    };

    let entry: ParcelEntryDto = serde_json::from_value(entry)
        .map_err(|error| shape_error(&format!("unexpected parcel entry: {error}")))?;
    if entry.success == Some(false) {
        return Err(ParcelGatewayError::rejected(
            entry
                .message
                .filter(|message| !message.trim().is_empty())
                .unwrap_or_else(|| "carrier refused the parcel".to_owned()),
        ));
    }

    let tracking = entry
        .tracking
        .map(TrackingNumber::new)
        .filter(|tracking| !tracking.as_str().is_empty())
        .or_else(|| fallback_tracking.cloned())
        .ok_or_else(|| shape_error("parcel entry has no tracking number"))?;

    Ok(NormalizedParcel {
        shape,
        record: ParcelRecord {
            tracking,
            label_url: entry.label.filter(|label| !label.trim().is_empty()),
            status: entry
                .status
                .filter(|status| !status.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_PARCEL_STATUS.to_owned()),
            origin: TrackingOrigin::Carrier,
        },
    })
}

fn is_entry(map: &Map<String, Value>) -> bool {
    ENTRY_MARKERS.iter().any(|key| map.contains_key(*key))
}

fn single_value(map: Map<String, Value>) -> Option<Value> {
    let mut values = map.into_iter().map(|(_, value)| value);
    let first = values.next()?;
    values.next().is_none().then_some(first)
}

fn first_entry(
    items: Vec<Value>,
    lookup: Option<&TrackingNumber>,
) -> Result<Value, ParcelGatewayError> {
    items.into_iter().next().ok_or_else(|| {
        ParcelGatewayError::not_found(lookup.map_or_else(String::new, ToString::to_string))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::array(
        r#"[{"tracking":"yal-1A","label":"https://l/1","success":true}]"#,
        ResponseShape::Array
    )]
    #[case::keyed(
        r#"{"ord-7":{"success":true,"order_id":"ord-7","tracking":"yal-1A","label":"https://l/1"}}"#,
        ResponseShape::KeyedByOrderId
    )]
    #[case::flat(
        r#"{"tracking":"yal-1A","label":"https://l/1"}"#,
        ResponseShape::Flat
    )]
    #[case::envelope(
        r#"{"has_more":false,"data":[{"tracking":"yal-1A","label":"https://l/1"}]}"#,
        ResponseShape::Envelope
    )]
    fn every_observed_shape_yields_the_same_record(
        #[case] body: &str,
        #[case] expected: ResponseShape,
    ) {
        let normalized =
            normalize_parcel_response(body.as_bytes(), Some("ord-7"), None).expect("normalise");
        assert_eq!(normalized.shape, expected);
        assert_eq!(
            normalized.record,
            ParcelRecord {
                tracking: TrackingNumber::new("yal-1A"),
                label_url: Some("https://l/1".to_owned()),
                status: DEFAULT_PARCEL_STATUS.to_owned(),
                origin: TrackingOrigin::Carrier,
            }
        );
    }

    #[test]
    fn keyed_response_is_picked_by_order_id() {
        let body = r#"{
            "ord-1": {"tracking":"yal-111"},
            "ord-2": {"tracking":"yal-222","last_status":"En préparation"}
        }"#;
        let normalized =
            normalize_parcel_response(body.as_bytes(), Some("ord-2"), None).expect("normalise");
        assert_eq!(normalized.record.tracking.as_str(), "yal-222");
        assert_eq!(normalized.record.status, "En préparation");
    }

    #[test]
    fn unsuccessful_entry_surfaces_carrier_text() {
        let body = r#"{"ord-7":{"success":false,"message":"commune inconnue"}}"#;
        let error =
            normalize_parcel_response(body.as_bytes(), Some("ord-7"), None).expect_err("rejected");
        assert_eq!(error, ParcelGatewayError::rejected("commune inconnue"));
    }

    #[test]
    fn patch_echo_without_tracking_uses_the_requested_one() {
        let tracking = TrackingNumber::new("yal-9");
        let body = r#"{"label":"https://l/9","status":"Expédié"}"#;
        let normalized =
            normalize_parcel_response(body.as_bytes(), None, Some(&tracking)).expect("normalise");
        assert_eq!(normalized.record.tracking, tracking);
        assert_eq!(normalized.shape, ResponseShape::Flat);
    }

    #[test]
    fn empty_lookup_page_is_not_found() {
        let tracking = TrackingNumber::new("yal-gone");
        let error = normalize_parcel_response(br#"{"data":[]}"#, None, Some(&tracking))
            .expect_err("missing");
        assert_eq!(error, ParcelGatewayError::not_found("yal-gone"));
    }

    #[rstest]
    #[case::not_json("<html>502 Bad Gateway</html>")]
    #[case::scalar("42")]
    #[case::no_tracking(r#"[{"label":"https://l/1"}]"#)]
    #[case::ambiguous_keys(r#"{"a":{"tracking":"1"},"b":{"tracking":"2"}}"#)]
    fn unrecognised_bodies_keep_the_raw_text(#[case] body: &str) {
        let error =
            normalize_parcel_response(body.as_bytes(), Some("ord-7"), None).expect_err("shape");
        match error {
            ParcelGatewayError::ResponseShape { raw_body, .. } => assert_eq!(raw_body, body),
            other => panic!("expected a shape error, got {other:?}"),
        }
    }
}
