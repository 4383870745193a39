//! Reqwest-backed carrier adapter.
//!
//! Owns transport only: auth headers, URL building, status mapping, and
//! decoding. One client serves both the reference-data directory and the
//! parcel lifecycle endpoints.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde_json::Value;
use tracing::{debug, info};

use super::CarrierCredentials;
use super::dto::{CreateParcelDto, FeeMatrixDto, SubRegionListDto, UpdateParcelDto};
use super::normalize::normalize_parcel_response;
use crate::domain::geography::{RegionId, SubRegion};
use crate::domain::parcel::{ParcelDraft, ParcelPatch, ParcelRecord, TrackingNumber};
use crate::domain::ports::{
    CarrierDirectory, CarrierDirectoryError, FeeMatrix, ParcelGateway, ParcelGatewayError,
};

const API_ID_HEADER: &str = "X-API-ID";
const API_TOKEN_HEADER: &str = "X-API-TOKEN";

/// Transport-level failure before it is phrased as a port error.
#[derive(Debug, Clone, PartialEq, Eq)]
enum HttpFailure {
    Transport(String),
    Timeout(String),
    NotFound(String),
    Rejected(String),
}

impl From<HttpFailure> for CarrierDirectoryError {
    fn from(value: HttpFailure) -> Self {
        match value {
            HttpFailure::Transport(message) => Self::transport(message),
            HttpFailure::Timeout(message) => Self::timeout(message),
            HttpFailure::NotFound(message) | HttpFailure::Rejected(message) => {
                Self::rejected(message)
            }
        }
    }
}

fn gateway_error(failure: HttpFailure, tracking: Option<&TrackingNumber>) -> ParcelGatewayError {
    match failure {
        HttpFailure::Transport(message) => ParcelGatewayError::transport(message),
        HttpFailure::Timeout(message) => ParcelGatewayError::timeout(message),
        HttpFailure::NotFound(message) => ParcelGatewayError::not_found(
            tracking.map_or(message, ToString::to_string),
        ),
        HttpFailure::Rejected(message) => ParcelGatewayError::rejected(message),
    }
}

/// Carrier REST client.
pub struct CarrierHttpClient {
    client: Client,
    base_url: Url,
    credentials: CarrierCredentials,
    origin_region: String,
}

impl CarrierHttpClient {
    /// Build a client with an explicit request timeout.
    ///
    /// `origin_region` is sent as the dispatch region of every new parcel.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        base_url: Url,
        timeout: Duration,
        credentials: CarrierCredentials,
        origin_region: impl Into<String>,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            credentials,
            origin_region: origin_region.into(),
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, HttpFailure> {
        endpoint(&self.base_url, segments)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .header(API_ID_HEADER, self.credentials.api_id())
            .header(API_TOKEN_HEADER, self.credentials.api_token())
            .header(reqwest::header::ACCEPT, "application/json")
    }

    /// Send, read the whole body, and map non-success statuses.
    async fn send(&self, request: RequestBuilder) -> Result<Vec<u8>, HttpFailure> {
        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let url = response.url().path().to_owned();
        let body = response.bytes().await.map_err(map_transport_error)?;
        debug!(path = %url, status = status.as_u16(), bytes = body.len(), "carrier response");
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        Ok(body.to_vec())
    }
}

#[async_trait]
impl CarrierDirectory for CarrierHttpClient {
    async fn fetch_sub_regions(
        &self,
        region: RegionId,
        has_pickup: Option<bool>,
    ) -> Result<Vec<SubRegion>, CarrierDirectoryError> {
        let mut query = vec![("region_id", region.to_string())];
        if let Some(has_pickup) = has_pickup {
            query.push(("has_pickup", has_pickup.to_string()));
        }
        let url = self.endpoint(&["subregions"])?;
        let body = self
            .send(self.request(Method::GET, url).query(&query))
            .await?;
        let list: SubRegionListDto = serde_json::from_slice(&body).map_err(|error| {
            CarrierDirectoryError::decode(format!("invalid sub-region payload: {error}"))
        })?;
        Ok(list.into_domain())
    }

    async fn fetch_fee_matrix(
        &self,
        from: RegionId,
        to: RegionId,
    ) -> Result<FeeMatrix, CarrierDirectoryError> {
        let url = self.endpoint(&["fees", ""])?;
        let query = [
            ("from_region_id", from.to_string()),
            ("to_region_id", to.to_string()),
        ];
        let body = self
            .send(self.request(Method::GET, url).query(&query))
            .await?;
        let dto: FeeMatrixDto = serde_json::from_slice(&body).map_err(|error| {
            CarrierDirectoryError::decode(format!("invalid fee payload: {error}"))
        })?;
        Ok(dto.into_domain(to))
    }
}

#[async_trait]
impl ParcelGateway for CarrierHttpClient {
    async fn create(&self, draft: &ParcelDraft) -> Result<ParcelRecord, ParcelGatewayError> {
        draft
            .validate()
            .map_err(ParcelGatewayError::invalid_request)?;
        let url = self
            .endpoint(&["parcels"])
            .map_err(|failure| gateway_error(failure, None))?;
        let body = [CreateParcelDto::new(draft, &self.origin_region)];
        let response = self
            .send(self.request(Method::POST, url).json(&body))
            .await
            .map_err(|failure| gateway_error(failure, None))?;
        let normalized =
            normalize_parcel_response(&response, Some(draft.order_id.as_str()), None)?;
        info!(
            order_id = %draft.order_id,
            tracking = %normalized.record.tracking,
            shape = ?normalized.shape,
            "carrier parcel created"
        );
        Ok(normalized.record)
    }

    async fn update(
        &self,
        tracking: &TrackingNumber,
        patch: &ParcelPatch,
    ) -> Result<ParcelRecord, ParcelGatewayError> {
        if patch.is_empty() {
            return Err(ParcelGatewayError::invalid_request(
                "patch does not change any field",
            ));
        }
        let url = self
            .endpoint(&["parcels", tracking.as_str()])
            .map_err(|failure| gateway_error(failure, Some(tracking)))?;
        let response = self
            .send(
                self.request(Method::PATCH, url)
                    .json(&UpdateParcelDto::from(patch)),
            )
            .await
            .map_err(|failure| gateway_error(failure, Some(tracking)))?;
        Ok(normalize_parcel_response(&response, None, Some(tracking))?.record)
    }

    async fn delete(&self, tracking: &TrackingNumber) -> Result<(), ParcelGatewayError> {
        let url = self
            .endpoint(&["parcels", tracking.as_str()])
            .map_err(|failure| gateway_error(failure, Some(tracking)))?;
        let response = self
            .send(self.request(Method::DELETE, url))
            .await
            .map_err(|failure| gateway_error(failure, Some(tracking)))?;
        if deletion_refused(&response) {
            return Err(ParcelGatewayError::rejected(format!(
                "carrier refused to delete parcel {tracking}"
            )));
        }
        info!(tracking = %tracking, "carrier parcel deleted");
        Ok(())
    }

    async fn get(&self, tracking: &TrackingNumber) -> Result<ParcelRecord, ParcelGatewayError> {
        let url = self
            .endpoint(&["parcels", tracking.as_str()])
            .map_err(|failure| gateway_error(failure, Some(tracking)))?;
        let response = self
            .send(self.request(Method::GET, url))
            .await
            .map_err(|failure| gateway_error(failure, Some(tracking)))?;
        Ok(normalize_parcel_response(&response, None, Some(tracking))?.record)
    }
}

fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, HttpFailure> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| HttpFailure::Transport(format!("carrier base URL {base} cannot be a base")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Whether a delete response explicitly reports `"deleted": false`.
fn deletion_refused(body: &[u8]) -> bool {
    let Ok(value) = serde_json::from_slice::<Value>(body) else {
        return false;
    };
    let refused = |entry: &Value| entry.get("deleted").and_then(Value::as_bool) == Some(false);
    match &value {
        Value::Array(items) => items.iter().any(refused),
        Value::Object(map) => refused(&value) || map.values().any(refused),
        _ => false,
    }
}

fn map_transport_error(error: reqwest::Error) -> HttpFailure {
    if error.is_timeout() {
        HttpFailure::Timeout(error.to_string())
    } else {
        HttpFailure::Transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> HttpFailure {
    let text = carrier_message(body).unwrap_or_else(|| body_preview(body));
    let message = if text.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        text
    };

    match status {
        StatusCode::NOT_FOUND => HttpFailure::NotFound(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => HttpFailure::Timeout(message),
        _ if status.is_client_error() => HttpFailure::Rejected(message),
        _ => HttpFailure::Transport(format!("status {}: {message}", status.as_u16())),
    }
}

/// The carrier's own error text, from `message` or `error.message`.
fn carrier_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    let message = value
        .get("message")
        .or_else(|| value.get("error").and_then(|error| error.get("message")))
        .or_else(|| value.get("error").filter(|error| error.is_string()))?;
    message
        .as_str()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_owned)
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::not_found(StatusCode::NOT_FOUND, "NotFound")]
    #[case::request_timeout(StatusCode::REQUEST_TIMEOUT, "Timeout")]
    #[case::gateway_timeout(StatusCode::GATEWAY_TIMEOUT, "Timeout")]
    #[case::unprocessable(StatusCode::UNPROCESSABLE_ENTITY, "Rejected")]
    #[case::unauthorised(StatusCode::UNAUTHORIZED, "Rejected")]
    #[case::server_error(StatusCode::INTERNAL_SERVER_ERROR, "Transport")]
    #[case::bad_gateway(StatusCode::BAD_GATEWAY, "Transport")]
    fn maps_http_statuses(#[case] status: StatusCode, #[case] expected: &str) {
        let failure = map_status_error(status, br#"{"message":"wilaya inconnue"}"#);
        let kind = match failure {
            HttpFailure::NotFound(_) => "NotFound",
            HttpFailure::Timeout(_) => "Timeout",
            HttpFailure::Rejected(_) => "Rejected",
            HttpFailure::Transport(_) => "Transport",
        };
        assert_eq!(kind, expected);
    }

    #[test]
    fn rejection_carries_the_carrier_text() {
        let failure = map_status_error(
            StatusCode::BAD_REQUEST,
            br#"{"error":{"code":400,"message":"Le numero de telephone est invalide"}}"#,
        );
        assert_eq!(
            gateway_error(failure, None),
            ParcelGatewayError::rejected("Le numero de telephone est invalide")
        );
    }

    #[test]
    fn non_json_bodies_are_previewed() {
        let body = "x".repeat(400);
        let HttpFailure::Rejected(message) = map_status_error(StatusCode::BAD_REQUEST, body.as_bytes())
        else {
            panic!("400 should be a rejection");
        };
        assert_eq!(message.len(), 163);
        assert!(message.ends_with("..."));
    }

    #[test]
    fn not_found_names_the_tracking_number() {
        let tracking = TrackingNumber::new("yal-404");
        let error = gateway_error(HttpFailure::NotFound("gone".to_owned()), Some(&tracking));
        assert_eq!(error, ParcelGatewayError::not_found("yal-404"));
    }

    #[rstest]
    #[case::with_slash("https://api.example.test/v1/")]
    #[case::without_slash("https://api.example.test/v1")]
    fn endpoints_extend_the_base_path(#[case] base: &str) {
        let base = Url::parse(base).expect("url");
        assert_eq!(
            endpoint(&base, &["parcels", "yal-1"]).expect("endpoint").as_str(),
            "https://api.example.test/v1/parcels/yal-1"
        );
        assert_eq!(
            endpoint(&base, &["fees", ""]).expect("endpoint").as_str(),
            "https://api.example.test/v1/fees/"
        );
    }

    #[rstest]
    #[case::array_refused(r#"[{"tracking":"yal-1","deleted":false}]"#, true)]
    #[case::array_deleted(r#"[{"tracking":"yal-1","deleted":true}]"#, false)]
    #[case::keyed_refused(r#"{"yal-1":{"deleted":false}}"#, true)]
    #[case::empty("", false)]
    fn detects_refused_deletions(#[case] body: &str, #[case] refused: bool) {
        assert_eq!(deletion_refused(body.as_bytes()), refused);
    }

    #[test]
    fn directory_folds_not_found_into_rejection() {
        let error = CarrierDirectoryError::from(HttpFailure::NotFound("no such region".to_owned()));
        assert_eq!(error, CarrierDirectoryError::rejected("no such region"));
    }
}
