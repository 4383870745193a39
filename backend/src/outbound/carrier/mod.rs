//! Carrier outbound adapters.
//!
//! [`CarrierHttpClient`] speaks to the real carrier when credentials exist;
//! [`OfflineParcelGateway`] stands in for parcel operations when they do not.

mod dto;
mod http_client;
mod normalize;
mod offline_gateway;

use zeroize::Zeroizing;

pub use http_client::CarrierHttpClient;
pub use normalize::{
    DEFAULT_PARCEL_STATUS, NormalizedParcel, ResponseShape, normalize_parcel_response,
};
pub use offline_gateway::{OfflineParcelGateway, mock_tracking_number};

/// Static id/token pair sent with every carrier request.
#[derive(Clone)]
pub struct CarrierCredentials {
    api_id: String,
    api_token: Zeroizing<String>,
}

impl CarrierCredentials {
    /// Pair the two values; `None` when either is absent or blank.
    ///
    /// # Examples
    /// ```
    /// use shipping::outbound::carrier::CarrierCredentials;
    /// use zeroize::Zeroizing;
    ///
    /// assert!(CarrierCredentials::new(Some("id".into()), Some(Zeroizing::new("t".into()))).is_some());
    /// assert!(CarrierCredentials::new(Some("id".into()), Some(Zeroizing::new(" ".into()))).is_none());
    /// assert!(CarrierCredentials::new(None, Some(Zeroizing::new("t".into()))).is_none());
    /// ```
    #[must_use]
    pub fn new(api_id: Option<String>, api_token: Option<Zeroizing<String>>) -> Option<Self> {
        let id = api_id.filter(|id| !id.trim().is_empty())?;
        let token = api_token.filter(|token| !token.trim().is_empty())?;
        Some(Self {
            api_id: id.trim().to_owned(),
            api_token: token,
        })
    }

    pub(crate) fn api_id(&self) -> &str {
        &self.api_id
    }

    pub(crate) fn api_token(&self) -> &str {
        self.api_token.trim()
    }
}

impl std::fmt::Debug for CarrierCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CarrierCredentials")
            .field("api_id", &self.api_id)
            .field("api_token", &"<redacted>")
            .finish()
    }
}
