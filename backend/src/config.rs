//! Service configuration loaded once at startup via OrthoConfig.
//!
//! [`ShippingSettings`] is the raw layered input (CLI, `SHIPPING_*`
//! environment, config file). [`ShippingSettings::resolve`] validates it into
//! the immutable [`ShippingConfig`] handed to every component; nothing else
//! reads the environment.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;
use zeroize::Zeroizing;

use crate::domain::geography::{Region, resolve_region};
use crate::domain::pricing::{ZoneFeeTable, ZoneFeeTableError};
use crate::domain::reconciliation::WebhookVerifier;
use crate::outbound::carrier::CarrierCredentials;

const DEFAULT_CARRIER_BASE_URL: &str = "https://api.yalidine.app/v1/";
const DEFAULT_CARRIER_TIMEOUT_SECONDS: u64 = 10;
const DEFAULT_ORIGIN_REGION: &str = "Alger";
const DEFAULT_ESTIMATED_DELIVERY_DAYS: u32 = 3;
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Raw configuration values.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SHIPPING")]
pub struct ShippingSettings {
    /// Carrier API id (`X-API-ID`).
    pub carrier_api_id: Option<String>,
    /// Carrier API token (`X-API-TOKEN`).
    pub carrier_api_token: Option<String>,
    /// Carrier REST base URL.
    pub carrier_base_url: Option<String>,
    /// Per-request carrier timeout.
    pub carrier_timeout_seconds: Option<u64>,
    /// Region parcels are dispatched from.
    pub origin_region: Option<String>,
    /// Shared HMAC secret for carrier webhooks.
    pub webhook_secret: Option<String>,
    /// Days added to the dispatch time for the delivery estimate.
    pub estimated_delivery_days: Option<u32>,
    /// Path of a JSON zone fee table replacing the built-in one.
    pub zone_table_path: Option<PathBuf>,
    /// Socket address the HTTP server binds.
    pub bind_addr: Option<String>,
}

impl std::fmt::Debug for ShippingSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShippingSettings")
            .field("carrier_api_id", &self.carrier_api_id)
            .field("carrier_api_token", &self.carrier_api_token.as_ref().map(|_| "<redacted>"))
            .field("carrier_base_url", &self.carrier_base_url)
            .field("carrier_timeout_seconds", &self.carrier_timeout_seconds)
            .field("origin_region", &self.origin_region)
            .field("webhook_secret", &self.webhook_secret.as_ref().map(|_| "<redacted>"))
            .field("estimated_delivery_days", &self.estimated_delivery_days)
            .field("zone_table_path", &self.zone_table_path)
            .field("bind_addr", &self.bind_addr)
            .finish()
    }
}

/// Why the settings cannot be turned into a runnable configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The carrier base URL does not parse.
    #[error("invalid carrier base URL {value:?}: {source}")]
    BaseUrl {
        /// Rejected value.
        value: String,
        /// Parser error.
        #[source]
        source: url::ParseError,
    },
    /// The origin region name matches no catalog entry.
    #[error("origin region {0:?} is not in the region catalog")]
    OriginRegion(String),
    /// The bind address does not parse.
    #[error("invalid bind address {value:?}: {source}")]
    BindAddr {
        /// Rejected value.
        value: String,
        /// Parser error.
        #[source]
        source: std::net::AddrParseError,
    },
    /// The zone table file cannot be read.
    #[error("cannot read zone table {path}: {source}")]
    ZoneTableRead {
        /// Configured path.
        path: PathBuf,
        /// I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The zone table file is not a valid table.
    #[error("invalid zone table {path}: {source}")]
    ZoneTable {
        /// Configured path.
        path: PathBuf,
        /// Validation error.
        #[source]
        source: ZoneFeeTableError,
    },
}

/// Validated, immutable configuration.
#[derive(Debug, Clone)]
pub struct ShippingConfig {
    /// `None` means the carrier is not configured.
    pub credentials: Option<CarrierCredentials>,
    /// Carrier API root.
    pub carrier_base_url: Url,
    /// Per-request carrier timeout.
    pub carrier_timeout: Duration,
    /// Region parcels ship from.
    pub origin_region: &'static Region,
    /// Verifier holding the webhook secret.
    pub webhook_verifier: WebhookVerifier,
    /// Days added to the shipping date for the delivery estimate.
    pub estimated_delivery_days: u32,
    /// Cached zone fee table.
    pub zone_table: Arc<ZoneFeeTable>,
    /// HTTP listen address.
    pub bind_addr: SocketAddr,
}

impl ShippingSettings {
    /// Carrier credentials, when both halves are present.
    #[must_use]
    pub fn credentials(&self) -> Option<CarrierCredentials> {
        CarrierCredentials::new(
            self.carrier_api_id.clone(),
            self.carrier_api_token.clone().map(Zeroizing::new),
        )
    }

    /// Carrier request timeout, defaulting when unset or zero.
    #[must_use]
    pub fn carrier_timeout(&self) -> Duration {
        Duration::from_secs(
            self.carrier_timeout_seconds
                .filter(|seconds| *seconds > 0)
                .unwrap_or(DEFAULT_CARRIER_TIMEOUT_SECONDS),
        )
    }

    /// Region parcels ship from, trimmed.
    #[must_use]
    pub fn origin_region_name(&self) -> &str {
        self.origin_region
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_ORIGIN_REGION)
    }

    /// Days added to the shipping date for the delivery estimate.
    #[must_use]
    pub fn estimated_delivery_days(&self) -> u32 {
        self.estimated_delivery_days
            .unwrap_or(DEFAULT_ESTIMATED_DELIVERY_DAYS)
    }

    /// Validate every value and build the runtime configuration.
    ///
    /// # Errors
    ///
    /// Any [`ConfigError`]; the process should refuse to start.
    pub fn resolve(&self) -> Result<ShippingConfig, ConfigError> {
        let base_url = self
            .carrier_base_url
            .as_deref()
            .unwrap_or(DEFAULT_CARRIER_BASE_URL);
        let carrier_base_url = Url::parse(base_url).map_err(|source| ConfigError::BaseUrl {
            value: base_url.to_owned(),
            source,
        })?;

        let origin = self.origin_region_name();
        let origin_region =
            resolve_region(origin).ok_or_else(|| ConfigError::OriginRegion(origin.to_owned()))?;

        let bind = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        let bind_addr = bind.parse().map_err(|source| ConfigError::BindAddr {
            value: bind.to_owned(),
            source,
        })?;

        Ok(ShippingConfig {
            credentials: self.credentials(),
            carrier_base_url,
            carrier_timeout: self.carrier_timeout(),
            origin_region,
            webhook_verifier: WebhookVerifier::new(self.webhook_secret.clone().map(Zeroizing::new)),
            estimated_delivery_days: self.estimated_delivery_days(),
            zone_table: Arc::new(self.zone_table()?),
            bind_addr,
        })
    }

    fn zone_table(&self) -> Result<ZoneFeeTable, ConfigError> {
        let Some(path) = &self.zone_table_path else {
            return Ok(ZoneFeeTable::default());
        };
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::ZoneTableRead {
            path: path.clone(),
            source,
        })?;
        ZoneFeeTable::from_json(&raw).map_err(|source| ConfigError::ZoneTable {
            path: path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 9] = [
        "SHIPPING_CARRIER_API_ID",
        "SHIPPING_CARRIER_API_TOKEN",
        "SHIPPING_CARRIER_BASE_URL",
        "SHIPPING_CARRIER_TIMEOUT_SECONDS",
        "SHIPPING_ORIGIN_REGION",
        "SHIPPING_WEBHOOK_SECRET",
        "SHIPPING_ESTIMATED_DELIVERY_DAYS",
        "SHIPPING_ZONE_TABLE_PATH",
        "SHIPPING_BIND_ADDR",
    ];

    fn env_with(overrides: &[(&'static str, &str)]) -> Vec<(&'static str, Option<String>)> {
        VARS.iter()
            .map(|name| {
                let value = overrides
                    .iter()
                    .find(|(key, _)| key == name)
                    .map(|(_, value)| (*value).to_owned());
                (*name, value)
            })
            .collect()
    }

    fn load_from_empty_args() -> ShippingSettings {
        ShippingSettings::load_from_iter([OsString::from("shipping")]).expect("config should load")
    }

    #[rstest]
    fn defaults_describe_an_unconfigured_carrier() {
        let _guard = lock_env(env_with(&[]));

        let config = load_from_empty_args().resolve().expect("defaults resolve");
        assert!(config.credentials.is_none());
        assert!(!config.webhook_verifier.is_configured());
        assert_eq!(config.carrier_base_url.as_str(), DEFAULT_CARRIER_BASE_URL);
        assert_eq!(config.carrier_timeout, Duration::from_secs(10));
        assert_eq!(config.origin_region.name, "Alger");
        assert_eq!(config.estimated_delivery_days, 3);
        assert_eq!(config.bind_addr.port(), 8080);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env(env_with(&[
            ("SHIPPING_CARRIER_API_ID", "12345"),
            ("SHIPPING_CARRIER_API_TOKEN", "tok"),
            ("SHIPPING_CARRIER_TIMEOUT_SECONDS", "4"),
            ("SHIPPING_ORIGIN_REGION", "oran"),
            ("SHIPPING_WEBHOOK_SECRET", "whsec"),
            ("SHIPPING_ESTIMATED_DELIVERY_DAYS", "5"),
            ("SHIPPING_BIND_ADDR", "127.0.0.1:9000"),
        ]));

        let config = load_from_empty_args().resolve().expect("overrides resolve");
        assert!(config.credentials.is_some());
        assert!(config.webhook_verifier.is_configured());
        assert_eq!(config.carrier_timeout, Duration::from_secs(4));
        assert_eq!(config.origin_region.name, "Oran");
        assert_eq!(config.estimated_delivery_days, 5);
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:9000");
    }

    #[rstest]
    fn half_configured_credentials_count_as_absent() {
        let _guard = lock_env(env_with(&[("SHIPPING_CARRIER_API_ID", "12345")]));

        assert!(load_from_empty_args().credentials().is_none());
    }

    #[rstest]
    #[case::origin(("SHIPPING_ORIGIN_REGION", "Atlantis"))]
    #[case::bind(("SHIPPING_BIND_ADDR", "not-an-address"))]
    #[case::url(("SHIPPING_CARRIER_BASE_URL", "::nope"))]
    #[case::table(("SHIPPING_ZONE_TABLE_PATH", "/nonexistent/zones.json"))]
    fn invalid_values_refuse_to_resolve(#[case] override_: (&'static str, &str)) {
        let _guard = lock_env(env_with(&[override_]));

        assert!(load_from_empty_args().resolve().is_err());
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let settings = ShippingSettings {
            carrier_api_id: Some("id".to_owned()),
            carrier_api_token: Some("very-secret-token".to_owned()),
            carrier_base_url: None,
            carrier_timeout_seconds: None,
            origin_region: None,
            webhook_secret: Some("very-secret-hmac".to_owned()),
            estimated_delivery_days: None,
            zone_table_path: None,
            bind_addr: None,
        };
        let rendered = format!("{settings:?}");
        assert!(!rendered.contains("very-secret"));
    }
}
