//! Driven port for the carrier's reference-data and pricing directory.
//!
//! Covers sub-region listing and the per-region-pair fee matrix. Region lists
//! are not fetched: the static catalog is authoritative for those.

use async_trait::async_trait;

use crate::domain::geography::{RegionId, SubRegion};

use super::define_port_error;

/// Fee matrix for one origin/destination region pair.
#[derive(Debug, Clone, PartialEq)]
pub struct FeeMatrix {
    /// Carrier cost tier for the region pair.
    pub zone: u8,
    /// Fee charged when a parcel is returned to the sender.
    pub return_fee: u32,
    /// Percentage of the collected cash kept by the carrier.
    pub cod_percentage: f64,
    /// Insurance percentage of the declared value.
    pub insurance_percentage: f64,
    /// Surcharge per kilogram above the overweight threshold.
    pub oversize_fee_per_kg: u32,
    /// Per-sub-region fees, in the order the carrier returned them.
    pub sub_regions: Vec<SubRegion>,
}

define_port_error! {
    /// Errors surfaced while calling the carrier directory.
    pub enum CarrierDirectoryError {
        /// Credentials are absent; the live directory is not usable.
        NotConfigured => "carrier directory is not configured",
        /// Network transport failed before a response arrived.
        Transport { message: String } => "carrier directory transport failed: {message}",
        /// The call exceeded its timeout.
        Timeout { message: String } => "carrier directory timeout: {message}",
        /// The response body could not be decoded.
        Decode { message: String } => "carrier directory response decode failed: {message}",
        /// The carrier refused the request.
        Rejected { message: String } => "carrier directory rejected request: {message}",
    }
}

/// Port for carrier reference data.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CarrierDirectory: Send + Sync {
    /// List sub-regions of a region, optionally only those with a pickup desk.
    async fn fetch_sub_regions(
        &self,
        region: RegionId,
        has_pickup: Option<bool>,
    ) -> Result<Vec<SubRegion>, CarrierDirectoryError>;

    /// Fetch the fee matrix for a region pair.
    async fn fetch_fee_matrix(
        &self,
        from: RegionId,
        to: RegionId,
    ) -> Result<FeeMatrix, CarrierDirectoryError>;
}

/// Directory used when no carrier is configured: every call reports
/// [`CarrierDirectoryError::NotConfigured`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredCarrierDirectory;

#[async_trait]
impl CarrierDirectory for UnconfiguredCarrierDirectory {
    async fn fetch_sub_regions(
        &self,
        _region: RegionId,
        _has_pickup: Option<bool>,
    ) -> Result<Vec<SubRegion>, CarrierDirectoryError> {
        Err(CarrierDirectoryError::not_configured())
    }

    async fn fetch_fee_matrix(
        &self,
        _from: RegionId,
        _to: RegionId,
    ) -> Result<FeeMatrix, CarrierDirectoryError> {
        Err(CarrierDirectoryError::not_configured())
    }
}
