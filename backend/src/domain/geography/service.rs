//! Geography resolver: live directory first, offline catalog on any failure.

use std::sync::Arc;

use tracing::warn;

use crate::domain::Error;
use crate::domain::ports::{CarrierDirectory, CarrierDirectoryError};

use super::{
    PickupPoint, Region, Sourced, SubRegion, offline_pickup_points, offline_sub_regions,
    region_catalog, resolve_region,
};

/// Resolves regions, sub-regions, and pickup points for checkout and pricing.
#[derive(Clone)]
pub struct GeographyResolver {
    directory: Arc<dyn CarrierDirectory>,
}

impl GeographyResolver {
    /// Build a resolver over a carrier directory.
    #[must_use]
    pub const fn new(directory: Arc<dyn CarrierDirectory>) -> Self {
        Self { directory }
    }

    /// The full static region catalog. Never fails.
    #[must_use]
    pub const fn list_regions(&self) -> &'static [Region] {
        region_catalog()
    }

    /// Resolve a region or report a lookup error naming the query.
    ///
    /// # Errors
    ///
    /// Returns [`Error::not_found`] when nothing in the catalog matches.
    pub fn region(&self, query: &str) -> Result<&'static Region, Error> {
        resolve_region(query).ok_or_else(|| Error::not_found(format!("unknown region: {query}")))
    }

    /// Sub-regions of a region, degrading to the offline catalog.
    ///
    /// # Errors
    ///
    /// Only fails when the region name itself cannot be resolved.
    pub async fn list_sub_regions(&self, region_name: &str) -> Result<Sourced<SubRegion>, Error> {
        let region = self.region(region_name)?;
        match self.directory.fetch_sub_regions(region.id, None).await {
            Ok(items) => Ok(Sourced::carrier(items)),
            Err(error) => {
                log_degradation("sub-regions", region, &error);
                Ok(Sourced::offline(offline_sub_regions(region.id)))
            }
        }
    }

    /// Pickup desks of a region, degrading to the offline catalog.
    ///
    /// # Errors
    ///
    /// Only fails when the region name itself cannot be resolved.
    pub async fn list_pickup_points(
        &self,
        region_name: &str,
    ) -> Result<Sourced<PickupPoint>, Error> {
        let region = self.region(region_name)?;
        match self.directory.fetch_sub_regions(region.id, Some(true)).await {
            Ok(items) => Ok(Sourced::carrier(
                items
                    .iter()
                    .filter(|sub_region| sub_region.has_pickup_point)
                    .map(PickupPoint::for_sub_region)
                    .collect(),
            )),
            Err(error) => {
                log_degradation("pickup points", region, &error);
                Ok(Sourced::offline(offline_pickup_points(region.id)))
            }
        }
    }
}

fn log_degradation(what: &str, region: &Region, error: &CarrierDirectoryError) {
    match error {
        CarrierDirectoryError::NotConfigured => warn!(
            region = region.name,
            "carrier not configured; serving offline {what}"
        ),
        other => warn!(
            region = region.name,
            error = %other,
            "carrier directory failed; serving offline {what}"
        ),
    }
}
