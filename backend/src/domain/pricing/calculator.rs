//! Fee calculator: validates a request and walks the tier chain.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::geography::resolve_region;
use crate::domain::ports::CarrierDirectory;

use super::{
    FeeQuote, FeeTier, HeuristicTier, LiveFeeTier, PricingError, PricingInput, Provenance,
    QuoteRequest, TierFailure, ZoneFeeTable, ZoneTableTier, billable_weight,
};

/// Produces quotes from an ordered chain of tiers; the first success wins.
#[derive(Clone)]
pub struct FeeCalculator {
    tiers: Vec<Arc<dyn FeeTier>>,
}

impl FeeCalculator {
    /// Pick the chain once from carrier capability.
    ///
    /// With a configured directory the chain is live, zone table, heuristic.
    /// Without one the live tier is skipped entirely.
    #[must_use]
    pub fn select(directory: Option<Arc<dyn CarrierDirectory>>, table: Arc<ZoneFeeTable>) -> Self {
        if directory.is_none() {
            warn!("carrier not configured; live pricing tier disabled");
        }
        let live = directory
            .map(|directory| -> Arc<dyn FeeTier> { Arc::new(LiveFeeTier::new(directory)) });
        let fallbacks: [Arc<dyn FeeTier>; 2] =
            [Arc::new(ZoneTableTier::new(table)), Arc::new(HeuristicTier)];
        Self::with_tiers(live.into_iter().chain(fallbacks).collect())
    }

    /// Build a calculator over an explicit chain.
    #[must_use]
    pub const fn with_tiers(tiers: Vec<Arc<dyn FeeTier>>) -> Self {
        Self { tiers }
    }

    /// Provenance of each tier, in the order they are tried.
    #[must_use]
    pub fn chain(&self) -> Vec<Provenance> {
        self.tiers.iter().map(|tier| tier.provenance()).collect()
    }

    /// Quote a delivery.
    ///
    /// # Errors
    ///
    /// [`PricingError::InvalidParcel`] or [`PricingError::UnknownOrigin`] for
    /// unusable input; [`PricingError::NoDeliveryAvailable`] when some tier
    /// could not resolve the destination and none priced it;
    /// [`PricingError::Unavailable`] when every tier was unreachable; any
    /// terminal error a tier raises.
    pub async fn quote(&self, request: &QuoteRequest) -> Result<FeeQuote, PricingError> {
        let input = Self::prepare(request)?;
        let mut unresolved = false;
        let mut last_unavailable = None;

        for tier in &self.tiers {
            let tier_name = tier.provenance();
            match tier.quote(&input).await {
                Ok(quote) => {
                    info!(
                        tier = %tier_name,
                        destination = %input.destination_region,
                        cost = quote.cost,
                        degraded_match = quote.degraded_match,
                        "delivery quote produced"
                    );
                    return Ok(quote);
                }
                Err(TierFailure::Unavailable(message)) => {
                    warn!(tier = %tier_name, error = %message, "pricing tier unavailable");
                    last_unavailable = Some(message);
                }
                Err(TierFailure::UnresolvedDestination) => {
                    debug!(
                        tier = %tier_name,
                        destination = %input.destination_region,
                        "pricing tier cannot resolve destination"
                    );
                    unresolved = true;
                }
                Err(TierFailure::Fatal(error)) => {
                    warn!(tier = %tier_name, error = %error, "pricing stopped");
                    return Err(error);
                }
            }
        }

        if unresolved {
            warn!(destination = %input.destination_region, "no delivery available");
            return Err(PricingError::NoDeliveryAvailable {
                destination: input.destination_region,
            });
        }
        Err(PricingError::Unavailable {
            message: last_unavailable.unwrap_or_else(|| "no pricing tier configured".to_owned()),
        })
    }

    fn prepare(request: &QuoteRequest) -> Result<PricingInput, PricingError> {
        if !request.weight_kg.is_finite() || request.weight_kg <= 0.0 {
            return Err(PricingError::InvalidParcel {
                message: "weight must be a positive number of kilograms".to_owned(),
            });
        }
        if request.dimensions.is_some_and(|dims| !dims.is_valid()) {
            return Err(PricingError::InvalidParcel {
                message: "dimensions must be finite and non-negative".to_owned(),
            });
        }
        if resolve_region(&request.origin_region).is_none() {
            return Err(PricingError::UnknownOrigin {
                origin: request.origin_region.clone(),
            });
        }

        Ok(PricingInput {
            origin_region: request.origin_region.clone(),
            destination_region: request.destination_region.trim().to_owned(),
            destination_sub_region: request
                .destination_sub_region
                .as_deref()
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_owned),
            billable_weight_kg: billable_weight(request.weight_kg, request.dimensions.as_ref()),
            mode: request.mode,
        })
    }
}
