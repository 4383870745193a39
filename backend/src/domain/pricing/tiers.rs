//! The three pricing tiers.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::geography::{SubRegion, find_by_name, resolve_region};
use crate::domain::ports::{CarrierDirectory, CarrierDirectoryError};

use super::{
    CURRENCY, DeliveryMode, FeeQuote, PricingError, Provenance, QuoteBreakdown, WeightBracket,
    ZoneFeeTable, overweight_fee,
};

/// Validated input shared by every tier.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingInput {
    /// Dispatch region query.
    pub origin_region: String,
    /// Destination region query.
    pub destination_region: String,
    /// Destination commune, when known.
    pub destination_sub_region: Option<String>,
    /// Billable weight already computed from weight and dimensions.
    pub billable_weight_kg: f64,
    /// Home or desk delivery.
    pub mode: DeliveryMode,
}

/// Why a tier produced no quote.
#[derive(Debug, Clone, PartialEq)]
pub enum TierFailure {
    /// The tier's data source is unreachable or unconfigured; try the next.
    Unavailable(String),
    /// The tier does not know the destination; try the next.
    UnresolvedDestination,
    /// Stop the chain and report this error.
    Fatal(PricingError),
}

impl From<CarrierDirectoryError> for TierFailure {
    fn from(value: CarrierDirectoryError) -> Self {
        Self::Unavailable(value.to_string())
    }
}

/// One step of the fallback chain.
#[async_trait]
pub trait FeeTier: Send + Sync {
    /// Provenance stamped on quotes this tier produces.
    fn provenance(&self) -> Provenance;

    /// Price a parcel or explain why this tier cannot.
    async fn quote(&self, input: &PricingInput) -> Result<FeeQuote, TierFailure>;
}

/// Live carrier fee matrix.
#[derive(Clone)]
pub struct LiveFeeTier {
    directory: Arc<dyn CarrierDirectory>,
}

impl LiveFeeTier {
    /// Price from the directory's fee matrix.
    #[must_use]
    pub const fn new(directory: Arc<dyn CarrierDirectory>) -> Self {
        Self { directory }
    }
}

/// Pick the sub-region entry for a request.
///
/// Returns the entry and whether it is a degraded first-entry substitute.
fn match_sub_region<'a>(
    entries: &'a [SubRegion],
    requested: Option<&str>,
) -> Option<(&'a SubRegion, bool)> {
    if let Some(entry) = requested.and_then(|name| find_by_name(entries, name)) {
        return Some((entry, false));
    }
    entries.first().map(|entry| (entry, true))
}

fn mode_fee(entry: &SubRegion, mode: DeliveryMode) -> Option<u32> {
    match mode {
        DeliveryMode::Home => entry.fees.express_home.or(entry.fees.economic_home),
        DeliveryMode::Desk => entry.fees.express_desk.or(entry.fees.economic_desk),
    }
}

#[async_trait]
impl FeeTier for LiveFeeTier {
    fn provenance(&self) -> Provenance {
        Provenance::Live
    }

    async fn quote(&self, input: &PricingInput) -> Result<FeeQuote, TierFailure> {
        let origin = resolve_region(&input.origin_region).ok_or_else(|| {
            TierFailure::Fatal(PricingError::UnknownOrigin {
                origin: input.origin_region.clone(),
            })
        })?;
        let destination = resolve_region(&input.destination_region)
            .ok_or(TierFailure::UnresolvedDestination)?;

        let matrix = self
            .directory
            .fetch_fee_matrix(origin.id, destination.id)
            .await?;

        let (entry, degraded_match) =
            match_sub_region(&matrix.sub_regions, input.destination_sub_region.as_deref())
                .ok_or_else(|| {
                    TierFailure::Unavailable(format!(
                        "fee matrix for {} lists no sub-regions",
                        destination.name
                    ))
                })?;

        let base_fee = match mode_fee(entry, input.mode) {
            Some(fee) => fee,
            // A substitute entry says nothing authoritative about the
            // requested sub-region.
            None if degraded_match => {
                return Err(TierFailure::Unavailable(format!(
                    "fallback sub-region {} offers no {} delivery",
                    entry.name, input.mode
                )));
            }
            None => {
                return Err(TierFailure::Fatal(PricingError::ModeUnavailable {
                    sub_region: entry.name.clone(),
                    mode: input.mode,
                }));
            }
        };
        let surcharge = overweight_fee(input.billable_weight_kg, matrix.oversize_fee_per_kg);

        Ok(FeeQuote {
            cost: base_fee.saturating_add(surcharge),
            currency: CURRENCY.to_owned(),
            estimated_days: matrix.zone.saturating_add(1),
            provenance: Provenance::Live,
            degraded_match,
            breakdown: QuoteBreakdown {
                billable_weight_kg: input.billable_weight_kg,
                base_fee,
                overweight_fee: surcharge,
                zone: Some(matrix.zone),
                table_version: None,
            },
        })
    }
}

/// Static versioned zone table.
#[derive(Debug, Clone)]
pub struct ZoneTableTier {
    table: Arc<ZoneFeeTable>,
}

impl ZoneTableTier {
    /// Price from `table`.
    #[must_use]
    pub const fn new(table: Arc<ZoneFeeTable>) -> Self {
        Self { table }
    }
}

#[async_trait]
impl FeeTier for ZoneTableTier {
    fn provenance(&self) -> Provenance {
        Provenance::CachedTable
    }

    async fn quote(&self, input: &PricingInput) -> Result<FeeQuote, TierFailure> {
        let brackets = self
            .table
            .lookup(&input.destination_region)
            .ok_or(TierFailure::UnresolvedDestination)?;
        let base_fee = brackets.price(input.mode, input.billable_weight_kg);

        Ok(FeeQuote {
            cost: base_fee,
            currency: CURRENCY.to_owned(),
            estimated_days: brackets.estimated_days,
            provenance: Provenance::CachedTable,
            degraded_match: false,
            breakdown: QuoteBreakdown {
                billable_weight_kg: input.billable_weight_kg,
                base_fee,
                overweight_fee: 0,
                zone: Some(brackets.zone),
                table_version: Some(self.table.version.clone()),
            },
        })
    }
}

/// Home delivery prices per weight bracket for the last-resort heuristic.
pub const HEURISTIC_HOME_PRICES: [u32; 4] = [450, 650, 850, 1_250];

/// Transit estimate attached to heuristic quotes.
pub const HEURISTIC_ESTIMATED_DAYS: u8 = 7;

/// Last resort: weight brackets only, desk discounted to 80 % (rounded up).
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicTier;

impl HeuristicTier {
    fn price(mode: DeliveryMode, billable_kg: f64) -> u32 {
        let home = WeightBracket::for_weight(billable_kg).pick(&HEURISTIC_HOME_PRICES);
        match mode {
            DeliveryMode::Home => home,
            DeliveryMode::Desk => (home * 4).div_ceil(5),
        }
    }
}

#[async_trait]
impl FeeTier for HeuristicTier {
    fn provenance(&self) -> Provenance {
        Provenance::Heuristic
    }

    async fn quote(&self, input: &PricingInput) -> Result<FeeQuote, TierFailure> {
        resolve_region(&input.destination_region).ok_or(TierFailure::UnresolvedDestination)?;
        let base_fee = Self::price(input.mode, input.billable_weight_kg);

        Ok(FeeQuote {
            cost: base_fee,
            currency: CURRENCY.to_owned(),
            estimated_days: HEURISTIC_ESTIMATED_DAYS,
            provenance: Provenance::Heuristic,
            degraded_match: false,
            breakdown: QuoteBreakdown {
                billable_weight_kg: input.billable_weight_kg,
                base_fee,
                overweight_fee: 0,
                zone: None,
                table_version: None,
            },
        })
    }
}
