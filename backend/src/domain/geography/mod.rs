//! Delivery geography: regions, sub-regions, and pickup points.
//!
//! Regions are immutable reference data compiled into the binary. Sub-regions
//! and pickup points come from the carrier directory when it is reachable and
//! from a deterministic offline catalog otherwise; every list is tagged with
//! its [`DataSource`] so callers can tell authoritative data from degraded
//! data.
//!
//! Name matching policy (see [`find_by_name`]): names are normalised by
//! trimming, lowercasing, and folding Latin diacritics (`é` → `e`). An exact
//! normalised match wins; otherwise the first entry whose normalised name
//! contains the query is returned. Ambiguous fragments therefore resolve to
//! catalog order, never to a "best guess".

mod catalog;
mod service;

use serde::{Deserialize, Serialize};

pub use catalog::{offline_pickup_points, offline_sub_regions, region_catalog};
pub use service::GeographyResolver;

/// Official numeric identifier of a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionId(pub u16);

impl std::fmt::Display for RegionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Top-level administrative region (wilaya).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    /// Official number.
    pub id: RegionId,
    /// Display name.
    pub name: &'static str,
    /// Two-digit code.
    pub code: &'static str,
}

/// Per-mode delivery fees for a sub-region. `None` means the mode is not
/// offered there.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryFees {
    /// Express delivery to the door.
    pub express_home: Option<u32>,
    /// Express delivery to a pickup desk.
    pub express_desk: Option<u32>,
    /// Economic delivery to the door.
    pub economic_home: Option<u32>,
    /// Economic delivery to a pickup desk.
    pub economic_desk: Option<u32>,
}

/// Local area (commune) inside a region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubRegion {
    /// Carrier identifier.
    pub id: u32,
    /// Commune name.
    pub name: String,
    /// Parent region.
    pub region_id: RegionId,
    /// Whether a pickup desk operates here.
    pub has_pickup_point: bool,
    /// Fees for delivering here from the configured origin.
    pub fees: DeliveryFees,
}

/// Carrier-operated desk where a recipient collects a parcel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickupPoint {
    /// Desk identifier, shared with its sub-region.
    pub id: u32,
    /// Desk name.
    pub name: String,
    /// Hosting sub-region.
    pub sub_region_id: u32,
    /// Hosting sub-region name.
    pub sub_region_name: String,
    /// Parent region.
    pub region_id: RegionId,
}

impl PickupPoint {
    /// Derive the pickup desk hosted by a sub-region.
    #[must_use]
    pub fn for_sub_region(sub_region: &SubRegion) -> Self {
        Self {
            id: sub_region.id,
            name: format!("Stopdesk {}", sub_region.name),
            sub_region_id: sub_region.id,
            sub_region_name: sub_region.name.clone(),
            region_id: sub_region.region_id,
        }
    }
}

/// Origin of a reference-data list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DataSource {
    /// Live carrier directory (authoritative).
    Carrier,
    /// Compiled-in offline catalog (degraded).
    OfflineCatalog,
}

/// A list tagged with where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sourced<T> {
    /// The listed entries.
    pub items: Vec<T>,
    /// Where the entries came from.
    pub source: DataSource,
}

impl<T> Sourced<T> {
    /// Wrap carrier-provided items.
    #[must_use]
    pub const fn carrier(items: Vec<T>) -> Self {
        Self {
            items,
            source: DataSource::Carrier,
        }
    }

    /// Wrap offline catalog items.
    #[must_use]
    pub const fn offline(items: Vec<T>) -> Self {
        Self {
            items,
            source: DataSource::OfflineCatalog,
        }
    }

    /// Whether the items came from the degraded offline catalog.
    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        matches!(self.source, DataSource::OfflineCatalog)
    }
}

/// Anything addressable by a human-entered name.
pub trait Named {
    /// Display name used for matching.
    fn name(&self) -> &str;
}

impl Named for Region {
    fn name(&self) -> &str {
        self.name
    }
}

impl Named for SubRegion {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Normalise a name for matching: trim, lowercase, fold Latin diacritics.
///
/// # Examples
/// ```
/// use shipping::domain::geography::normalise_name;
///
/// assert_eq!(normalise_name("  Béjaïa "), "bejaia");
/// ```
#[must_use]
pub fn normalise_name(raw: &str) -> String {
    raw.trim()
        .chars()
        .flat_map(char::to_lowercase)
        .map(fold_diacritic)
        .collect()
}

fn fold_diacritic(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ä' | 'ã' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        '’' => '\'',
        other => other,
    }
}

/// Find the entry matching a user-entered name.
///
/// Exact normalised match first, then the first entry containing the query.
/// Blank queries never match.
///
/// # Examples
/// ```
/// use shipping::domain::geography::{find_by_name, region_catalog};
///
/// let regions = region_catalog();
/// assert_eq!(find_by_name(regions, "constan").map(|r| r.code), Some("25"));
/// assert!(find_by_name(regions, "   ").is_none());
/// ```
#[must_use]
pub fn find_by_name<'a, T: Named>(items: &'a [T], query: &str) -> Option<&'a T> {
    let needle = normalise_name(query);
    if needle.is_empty() {
        return None;
    }
    items
        .iter()
        .find(|item| normalise_name(item.name()) == needle)
        .or_else(|| {
            items
                .iter()
                .find(|item| normalise_name(item.name()).contains(&needle))
        })
}

/// Resolve a region by name fragment, official number, or two-digit code.
///
/// # Examples
/// ```
/// use shipping::domain::geography::{resolve_region, RegionId};
///
/// assert_eq!(resolve_region("oran").map(|r| r.id), Some(RegionId(31)));
/// assert_eq!(resolve_region("9").map(|r| r.name), Some("Blida"));
/// assert_eq!(resolve_region("09").map(|r| r.name), Some("Blida"));
/// assert!(resolve_region("Atlantis").is_none());
/// ```
#[must_use]
pub fn resolve_region(query: &str) -> Option<&'static Region> {
    let regions = region_catalog();
    let trimmed = query.trim();
    if let Ok(number) = trimmed.parse::<u16>() {
        return regions.iter().find(|region| region.id.0 == number);
    }
    find_by_name(regions, trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::exact_case_insensitive("ALGER", 16)]
    #[case::accent_folded("bejaia", 6)]
    #[case::substring("bel abb", 22)]
    #[case::exact_name("Mila", 43)]
    fn resolves_region_names(#[case] query: &str, #[case] expected: u16) {
        let region = resolve_region(query).expect("region should resolve");
        assert_eq!(region.id, RegionId(expected));
    }

    #[test]
    fn ambiguous_fragment_resolves_to_first_catalog_entry() {
        // "el" occurs in Oum El Bouaghi (4) before Djelfa (17) and El Bayadh (32).
        let region = resolve_region("el").expect("fragment should resolve");
        assert_eq!(region.id, RegionId(4));
    }

    #[test]
    fn unknown_region_does_not_resolve() {
        assert!(resolve_region("Narnia").is_none());
        assert!(resolve_region("99").is_none());
    }

    #[test]
    fn sourced_reports_degradation() {
        assert!(Sourced::<Region>::offline(Vec::new()).is_degraded());
        assert!(!Sourced::<Region>::carrier(Vec::new()).is_degraded());
    }
}
