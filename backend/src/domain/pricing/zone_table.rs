//! Versioned static zone fee table used when live pricing is unavailable.
//!
//! The table is coarse on purpose: one zone per destination region, four
//! flat weight brackets per delivery mode, no sub-region granularity and no
//! per-kilogram surcharge.

use serde::{Deserialize, Serialize};

use crate::domain::geography::{Named, find_by_name};

use super::{DeliveryMode, WeightBracket};

/// Bracket prices and transit estimate for one zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneBrackets {
    /// Zone number referenced by [`ZoneRegion::zone`].
    pub zone: u8,
    /// Home delivery prices for ≤1 kg, ≤3 kg, ≤5 kg, >5 kg.
    pub home: [u32; 4],
    /// Desk delivery prices for the same brackets.
    pub desk: [u32; 4],
    /// Transit estimate in days.
    pub estimated_days: u8,
}

impl ZoneBrackets {
    /// Price for a mode and billable weight.
    #[must_use]
    pub fn price(&self, mode: DeliveryMode, billable_kg: f64) -> u32 {
        let bracket = WeightBracket::for_weight(billable_kg);
        match mode {
            DeliveryMode::Home => bracket.pick(&self.home),
            DeliveryMode::Desk => bracket.pick(&self.desk),
        }
    }
}

/// Destination region assigned to a zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneRegion {
    /// Region name as matched against destinations.
    pub name: String,
    /// Zone the region belongs to.
    pub zone: u8,
}

impl Named for ZoneRegion {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Problems found while loading a zone table.
#[derive(Debug, thiserror::Error)]
pub enum ZoneFeeTableError {
    /// The JSON document could not be parsed.
    #[error("zone fee table is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    /// A region points at a zone with no brackets.
    #[error("region {region} references undefined zone {zone}")]
    UndefinedZone {
        /// Offending region.
        region: String,
        /// Zone it references.
        zone: u8,
    },
}

/// Versioned destination-region → zone → bracket price table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneFeeTable {
    /// Version reported on cached-table quotes.
    pub version: String,
    /// Bracket prices per zone.
    pub zones: Vec<ZoneBrackets>,
    /// Destination regions and their zones.
    pub regions: Vec<ZoneRegion>,
}

const BUILT_IN_VERSION: &str = "2025-01";

static BUILT_IN_ZONES: &[(u8, [u32; 4], [u32; 4], u8)] = &[
    (1, [400, 500, 650, 900], [300, 400, 500, 750], 1),
    (2, [550, 650, 800, 1_100], [400, 500, 600, 900], 2),
    (3, [650, 750, 900, 1_250], [450, 550, 700, 1_000], 3),
    (4, [850, 950, 1_100, 1_500], [600, 700, 850, 1_200], 4),
    (5, [1_200, 1_350, 1_550, 2_100], [900, 1_050, 1_200, 1_700], 6),
];

static BUILT_IN_REGIONS: &[(&str, u8)] = &[
    ("Alger", 1),
    ("Blida", 1),
    ("Boumerdès", 1),
    ("Tipaza", 1),
    ("Tizi Ouzou", 2),
    ("Bouira", 2),
    ("Médéa", 2),
    ("Aïn Defla", 2),
    ("Chlef", 2),
    ("Béjaïa", 2),
    ("Bordj Bou Arréridj", 2),
    ("Sétif", 2),
    ("M'Sila", 2),
    ("Tissemsilt", 2),
    ("Oran", 3),
    ("Constantine", 3),
    ("Annaba", 3),
    ("Mostaganem", 3),
    ("Relizane", 3),
    ("Mascara", 3),
    ("Tiaret", 3),
    ("Tlemcen", 3),
    ("Sidi Bel Abbès", 3),
    ("Aïn Témouchent", 3),
    ("Saïda", 3),
    ("Jijel", 3),
    ("Mila", 3),
    ("Skikda", 3),
    ("Guelma", 3),
    ("Souk Ahras", 3),
    ("El Tarf", 3),
    ("Oum El Bouaghi", 3),
    ("Batna", 3),
    ("Khenchela", 3),
    ("Tébessa", 3),
    ("Laghouat", 3),
    ("Djelfa", 3),
    ("Biskra", 4),
    ("El Oued", 4),
    ("Ouargla", 4),
    ("Ghardaïa", 4),
    ("Touggourt", 4),
    ("El M'Ghair", 4),
    ("Ouled Djellal", 4),
    ("El Bayadh", 4),
    ("Naâma", 4),
    ("Béchar", 4),
    ("El Meniaa", 4),
    ("Adrar", 5),
    ("Tamanrasset", 5),
    ("Illizi", 5),
    ("Tindouf", 5),
    ("Timimoun", 5),
    ("Bordj Badji Mokhtar", 5),
    ("Béni Abbès", 5),
    ("In Salah", 5),
    ("In Guezzam", 5),
    ("Djanet", 5),
];

impl Default for ZoneFeeTable {
    fn default() -> Self {
        Self {
            version: BUILT_IN_VERSION.to_owned(),
            zones: BUILT_IN_ZONES
                .iter()
                .map(|(zone, home, desk, estimated_days)| ZoneBrackets {
                    zone: *zone,
                    home: *home,
                    desk: *desk,
                    estimated_days: *estimated_days,
                })
                .collect(),
            regions: BUILT_IN_REGIONS
                .iter()
                .map(|(name, zone)| ZoneRegion {
                    name: (*name).to_owned(),
                    zone: *zone,
                })
                .collect(),
        }
    }
}

impl ZoneFeeTable {
    /// Parse and validate a table from JSON.
    ///
    /// # Errors
    ///
    /// Fails on malformed JSON or a region referencing an undefined zone.
    ///
    /// # Examples
    /// ```
    /// use shipping::domain::pricing::ZoneFeeTable;
    ///
    /// let table = ZoneFeeTable::from_json(r#"{
    ///     "version": "test-1",
    ///     "zones": [{ "zone": 1, "home": [1, 2, 3, 4], "desk": [1, 1, 1, 1], "estimatedDays": 2 }],
    ///     "regions": [{ "name": "R1", "zone": 1 }]
    /// }"#)?;
    /// assert_eq!(table.version, "test-1");
    /// # Ok::<(), shipping::domain::pricing::ZoneFeeTableError>(())
    /// ```
    pub fn from_json(raw: &str) -> Result<Self, ZoneFeeTableError> {
        let table: Self = serde_json::from_str(raw)?;
        table.validate()?;
        Ok(table)
    }

    fn validate(&self) -> Result<(), ZoneFeeTableError> {
        self.regions
            .iter()
            .find(|region| self.brackets(region.zone).is_none())
            .map_or(Ok(()), |region| {
                Err(ZoneFeeTableError::UndefinedZone {
                    region: region.name.clone(),
                    zone: region.zone,
                })
            })
    }

    fn brackets(&self, zone: u8) -> Option<&ZoneBrackets> {
        self.zones.iter().find(|brackets| brackets.zone == zone)
    }

    /// Bracket prices for a destination region name, if the table knows it.
    #[must_use]
    pub fn lookup(&self, destination: &str) -> Option<&ZoneBrackets> {
        find_by_name(&self.regions, destination).and_then(|region| self.brackets(region.zone))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::geography::region_catalog;

    #[test]
    fn built_in_table_covers_every_catalog_region() {
        let table = ZoneFeeTable::default();
        assert!(table.validate().is_ok());
        for region in region_catalog() {
            assert!(
                table.lookup(region.name).is_some(),
                "{} missing from zone table",
                region.name
            );
        }
    }

    #[test]
    fn lookup_picks_bracket_by_mode_and_weight() {
        let table = ZoneFeeTable::default();
        let oran = table.lookup("oran").expect("Oran is zone 3");
        assert_eq!(oran.zone, 3);
        assert_eq!(oran.price(DeliveryMode::Home, 3.0), 750);
        assert_eq!(oran.price(DeliveryMode::Desk, 0.4), 450);
        assert_eq!(oran.price(DeliveryMode::Home, 12.0), 1_250);
    }

    #[test]
    fn undefined_zone_is_rejected() {
        let raw = r#"{
            "version": "broken",
            "zones": [],
            "regions": [{ "name": "Alger", "zone": 9 }]
        }"#;
        let err = ZoneFeeTable::from_json(raw).expect_err("zone 9 is undefined");
        assert!(matches!(err, ZoneFeeTableError::UndefinedZone { zone: 9, .. }));
    }

    #[test]
    fn unknown_destination_is_not_resolved() {
        assert!(ZoneFeeTable::default().lookup("Atlantis").is_none());
    }
}
