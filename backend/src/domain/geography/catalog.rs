//! Compiled-in reference data: the region list and the offline sub-region
//! catalog used when the carrier directory is unavailable.

use super::{DeliveryFees, PickupPoint, Region, RegionId, SubRegion};

macro_rules! regions {
    ($($id:literal => $code:literal, $name:literal;)*) => {
        &[$(Region { id: RegionId($id), name: $name, code: $code },)*]
    };
}

static REGIONS: &[Region] = regions! {
    1 => "01", "Adrar";
    2 => "02", "Chlef";
    3 => "03", "Laghouat";
    4 => "04", "Oum El Bouaghi";
    5 => "05", "Batna";
    6 => "06", "Béjaïa";
    7 => "07", "Biskra";
    8 => "08", "Béchar";
    9 => "09", "Blida";
    10 => "10", "Bouira";
    11 => "11", "Tamanrasset";
    12 => "12", "Tébessa";
    13 => "13", "Tlemcen";
    14 => "14", "Tiaret";
    15 => "15", "Tizi Ouzou";
    16 => "16", "Alger";
    17 => "17", "Djelfa";
    18 => "18", "Jijel";
    19 => "19", "Sétif";
    20 => "20", "Saïda";
    21 => "21", "Skikda";
    22 => "22", "Sidi Bel Abbès";
    23 => "23", "Annaba";
    24 => "24", "Guelma";
    25 => "25", "Constantine";
    26 => "26", "Médéa";
    27 => "27", "Mostaganem";
    28 => "28", "M'Sila";
    29 => "29", "Mascara";
    30 => "30", "Ouargla";
    31 => "31", "Oran";
    32 => "32", "El Bayadh";
    33 => "33", "Illizi";
    34 => "34", "Bordj Bou Arréridj";
    35 => "35", "Boumerdès";
    36 => "36", "El Tarf";
    37 => "37", "Tindouf";
    38 => "38", "Tissemsilt";
    39 => "39", "El Oued";
    40 => "40", "Khenchela";
    41 => "41", "Souk Ahras";
    42 => "42", "Tipaza";
    43 => "43", "Mila";
    44 => "44", "Aïn Defla";
    45 => "45", "Naâma";
    46 => "46", "Aïn Témouchent";
    47 => "47", "Ghardaïa";
    48 => "48", "Relizane";
    49 => "49", "Timimoun";
    50 => "50", "Bordj Badji Mokhtar";
    51 => "51", "Ouled Djellal";
    52 => "52", "Béni Abbès";
    53 => "53", "In Salah";
    54 => "54", "In Guezzam";
    55 => "55", "Touggourt";
    56 => "56", "Djanet";
    57 => "57", "El M'Ghair";
    58 => "58", "El Meniaa";
};

/// Extra communes seeded for the busiest regions, beyond each seat commune.
static EXTRA_SUB_REGIONS: &[(u16, &str, bool)] = &[
    (16, "Bab El Oued", true),
    (16, "Hydra", false),
    (16, "Kouba", true),
    (16, "Bir Mourad Raïs", false),
    (16, "Dar El Beïda", true),
    (31, "Bir El Djir", true),
    (31, "Es Senia", false),
    (31, "Arzew", false),
    (25, "El Khroub", true),
    (25, "Hamma Bouziane", false),
    (19, "El Eulma", true),
    (19, "Aïn Arnat", false),
    (9, "Boufarik", true),
    (9, "Ouled Yaïch", false),
];

/// Seat communes whose name differs from their region.
const fn seat_name(region: &Region) -> &'static str {
    match region.id.0 {
        16 => "Alger Centre",
        _ => region.name,
    }
}

/// The full region catalog in official order.
#[must_use]
pub const fn region_catalog() -> &'static [Region] {
    REGIONS
}

/// Deterministic offline sub-regions for a region.
///
/// Every region gets its seat commune (id `region * 100 + 1`, with a pickup
/// desk); larger regions get a few additional communes. Fees are left empty:
/// offline pricing goes through the zone table instead.
///
/// # Examples
/// ```
/// use shipping::domain::geography::{offline_sub_regions, RegionId};
///
/// let communes = offline_sub_regions(RegionId(16));
/// assert_eq!(communes[0].name, "Alger Centre");
/// assert_eq!(communes[0].id, 1601);
/// assert!(offline_sub_regions(RegionId(99)).is_empty());
/// ```
#[must_use]
pub fn offline_sub_regions(region_id: RegionId) -> Vec<SubRegion> {
    let Some(region) = REGIONS.iter().find(|region| region.id == region_id) else {
        return Vec::new();
    };
    let base = u32::from(region.id.0) * 100;
    let seat = SubRegion {
        id: base + 1,
        name: seat_name(region).to_owned(),
        region_id,
        has_pickup_point: true,
        fees: DeliveryFees::default(),
    };
    let extras = EXTRA_SUB_REGIONS
        .iter()
        .filter(|(owner, _, _)| *owner == region_id.0)
        .zip(2_u32..)
        .map(|((_, name, has_pickup_point), offset)| SubRegion {
            id: base + offset,
            name: (*name).to_owned(),
            region_id,
            has_pickup_point: *has_pickup_point,
            fees: DeliveryFees::default(),
        });
    std::iter::once(seat).chain(extras).collect()
}

/// Offline pickup desks: every offline sub-region flagged with a desk.
#[must_use]
pub fn offline_pickup_points(region_id: RegionId) -> Vec<PickupPoint> {
    offline_sub_regions(region_id)
        .iter()
        .filter(|sub_region| sub_region.has_pickup_point)
        .map(PickupPoint::for_sub_region)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn catalog_has_fifty_eight_unique_regions() {
        let regions = region_catalog();
        assert_eq!(regions.len(), 58);
        let ids: HashSet<_> = regions.iter().map(|region| region.id).collect();
        assert_eq!(ids.len(), 58, "region ids must be unique");
        for region in regions {
            assert_eq!(region.code, format!("{:02}", region.id.0));
        }
    }

    #[test]
    fn every_region_has_an_offline_seat_with_a_pickup_desk() {
        for region in region_catalog() {
            let communes = offline_sub_regions(region.id);
            let seat = communes.first().expect("seat commune");
            assert!(seat.has_pickup_point, "{} seat must host a desk", region.name);
            assert!(communes.iter().all(|commune| commune.region_id == region.id));
            assert!(!offline_pickup_points(region.id).is_empty());
        }
    }

    #[test]
    fn offline_catalog_is_deterministic() {
        assert_eq!(offline_sub_regions(RegionId(31)), offline_sub_regions(RegionId(31)));
        let ids: Vec<_> = offline_sub_regions(RegionId(31))
            .into_iter()
            .map(|commune| commune.id)
            .collect();
        assert_eq!(ids, vec![3101, 3102, 3103, 3104]);
    }

    #[test]
    fn pickup_points_only_cover_desk_communes() {
        let points = offline_pickup_points(RegionId(16));
        let names: Vec<_> = points.iter().map(|p| p.sub_region_name.as_str()).collect();
        assert_eq!(names, vec!["Alger Centre", "Bab El Oued", "Kouba", "Dar El Beïda"]);
        assert_eq!(points[0].name, "Stopdesk Alger Centre");
    }
}
