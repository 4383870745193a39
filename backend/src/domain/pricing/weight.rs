//! Billable weight and overweight surcharge arithmetic.

use crate::domain::parcel::Dimensions;

/// Kilograms per cubic centimetre used for volumetric weight.
pub const VOLUMETRIC_FACTOR: f64 = 0.0002;

/// Parcels at or below this billable weight pay no surcharge.
pub const OVERWEIGHT_THRESHOLD_KG: f64 = 5.0;

/// The greater of actual and volumetric weight.
///
/// # Examples
/// ```
/// use shipping::domain::parcel::Dimensions;
/// use shipping::domain::pricing::billable_weight;
///
/// let cube = Dimensions { length_cm: 10.0, width_cm: 10.0, height_cm: 10.0 };
/// assert_eq!(billable_weight(2.0, Some(&cube)), 2.0);
/// assert_eq!(billable_weight(0.1, Some(&cube)), 1000.0 * 0.0002);
/// assert_eq!(billable_weight(3.0, None), 3.0);
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "volumetric weight is defined over fractional centimetres"
)]
pub fn billable_weight(actual_kg: f64, dimensions: Option<&Dimensions>) -> f64 {
    let volumetric = dimensions.map_or(0.0, |dims| dims.volume_cm3() * VOLUMETRIC_FACTOR);
    actual_kg.max(volumetric)
}

/// Surcharge for billable weight above the threshold, rounded up.
///
/// Non-finite inputs yield no surcharge; results beyond `u32::MAX` saturate.
///
/// # Examples
/// ```
/// use shipping::domain::pricing::overweight_fee;
///
/// assert_eq!(overweight_fee(7.0, 50), 100);
/// assert_eq!(overweight_fee(4.0, 50), 0);
/// assert_eq!(overweight_fee(5.5, 25), 13);
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "the surcharge rate applies to fractional kilograms"
)]
pub fn overweight_fee(billable_kg: f64, fee_per_kg: u32) -> u32 {
    let excess = (billable_kg - OVERWEIGHT_THRESHOLD_KG).max(0.0);
    let fee = (excess * f64::from(fee_per_kg)).ceil();
    if fee.is_finite() {
        saturating_u32(fee)
    } else {
        0
    }
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "the value is clamped to the u32 range before the cast"
)]
fn saturating_u32(value: f64) -> u32 {
    value.clamp(0.0, f64::from(u32::MAX)) as u32
}

/// Flat-rate weight brackets used by the zone table and the heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightBracket {
    /// Up to and including 1 kg.
    UpTo1Kg,
    /// Above 1 kg, up to and including 3 kg.
    UpTo3Kg,
    /// Above 3 kg, up to and including the overweight threshold.
    UpTo5Kg,
    /// Above the overweight threshold.
    Over5Kg,
}

impl WeightBracket {
    /// Bracket for a billable weight.
    #[must_use]
    pub fn for_weight(billable_kg: f64) -> Self {
        if billable_kg <= 1.0 {
            Self::UpTo1Kg
        } else if billable_kg <= 3.0 {
            Self::UpTo3Kg
        } else if billable_kg <= OVERWEIGHT_THRESHOLD_KG {
            Self::UpTo5Kg
        } else {
            Self::Over5Kg
        }
    }

    /// Price for this bracket from a four-entry list, lightest first.
    ///
    /// # Examples
    /// ```
    /// use shipping::domain::pricing::WeightBracket;
    ///
    /// assert_eq!(WeightBracket::UpTo3Kg.pick(&[400, 600, 800, 1_200]), 600);
    /// ```
    #[must_use]
    pub const fn pick(self, prices: &[u32; 4]) -> u32 {
        let [up_to_1, up_to_3, up_to_5, over_5] = *prices;
        match self {
            Self::UpTo1Kg => up_to_1,
            Self::UpTo3Kg => up_to_3,
            Self::UpTo5Kg => up_to_5,
            Self::Over5Kg => over_5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn small_cube_is_billed_by_actual_weight() {
        // 1 000 cm³ × 0.0002 = 0.2 kg, below the 2 kg actual weight
        let dims = Dimensions {
            length_cm: 10.0,
            width_cm: 10.0,
            height_cm: 10.0,
        };
        assert_eq!(billable_weight(2.0, Some(&dims)), 2.0);
    }

    #[test]
    fn bulky_light_parcel_is_billed_by_volume() {
        let dims = Dimensions {
            length_cm: 50.0,
            width_cm: 40.0,
            height_cm: 30.0,
        };
        // 60 000 cm³ × 0.0002 = 12 kg
        assert!((billable_weight(1.0, Some(&dims)) - 12.0).abs() < 1e-9);
    }

    #[rstest]
    #[case::two_kilos_over(7.0, 50, 100)]
    #[case::one_kilo_over(6.0, 50, 50)]
    #[case::below_threshold(4.0, 50, 0)]
    #[case::at_threshold(5.0, 50, 0)]
    #[case::fraction_rounds_up(5.1, 50, 5)]
    #[case::no_rate(9.0, 0, 0)]
    fn overweight_fee_is_ceiled_excess_times_rate(
        #[case] billable: f64,
        #[case] rate: u32,
        #[case] expected: u32,
    ) {
        assert_eq!(overweight_fee(billable, rate), expected);
    }

    #[rstest]
    #[case(0.3, WeightBracket::UpTo1Kg)]
    #[case(1.0, WeightBracket::UpTo1Kg)]
    #[case(1.01, WeightBracket::UpTo3Kg)]
    #[case(3.0, WeightBracket::UpTo3Kg)]
    #[case(5.0, WeightBracket::UpTo5Kg)]
    #[case(5.01, WeightBracket::Over5Kg)]
    fn brackets_are_inclusive_upper_bounds(#[case] weight: f64, #[case] expected: WeightBracket) {
        assert_eq!(WeightBracket::for_weight(weight), expected);
    }

    #[rstest]
    #[case::nan(f64::NAN)]
    #[case::infinite(f64::INFINITY)]
    fn non_finite_weight_pays_no_surcharge(#[case] billable: f64) {
        assert_eq!(overweight_fee(billable, 50), 0);
    }

    #[test]
    fn huge_surcharge_saturates() {
        assert_eq!(overweight_fee(1.0e12, u32::MAX), u32::MAX);
    }

    #[test]
    fn each_bracket_picks_its_own_price() {
        let prices = [1, 2, 3, 4];
        let picked = [
            WeightBracket::UpTo1Kg,
            WeightBracket::UpTo3Kg,
            WeightBracket::UpTo5Kg,
            WeightBracket::Over5Kg,
        ]
        .map(|bracket| bracket.pick(&prices));
        assert_eq!(picked, prices);
    }
}
