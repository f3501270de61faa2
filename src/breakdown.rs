// Breakdown Calculator: turns validated CarSpecs plus the reference tables
// into the itemized PriceBreakdown and the unrounded current value.

use crate::config::ReferenceTables;
use crate::models::{Adjustments, CarSpecs, PriceBreakdown};

/// Facts about the computation that the confidence stage needs.
#[derive(Debug, Clone)]
pub(crate) struct BreakdownTrace {
    /// Base value with the brand premium applied, before any penalty.
    pub adjusted_base: f64,
    /// Current value before paise rounding.
    pub unrounded_value: f64,
    pub vehicle_age: i32,
    pub mileage: i64,
    pub owners: i32,
    pub brand_known: bool,
}

/// Compute the itemized breakdown. Pure; total over validated input —
/// unknown brands degrade to the default tier and every enum value has a
/// guaranteed table entry.
pub(crate) fn compute_breakdown(
    specs: &CarSpecs,
    tables: &ReferenceTables,
    current_year: i32,
) -> (PriceBreakdown, BreakdownTrace) {
    let (tier, brand_known) = tables.brand_tiers.resolve(&specs.brand);
    let vehicle_age = (current_year - specs.model_year).max(0);

    // Sequential multiplicative pipeline over the running value; each stage
    // is reported as the signed delta it applied, so base_value plus all
    // deltas telescopes back to the final value.
    let base_value = tier.base_value;

    let after_premium = base_value * tier.premium_multiplier;
    let brand_premium = after_premium - base_value;

    let after_age = after_premium * tables.age_curve.factor(vehicle_age);
    let age_adjustment = after_age - after_premium;

    let after_mileage = after_age * tables.mileage_curve.factor(specs.mileage);
    let mileage_adjustment = after_mileage - after_age;

    let after_owners = after_mileage * tables.owner_curve.factor(specs.owners);
    let owner_adjustment = after_owners - after_mileage;

    let after_transmission =
        after_owners * tables.transmission_factors.factor(specs.transmission);
    let transmission_adjustment = after_transmission - after_owners;

    let value = after_transmission * tables.fuel_factors.factor(specs.fuel_type);
    let fuel_type_adjustment = value - after_transmission;

    tracing::debug!(
        brand = %specs.brand,
        brand_known,
        vehicle_age,
        mileage = specs.mileage,
        owners = specs.owners,
        base_value,
        value,
        "Computed price breakdown"
    );

    let breakdown = PriceBreakdown {
        base_value,
        brand_premium,
        age_adjustment,
        mileage_adjustment,
        owner_adjustment,
        transmission_adjustment,
        fuel_type_adjustment,
    };

    let trace = BreakdownTrace {
        adjusted_base: after_premium,
        unrounded_value: value,
        vehicle_age,
        mileage: specs.mileage,
        owners: specs.owners,
        brand_known,
    };

    (breakdown, trace)
}

/// Derive the summary adjustments from the breakdown: the age penalty is
/// partitioned into the share of the vehicle's life it was actually in use
/// and the share between model year and purchase. Usage plus the purchase
/// gap never exceeds the vehicle age (guaranteed by validation), so the two
/// shares never overstate the age adjustment.
pub(crate) fn derive_adjustments(
    specs: &CarSpecs,
    breakdown: &PriceBreakdown,
    current_year: i32,
) -> Adjustments {
    let vehicle_age = (current_year - specs.model_year).max(0);
    if vehicle_age == 0 {
        return Adjustments {
            usage_duration_adjustment: 0.0,
            purchase_year_adjustment: 0.0,
        };
    }

    let age = vehicle_age as f64;
    let usage_share = specs.usage_duration.max(0) as f64 / age;
    let gap_share = (specs.year_of_purchase - specs.model_year).max(0) as f64 / age;

    Adjustments {
        usage_duration_adjustment: breakdown.age_adjustment * usage_share,
        purchase_year_adjustment: breakdown.age_adjustment * gap_share,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FuelType, TransmissionType};

    const CURRENT_YEAR: i32 = 2025;

    fn specs() -> CarSpecs {
        CarSpecs {
            brand: "Toyota".to_string(),
            model_year: 2018,
            mileage: 40_000,
            year_of_purchase: 2019,
            usage_duration: 5,
            transmission: TransmissionType::Automatic,
            fuel_type: FuelType::Petrol,
            owners: 1,
        }
    }

    #[test]
    fn breakdown_reconstructs_the_computed_value() {
        let tables = ReferenceTables::default();
        let (b, trace) = compute_breakdown(&specs(), &tables, CURRENT_YEAR);

        let reconstructed = b.base_value
            + b.brand_premium
            + b.age_adjustment
            + b.mileage_adjustment
            + b.owner_adjustment
            + b.transmission_adjustment
            + b.fuel_type_adjustment;
        assert!((reconstructed - trace.unrounded_value).abs() < 0.01);
        assert!(trace.unrounded_value > 0.0);
    }

    #[test]
    fn higher_mileage_never_raises_the_value() {
        let tables = ReferenceTables::default();
        let low = specs();
        let mut high = specs();
        high.mileage = 160_000;

        let (_, low_trace) = compute_breakdown(&low, &tables, CURRENT_YEAR);
        let (_, high_trace) = compute_breakdown(&high, &tables, CURRENT_YEAR);
        assert!(high_trace.unrounded_value < low_trace.unrounded_value);
    }

    #[test]
    fn older_model_year_never_raises_the_value() {
        let tables = ReferenceTables::default();
        let newer = specs();
        let mut older = specs();
        older.model_year = 2010;
        older.year_of_purchase = 2012;

        let (_, newer_trace) = compute_breakdown(&newer, &tables, CURRENT_YEAR);
        let (_, older_trace) = compute_breakdown(&older, &tables, CURRENT_YEAR);
        assert!(older_trace.unrounded_value < newer_trace.unrounded_value);
    }

    #[test]
    fn more_owners_never_raise_the_value() {
        let tables = ReferenceTables::default();
        let few = specs();
        let mut many = specs();
        many.owners = 4;

        let (_, few_trace) = compute_breakdown(&few, &tables, CURRENT_YEAR);
        let (_, many_trace) = compute_breakdown(&many, &tables, CURRENT_YEAR);
        assert!(many_trace.unrounded_value < few_trace.unrounded_value);
    }

    #[test]
    fn unknown_brand_degrades_to_default_tier() {
        let tables = ReferenceTables::default();
        let mut unknown = specs();
        unknown.brand = "Completely Unlisted".to_string();

        let (b, trace) = compute_breakdown(&unknown, &tables, CURRENT_YEAR);
        assert!(!trace.brand_known);
        // Default tier is mid, the same tier Toyota sits in.
        assert_eq!(b.base_value, 1_500_000.0);
    }

    #[test]
    fn current_year_model_has_no_age_penalty() {
        let tables = ReferenceTables::default();
        let mut new_car = specs();
        new_car.model_year = CURRENT_YEAR;
        new_car.year_of_purchase = CURRENT_YEAR;
        new_car.usage_duration = 0;
        new_car.mileage = 0;
        new_car.owners = 0;

        let (b, _) = compute_breakdown(&new_car, &tables, CURRENT_YEAR);
        assert!(b.age_adjustment.abs() < 1e-6);
        assert!(b.mileage_adjustment.abs() < 1e-6);
        assert!(b.owner_adjustment.abs() < 1e-6);
    }

    #[test]
    fn value_stays_positive_for_extreme_inputs() {
        let tables = ReferenceTables::default();
        let mut beater = specs();
        beater.model_year = 1990;
        beater.year_of_purchase = 1995;
        beater.usage_duration = 30;
        beater.mileage = 900_000;
        beater.owners = 9;
        beater.transmission = TransmissionType::Manual;

        let (_, trace) = compute_breakdown(&beater, &tables, CURRENT_YEAR);
        assert!(trace.unrounded_value > 0.0);
    }

    #[test]
    fn adjustments_partition_the_age_penalty() {
        let tables = ReferenceTables::default();
        let s = specs();
        let (b, _) = compute_breakdown(&s, &tables, CURRENT_YEAR);
        let adj = derive_adjustments(&s, &b, CURRENT_YEAR);

        // Age penalty is negative; both shares carry its sign and together
        // never exceed it.
        assert!(b.age_adjustment < 0.0);
        assert!(adj.usage_duration_adjustment <= 0.0);
        assert!(adj.purchase_year_adjustment <= 0.0);
        assert!(
            adj.usage_duration_adjustment + adj.purchase_year_adjustment
                >= b.age_adjustment - 1e-9
        );
    }

    #[test]
    fn brand_new_car_has_zero_summary_adjustments() {
        let tables = ReferenceTables::default();
        let mut s = specs();
        s.model_year = CURRENT_YEAR;
        s.year_of_purchase = CURRENT_YEAR;
        s.usage_duration = 0;

        let (b, _) = compute_breakdown(&s, &tables, CURRENT_YEAR);
        let adj = derive_adjustments(&s, &b, CURRENT_YEAR);
        assert_eq!(adj.usage_duration_adjustment, 0.0);
        assert_eq!(adj.purchase_year_adjustment, 0.0);
    }
}
