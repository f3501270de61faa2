// Depreciation Projector: applies horizon-specific depreciation rates to
// the current estimate, producing one TimePrediction per horizon and the
// matching YearlyPrediction keyed by absolute calendar year.

use crate::confidence::value_range;
use crate::config::ReferenceTables;
use crate::models::{
    round_paise, CarSpecs, PriceBreakdown, PriceEstimate, TimePrediction, YearlyPrediction,
};

/// Project the current estimate over the configured horizons. Pure; the
/// yearly sequence is a deterministic projection of the horizon sequence
/// (year = currentYear + yearsAhead).
pub(crate) fn project(
    current: &PriceEstimate,
    specs: &CarSpecs,
    breakdown: &PriceBreakdown,
    tables: &ReferenceTables,
    current_year: i32,
) -> (Vec<TimePrediction>, Vec<YearlyPrediction>) {
    let params = &tables.depreciation;

    // Horizons come from configuration; emit them ascending regardless of
    // how they were written, ignoring non-positive entries.
    let mut horizons: Vec<i64> = params.horizons.iter().copied().filter(|h| *h > 0).collect();
    horizons.sort_unstable();
    horizons.dedup();

    // Vehicles do not depreciate to zero.
    let residual_floor = breakdown.base_value * params.min_residual_fraction;

    let mut future = Vec::with_capacity(horizons.len());
    let mut by_year = Vec::with_capacity(horizons.len());

    for years_ahead in horizons {
        let rate = params.cumulative_rate(years_ahead, specs.fuel_type, specs.transmission);
        let raw = current.price * (1.0 - rate);
        let price = round_paise(raw.max(residual_floor).min(current.price));

        // Farther projections are strictly less certain, down to the same
        // floor the current estimate uses.
        let confidence = (current.confidence
            * params.horizon_confidence_decay.powi(years_ahead as i32))
        .clamp(tables.confidence.floor, tables.confidence.cap);

        tracing::debug!(years_ahead, rate, price, confidence, "Projected future price");

        by_year.push(YearlyPrediction {
            year: current_year + years_ahead as i32,
            predicted_price: price,
            confidence,
        });
        future.push(TimePrediction {
            years_ahead,
            depreciation_rate: rate,
            price_estimate: PriceEstimate {
                price,
                confidence,
                value_range: value_range(price, confidence, tables),
            },
        });
    }

    (future, by_year)
}
