// Confidence & Range Estimator: derives a [0, 1] confidence score and a
// low/high value range from the magnitude and consistency of the
// adjustments applied.

use crate::breakdown::BreakdownTrace;
use crate::config::ReferenceTables;
use crate::models::{round_paise, Range};

/// Estimate confidence for the current valuation. Per-factor multipliers in
/// (0, 1] are combined by product; the result is clamped to the configured
/// floor and cap, so confidence is never reported as zero.
pub(crate) fn estimate_confidence(trace: &BreakdownTrace, tables: &ReferenceTables) -> f64 {
    let p = &tables.confidence;

    // Magnitude of the cumulative adjustment relative to the
    // premium-adjusted base value.
    let relative = if trace.adjusted_base > 0.0 {
        ((trace.adjusted_base - trace.unrounded_value) / trace.adjusted_base).abs()
    } else {
        0.0
    };
    let magnitude_multiplier = (1.0 - p.adjustment_weight * relative).clamp(0.05, 1.0);

    let mut confidence = p.base * magnitude_multiplier;

    // Each extremeness factor independently discounts the score.
    if trace.vehicle_age > p.old_age_years {
        confidence *= p.old_age_multiplier;
    }
    if trace.mileage > p.high_mileage_km {
        confidence *= p.high_mileage_multiplier;
    }
    if trace.owners > p.many_owners {
        confidence *= p.many_owners_multiplier;
    }
    if !trace.brand_known {
        confidence *= p.unknown_brand_multiplier;
    }

    let confidence = confidence.clamp(p.floor, p.cap);
    tracing::debug!(relative, confidence, "Estimated valuation confidence");
    confidence
}

/// Value range around a price: width grows as confidence falls, symmetric
/// about the price except where the zero floor truncates the band. Bounds
/// are rounded to the paise like every reported price.
pub(crate) fn value_range(price: f64, confidence: f64, tables: &ReferenceTables) -> Range {
    let half_width = price * (1.0 - confidence) * tables.confidence.range_width_scale;
    Range {
        low: round_paise((price - half_width).max(0.0)),
        high: round_paise(price + half_width),
    }
}
