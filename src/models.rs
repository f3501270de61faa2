// Data structures for the valuation engine
// e.g., CarSpecs, PriceBreakdown, PricePredictionResult

use serde::{Deserialize, Serialize};

/// Fuel type of the vehicle. Closed set so every adjustment table is
/// exhaustively covered at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FuelType {
    Petrol,
    Diesel,
    Electric,
    Hybrid,
}

/// Transmission type of the vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransmissionType {
    Manual,
    Automatic,
}

// Vehicle specification received from the caller
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")] // Match JavaScript frontend keys
pub struct CarSpecs {
    pub brand: String,
    pub model_year: i32,
    /// Odometer reading in kilometres.
    pub mileage: i64,
    pub year_of_purchase: i32,
    /// Years the vehicle was actually in use. Cannot exceed the ownership
    /// window (currentYear - yearOfPurchase).
    pub usage_duration: i32,
    pub transmission: TransmissionType,
    pub fuel_type: FuelType,
    /// Number of previous owners. Zero means first-hand.
    pub owners: i32,
}

/// Itemized decomposition of the current estimate. All values in INR.
///
/// `base_value` plus the six signed adjustment deltas reconstructs the
/// reported current price (up to paise rounding).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    pub base_value: f64,
    pub brand_premium: f64,
    pub age_adjustment: f64,
    pub mileage_adjustment: f64,
    pub owner_adjustment: f64,
    pub transmission_adjustment: f64,
    pub fuel_type_adjustment: f64,
}

/// Uncertainty band around a price. Invariant: `low <= high`.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Range {
    pub low: f64,
    pub high: f64,
}

impl Range {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.low && value <= self.high
    }

    pub fn width(&self) -> f64 {
        self.high - self.low
    }
}

/// A single point-in-time valuation. The range always brackets the price.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PriceEstimate {
    pub price: f64,
    /// Calibrated heuristic in [0, 1], not a statistical probability.
    pub confidence: f64,
    pub value_range: Range,
}

// Summary deltas surfaced to the caller alongside the full breakdown.
// Both are shares of the age adjustment: the part attributable to actual
// usage years vs. the years between model year and purchase.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Adjustments {
    pub usage_duration_adjustment: f64,
    pub purchase_year_adjustment: f64,
}

/// One calendar-year point on the future timeline.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct YearlyPrediction {
    pub year: i32,
    pub predicted_price: f64,
    pub confidence: f64,
}

/// One horizon projection (1, 3 or 5 years ahead by default).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimePrediction {
    pub years_ahead: i64,
    /// Cumulative fractional reduction applied to the current price.
    pub depreciation_rate: f64,
    pub price_estimate: PriceEstimate,
}

/// Full engine output returned to the caller.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PricePredictionResult {
    pub current_price: PriceEstimate,
    pub detailed_breakdown: PriceBreakdown,
    pub adjustments: Adjustments,
    /// Sorted by ascending `years_ahead`.
    pub future_predictions: Vec<TimePrediction>,
    /// Deterministic projection of `future_predictions` keyed by absolute
    /// calendar year; sorted ascending.
    pub predictions_by_year: Vec<YearlyPrediction>,
    /// Minimum of the current-price confidence and every future-prediction
    /// confidence (weakest link in the chain).
    pub confidence_score: f64,
}

/// Round a monetary amount to the paise (two decimals).
pub(crate) fn round_paise(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
