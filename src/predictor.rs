// Valuation Facade: validates input, runs the computation pipeline
// (breakdown -> confidence -> projection) and assembles the
// PricePredictionResult contract.

use chrono::Datelike;

use crate::breakdown::{compute_breakdown, derive_adjustments};
use crate::confidence::{estimate_confidence, value_range};
use crate::config::ReferenceTables;
use crate::depreciation::project;
use crate::error::{EngineResult, PredictionError};
use crate::models::{round_paise, CarSpecs, PriceEstimate, PricePredictionResult};

/// Earliest plausible model year (the Benz Patent-Motorwagen).
const MIN_MODEL_YEAR: i32 = 1886;

/// The valuation engine. Holds the immutable reference tables and the year
/// all age arithmetic is anchored to; carries no per-call state, so a single
/// instance can serve concurrent callers.
pub struct CarPricePredictor {
    tables: ReferenceTables,
    current_year: i32,
}

impl CarPricePredictor {
    /// Predictor anchored to the system clock's current year.
    pub fn new(tables: ReferenceTables) -> Self {
        Self::with_current_year(tables, chrono::Local::now().year())
    }

    /// Predictor anchored to a fixed year, for deterministic tests and
    /// replayed valuations.
    pub fn with_current_year(tables: ReferenceTables, current_year: i32) -> Self {
        CarPricePredictor { tables, current_year }
    }

    pub fn tables(&self) -> &ReferenceTables {
        &self.tables
    }

    /// Estimate the current market value of a vehicle (INR) and project it
    /// forward over the configured horizons.
    ///
    /// Fails only with [`PredictionError::InvalidInput`]; once validation
    /// passes, the computation is total and deterministic — no retries, no
    /// caching, no partial results.
    pub fn predict_car_price(&self, specs: &CarSpecs) -> EngineResult<PricePredictionResult> {
        self.validate(specs)?;

        let (breakdown, trace) = compute_breakdown(specs, &self.tables, self.current_year);

        let confidence = estimate_confidence(&trace, &self.tables);
        let price = round_paise(trace.unrounded_value);
        let current_price = PriceEstimate {
            price,
            confidence,
            value_range: value_range(price, confidence, &self.tables),
        };

        let adjustments = derive_adjustments(specs, &breakdown, self.current_year);
        let (future_predictions, predictions_by_year) =
            project(&current_price, specs, &breakdown, &self.tables, self.current_year);

        // Weakest link across the whole prediction chain.
        let confidence_score = future_predictions
            .iter()
            .map(|p| p.price_estimate.confidence)
            .fold(confidence, f64::min);

        tracing::info!(
            brand = %specs.brand,
            price,
            confidence_score,
            horizons = future_predictions.len(),
            "Prediction complete"
        );

        Ok(PricePredictionResult {
            current_price,
            detailed_breakdown: breakdown,
            adjustments,
            future_predictions,
            predictions_by_year,
            confidence_score,
        })
    }

    // Input validation. The first violation is surfaced unchanged to the
    // caller; nothing is computed for a rejected spec. Field names follow
    // the wire contract (camelCase).
    fn validate(&self, specs: &CarSpecs) -> EngineResult<()> {
        let current_year = self.current_year;

        if specs.brand.trim().is_empty() {
            return Err(PredictionError::invalid("brand", "brand must not be empty"));
        }
        if specs.model_year < MIN_MODEL_YEAR || specs.model_year > current_year {
            return Err(PredictionError::invalid(
                "modelYear",
                format!("must be between {MIN_MODEL_YEAR} and {current_year}"),
            ));
        }
        if specs.year_of_purchase < specs.model_year || specs.year_of_purchase > current_year {
            return Err(PredictionError::invalid(
                "yearOfPurchase",
                format!("must be between {} and {}", specs.model_year, current_year),
            ));
        }
        if specs.mileage < 0 {
            return Err(PredictionError::invalid("mileage", "must be 0 or greater"));
        }
        if specs.usage_duration < 0 {
            return Err(PredictionError::invalid("usageDuration", "must be 0 or greater"));
        }
        let max_usage = current_year - specs.year_of_purchase;
        if specs.usage_duration > max_usage {
            return Err(PredictionError::invalid(
                "usageDuration",
                format!("cannot exceed {max_usage} years"),
            ));
        }
        if specs.owners < 0 {
            return Err(PredictionError::invalid("owners", "must be 0 or greater"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FuelType, TransmissionType};

    const CURRENT_YEAR: i32 = 2025;

    fn predictor() -> CarPricePredictor {
        // Surface engine logs in tests when RUST_LOG is set.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
        CarPricePredictor::with_current_year(ReferenceTables::default(), CURRENT_YEAR)
    }

    fn toyota() -> CarSpecs {
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
    fn toyota_scenario_produces_three_decreasing_projections() {
        let result = predictor().predict_car_price(&toyota()).unwrap();

        let horizons: Vec<i64> = result
            .future_predictions
            .iter()
            .map(|p| p.years_ahead)
            .collect();
        assert_eq!(horizons, vec![1, 3, 5]);

        let mut prev = result.current_price.price;
        for pred in &result.future_predictions {
            assert!(pred.price_estimate.price < prev);
            prev = pred.price_estimate.price;
        }

        // Higher mileage, all else equal, must come out strictly cheaper.
        let mut low_mileage = toyota();
        low_mileage.mileage = 10_000;
        let cheaper = predictor().predict_car_price(&low_mileage).unwrap();
        assert!(result.current_price.price < cheaper.current_price.price);
    }

    #[test]
    fn breakdown_reconstructs_the_reported_price() {
        let result = predictor().predict_car_price(&toyota()).unwrap();
        let b = &result.detailed_breakdown;

        let reconstructed = b.base_value
            + b.brand_premium
            + b.age_adjustment
            + b.mileage_adjustment
            + b.owner_adjustment
            + b.transmission_adjustment
            + b.fuel_type_adjustment;
        assert!((reconstructed - result.current_price.price).abs() <= 0.01);
    }

    #[test]
    fn every_estimate_is_bracketed_by_its_range() {
        let result = predictor().predict_car_price(&toyota()).unwrap();

        let current = &result.current_price;
        assert!(current.value_range.contains(current.price));

        for pred in &result.future_predictions {
            let est = &pred.price_estimate;
            assert!(est.value_range.contains(est.price));
            assert!(est.price <= current.price);
            assert!(est.price >= 0.0);
        }
    }

    #[test]
    fn confidence_score_is_the_weakest_link() {
        let result = predictor().predict_car_price(&toyota()).unwrap();

        assert!((0.0..=1.0).contains(&result.confidence_score));
        assert!(result.confidence_score <= result.current_price.confidence);
        for pred in &result.future_predictions {
            assert!((0.0..=1.0).contains(&pred.price_estimate.confidence));
            assert!(result.confidence_score <= pred.price_estimate.confidence);
        }
    }

    #[test]
    fn predictions_by_year_tracks_future_predictions() {
        let result = predictor().predict_car_price(&toyota()).unwrap();
        assert_eq!(result.predictions_by_year.len(), result.future_predictions.len());

        let mut prev_year = CURRENT_YEAR;
        for (yearly, time_pred) in result
            .predictions_by_year
            .iter()
            .zip(&result.future_predictions)
        {
            assert!(yearly.year > prev_year);
            assert_eq!(yearly.year, CURRENT_YEAR + time_pred.years_ahead as i32);
            assert_eq!(yearly.predicted_price, time_pred.price_estimate.price);
            prev_year = yearly.year;
        }
    }

    #[test]
    fn rejects_implausible_model_year() {
        let mut specs = toyota();
        specs.model_year = 1800;

        let err = predictor().predict_car_price(&specs).unwrap_err();
        assert_eq!(err.field(), "modelYear");
    }

    #[test]
    fn rejects_model_year_in_the_future() {
        let mut specs = toyota();
        specs.model_year = CURRENT_YEAR + 1;
        specs.year_of_purchase = CURRENT_YEAR + 1;

        let err = predictor().predict_car_price(&specs).unwrap_err();
        assert_eq!(err.field(), "modelYear");
    }

    #[test]
    fn rejects_purchase_before_model_year() {
        let mut specs = toyota();
        specs.year_of_purchase = 2017;

        let err = predictor().predict_car_price(&specs).unwrap_err();
        assert_eq!(err.field(), "yearOfPurchase");
    }

    #[test]
    fn rejects_usage_duration_exceeding_ownership_window() {
        let mut specs = toyota();
        specs.usage_duration = CURRENT_YEAR - specs.year_of_purchase + 1;

        let err = predictor().predict_car_price(&specs).unwrap_err();
        assert_eq!(err.field(), "usageDuration");
    }

    #[test]
    fn rejects_negative_mileage_and_owners() {
        let mut specs = toyota();
        specs.mileage = -1;
        assert_eq!(predictor().predict_car_price(&specs).unwrap_err().field(), "mileage");

        let mut specs = toyota();
        specs.owners = -1;
        assert_eq!(predictor().predict_car_price(&specs).unwrap_err().field(), "owners");
    }

    #[test]
    fn rejects_blank_brand() {
        let mut specs = toyota();
        specs.brand = "   ".to_string();

        let err = predictor().predict_car_price(&specs).unwrap_err();
        assert_eq!(err.field(), "brand");
    }

    #[test]
    fn unknown_brand_still_predicts_with_lower_confidence() {
        let known = predictor().predict_car_price(&toyota()).unwrap();

        let mut specs = toyota();
        specs.brand = "Completely Unlisted".to_string();
        let unknown = predictor().predict_car_price(&specs).unwrap();

        assert!(unknown.current_price.price > 0.0);
        assert!(unknown.current_price.confidence < known.current_price.confidence);
    }

    #[test]
    fn result_serializes_with_contract_keys() {
        let result = predictor().predict_car_price(&toyota()).unwrap();
        let json = serde_json::to_value(&result).unwrap();

        assert!(json["currentPrice"]["valueRange"]["low"].is_number());
        assert!(json["detailedBreakdown"]["fuelTypeAdjustment"].is_number());
        assert!(json["adjustments"]["usageDurationAdjustment"].is_number());
        assert!(json["futurePredictions"][0]["yearsAhead"].is_number());
        assert!(json["predictionsByYear"][0]["predictedPrice"].is_number());
        assert!(json["confidenceScore"].is_number());
    }
}
