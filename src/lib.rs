//! Car price valuation and forecasting engine.
//!
//! A deterministic, explainable rule engine: given a vehicle's
//! specification it produces a current price estimate (in INR) with a
//! confidence score and value range, an itemized breakdown of the factors
//! that drove the price, and future price projections at fixed horizons.
//! Calibration lives in the versioned [`ReferenceTables`], loaded once at
//! startup and injected into the predictor; the engine owns no session
//! state and performs no I/O, so concurrent calls need no locking.
//!
//! ```no_run
//! use carpredict_rust::{
//!     CarPricePredictor, CarSpecs, FuelType, ReferenceTables, TransmissionType,
//! };
//!
//! fn main() -> anyhow::Result<()> {
//!     let tables = ReferenceTables::load()?;
//!     let predictor = CarPricePredictor::new(tables);
//!
//!     let result = predictor.predict_car_price(&CarSpecs {
//!         brand: "Toyota".to_string(),
//!         model_year: 2018,
//!         mileage: 40_000,
//!         year_of_purchase: 2019,
//!         usage_duration: 5,
//!         transmission: TransmissionType::Automatic,
//!         fuel_type: FuelType::Petrol,
//!         owners: 1,
//!     })?;
//!
//!     println!("estimated price: ₹{:.0}", result.current_price.price);
//!     Ok(())
//! }
//! ```

// Declare modules
mod breakdown;
mod confidence;
pub mod config;
mod depreciation;
pub mod error;
pub mod models;
pub mod predictor;

pub use config::ReferenceTables;
pub use error::{EngineResult, PredictionError};
pub use models::{
    Adjustments, CarSpecs, FuelType, PriceBreakdown, PriceEstimate, PricePredictionResult,
    Range, TimePrediction, TransmissionType, YearlyPrediction,
};
pub use predictor::CarPricePredictor;
