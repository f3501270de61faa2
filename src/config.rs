// Loading of the versioned reference tables (calibration data)
// Uses the 'config' crate and 'dotenv', with full built-in defaults so the
// engine runs without any external file.

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashMap;

use crate::models::{FuelType, TransmissionType};

// Brand catalogue grouped by calibration tier. Mirrors the brand list the
// prediction form offers; anything not listed degrades to the default tier.
const EXOTIC_BRANDS: &[&str] = &[
    "Ferrari", "Lamborghini", "Bugatti", "Pagani", "Koenigsegg", "McLaren",
    "Rolls-Royce", "Bentley", "Aston Martin", "Maserati",
];

const LUXURY_BRANDS: &[&str] = &[
    "BMW", "Mercedes-Benz", "Audi", "Lexus", "Porsche", "Land Rover",
    "Jaguar", "Volvo", "Tesla", "Cadillac", "Lincoln", "Genesis", "Infiniti",
    "Acura", "Alfa Romeo", "Lotus", "Polestar", "Lucid", "NIO", "Hongqi",
    "Morgan", "TVR", "Noble", "Caterham", "Karma", "Faraday Future", "Byton",
];

const PREMIUM_BRANDS: &[&str] = &[
    "Volkswagen", "Mini", "Jeep", "GMC", "Ram", "Dodge", "Chrysler", "Buick",
    "Skoda", "Rivian", "BYD", "Xpeng", "Li Auto", "Lynk & Co", "Voyah",
    "Wey", "Tank", "Seres", "Arcfox", "WM Motor", "Aiways", "Weltmeister",
    "Fisker", "Canoo", "Lordstown", "Nikola", "Bollinger",
];

const MID_BRANDS: &[&str] = &[
    "Toyota", "Honda", "Ford", "Chevrolet", "Nissan", "Hyundai", "Kia",
    "Mazda", "Subaru", "Mitsubishi", "Suzuki", "Isuzu", "Renault", "Peugeot",
    "Citroën", "Opel", "Vauxhall", "Seat", "Fiat", "MG", "Geely", "Chery",
    "Haval", "Great Wall", "Dongfeng", "FAW", "SAIC", "Changan", "JAC",
];

const ECONOMY_BRANDS: &[&str] = &[
    "Dacia", "Lada", "UAZ", "GAZ", "ZAZ", "Moskvitch", "Tata", "Mahindra",
    "Maruti Suzuki", "Perodua", "Proton", "Daihatsu", "Ora",
];

// Built once; brand names are matched case-insensitively.
static DEFAULT_BRAND_MAP: Lazy<HashMap<String, String>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for (tier, brands) in [
        ("exotic", EXOTIC_BRANDS),
        ("luxury", LUXURY_BRANDS),
        ("premium", PREMIUM_BRANDS),
        ("mid", MID_BRANDS),
        ("economy", ECONOMY_BRANDS),
    ] {
        for brand in brands {
            map.insert(brand.to_lowercase(), tier.to_string());
        }
    }
    map
});

// Last-resort tier if the configured default tier is itself missing from the
// tier table. The engine never validates table consistency, so every lookup
// must bottom out somewhere.
const FALLBACK_TIER: TierParams = TierParams {
    base_value: 1_500_000.0,
    premium_multiplier: 1.0,
};

/// Calibration bucket for a brand: new-vehicle reference value (INR) and a
/// premium multiplier applied on top of it.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct TierParams {
    pub base_value: f64,
    pub premium_multiplier: f64,
}

/// Brand → tier mapping plus the tier table itself.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct BrandTiers {
    pub tiers: HashMap<String, TierParams>,
    pub default_tier: String,
    /// Lowercased brand name → tier key.
    pub brands: HashMap<String, String>,
}

impl Default for BrandTiers {
    fn default() -> Self {
        let tiers = HashMap::from([
            ("exotic".to_string(), TierParams { base_value: 25_000_000.0, premium_multiplier: 1.30 }),
            ("luxury".to_string(), TierParams { base_value: 7_500_000.0, premium_multiplier: 1.18 }),
            ("premium".to_string(), TierParams { base_value: 3_200_000.0, premium_multiplier: 1.08 }),
            ("mid".to_string(), TierParams { base_value: 1_500_000.0, premium_multiplier: 1.00 }),
            ("economy".to_string(), TierParams { base_value: 700_000.0, premium_multiplier: 0.95 }),
        ]);
        BrandTiers {
            tiers,
            default_tier: "mid".to_string(),
            brands: DEFAULT_BRAND_MAP.clone(),
        }
    }
}

impl BrandTiers {
    /// Resolve a brand to its tier parameters. Unknown brands fall back to
    /// the default tier and report `known = false` so the confidence stage
    /// can discount the estimate; the lookup itself never fails.
    pub fn resolve(&self, brand: &str) -> (TierParams, bool) {
        let key = brand.trim().to_lowercase();
        let default_params = self
            .tiers
            .get(&self.default_tier)
            .copied()
            .unwrap_or(FALLBACK_TIER);

        match self.brands.get(&key) {
            Some(tier_key) => {
                let params = self.tiers.get(tier_key).copied().unwrap_or(default_params);
                (params, true)
            }
            None => (default_params, false),
        }
    }
}

/// Age-decay curve: `floor + (1 - floor) * e^(-decay_per_year * age)`.
/// Continuous, monotonically non-increasing, bounded below by `floor`.
#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct AgeCurve {
    pub floor: f64,
    pub decay_per_year: f64,
}

impl Default for AgeCurve {
    fn default() -> Self {
        AgeCurve { floor: 0.18, decay_per_year: 0.11 }
    }
}

impl AgeCurve {
    pub fn factor(&self, age_years: i32) -> f64 {
        let age = age_years.max(0) as f64;
        self.floor + (1.0 - self.floor) * (-self.decay_per_year * age).exp()
    }
}

/// Mileage-decay curve over kilometres; the exponential shape gives a
/// diminishing marginal penalty at high mileage.
#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct MileageCurve {
    pub floor: f64,
    pub scale_km: f64,
}

impl Default for MileageCurve {
    fn default() -> Self {
        MileageCurve { floor: 0.35, scale_km: 150_000.0 }
    }
}

impl MileageCurve {
    pub fn factor(&self, mileage_km: i64) -> f64 {
        let km = mileage_km.max(0) as f64;
        self.floor + (1.0 - self.floor) * (-km / self.scale_km).exp()
    }
}

/// Owner-count penalty: each additional owner multiplies the value by
/// `1 - per_owner_penalty`, floored. Zero owners is the most favorable case.
#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct OwnerCurve {
    pub per_owner_penalty: f64,
    pub floor: f64,
}

impl Default for OwnerCurve {
    fn default() -> Self {
        OwnerCurve { per_owner_penalty: 0.06, floor: 0.55 }
    }
}

impl OwnerCurve {
    pub fn factor(&self, owners: i32) -> f64 {
        let owners = owners.max(0);
        (1.0 - self.per_owner_penalty)
            .powi(owners)
            .max(self.floor)
    }
}

/// Resale-market preference multiplier per transmission type.
#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct TransmissionFactors {
    pub manual: f64,
    pub automatic: f64,
}

impl Default for TransmissionFactors {
    fn default() -> Self {
        TransmissionFactors { manual: 0.97, automatic: 1.03 }
    }
}

impl TransmissionFactors {
    pub fn factor(&self, transmission: TransmissionType) -> f64 {
        match transmission {
            TransmissionType::Manual => self.manual,
            TransmissionType::Automatic => self.automatic,
        }
    }
}

/// Resale-market preference multiplier per fuel type.
#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct FuelFactors {
    pub petrol: f64,
    pub diesel: f64,
    pub electric: f64,
    pub hybrid: f64,
}

impl Default for FuelFactors {
    fn default() -> Self {
        FuelFactors { petrol: 1.00, diesel: 0.96, electric: 1.08, hybrid: 1.04 }
    }
}

impl FuelFactors {
    pub fn factor(&self, fuel: FuelType) -> f64 {
        match fuel {
            FuelType::Petrol => self.petrol,
            FuelType::Diesel => self.diesel,
            FuelType::Electric => self.electric,
            FuelType::Hybrid => self.hybrid,
        }
    }
}

/// Parameters for the confidence score and the value range width.
#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct ConfidenceParams {
    /// Starting confidence before any discount multiplier is applied.
    pub base: f64,
    /// Confidence is never reported below this.
    pub floor: f64,
    pub cap: f64,
    /// Weight of the cumulative-adjustment magnitude discount.
    pub adjustment_weight: f64,
    pub old_age_years: i32,
    pub old_age_multiplier: f64,
    pub high_mileage_km: i64,
    pub high_mileage_multiplier: f64,
    pub many_owners: i32,
    pub many_owners_multiplier: f64,
    pub unknown_brand_multiplier: f64,
    /// Range half-width = price * (1 - confidence) * scale.
    pub range_width_scale: f64,
}

impl Default for ConfidenceParams {
    fn default() -> Self {
        ConfidenceParams {
            base: 0.95,
            floor: 0.30,
            cap: 0.99,
            adjustment_weight: 0.35,
            old_age_years: 15,
            old_age_multiplier: 0.90,
            high_mileage_km: 200_000,
            high_mileage_multiplier: 0.88,
            many_owners: 4,
            many_owners_multiplier: 0.92,
            unknown_brand_multiplier: 0.85,
            range_width_scale: 0.60,
        }
    }
}

/// Parameters for the future-price projection.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DepreciationParams {
    /// Forward horizons in years, ascending.
    pub horizons: Vec<i64>,
    /// Annual depreciation before category shifts.
    pub base_annual_rate: f64,
    /// Per-fuel-type shift on the annual rate (electric depreciates faster
    /// on battery-life uncertainty).
    pub fuel_shift: FuelFactors,
    pub transmission_shift: TransmissionFactors,
    /// Per-year multiplier on confidence for future estimates.
    pub horizon_confidence_decay: f64,
    /// Vehicles never depreciate below this fraction of their base value.
    pub min_residual_fraction: f64,
}

impl Default for DepreciationParams {
    fn default() -> Self {
        DepreciationParams {
            horizons: vec![1, 3, 5],
            base_annual_rate: 0.115,
            fuel_shift: FuelFactors { petrol: 1.00, diesel: 1.05, electric: 1.25, hybrid: 1.10 },
            transmission_shift: TransmissionFactors { manual: 1.02, automatic: 1.00 },
            horizon_confidence_decay: 0.94,
            min_residual_fraction: 0.08,
        }
    }
}

impl DepreciationParams {
    /// Cumulative depreciation rate for a horizon: compound the shifted
    /// annual rate, clamped into [0, 1]. Non-decreasing in the horizon.
    pub fn cumulative_rate(&self, years_ahead: i64, fuel: FuelType, transmission: TransmissionType) -> f64 {
        let annual = (self.base_annual_rate
            * self.fuel_shift.factor(fuel)
            * self.transmission_shift.factor(transmission))
        .clamp(0.0, 1.0);
        let retained = (1.0 - annual).powi(years_ahead.max(0) as i32);
        (1.0 - retained).clamp(0.0, 1.0)
    }
}

/// The versioned, immutable calibration data consumed by the engine.
///
/// Loaded once at startup and injected into the predictor; nothing here is
/// mutated afterwards. The engine is parameterized by these tables but does
/// not validate their internal consistency.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ReferenceTables {
    version: String,
    pub brand_tiers: BrandTiers,
    pub age_curve: AgeCurve,
    pub mileage_curve: MileageCurve,
    pub owner_curve: OwnerCurve,
    pub transmission_factors: TransmissionFactors,
    pub fuel_factors: FuelFactors,
    pub confidence: ConfidenceParams,
    pub depreciation: DepreciationParams,
}

impl Default for ReferenceTables {
    fn default() -> Self {
        ReferenceTables {
            version: "2025.2".to_string(),
            brand_tiers: BrandTiers::default(),
            age_curve: AgeCurve::default(),
            mileage_curve: MileageCurve::default(),
            owner_curve: OwnerCurve::default(),
            transmission_factors: TransmissionFactors::default(),
            fuel_factors: FuelFactors::default(),
            confidence: ConfidenceParams::default(),
            depreciation: DepreciationParams::default(),
        }
    }
}

impl ReferenceTables {
    /// Load the tables: built-in defaults, overridden by an optional
    /// `tables.toml`, overridden by `CARPREDICT__`-prefixed environment
    /// variables (e.g. `CARPREDICT__CONFIDENCE__FLOOR=0.4`).
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok(); // Load .env file if present

        let builder = Config::builder()
            // Calibration file is optional; built-in defaults cover every table
            .add_source(File::with_name("tables").required(false))
            .add_source(Environment::with_prefix("CARPREDICT").separator("__"));

        let tables: ReferenceTables = builder
            .build()
            .context("Failed to build reference-table configuration")?
            .try_deserialize()
            .context("Failed to deserialize reference tables")?;

        tracing::info!(version = %tables.version, "Reference tables loaded");
        Ok(tables)
    }

    /// Revision identifier of the loaded calibration data.
    pub fn version(&self) -> &str {
        &self.version
    }
}
