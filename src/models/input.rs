//! Form submissions for the two risk tracks

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use super::record::DisasterRecord;
use super::track::{DisasterType, FeatureVector, ModelKind};

/// Maximum length of the shared contact field
pub const PHONE_NUMBER_MAX_LEN: u64 = 15;

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error(transparent)]
    Invalid(#[from] ValidationErrors),

    #[error("{0} is out of range")]
    OutOfRange(&'static str),

    #[error("{0} is required")]
    Missing(&'static str),

    /// The request body could not be decoded at all
    #[error("{0}")]
    Malformed(String),
}

/// One submission of a risk track: feature schema, classifier choice,
/// contact address and the mapping onto a stored row.
pub trait RiskTrack: Validate + Send + Sync {
    const TRACK: DisasterType;

    fn model(&self) -> ModelKind;

    /// Model inputs, in the order of `TRACK.fields()`
    fn features(&self) -> FeatureVector;

    fn phone_number(&self) -> &str;

    fn to_record(&self) -> DisasterRecord;

    /// Assemble a submission from values in `TRACK.fields()` order
    fn from_features(model: ModelKind, features: FeatureVector, phone_number: String) -> Self;

    /// Derived validation plus a pass over the field schema, which also
    /// rejects NaN
    fn check(&self) -> Result<(), InputError> {
        self.validate()?;

        for (field, value) in Self::TRACK.fields().iter().zip(self.features()) {
            if !field.contains(value) {
                return Err(InputError::OutOfRange(field.name));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct FloodInput {
    #[serde(default, alias = "flood_model")]
    pub model: ModelKind,

    #[validate(range(min = 50.0, max = 300.0))]
    pub rainfall_mm: f64,

    #[validate(range(min = 1.0, max = 10.0))]
    pub river_level_m: f64,

    #[validate(range(min = 30.0, max = 100.0))]
    pub soil_moisture_pct: f64,

    #[validate(range(min = 10.0, max = 45.0))]
    pub temperature_c: f64,

    #[serde(default)]
    #[validate(length(max = 15))]
    pub phone_number: String,
}

impl RiskTrack for FloodInput {
    const TRACK: DisasterType = DisasterType::Flood;

    fn model(&self) -> ModelKind {
        self.model
    }

    fn features(&self) -> FeatureVector {
        [self.rainfall_mm, self.river_level_m, self.soil_moisture_pct, self.temperature_c]
    }

    fn phone_number(&self) -> &str {
        &self.phone_number
    }

    fn to_record(&self) -> DisasterRecord {
        DisasterRecord {
            rainfall_mm: Some(self.rainfall_mm),
            river_level_m: Some(self.river_level_m),
            soil_moisture: Some(self.soil_moisture_pct),
            temperature_c: Some(self.temperature_c),
            earthquake_magnitude: None,
            earthquake_depth: None,
            phone_number: self.phone_number.clone(),
            disaster_type: DisasterType::Flood,
        }
    }

    fn from_features(model: ModelKind, features: FeatureVector, phone_number: String) -> Self {
        let [rainfall_mm, river_level_m, soil_moisture_pct, temperature_c] = features;
        Self { model, rainfall_mm, river_level_m, soil_moisture_pct, temperature_c, phone_number }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct EarthquakeInput {
    #[serde(default, alias = "earthquake_model")]
    pub model: ModelKind,

    #[validate(range(min = 3.0, max = 9.0))]
    pub magnitude: f64,

    #[validate(range(min = 1.0, max = 50.0))]
    pub depth_km: f64,

    #[validate(range(min = 1.0, max = 200.0))]
    pub distance_km: f64,

    #[validate(range(min = 100.0, max = 15000.0))]
    pub population_density: f64,

    #[serde(default)]
    #[validate(length(max = 15))]
    pub phone_number: String,
}

impl RiskTrack for EarthquakeInput {
    const TRACK: DisasterType = DisasterType::Earthquake;

    fn model(&self) -> ModelKind {
        self.model
    }

    fn features(&self) -> FeatureVector {
        [self.magnitude, self.depth_km, self.distance_km, self.population_density]
    }

    fn phone_number(&self) -> &str {
        &self.phone_number
    }

    // Distance and population density feed the model only; the table has no
    // columns for them.
    fn to_record(&self) -> DisasterRecord {
        DisasterRecord {
            rainfall_mm: None,
            river_level_m: None,
            soil_moisture: None,
            temperature_c: None,
            earthquake_magnitude: Some(self.magnitude),
            earthquake_depth: Some(self.depth_km),
            phone_number: self.phone_number.clone(),
            disaster_type: DisasterType::Earthquake,
        }
    }

    fn from_features(model: ModelKind, features: FeatureVector, phone_number: String) -> Self {
        let [magnitude, depth_km, distance_km, population_density] = features;
        Self { model, magnitude, depth_km, distance_km, population_density, phone_number }
    }
}
