//! Risk tracks (flood, earthquake) and their fixed schemas

use serde::{Deserialize, Serialize};

/// Number of model inputs per track
pub const FEATURE_COUNT: usize = 4;

/// Ordered model inputs for one track
pub type FeatureVector = [f64; FEATURE_COUNT];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisasterType {
    Flood,
    Earthquake,
}

impl DisasterType {
    pub const ALL: [DisasterType; 2] = [DisasterType::Flood, DisasterType::Earthquake];

    /// Tag stored in the `Disaster_Type` column
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Flood => "Flood",
            Self::Earthquake => "Earthquake",
        }
    }

    /// Lowercase identifier used in routes and artifact names
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Flood => "flood",
            Self::Earthquake => "earthquake",
        }
    }

    /// SMS text sent on a high-risk verdict
    pub fn alert_message(&self) -> &'static str {
        match self {
            Self::Flood => "🚨 Flood Alert! Take precautions immediately.",
            Self::Earthquake => "🚨 Earthquake Alert! Follow safety protocols.",
        }
    }

    pub fn high_risk_notice(&self) -> &'static str {
        match self {
            Self::Flood => "🚨 High Risk of Flood Detected!",
            Self::Earthquake => "🚨 High Risk of Earthquake Detected!",
        }
    }

    pub fn low_risk_notice(&self) -> &'static str {
        match self {
            Self::Flood => "✅ Low Flood Risk",
            Self::Earthquake => "✅ Low Earthquake Risk",
        }
    }

    pub fn panel_title(&self) -> &'static str {
        match self {
            Self::Flood => "🌊 Flood Risk",
            Self::Earthquake => "🌍 Earthquake Risk",
        }
    }

    /// Input fields in model-input order
    pub fn fields(&self) -> &'static [FieldSpec; FEATURE_COUNT] {
        match self {
            Self::Flood => &FLOOD_FIELDS,
            Self::Earthquake => &EARTHQUAKE_FIELDS,
        }
    }

    pub fn default_features(&self) -> FeatureVector {
        let fields = self.fields();
        [fields[0].default, fields[1].default, fields[2].default, fields[3].default]
    }
}

/// Classifier choice offered per track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    #[default]
    RandomForest,
    LogisticRegression,
}

impl ModelKind {
    pub const ALL: [ModelKind; 2] = [ModelKind::RandomForest, ModelKind::LogisticRegression];

    pub fn label(&self) -> &'static str {
        match self {
            Self::RandomForest => "Random Forest",
            Self::LogisticRegression => "Logistic Regression",
        }
    }

    /// Form/JSON value
    pub fn id(&self) -> &'static str {
        match self {
            Self::RandomForest => "random_forest",
            Self::LogisticRegression => "logistic_regression",
        }
    }

    /// Short tag used in artifact file names
    pub fn artifact_tag(&self) -> &'static str {
        match self {
            Self::RandomForest => "rf",
            Self::LogisticRegression => "lr",
        }
    }
}

/// Bounded numeric input of a track
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
    pub default: f64,
    pub step: f64,
}

impl FieldSpec {
    pub fn contains(&self, value: f64) -> bool {
        value.is_finite() && value >= self.min && value <= self.max
    }
}

pub const FLOOD_FIELDS: [FieldSpec; FEATURE_COUNT] = [
    FieldSpec { name: "rainfall_mm", label: "Rainfall (mm)", min: 50.0, max: 300.0, default: 120.0, step: 1.0 },
    FieldSpec { name: "river_level_m", label: "River Level (m)", min: 1.0, max: 10.0, default: 5.0, step: 0.1 },
    FieldSpec { name: "soil_moisture_pct", label: "Soil Moisture (%)", min: 30.0, max: 100.0, default: 60.0, step: 1.0 },
    FieldSpec { name: "temperature_c", label: "Temperature (°C)", min: 10.0, max: 45.0, default: 28.0, step: 1.0 },
];

pub const EARTHQUAKE_FIELDS: [FieldSpec; FEATURE_COUNT] = [
    FieldSpec { name: "magnitude", label: "Magnitude", min: 3.0, max: 9.0, default: 5.5, step: 0.1 },
    FieldSpec { name: "depth_km", label: "Depth (km)", min: 1.0, max: 50.0, default: 10.0, step: 0.1 },
    FieldSpec { name: "distance_km", label: "Distance to City (km)", min: 1.0, max: 200.0, default: 50.0, step: 1.0 },
    FieldSpec { name: "population_density", label: "Population Density", min: 100.0, max: 15000.0, default: 3000.0, step: 1.0 },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_within_bounds() {
        for track in DisasterType::ALL {
            for field in track.fields() {
                assert!(field.min < field.max, "{}", field.name);
                assert!(field.contains(field.default), "{}", field.name);
            }
        }
    }

    #[test]
    fn test_default_features_follow_field_order() {
        assert_eq!(DisasterType::Flood.default_features(), [120.0, 5.0, 60.0, 28.0]);
        assert_eq!(DisasterType::Earthquake.default_features(), [5.5, 10.0, 50.0, 3000.0]);
    }

    #[test]
    fn test_stored_tags() {
        assert_eq!(DisasterType::Flood.as_str(), "Flood");
        assert_eq!(DisasterType::Earthquake.as_str(), "Earthquake");
        assert_eq!(
            serde_json::to_string(&DisasterType::Earthquake).unwrap(),
            "\"Earthquake\""
        );
    }

    #[test]
    fn test_field_contains_rejects_nan() {
        assert!(!FLOOD_FIELDS[0].contains(f64::NAN));
        assert!(!FLOOD_FIELDS[0].contains(49.9));
        assert!(FLOOD_FIELDS[0].contains(300.0));
    }

    #[test]
    fn test_model_kind_serde_ids() {
        for kind in ModelKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.id()));
        }
    }
}
