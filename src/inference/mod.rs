//! Inference Module - pretrained risk classifiers
//!
//! Four binary classifiers (flood/earthquake x random forest/logistic
//! regression) are loaded once at startup and shared read-only by every
//! request. The classifier trait is the seam: production uses ONNX Runtime,
//! tests plug in fixed-output fakes.

pub mod onnx;
pub mod registry;

use std::path::PathBuf;

use serde::Serialize;

use crate::models::{DisasterType, FeatureVector, ModelKind};

pub use onnx::OnnxClassifier;
pub use registry::ModelRegistry;

/// Binary verdict of a classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionResult {
    LowRisk,
    HighRisk,
}

impl PredictionResult {
    pub fn from_label(label: i64) -> Result<Self, ModelError> {
        match label {
            0 => Ok(Self::LowRisk),
            1 => Ok(Self::HighRisk),
            other => Err(ModelError::UnexpectedLabel(other)),
        }
    }

    pub fn label(&self) -> u8 {
        match self {
            Self::LowRisk => 0,
            Self::HighRisk => 1,
        }
    }

    pub fn is_high_risk(&self) -> bool {
        matches!(self, Self::HighRisk)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("model artifact not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to load model {}: {message}", .path.display())]
    Load { path: PathBuf, message: String },

    #[error("no {model:?} classifier registered for {track:?}")]
    Missing { track: DisasterType, model: ModelKind },

    #[error("inference failed: {0}")]
    Inference(String),

    #[error("classifier returned label {0}, expected 0 or 1")]
    UnexpectedLabel(i64),
}

/// A loaded binary classifier
pub trait Classifier: Send + Sync {
    fn predict(&self, features: &FeatureVector) -> Result<PredictionResult, ModelError>;
}

/// Run the selected classifier on one feature vector
pub fn predict(
    registry: &ModelRegistry,
    track: DisasterType,
    model: ModelKind,
    features: &FeatureVector,
) -> Result<PredictionResult, ModelError> {
    let classifier = registry.get(track, model)?;
    let result = classifier.predict(features)?;

    tracing::debug!(
        track = track.as_str(),
        model = model.label(),
        label = result.label(),
        "prediction complete"
    );

    Ok(result)
}
