//! ONNX Runtime classifier
//!
//! The artifacts are scikit-learn classifiers exported to ONNX: one
//! `float32[1, 4]` input, the predicted label (`int64`) as first output.

use std::path::{Path, PathBuf};

use ndarray::Array2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use parking_lot::Mutex;

use super::{Classifier, ModelError, PredictionResult};
use crate::models::{FeatureVector, FEATURE_COUNT};

pub struct OnnxClassifier {
    // `Session::run` needs `&mut`
    session: Mutex<Session>,
    output_name: String,
    path: PathBuf,
}

impl OnnxClassifier {
    /// Load an ONNX classifier from file
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        if !path.exists() {
            return Err(ModelError::NotFound(path.to_path_buf()));
        }

        let session = Session::builder()
            .map_err(|e| load_error(path, e))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| load_error(path, e))?
            .commit_from_file(path)
            .map_err(|e| load_error(path, e))?;

        if session.inputs.len() != 1 {
            return Err(ModelError::Load {
                path: path.to_path_buf(),
                message: format!("expected 1 input, found {}", session.inputs.len()),
            });
        }

        let output_name = session
            .outputs
            .first()
            .map(|o| o.name.clone())
            .ok_or_else(|| ModelError::Load {
                path: path.to_path_buf(),
                message: "model defines no outputs".to_string(),
            })?;

        tracing::info!("Loaded classifier {} (label output '{}')", path.display(), output_name);

        Ok(Self {
            session: Mutex::new(session),
            output_name,
            path: path.to_path_buf(),
        })
    }
}

fn load_error(path: &Path, e: impl std::fmt::Display) -> ModelError {
    ModelError::Load {
        path: path.to_path_buf(),
        message: e.to_string(),
    }
}

impl Classifier for OnnxClassifier {
    fn predict(&self, features: &FeatureVector) -> Result<PredictionResult, ModelError> {
        let input_data: Vec<f32> = features.iter().map(|v| *v as f32).collect();
        let input_array = Array2::<f32>::from_shape_vec((1, FEATURE_COUNT), input_data)
            .map_err(|e| ModelError::Inference(format!("Array error: {}", e)))?;

        let input_tensor = Value::from_array(input_array)
            .map_err(|e| ModelError::Inference(format!("Tensor error: {}", e)))?;

        let mut session = self.session.lock();
        let outputs = session
            .run(ort::inputs![input_tensor])
            .map_err(|e| ModelError::Inference(format!("{}: {}", self.path.display(), e)))?;

        let output = outputs
            .get(&self.output_name)
            .ok_or_else(|| ModelError::Inference("No label output".to_string()))?;

        let (_, labels) = output
            .try_extract_tensor::<i64>()
            .map_err(|e| ModelError::Inference(format!("Extract error: {}", e)))?;

        let label = labels
            .first()
            .copied()
            .ok_or_else(|| ModelError::Inference("Empty label tensor".to_string()))?;

        PredictionResult::from_label(label)
    }
}
