//! Model registry: one classifier per (track, model choice)

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::{Classifier, ModelError, OnnxClassifier};
use crate::models::{DisasterType, ModelKind};

pub struct ModelRegistry {
    models: HashMap<(DisasterType, ModelKind), Box<dyn Classifier>>,
}

impl ModelRegistry {
    /// Load all four ONNX artifacts from `dir`. Fails on the first missing
    /// or unreadable artifact.
    pub fn load_dir(dir: &Path) -> Result<Self, ModelError> {
        tracing::info!("Loading classifiers from {}", dir.display());

        let registry = Self::try_from_classifiers(|track, model| {
            let path = artifact_path(dir, track, model);
            let classifier = OnnxClassifier::load(&path)?;
            Ok(Box::new(classifier) as Box<dyn Classifier>)
        })?;

        tracing::info!("{} classifiers loaded", registry.len());
        Ok(registry)
    }

    /// Build a registry from a constructor called once per (track, model)
    pub fn try_from_classifiers<F>(mut build: F) -> Result<Self, ModelError>
    where
        F: FnMut(DisasterType, ModelKind) -> Result<Box<dyn Classifier>, ModelError>,
    {
        let mut models = HashMap::new();
        for track in DisasterType::ALL {
            for model in ModelKind::ALL {
                models.insert((track, model), build(track, model)?);
            }
        }
        Ok(Self { models })
    }

    #[cfg(test)]
    pub fn from_classifiers<F>(mut build: F) -> Self
    where
        F: FnMut(DisasterType, ModelKind) -> Box<dyn Classifier>,
    {
        let models = DisasterType::ALL
            .into_iter()
            .flat_map(|track| ModelKind::ALL.into_iter().map(move |model| (track, model)))
            .map(|(track, model)| ((track, model), build(track, model)))
            .collect();
        Self { models }
    }

    pub fn get(&self, track: DisasterType, model: ModelKind) -> Result<&dyn Classifier, ModelError> {
        self.models
            .get(&(track, model))
            .map(|c| c.as_ref())
            .ok_or(ModelError::Missing { track, model })
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }
}

/// `<dir>/<track>_<rf|lr>_model.onnx`
pub fn artifact_path(dir: &Path, track: DisasterType, model: ModelKind) -> PathBuf {
    dir.join(format!("{}_{}_model.onnx", track.slug(), model.artifact_tag()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::PredictionResult;
    use crate::testing::FixedClassifier;

    #[test]
    fn test_artifact_names() {
        let dir = Path::new("models");
        assert_eq!(
            artifact_path(dir, DisasterType::Flood, ModelKind::RandomForest),
            PathBuf::from("models/flood_rf_model.onnx")
        );
        assert_eq!(
            artifact_path(dir, DisasterType::Earthquake, ModelKind::LogisticRegression),
            PathBuf::from("models/earthquake_lr_model.onnx")
        );
    }

    #[test]
    fn test_registry_holds_four_classifiers() {
        let registry = ModelRegistry::from_classifiers(|_, _| {
            Box::new(FixedClassifier(PredictionResult::LowRisk)) as Box<dyn Classifier>
        });
        assert_eq!(registry.len(), 4);
        for track in DisasterType::ALL {
            for model in ModelKind::ALL {
                assert!(registry.get(track, model).is_ok());
            }
        }
    }

    #[test]
    fn test_load_fails_when_artifacts_missing() {
        let dir = tempfile::tempdir().unwrap();
        let result = ModelRegistry::load_dir(dir.path());
        match result {
            Err(ModelError::NotFound(path)) => {
                assert_eq!(path, dir.path().join("flood_rf_model.onnx"));
            }
            Err(other) => panic!("Expected NotFound, got {other}"),
            Ok(_) => panic!("Expected load failure"),
        }
    }

    #[test]
    fn test_constructor_error_aborts_registry() {
        let mut calls = 0;
        let result = ModelRegistry::try_from_classifiers(|track, model| {
            calls += 1;
            if track == DisasterType::Earthquake {
                return Err(ModelError::Missing { track, model });
            }
            Ok(Box::new(FixedClassifier(PredictionResult::LowRisk)) as Box<dyn Classifier>)
        });
        assert!(result.is_err());
        assert_eq!(calls, 3);
    }
}
