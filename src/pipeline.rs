//! Submission pipeline
//!
//! validate -> predict -> alert (high risk only) -> save, strictly in that
//! order. A gateway failure stops before the save; a store failure happens
//! after any alert was already delivered.

use serde::Serialize;
use uuid::Uuid;

use crate::alert::{self, AlertOutcome, GatewayError};
use crate::db::StoreError;
use crate::inference::{self, ModelError, PredictionResult};
use crate::models::{DisasterType, InputError, ModelKind, RiskTrack};
use crate::AppState;

#[derive(Debug, Clone, Serialize)]
pub struct SubmissionOutcome {
    pub submission_id: Uuid,
    pub disaster_type: DisasterType,
    pub model: ModelKind,
    pub prediction: PredictionResult,
    pub alert: AlertOutcome,
}

#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("invalid input: {0}")]
    Invalid(#[from] InputError),

    #[error(transparent)]
    Model(#[from] ModelError),

    /// The alert could not be sent; nothing was saved
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// Saving failed after the alert step completed with `alert`
    #[error("{source}")]
    Store {
        alert: AlertOutcome,
        #[source]
        source: StoreError,
    },
}

/// Process one "predict" action of a risk track
pub async fn submit<T: RiskTrack>(state: &AppState, input: &T) -> Result<SubmissionOutcome, SubmissionError> {
    let submission_id = Uuid::new_v4();
    let track = T::TRACK;

    input.check()?;

    let prediction = inference::predict(&state.models, track, input.model(), &input.features())?;

    tracing::info!(
        submission = %submission_id,
        track = track.as_str(),
        model = input.model().label(),
        high_risk = prediction.is_high_risk(),
        "Prediction made"
    );

    let alert = alert::dispatch(state.gateway.as_ref(), prediction, track, input.phone_number()).await?;

    if let Err(source) = state.store.save(&input.to_record()).await {
        tracing::error!(submission = %submission_id, "Failed to save submission: {}", source);
        return Err(SubmissionError::Store { alert, source });
    }

    Ok(SubmissionOutcome {
        submission_id,
        disaster_type: track,
        model: input.model(),
        prediction,
        alert,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EarthquakeInput, FloodInput};
    use crate::testing::TestServices;

    fn scenario_flood() -> FloodInput {
        FloodInput {
            model: ModelKind::RandomForest,
            rainfall_mm: 250.0,
            river_level_m: 8.0,
            soil_moisture_pct: 90.0,
            temperature_c: 30.0,
            phone_number: "+911234567890".to_string(),
        }
    }

    fn scenario_earthquake() -> EarthquakeInput {
        EarthquakeInput {
            model: ModelKind::RandomForest,
            magnitude: 4.0,
            depth_km: 30.0,
            distance_km: 150.0,
            population_density: 500.0,
            phone_number: String::new(),
        }
    }

    #[tokio::test]
    async fn test_high_risk_flood_alerts_and_saves() {
        let services = TestServices::new(PredictionResult::HighRisk);

        let outcome = submit(&services.state, &scenario_flood()).await.unwrap();

        assert_eq!(outcome.prediction, PredictionResult::HighRisk);
        assert!(matches!(outcome.alert, AlertOutcome::Sent { .. }));
        assert_eq!(
            services.gateway.calls(),
            vec![(
                "+911234567890".to_string(),
                "🚨 Flood Alert! Take precautions immediately.".to_string()
            )]
        );

        let records = services.store.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].disaster_type, DisasterType::Flood);
        assert_eq!(records[0].rainfall_mm, Some(250.0));
        assert!(records[0].earthquake_magnitude.is_none());
        assert!(records[0].earthquake_depth.is_none());
    }

    #[tokio::test]
    async fn test_earthquake_without_destination_never_alerts() {
        for prediction in [PredictionResult::LowRisk, PredictionResult::HighRisk] {
            let services = TestServices::new(prediction);

            let outcome = submit(&services.state, &scenario_earthquake()).await.unwrap();

            let expected = if prediction.is_high_risk() {
                AlertOutcome::MissingDestination
            } else {
                AlertOutcome::NotRequired
            };
            assert_eq!(outcome.alert, expected);
            assert!(services.gateway.calls().is_empty());

            let records = services.store.records();
            assert_eq!(records.len(), 1);
            assert_eq!(records[0].disaster_type, DisasterType::Earthquake);
            assert!(records[0].rainfall_mm.is_none());
            assert!(records[0].temperature_c.is_none());
        }
    }

    #[tokio::test]
    async fn test_low_risk_with_destination_saves_without_alert() {
        let services = TestServices::new(PredictionResult::LowRisk);

        let outcome = submit(&services.state, &scenario_flood()).await.unwrap();

        assert_eq!(outcome.alert, AlertOutcome::NotRequired);
        assert!(services.gateway.calls().is_empty());
        assert_eq!(services.store.records().len(), 1);
    }

    #[tokio::test]
    async fn test_identical_submissions_are_not_deduplicated() {
        let services = TestServices::new(PredictionResult::LowRisk);

        let first = submit(&services.state, &scenario_flood()).await.unwrap();
        let second = submit(&services.state, &scenario_flood()).await.unwrap();

        assert_ne!(first.submission_id, second.submission_id);
        let records = services.store.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], records[1]);
    }

    #[tokio::test]
    async fn test_store_failure_after_alert() {
        let services = TestServices::new(PredictionResult::HighRisk).with_failing_store();

        let result = submit(&services.state, &scenario_flood()).await;

        match result {
            Err(SubmissionError::Store { alert, .. }) => {
                assert!(matches!(alert, AlertOutcome::Sent { .. }));
            }
            other => panic!("Expected store error, got {:?}", other),
        }
        assert_eq!(services.gateway.calls().len(), 1);
        assert!(services.store.records().is_empty());
    }

    #[tokio::test]
    async fn test_gateway_failure_skips_save() {
        let services = TestServices::new(PredictionResult::HighRisk).with_failing_gateway();

        let result = submit(&services.state, &scenario_flood()).await;

        assert!(matches!(result, Err(SubmissionError::Gateway(_))));
        assert!(services.store.records().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_input_stops_before_prediction() {
        let services = TestServices::new(PredictionResult::HighRisk);
        let mut input = scenario_flood();
        input.rainfall_mm = 1000.0;

        let result = submit(&services.state, &input).await;

        assert!(matches!(result, Err(SubmissionError::Invalid(_))));
        assert_eq!(services.predictions(), 0);
        assert!(services.gateway.calls().is_empty());
        assert!(services.store.records().is_empty());
    }
}
