//! Track schema handler

use axum::Json;
use serde::Serialize;

use crate::models::{DisasterType, FieldSpec, ModelKind};

#[derive(Serialize)]
pub struct ModelChoice {
    id: &'static str,
    label: &'static str,
}

#[derive(Serialize)]
pub struct TrackSchema {
    disaster_type: DisasterType,
    alert_message: &'static str,
    models: Vec<ModelChoice>,
    fields: &'static [FieldSpec],
}

/// Bounds, defaults and model choices of both tracks
pub async fn list() -> Json<Vec<TrackSchema>> {
    let tracks = DisasterType::ALL
        .into_iter()
        .map(|track| TrackSchema {
            disaster_type: track,
            alert_message: track.alert_message(),
            models: ModelKind::ALL
                .into_iter()
                .map(|m| ModelChoice { id: m.id(), label: m.label() })
                .collect(),
            fields: track.fields(),
        })
        .collect();

    Json(tracks)
}
