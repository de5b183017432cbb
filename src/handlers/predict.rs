//! JSON prediction handlers

use axum::{extract::State, Json};
use serde::de::DeserializeOwned;

use crate::models::RiskTrack;
use crate::pipeline::{self, SubmissionOutcome};
use crate::{AppResult, AppState};

/// Run one submission of track `T`
pub async fn submit<T>(
    State(state): State<AppState>,
    Json(input): Json<T>,
) -> AppResult<Json<SubmissionOutcome>>
where
    T: RiskTrack + DeserializeOwned + 'static,
{
    let outcome = pipeline::submit(&state, &input).await?;
    Ok(Json(outcome))
}
