//! Prediction Routes

use axum::{extract::State, Json};
use forecast::Prediction;
use serde::Serialize;
use tracing::warn;

use crate::service;
use crate::state::SharedState;

/// Response for the predictions endpoint
#[derive(Debug, Serialize)]
pub struct PredictionsResponse {
    pub predictions: Vec<Prediction>,
}

/// Get the current predictions, generating them on first request.
/// Always 200; an unavailable classifier just yields an empty list.
pub async fn get_predictions(State(state): State<SharedState>) -> Json<PredictionsResponse> {
    let empty = state.read().await.predictions.is_empty();
    if empty {
        if let Err(e) = service::run_prediction(&state).await {
            warn!("Prediction run skipped: {}", e);
        }
    }

    let guard = state.read().await;
    Json(PredictionsResponse {
        predictions: guard.predictions.clone(),
    })
}
