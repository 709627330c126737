//! Trigger Route

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::service;
use crate::state::SharedState;

/// Response for the trigger endpoint
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerResponse {
    pub success: bool,
    pub message: String,
    pub prediction_count: usize,
}

/// Force a fresh fetch and prediction run.
///
/// The fetch itself cannot fail; an unavailable classifier surfaces as a
/// 500 with `success: false`.
pub async fn trigger_prediction(
    State(state): State<SharedState>,
) -> (StatusCode, Json<TriggerResponse>) {
    service::refresh_data(&state).await;

    match service::run_prediction(&state).await {
        Ok(count) => (
            StatusCode::OK,
            Json(TriggerResponse {
                success: true,
                message: format!("Generated {count} predictions"),
                prediction_count: count,
            }),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(TriggerResponse {
                success: false,
                message: e.to_string(),
                prediction_count: 0,
            }),
        ),
    }
}
