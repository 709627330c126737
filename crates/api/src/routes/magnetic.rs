//! Magnetic Data Route

use axum::{extract::State, Json};
use chrono::Utc;
use feature_encoder::Reading;
use serde::Serialize;

use crate::service;
use crate::state::SharedState;

/// Response for the magnetic-data endpoint
#[derive(Debug, Serialize)]
pub struct MagneticDataResponse {
    pub data: Vec<Reading>,
}

/// Get the current reading window, refetching when absent or stale.
/// Always 200 with best-effort data.
pub async fn get_magnetic_data(State(state): State<SharedState>) -> Json<MagneticDataResponse> {
    let stale = state.read().await.needs_refresh(Utc::now());
    if stale {
        service::refresh_data(&state).await;
    }

    let guard = state.read().await;
    Json(MagneticDataResponse {
        data: guard.readings.clone(),
    })
}
