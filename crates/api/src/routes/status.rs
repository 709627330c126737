//! Status, Risk and Dashboard Routes

use axum::{extract::State, Json};
use feature_encoder::Reading;
use forecast::{Prediction, RiskAssessment};
use serde::Serialize;

use crate::state::{ModelStatus, SharedState};

/// Get the model status record verbatim.
pub async fn get_model_status(State(state): State<SharedState>) -> Json<ModelStatus> {
    let guard = state.read().await;
    Json(guard.model_status.clone())
}

/// Get the risk assessment record verbatim.
pub async fn get_risk_assessment(State(state): State<SharedState>) -> Json<RiskAssessment> {
    let guard = state.read().await;
    Json(guard.risk.clone())
}

/// One-call summary for the dashboard landing view
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    /// Most recent reading, if any have been fetched
    pub current_reading: Option<Reading>,
    pub model_status: ModelStatus,
    pub risk_assessment: RiskAssessment,
    pub predictions: Vec<Prediction>,
}

/// Get the dashboard summary: latest reading plus status, risk and
/// predictions in one response.
pub async fn get_dashboard_summary(State(state): State<SharedState>) -> Json<DashboardSummary> {
    let guard = state.read().await;
    Json(DashboardSummary {
        current_reading: guard.readings.last().cloned(),
        model_status: guard.model_status.clone(),
        risk_assessment: guard.risk.clone(),
        predictions: guard.predictions.clone(),
    })
}
