//! Earthquake Risk API Server
//!
//! REST API for the earthquake prediction dashboard: magnetometer readings,
//! synthesized predictions, model status and risk assessment.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

mod routes;
mod service;
mod settings;
mod state;

pub use service::{refresh_data, run_prediction, PredictError};
pub use settings::Settings;
pub use state::{AppState, ModelPhase, ModelStatus, SharedState};

use acquisition::{AcquisitionError, AcquisitionPipeline};
use cache_store::CacheStore;
use classifier::Classifier;
use forecast::Forecaster;

/// Health response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub model_loaded: bool,
    pub scaler_loaded: bool,
}

/// Create the application router. CORS is open: the dashboard is served
/// from a different origin.
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/api/magnetic-data", get(routes::magnetic::get_magnetic_data))
        .route("/api/predictions", get(routes::predictions::get_predictions))
        .route("/api/model-status", get(routes::status::get_model_status))
        .route("/api/risk-assessment", get(routes::status::get_risk_assessment))
        .route("/api/dashboard-summary", get(routes::status::get_dashboard_summary))
        .route("/api/trigger-prediction", post(routes::trigger::trigger_prediction))
        .route("/api/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check handler
async fn health_handler(State(state): State<SharedState>) -> Json<HealthResponse> {
    let guard = state.read().await;
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now().to_rfc3339(),
        model_loaded: guard.classifier.is_loaded(),
        scaler_loaded: guard.classifier.has_scaler(),
    })
}

/// Assemble the shared application state from settings.
pub fn build_state(settings: &Settings) -> Result<SharedState, AcquisitionError> {
    let cache = CacheStore::new(&settings.cache_path);
    let pipeline = AcquisitionPipeline::new(settings.fetch_config(), cache)?;
    let classifier = Classifier::new(
        &settings.model_path,
        settings.scaler_path.as_ref().map(Into::into),
    );
    let forecaster = Forecaster::new(settings.rng_seed);

    Ok(Arc::new(RwLock::new(AppState::new(
        pipeline,
        classifier,
        forecaster,
        settings.refresh_max_age_secs,
    ))))
}

/// Startup sequence: attempt the model load, then seed the state with an
/// initial fetch and prediction run. Failures degrade; the server starts
/// regardless.
pub async fn startup(state: &SharedState) {
    {
        let mut guard = state.write().await;
        if let Err(e) = guard.classifier.load() {
            warn!("Model not loaded at startup ({}); will retry on first request", e);
        }
    }

    service::refresh_data(state).await;

    if let Err(e) = service::run_prediction(state).await {
        warn!("Initial prediction skipped: {}", e);
    }
}

/// Initialize logging
pub fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

/// Run the server
pub async fn run_server(
    addr: &str,
    state: SharedState,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(state);

    info!("Starting API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
