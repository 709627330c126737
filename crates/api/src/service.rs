//! Core Service Operations
//!
//! Fetch and predict, shared between the HTTP handlers and process startup.
//! Handlers degrade on error; nothing here is fatal to the process.

use crate::state::{ModelPhase, SharedState};
use chrono::Utc;
use forecast::assess;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Prediction-run failures surfaced on the trigger endpoint
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("Classifier unavailable: {0}")]
    ClassifierUnavailable(String),
}

/// Refresh the reading window through the acquisition pipeline.
///
/// Flips the model status to `analyzing` for the duration of the fetch and
/// back to `idle` afterwards, and stamps `last_fetch`. Infallible: the
/// pipeline itself degrades to cache or the safe default.
pub async fn refresh_data(state: &SharedState) {
    // No lock may be held across the fetch: tokio's RwLock is fair, so a
    // guard kept through the retry budget would queue a writer and park
    // every status poll behind it.
    let pipeline = {
        let mut guard = state.write().await;
        guard.set_phase(ModelPhase::Analyzing);
        Arc::clone(&guard.pipeline)
    };

    let readings = pipeline.fetch().await;

    let mut guard = state.write().await;
    info!("Reading window replaced with {} readings", readings.len());
    guard.readings = readings;
    guard.last_fetch = Some(Utc::now());
    guard.set_phase(ModelPhase::Idle);
}

/// Run the classifier over the current readings and rebuild the prediction
/// set and risk assessment. Returns the number of predictions synthesized.
///
/// The classifier is loaded lazily here when startup could not load it.
pub async fn run_prediction(state: &SharedState) -> Result<usize, PredictError> {
    let mut guard = state.write().await;

    if !guard.classifier.is_loaded() {
        if let Err(e) = guard.classifier.load() {
            warn!("Classifier load failed: {}", e);
            return Err(PredictError::ClassifierUnavailable(e.to_string()));
        }
    }

    guard.set_phase(ModelPhase::Predicting);

    let probabilities = guard.classifier.predict(&guard.readings);
    let predictions = guard.forecaster.synthesize(&probabilities);
    let count = predictions.len();

    guard.risk = assess(&predictions);
    guard.predictions = predictions;
    guard.set_phase(ModelPhase::Idle);

    info!("Prediction run complete: {} predictions", count);
    Ok(count)
}
