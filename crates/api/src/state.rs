//! Application State

use acquisition::AcquisitionPipeline;
use chrono::{DateTime, Utc};
use classifier::Classifier;
use feature_encoder::Reading;
use forecast::{Forecaster, Prediction, RiskAssessment};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared handle to the application state. Every mutation of the reading
/// set, predictions, model status and risk assessment goes through this
/// single lock.
pub type SharedState = Arc<RwLock<AppState>>;

/// Lifecycle phase of the model, surfaced to polling clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelPhase {
    Idle,
    Analyzing,
    Predicting,
    Training,
}

/// Model status record served verbatim on `/api/model-status`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelStatus {
    pub cpu_usage: u32,
    pub memory_usage: u32,
    /// ISO-8601 timestamp of the last phase change
    pub last_update: String,
    pub model_status: ModelPhase,
    pub model_version: String,
    pub accuracy: u32,
    pub precision: u32,
    pub recall: u32,
}

impl Default for ModelStatus {
    fn default() -> Self {
        Self {
            cpu_usage: 60,
            memory_usage: 70,
            last_update: Utc::now().to_rfc3339(),
            model_status: ModelPhase::Idle,
            model_version: "LEPAM v1.0.4".to_string(),
            accuracy: 76,
            precision: 71,
            recall: 68,
        }
    }
}

/// Application state shared across handlers
pub struct AppState {
    /// Data acquisition pipeline. Shared separately so fetches run with no
    /// state lock held; network I/O must never park status polls.
    pub pipeline: Arc<AcquisitionPipeline>,
    /// Classifier and optional scaler
    pub classifier: Classifier,
    /// Prediction synthesizer with its random source
    pub forecaster: Forecaster,
    /// Current reading window
    pub readings: Vec<Reading>,
    /// When the readings were last fetched
    pub last_fetch: Option<DateTime<Utc>>,
    /// Latest synthesized predictions
    pub predictions: Vec<Prediction>,
    /// Model status record
    pub model_status: ModelStatus,
    /// Latest risk assessment
    pub risk: RiskAssessment,
    /// Readings older than this are refetched on request
    pub refresh_max_age_secs: u64,
}

impl AppState {
    /// Create state around the given components.
    pub fn new(
        pipeline: AcquisitionPipeline,
        classifier: Classifier,
        forecaster: Forecaster,
        refresh_max_age_secs: u64,
    ) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            classifier,
            forecaster,
            readings: Vec::new(),
            last_fetch: None,
            predictions: Vec::new(),
            model_status: ModelStatus::default(),
            risk: RiskAssessment::default(),
            refresh_max_age_secs,
        }
    }

    /// Whether the reading window is absent or stale.
    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        match self.last_fetch {
            None => true,
            Some(last) => {
                // Compare whole seconds; a max age beyond i64 saturates
                // instead of wrapping negative.
                let age = now.signed_duration_since(last).num_seconds();
                age > i64::try_from(self.refresh_max_age_secs).unwrap_or(i64::MAX)
            }
        }
    }

    /// Stamp a phase change on the model status record.
    pub fn set_phase(&mut self, phase: ModelPhase) {
        self.model_status.model_status = phase;
        self.model_status.last_update = Utc::now().to_rfc3339();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use acquisition::FetchConfig;
    use cache_store::CacheStore;
    use chrono::Duration;

    fn state_with_max_age(dir: &tempfile::TempDir, max_age: u64) -> AppState {
        let config = FetchConfig {
            endpoints: Vec::new(),
            ..Default::default()
        };
        let cache = CacheStore::new(dir.path().join("readings.json"));
        let pipeline = AcquisitionPipeline::new(config, cache).unwrap();
        let classifier = Classifier::new(dir.path().join("absent.onnx"), None);
        AppState::new(pipeline, classifier, Forecaster::new(Some(1)), max_age)
    }

    #[test]
    fn test_staleness_window() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state_with_max_age(&dir, 300);
        let now = Utc::now();

        assert!(state.needs_refresh(now), "no fetch yet");

        state.last_fetch = Some(now);
        assert!(!state.needs_refresh(now));

        state.last_fetch = Some(now - Duration::seconds(301));
        assert!(state.needs_refresh(now));
    }

    #[test]
    fn test_huge_max_age_never_goes_stale() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state_with_max_age(&dir, u64::MAX);
        let now = Utc::now();

        // Would wrap negative under a plain i64 cast and refetch constantly.
        state.last_fetch = Some(now - Duration::days(365));
        assert!(!state.needs_refresh(now));
    }

    #[test]
    fn test_model_status_wire_format() {
        let json = serde_json::to_value(ModelStatus::default()).unwrap();
        assert_eq!(json["cpuUsage"], 60);
        assert_eq!(json["memoryUsage"], 70);
        assert_eq!(json["modelStatus"], "idle");
        assert_eq!(json["modelVersion"], "LEPAM v1.0.4");
        assert_eq!(json["accuracy"], 76);
    }

    #[test]
    fn test_phase_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(ModelPhase::Analyzing).unwrap(),
            "analyzing"
        );
    }
}
