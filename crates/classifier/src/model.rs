//! Classifier Implementation

use crate::{ClassifierError, Scaler};
use feature_encoder::{Reading, FEATURE_DIMENSION};
use std::path::{Path, PathBuf};
use tract_onnx::prelude::*;
use tracing::{debug, info, warn};

type OnnxPlan = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// Pretrained binary classifier with optional feature scaler.
///
/// Holds the loaded model for the life of the process; `load` is attempted
/// at startup and again lazily on the first prediction request if the
/// holder is still empty.
pub struct Classifier {
    model_path: PathBuf,
    scaler_path: Option<PathBuf>,
    model: Option<OnnxPlan>,
    scaler: Option<Scaler>,
}

impl Classifier {
    /// Create an unloaded classifier over the given artifact paths.
    pub fn new(model_path: impl Into<PathBuf>, scaler_path: Option<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
            scaler_path,
            model: None,
            scaler: None,
        }
    }

    /// Load the ONNX model, and the scaler when configured.
    ///
    /// A scaler that fails to load is logged and dropped; the classifier
    /// then runs on unscaled features. A model that fails to load is an
    /// error: without it there is nothing to invoke.
    pub fn load(&mut self) -> Result<(), ClassifierError> {
        let model = load_plan(&self.model_path)
            .map_err(|e| ClassifierError::ModelLoad(e.to_string()))?;
        info!("Model loaded from {}", self.model_path.display());
        self.model = Some(model);

        if let Some(path) = &self.scaler_path {
            match Scaler::from_path(path) {
                Ok(scaler) => {
                    info!("Scaler loaded from {}", path.display());
                    self.scaler = Some(scaler);
                }
                Err(e) => warn!("Scaler unavailable ({}); continuing unscaled", e),
            }
        }
        Ok(())
    }

    /// Whether the model is loaded.
    pub fn is_loaded(&self) -> bool {
        self.model.is_some()
    }

    /// Whether the scaler is loaded.
    pub fn has_scaler(&self) -> bool {
        self.scaler.is_some()
    }

    /// Positive-class probability per complete reading, in input order.
    ///
    /// Returns an empty sequence when the model is not loaded, when no
    /// reading carries all eight features, or when inference itself fails.
    /// Scaling failures degrade to unscaled input instead.
    pub fn predict(&self, readings: &[Reading]) -> Vec<f64> {
        let rows: Vec<[f64; FEATURE_DIMENSION]> = readings
            .iter()
            .filter_map(Reading::feature_vector)
            .collect();
        if rows.is_empty() {
            warn!("No readings with a complete feature vector; skipping prediction");
            return Vec::new();
        }

        let model = match &self.model {
            Some(model) => model,
            None => {
                warn!("Classifier not loaded; cannot run predictions");
                return Vec::new();
            }
        };

        let rows = match &self.scaler {
            Some(scaler) => match scaler.transform_all(&rows) {
                Ok(scaled) => scaled,
                Err(e) => {
                    warn!("Scaler transform failed ({}); continuing unscaled", e);
                    rows
                }
            },
            None => rows,
        };

        let mut probabilities = Vec::with_capacity(rows.len());
        for row in &rows {
            match run_row(model, row) {
                Ok(probability) => probabilities.push(probability),
                Err(e) => {
                    warn!("Inference failed: {}", e);
                    return Vec::new();
                }
            }
        }
        debug!("Classifier produced {} probabilities", probabilities.len());
        probabilities
    }
}

fn load_plan(path: &Path) -> TractResult<OnnxPlan> {
    tract_onnx::onnx()
        .model_for_path(path)?
        .with_input_fact(
            0,
            InferenceFact::dt_shape(f32::datum_type(), tvec!(1, FEATURE_DIMENSION)),
        )?
        .into_optimized()?
        .into_runnable()
}

fn run_row(model: &OnnxPlan, row: &[f64; FEATURE_DIMENSION]) -> Result<f64, ClassifierError> {
    let data: Vec<f32> = row.iter().map(|v| *v as f32).collect();
    let input = tract_ndarray::Array2::from_shape_vec((1, FEATURE_DIMENSION), data)
        .map_err(|e| ClassifierError::Inference(e.to_string()))?;
    let tensor: Tensor = input.into();

    let outputs = model
        .run(tvec!(tensor.into()))
        .map_err(|e| ClassifierError::Inference(e.to_string()))?;
    // RandomForest exports surface [label, probabilities]; the probability
    // tensor is the last output either way.
    let output = outputs
        .last()
        .ok_or_else(|| ClassifierError::Inference("model produced no outputs".to_string()))?;
    let view = output
        .to_array_view::<f32>()
        .map_err(|e| ClassifierError::Inference(e.to_string()))?;

    let probability = match view.ndim() {
        2 if view.shape()[1] >= 2 => view[[0, 1]],
        1 if view.len() >= 2 => view[[1]],
        _ => {
            return Err(ClassifierError::Inference(format!(
                "unexpected output shape {:?}",
                view.shape()
            )))
        }
    };
    Ok(f64::from(probability))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unloaded_classifier_returns_empty() {
        let classifier = Classifier::new("model.onnx", None);
        let readings = vec![Reading::safe_default()];
        assert!(classifier.predict(&readings).is_empty());
    }

    #[test]
    fn test_incomplete_readings_return_empty() {
        let classifier = Classifier::new("model.onnx", None);
        // No reading carries a complete feature vector.
        let readings = vec![Reading::default(), Reading::default()];
        assert!(classifier.predict(&readings).is_empty());
    }

    #[test]
    fn test_load_missing_model_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut classifier = Classifier::new(dir.path().join("absent.onnx"), None);
        assert!(classifier.load().is_err());
        assert!(!classifier.is_loaded());
    }
}
