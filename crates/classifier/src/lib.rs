//! Classifier Invocation
//!
//! Applies the optional feature scaler and the pretrained binary classifier
//! to complete readings, producing one positive-class probability per sample.
//!
//! The model is an ONNX export of the trained RandomForest. It must be
//! exported without ZipMap so the probability output is a plain float
//! tensor of shape `[N, 2]`.

mod model;
mod scaler;

pub use model::Classifier;
pub use scaler::Scaler;

use thiserror::Error;

/// Classifier errors. None of these propagate out of `predict`; they are
/// logged and degrade to an empty probability sequence.
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("Model load error: {0}")]
    ModelLoad(String),

    #[error("Inference error: {0}")]
    Inference(String),

    #[error("Scaler load error: {0}")]
    ScalerLoad(String),

    #[error("Scaler dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}
