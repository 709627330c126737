//! Acquisition Pipeline
//!
//! Fetches magnetometer readings from primary endpoints with bounded retry,
//! falling back to the on-disk cache and finally to a synthesized safe
//! default. The pipeline never fails outwardly and never yields an empty
//! reading set.

mod pipeline;
mod retry;

pub use pipeline::{AcquisitionPipeline, FetchConfig};

use reqwest::StatusCode;
use thiserror::Error;

/// Per-endpoint acquisition failures. These are logged and skipped; the
/// pipeline itself degrades instead of propagating them.
#[derive(Debug, Error)]
pub enum AcquisitionError {
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Endpoint returned status {0}")]
    Status(StatusCode),

    #[error("Endpoint did not declare a JSON content type: {0:?}")]
    NotJson(Option<String>),

    #[error("Response body is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Response body is not a sequence")]
    NotASequence,

    #[error("No usable entries after filtering")]
    NoUsableEntries,
}
