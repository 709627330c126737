//! Cache Store
//!
//! Persists the last successfully fetched reading set as a single JSON array
//! file. Read only when the primary fetch fails; a corrupt or missing cache
//! is indistinguishable from an empty one.

mod store;

pub use store::CacheStore;

use thiserror::Error;

/// Cache persistence errors
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
