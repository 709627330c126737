//! Cache Store Implementation

use crate::CacheError;
use feature_encoder::Reading;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File-backed store for the last known-valid reading set.
///
/// The file holds one JSON array of reading records and is overwritten
/// wholesale on every successful fetch.
pub struct CacheStore {
    path: PathBuf,
}

impl CacheStore {
    /// Create a store backed by the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the cached reading set.
    ///
    /// Returns an empty vector on any failure: missing file, unreadable
    /// file, invalid JSON, a body that is not an array, or array elements
    /// that are not records. A corrupt cache is a cache miss, never an error.
    pub fn load(&self) -> Vec<Reading> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) => {
                debug!("Cache not readable at {}: {}", self.path.display(), e);
                return Vec::new();
            }
        };

        let value: Value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!("Cache at {} is not valid JSON: {}", self.path.display(), e);
                return Vec::new();
            }
        };

        let items = match value.as_array() {
            Some(items) => items,
            None => {
                warn!("Cache at {} is not an array", self.path.display());
                return Vec::new();
            }
        };

        if !items.iter().all(Value::is_object) {
            warn!("Cache at {} contains non-record entries", self.path.display());
            return Vec::new();
        }

        match serde_json::from_value::<Vec<Reading>>(value) {
            Ok(readings) => {
                debug!("Loaded {} cached readings", readings.len());
                readings
            }
            Err(e) => {
                warn!("Cache records at {} failed to decode: {}", self.path.display(), e);
                Vec::new()
            }
        }
    }

    /// Persist a reading set, replacing any previous contents.
    pub fn save(&self, readings: &[Reading]) -> Result<(), CacheError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let body = serde_json::to_string(readings)?;
        fs::write(&self.path, body)?;
        debug!("Persisted {} readings to {}", readings.len(), self.path.display());
        Ok(())
    }
}
