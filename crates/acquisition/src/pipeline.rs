//! Pipeline Implementation

use crate::retry::get_json_array;
use crate::AcquisitionError;
use cache_store::CacheStore;
use feature_encoder::{encode, RawEntry, Reading};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Configuration for the acquisition pipeline
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Primary endpoints, tried in priority order
    pub endpoints: Vec<String>,
    /// Total attempt cap per endpoint
    pub max_attempts: u32,
    /// Retry backoff base in milliseconds
    pub backoff_base_ms: u64,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Most-recent entries kept from a successful fetch
    pub window: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            endpoints: vec![
                "https://geomag.usgs.gov/ws/data/?id=BOU&elements=X,Y,Z,F&sampling_period=60&format=json".to_string(),
                "https://geomag.usgs.gov/ws/data/?id=FRD&elements=X,Y,Z,F&sampling_period=60&format=json".to_string(),
            ],
            max_attempts: 3,
            backoff_base_ms: 500,
            timeout_secs: 10,
            window: 30,
        }
    }
}

/// Fetches reading sets with graceful degradation.
///
/// Fallback order: live endpoints, then the on-disk cache, then a single
/// synthesized safe-default reading. `fetch` therefore always returns a
/// non-empty set.
pub struct AcquisitionPipeline {
    client: Client,
    config: FetchConfig,
    cache: CacheStore,
}

impl AcquisitionPipeline {
    /// Create a pipeline over the given endpoints and cache.
    pub fn new(config: FetchConfig, cache: CacheStore) -> Result<Self, AcquisitionError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        info!(
            "Acquisition pipeline created with {} endpoints, window {}",
            config.endpoints.len(),
            config.window
        );
        Ok(Self {
            client,
            config,
            cache,
        })
    }

    /// Fetch the current reading set. Never fails and never returns empty.
    ///
    /// A fresh fetch is persisted to the cache best-effort; a persistence
    /// failure is logged and the fresh data still returned.
    pub async fn fetch(&self) -> Vec<Reading> {
        for endpoint in &self.config.endpoints {
            match self.fetch_endpoint(endpoint).await {
                Ok(readings) => {
                    info!("Fetched {} readings from {}", readings.len(), endpoint);
                    if let Err(e) = self.cache.save(&readings) {
                        warn!("Failed to persist readings to cache: {}", e);
                    }
                    return readings;
                }
                Err(e) => {
                    warn!("Endpoint {} unusable: {}", endpoint, e);
                }
            }
        }

        let cached = self.cache.load();
        if !cached.is_empty() {
            info!("All endpoints failed; serving {} cached readings", cached.len());
            return cached;
        }

        warn!("All endpoints failed and cache is empty; using safe default reading");
        vec![Reading::safe_default()]
    }

    /// Fetch and encode one endpoint's data.
    async fn fetch_endpoint(&self, url: &str) -> Result<Vec<Reading>, AcquisitionError> {
        let items = get_json_array(
            &self.client,
            url,
            self.config.max_attempts,
            self.config.backoff_base_ms,
        )
        .await?;

        // Most recent entries last, per source ordering.
        let start = items.len().saturating_sub(self.config.window);
        let mut readings = Vec::with_capacity(items.len() - start);
        for item in &items[start..] {
            let entry: RawEntry = match serde_json::from_value(item.clone()) {
                Ok(entry) => entry,
                Err(e) => {
                    debug!("Skipping malformed entry: {}", e);
                    continue;
                }
            };
            match encode(&entry) {
                Ok(reading) => readings.push(reading),
                Err(e) => debug!("Skipping entry: {}", e),
            }
        }

        if readings.is_empty() {
            return Err(AcquisitionError::NoUsableEntries);
        }
        Ok(readings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn offline_config() -> FetchConfig {
        FetchConfig {
            endpoints: Vec::new(),
            max_attempts: 1,
            backoff_base_ms: 1,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_no_endpoints_no_cache_yields_safe_default() {
        let dir = tempdir().unwrap();
        let cache = CacheStore::new(dir.path().join("readings.json"));
        let pipeline = AcquisitionPipeline::new(offline_config(), cache).unwrap();

        let readings = pipeline.fetch().await;
        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].value, "10.50");
    }

    #[tokio::test]
    async fn test_cache_served_when_endpoints_fail() {
        let dir = tempdir().unwrap();
        let cache = CacheStore::new(dir.path().join("readings.json"));

        let mut expected = Vec::new();
        for i in 0..4 {
            let mut reading = Reading::safe_default();
            reading.value = format!("{}.00", 100 + i);
            expected.push(reading);
        }
        cache.save(&expected).unwrap();

        let pipeline = AcquisitionPipeline::new(offline_config(), cache).unwrap();
        let readings = pipeline.fetch().await;
        assert_eq!(readings, expected);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_falls_back() {
        let dir = tempdir().unwrap();
        let cache = CacheStore::new(dir.path().join("readings.json"));
        let config = FetchConfig {
            endpoints: vec!["http://127.0.0.1:9/data".to_string()],
            max_attempts: 1,
            backoff_base_ms: 1,
            ..Default::default()
        };
        let pipeline = AcquisitionPipeline::new(config, cache).unwrap();

        let readings = pipeline.fetch().await;
        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].value, "10.50");
    }

    #[tokio::test]
    async fn test_corrupt_cache_treated_as_absent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("readings.json");
        std::fs::write(&path, "not json at all").unwrap();

        let pipeline =
            AcquisitionPipeline::new(offline_config(), CacheStore::new(path)).unwrap();
        let readings = pipeline.fetch().await;
        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].value, "10.50");
    }
}
