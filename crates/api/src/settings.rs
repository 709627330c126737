//! Service Configuration
//!
//! Layered configuration: defaults, then an optional `quake.toml`, then
//! `QUAKE_*` environment variables.

use acquisition::FetchConfig;
use serde::Deserialize;

/// Service settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Address the HTTP server binds to
    pub bind_addr: String,
    /// Primary data endpoints, in priority order (empty keeps the defaults)
    pub endpoints: Vec<String>,
    /// Path of the reading-set cache file
    pub cache_path: String,
    /// Path of the ONNX model
    pub model_path: String,
    /// Path of the scaler parameter file, if one is deployed
    pub scaler_path: Option<String>,
    /// Reading window age before a GET triggers a refetch (seconds)
    pub refresh_max_age_secs: u64,
    /// Total attempt cap per endpoint
    pub max_attempts: u32,
    /// Retry backoff base (milliseconds)
    pub backoff_base_ms: u64,
    /// Per-request timeout (seconds)
    pub timeout_secs: u64,
    /// Fixed RNG seed for the synthesizer (unset draws from entropy)
    pub rng_seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:5000".to_string(),
            endpoints: Vec::new(),
            cache_path: "magnetic_data_cache.json".to_string(),
            model_path: "earthquake_model.onnx".to_string(),
            scaler_path: None,
            refresh_max_age_secs: 300,
            max_attempts: 3,
            backoff_base_ms: 500,
            timeout_secs: 10,
            rng_seed: None,
        }
    }
}

impl Settings {
    /// Load settings from `quake.toml` and the `QUAKE_*` environment.
    pub fn load() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("quake").required(false))
            .add_source(config::Environment::with_prefix("QUAKE"))
            .build()?;
        settings.try_deserialize()
    }

    /// Fetch configuration for the acquisition pipeline.
    pub fn fetch_config(&self) -> FetchConfig {
        let mut config = FetchConfig {
            max_attempts: self.max_attempts,
            backoff_base_ms: self.backoff_base_ms,
            timeout_secs: self.timeout_secs,
            ..Default::default()
        };
        if !self.endpoints.is_empty() {
            config.endpoints = self.endpoints.clone();
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.bind_addr, "0.0.0.0:5000");
        assert_eq!(settings.refresh_max_age_secs, 300);
        assert!(settings.scaler_path.is_none());
    }

    #[test]
    fn test_empty_endpoint_list_keeps_pipeline_defaults() {
        let settings = Settings::default();
        assert!(!settings.fetch_config().endpoints.is_empty());
    }

    #[test]
    fn test_configured_endpoints_take_priority() {
        let settings = Settings {
            endpoints: vec!["http://localhost:9999/data".to_string()],
            ..Default::default()
        };
        assert_eq!(settings.fetch_config().endpoints.len(), 1);
    }
}
