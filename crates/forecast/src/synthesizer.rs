//! Prediction Synthesizer

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::info;

/// Maximum predictions synthesized per run
pub const MAX_PREDICTIONS: usize = 5;

/// Candidate locations for synthesized predictions
pub const LOCATIONS: [&str; 7] = [
    "San Andreas Fault, CA",
    "Pacific Ring of Fire",
    "Aleutian Islands, AK",
    "New Madrid Fault Zone",
    "Cascadia Subduction Zone",
    "Himalayan Fault System",
    "Japan Trench",
];

/// Candidate timeframe labels
pub const TIMEFRAMES: [&str; 4] = ["24 hours", "3-7 days", "1-2 weeks", "2-4 weeks"];

/// One synthesized earthquake prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub id: String,
    pub timestamp: String,
    pub location: String,
    pub magnitude: f64,
    /// Probability as a percentage, 0-100
    pub probability: i64,
    pub timeframe: String,
    pub confidence: i64,
}

/// Synthesizes prediction records from classifier probabilities.
///
/// Carries its own random source so a fixed seed reproduces the randomized
/// fields exactly.
pub struct Forecaster {
    rng: StdRng,
}

impl Forecaster {
    /// Create a forecaster, seeded when a seed is given.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }

    /// Synthesize up to [`MAX_PREDICTIONS`] predictions, in input order.
    ///
    /// Magnitude is correlated with probability (`3 + p/100 * 5`, one
    /// decimal); location and timeframe are uniform picks from the fixed
    /// lists; confidence tracks probability with a ±10 jitter.
    pub fn synthesize(&mut self, probabilities: &[f64]) -> Vec<Prediction> {
        let now = Utc::now().to_rfc3339();
        let epoch_secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        let predictions: Vec<Prediction> = probabilities
            .iter()
            .take(MAX_PREDICTIONS)
            .enumerate()
            .map(|(i, p)| {
                let probability = (p * 100.0) as i64;
                let magnitude = (3.0 + probability as f64 / 100.0 * 5.0) * 10.0;
                let magnitude = magnitude.round() / 10.0;

                let location = LOCATIONS[self.rng.gen_range(0..LOCATIONS.len())];
                let timeframe = TIMEFRAMES[self.rng.gen_range(0..TIMEFRAMES.len())];
                let confidence = probability - 10 + self.rng.gen_range(0..20);

                Prediction {
                    id: format!("pred-{epoch_secs}-{i}"),
                    timestamp: now.clone(),
                    location: location.to_string(),
                    magnitude,
                    probability,
                    timeframe: timeframe.to_string(),
                    confidence,
                }
            })
            .collect();

        info!("Synthesized {} predictions", predictions.len());
        predictions
    }
}
