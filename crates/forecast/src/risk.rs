//! Status/Risk Aggregator

use crate::Prediction;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Risk trend derived from the latest prediction batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
}

/// Qualitative factor labels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskFactors {
    pub magnetic_anomalies: String,
    pub historical_patterns: String,
    pub signal_intensity: String,
}

/// Coarse risk summary recomputed after each prediction run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    /// 0-100, the maximum probability across the latest predictions
    pub risk_level: i64,
    pub trend: Trend,
    pub factors: RiskFactors,
}

impl Default for RiskAssessment {
    fn default() -> Self {
        Self {
            risk_level: 25,
            trend: Trend::Stable,
            factors: RiskFactors {
                magnetic_anomalies: "Low".to_string(),
                historical_patterns: "Low Correlation".to_string(),
                signal_intensity: "Stable".to_string(),
            },
        }
    }
}

/// Derive the risk assessment from a prediction batch.
///
/// A threshold lookup over the maximum probability: above 60 the trend is
/// increasing with high anomalies, below 30 decreasing with low anomalies,
/// otherwise stable and moderate. An empty batch is explicitly stable at
/// level zero rather than falling into the below-30 branch.
pub fn assess(predictions: &[Prediction]) -> RiskAssessment {
    let max_prob = predictions.iter().map(|p| p.probability).max();

    let (risk_level, trend, anomalies) = match max_prob {
        None => (0, Trend::Stable, "Moderate"),
        Some(p) if p > 60 => (p, Trend::Increasing, "High"),
        Some(p) if p < 30 => (p, Trend::Decreasing, "Low"),
        Some(p) => (p, Trend::Stable, "Moderate"),
    };

    debug!("Risk assessment: level={} trend={:?}", risk_level, trend);
    RiskAssessment {
        risk_level,
        trend,
        factors: RiskFactors {
            magnetic_anomalies: anomalies.to_string(),
            historical_patterns: "Low Correlation".to_string(),
            signal_intensity: "Stable".to_string(),
        },
    }
}
