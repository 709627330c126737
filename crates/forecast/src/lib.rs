//! Forecast
//!
//! Maps classifier probabilities onto user-facing prediction records and
//! derives the coarse risk assessment. Locations, timeframes and confidence
//! jitter come from an injected seedable random source; they are not derived
//! from the readings' geography.

mod risk;
mod synthesizer;

pub use risk::{assess, RiskAssessment, RiskFactors, Trend};
pub use synthesizer::{Forecaster, Prediction, LOCATIONS, MAX_PREDICTIONS, TIMEFRAMES};
