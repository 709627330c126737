//! Magnetometer Reading Model

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Number of features the classifier expects
pub const FEATURE_DIMENSION: usize = 8;

/// Feature column order used when building the input matrix.
/// Matches the column order of the model's training frame.
pub const FEATURE_COLUMNS: [&str; FEATURE_DIMENSION] = [
    "decg", "dbhg", "decr", "dbhr", "mfig", "mfir", "mdig", "mdir",
];

/// Field magnitude of the safe-default reading (nT)
pub const SAFE_DEFAULT_MAGNITUDE: f64 = 10.5;

/// One magnetometer sample plus derived classifier features.
///
/// The eight feature fields are optional so that records loaded from the
/// cache (or a loose upstream source) can be checked for completeness before
/// classification. Field names match the wire format consumed by the
/// dashboard, so this struct serializes directly into API responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// ISO-8601 timestamp of the sample
    #[serde(default)]
    pub timestamp: String,
    /// Display label (HH:MM)
    #[serde(default)]
    pub label: String,
    /// Scalar field magnitude, rendered with two decimals
    #[serde(default)]
    pub value: String,
    /// Declination (degrees)
    #[serde(default)]
    pub decg: Option<f64>,
    /// Horizontal field component (degrees)
    #[serde(default)]
    pub dbhg: Option<f64>,
    /// Declination (radians)
    #[serde(default)]
    pub decr: Option<f64>,
    /// Horizontal field component (radians)
    #[serde(default)]
    pub dbhr: Option<f64>,
    /// Field intensity (degrees form)
    #[serde(default)]
    pub mfig: Option<f64>,
    /// Field intensity (radians form)
    #[serde(default)]
    pub mfir: Option<f64>,
    /// Inclination (degrees)
    #[serde(default)]
    pub mdig: Option<f64>,
    /// Inclination (radians)
    #[serde(default)]
    pub mdir: Option<f64>,
}

impl Reading {
    /// Feature vector in `FEATURE_COLUMNS` order, or `None` when any of the
    /// eight features is missing. Only complete readings are eligible for
    /// classification.
    pub fn feature_vector(&self) -> Option<[f64; FEATURE_DIMENSION]> {
        Some([
            self.decg?,
            self.dbhg?,
            self.decr?,
            self.dbhr?,
            self.mfig?,
            self.mfir?,
            self.mdig?,
            self.mdir?,
        ])
    }

    /// Whether all eight feature fields are populated.
    pub fn is_complete(&self) -> bool {
        self.feature_vector().is_some()
    }

    /// The last-resort reading handed out when every endpoint fails and the
    /// cache is absent or corrupt. Downstream consumers never observe an
    /// empty reading set.
    pub fn safe_default() -> Self {
        let timestamp = Utc::now().to_rfc3339();
        let label = crate::encoder::display_label(&timestamp);
        Self {
            timestamp,
            label,
            value: format!("{SAFE_DEFAULT_MAGNITUDE:.2}"),
            decg: Some(0.0),
            dbhg: Some(0.0),
            decr: Some(0.0),
            dbhr: Some(0.0),
            mfig: Some(0.0),
            mfir: Some(0.0),
            mdig: Some(0.0),
            mdir: Some(0.0),
        }
    }
}

impl Default for Reading {
    fn default() -> Self {
        Self {
            timestamp: String::new(),
            label: String::new(),
            value: String::new(),
            decg: None,
            dbhg: None,
            decr: None,
            dbhr: None,
            mfig: None,
            mfir: None,
            mdig: None,
            mdir: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_default_value() {
        let reading = Reading::safe_default();
        assert_eq!(reading.value, "10.50");
        assert!(reading.is_complete());
    }

    #[test]
    fn test_incomplete_reading_has_no_feature_vector() {
        let reading = Reading {
            decg: Some(1.0),
            ..Default::default()
        };
        assert!(reading.feature_vector().is_none());
        assert!(!reading.is_complete());
    }

    #[test]
    fn test_feature_vector_order() {
        let reading = Reading {
            decg: Some(1.0),
            dbhg: Some(2.0),
            decr: Some(3.0),
            dbhr: Some(4.0),
            mfig: Some(5.0),
            mfir: Some(6.0),
            mdig: Some(7.0),
            mdir: Some(8.0),
            ..Default::default()
        };
        assert_eq!(
            reading.feature_vector(),
            Some([1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0])
        );
    }

    #[test]
    fn test_partial_record_deserializes() {
        // Cache records may predate the full schema; missing features stay None.
        let reading: Reading =
            serde_json::from_str(r#"{"timestamp":"2026-01-01T00:00:00","decg":12.5}"#).unwrap();
        assert_eq!(reading.decg, Some(12.5));
        assert!(reading.mdir.is_none());
        assert!(!reading.is_complete());
    }
}
