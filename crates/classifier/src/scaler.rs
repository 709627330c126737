//! Feature Scaler

use crate::ClassifierError;
use feature_encoder::FEATURE_DIMENSION;
use serde::Deserialize;
use std::path::Path;

/// StandardScaler parameters exported alongside the model as JSON
/// (`{"mean": […], "scale": […]}`).
#[derive(Debug, Clone, Deserialize)]
pub struct Scaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl Scaler {
    /// Load scaler parameters from a JSON file and validate their dimension.
    pub fn from_path(path: &Path) -> Result<Self, ClassifierError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ClassifierError::ScalerLoad(e.to_string()))?;
        let scaler: Scaler =
            serde_json::from_str(&raw).map_err(|e| ClassifierError::ScalerLoad(e.to_string()))?;
        scaler.check_dimension()?;
        Ok(scaler)
    }

    fn check_dimension(&self) -> Result<(), ClassifierError> {
        for len in [self.mean.len(), self.scale.len()] {
            if len != FEATURE_DIMENSION {
                return Err(ClassifierError::DimensionMismatch {
                    expected: FEATURE_DIMENSION,
                    actual: len,
                });
            }
        }
        Ok(())
    }

    /// Transform one feature row: `(x - mean) / scale`.
    ///
    /// A zero scale entry divides by one instead, matching the exporter's
    /// handling of constant features.
    pub fn transform(
        &self,
        row: &[f64; FEATURE_DIMENSION],
    ) -> Result<[f64; FEATURE_DIMENSION], ClassifierError> {
        self.check_dimension()?;
        let mut out = [0.0; FEATURE_DIMENSION];
        for (i, value) in row.iter().enumerate() {
            let divisor = if self.scale[i] == 0.0 { 1.0 } else { self.scale[i] };
            out[i] = (value - self.mean[i]) / divisor;
        }
        Ok(out)
    }

    /// Transform a whole feature matrix.
    pub fn transform_all(
        &self,
        rows: &[[f64; FEATURE_DIMENSION]],
    ) -> Result<Vec<[f64; FEATURE_DIMENSION]>, ClassifierError> {
        rows.iter().map(|row| self.transform(row)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scaler() -> Scaler {
        Scaler {
            mean: vec![1.0; FEATURE_DIMENSION],
            scale: vec![2.0; FEATURE_DIMENSION],
        }
    }

    #[test]
    fn test_transform() {
        let row = [5.0; FEATURE_DIMENSION];
        let out = scaler().transform(&row).unwrap();
        assert_eq!(out, [2.0; FEATURE_DIMENSION]);
    }

    #[test]
    fn test_zero_scale_divides_by_one() {
        let mut s = scaler();
        s.scale[3] = 0.0;
        let out = s.transform(&[5.0; FEATURE_DIMENSION]).unwrap();
        assert_eq!(out[3], 4.0);
        assert_eq!(out[0], 2.0);
    }

    #[test]
    fn test_dimension_mismatch_is_an_error() {
        let s = Scaler {
            mean: vec![0.0; 4],
            scale: vec![1.0; 4],
        };
        assert!(s.transform(&[0.0; FEATURE_DIMENSION]).is_err());
    }

    #[test]
    fn test_from_path_rejects_bad_dimension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scaler.json");
        std::fs::write(&path, r#"{"mean":[0,0],"scale":[1,1]}"#).unwrap();
        assert!(Scaler::from_path(&path).is_err());
    }

    #[test]
    fn test_from_path_loads_valid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scaler.json");
        std::fs::write(
            &path,
            r#"{"mean":[0,0,0,0,0,0,0,0],"scale":[1,1,1,1,1,1,1,1]}"#,
        )
        .unwrap();
        let s = Scaler::from_path(&path).unwrap();
        assert_eq!(s.mean.len(), FEATURE_DIMENSION);
    }
}
