//! Raw Entry Encoding
//!
//! Maps one raw magnetometer source entry (orthogonal field components plus
//! an optional precomputed total) onto a [`Reading`]. The encoder fills four
//! of the eight feature slots; `dbhg`, `dbhr`, `mfig` and `mfir` have no
//! counterpart in the component schema and are fixed at zero. This is a
//! partial approximation of the model's original training features.

use crate::Reading;
use serde::Deserialize;
use thiserror::Error;

/// Errors rejecting a single source entry
#[derive(Debug, Clone, Error)]
pub enum EncodeError {
    /// Entry is missing a field the encoder cannot default
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}

/// One entry as returned by a magnetometer data endpoint.
///
/// Component fields default to zero when absent; the angle derivations below
/// treat a zero denominator as "no signal" rather than an error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEntry {
    /// Sample timestamp (ISO-8601)
    #[serde(alias = "time")]
    pub timestamp: Option<String>,
    /// Northward component (nT)
    #[serde(alias = "north")]
    pub x: Option<f64>,
    /// Eastward component (nT)
    #[serde(alias = "east")]
    pub y: Option<f64>,
    /// Vertical (downward) component (nT)
    #[serde(alias = "vertical", alias = "down")]
    pub z: Option<f64>,
    /// Precomputed total field (nT)
    #[serde(alias = "total")]
    pub f: Option<f64>,
}

/// Encode a raw source entry into a [`Reading`].
///
/// Only the timestamp is strictly required; missing components are treated
/// as zero so a sparse entry still yields a usable reading.
pub fn encode(entry: &RawEntry) -> Result<Reading, EncodeError> {
    let timestamp = entry
        .timestamp
        .clone()
        .ok_or(EncodeError::MissingField("timestamp"))?;

    let x = entry.x.unwrap_or(0.0);
    let y = entry.y.unwrap_or(0.0);
    let z = entry.z.unwrap_or(0.0);

    // Prefer the source's own total; fall back to the component norm.
    let magnitude = match entry.f {
        Some(f) if f > 0.0 => f,
        _ => (x * x + y * y + z * z).sqrt(),
    };

    let decr = if x != 0.0 { (y / x).atan() } else { 0.0 };
    let horizontal = (x * x + y * y).sqrt();
    let mdir = if z != 0.0 { (horizontal / z).atan() } else { 0.0 };

    let label = display_label(&timestamp);

    Ok(Reading {
        timestamp,
        label,
        value: format!("{magnitude:.2}"),
        decg: Some(decr.to_degrees()),
        dbhg: Some(0.0),
        decr: Some(decr),
        dbhr: Some(0.0),
        mfig: Some(0.0),
        mfir: Some(0.0),
        mdig: Some(mdir.to_degrees()),
        mdir: Some(mdir),
    })
}

/// HH:MM substring of an ISO-8601 timestamp, or the raw string when it is
/// too short to carry one.
pub(crate) fn display_label(timestamp: &str) -> String {
    timestamp
        .get(11..16)
        .map(str::to_string)
        .unwrap_or_else(|| timestamp.to_string())
}
