//! Feature Encoder
//!
//! Provides the magnetometer `Reading` model and the raw-entry encoder that
//! derives the fixed 8-dimensional feature vector the classifier expects.

mod encoder;
mod reading;

pub use encoder::{encode, EncodeError, RawEntry};
pub use reading::{Reading, FEATURE_COLUMNS, FEATURE_DIMENSION};
