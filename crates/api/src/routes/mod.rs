//! HTTP Route Handlers

pub mod magnetic;
pub mod predictions;
pub mod status;
pub mod trigger;
