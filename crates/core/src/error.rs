//! Shared error type for domain-level validation.

use thiserror::Error;

/// Errors produced while constructing or validating domain values.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A material name that matches nothing in the catalog.
    #[error("unknown material '{0}'")]
    UnknownMaterial(String),

    /// An operation name that matches nothing in the catalog.
    #[error("unknown operation '{0}'")]
    UnknownOperation(String),

    /// A cut mode name that matches nothing in the catalog.
    #[error("unknown cut mode '{0}'")]
    UnknownMode(String),

    /// Geometry that cannot describe a real stock-removal job.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// A numeric input outside its physically sensible range.
    #[error("{name} out of range: {value} (expected {min}..={max})")]
    OutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

pub type Result<T> = std::result::Result<T, CoreError>;
