//! Planarization error type.

use thiserror::Error;

/// Errors produced by `iso-planar`.  Any of them aborts the whole
/// planarization; no partial graph is returned.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlanarError {
    #[error("segment endpoint ({x}, {y}) is not finite")]
    NonFiniteCoordinate { x: f64, y: f64 },

    #[error("union primitive returned unsupported geometry: {0}")]
    UnexpectedGeometry(&'static str),

    #[error("union primitive failed: {0}")]
    Union(String),
}

pub type PlanarResult<T> = Result<T, PlanarError>;
