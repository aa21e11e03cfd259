//! Core error type.
//!
//! Downstream crates keep their own error enums and wrap `IsoError` as one
//! variant when a configuration check can fail inside them.

use thiserror::Error;

/// Errors raised by `iso-core` itself.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum IsoError {
    #[error("configuration error: {field} = {value} ({reason})")]
    Config {
        field:  &'static str,
        value:  f64,
        reason: &'static str,
    },
}

/// Shorthand result type for `iso-core`.
pub type IsoResult<T> = Result<T, IsoError>;
