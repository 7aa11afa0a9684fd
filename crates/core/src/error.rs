//! Error types for the trailfield core.

use thiserror::Error;

/// Errors produced while setting up a simulation or its surfaces.
///
/// Steady-state frame work never fails: capacity overflow, budget eviction
/// and degenerate geometry are handled by policy and never reach this type.
#[derive(Debug, Error)]
pub enum TrailError {
    /// Width or height was zero when creating a canvas or surface.
    #[error("invalid dimensions: width and height must be non-zero")]
    InvalidDimensions,

    /// A parameter existed but had the wrong JSON type.
    #[error("parameter type mismatch for '{name}': expected {expected}, got {got}")]
    ParamTypeMismatch {
        name: String,
        expected: String,
        got: String,
    },

    /// A numeric parameter fell outside its schema range.
    #[error("parameter '{name}' = {value} is outside [{min}, {max}]")]
    ParamOutOfRange {
        name: String,
        value: f64,
        min: f64,
        max: f64,
    },

    /// A parameter name is not part of the configuration schema.
    #[error("unknown parameter: {0}")]
    UnknownParam(String),

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// Writing an image or other output failed.
    #[error("i/o error: {0}")]
    Io(String),
}
