//! Structured CLI errors with meaningful exit codes.
//!
//! Exit code scheme:
//! - 0:  success
//! - 2:  clap arg parse error (automatic, before our code runs)
//! - 10: trail error (bad dimensions, bad frame rate, surface failure)
//! - 11: I/O error (PNG write)
//! - 12: input error (bad JSON params, bad `--set`, bad coordinates)
//! - 13: serialization error

use std::fmt;
use trailfield_core::TrailError;

/// Errors produced by CLI operations, each mapped to a distinct exit code.
pub enum CliError {
    Trail(TrailError),
    Io(String),
    Input(String),
    Serialization(String),
}

impl CliError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Trail(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Trail(e) => write!(f, "{e}"),
            CliError::Io(msg) | CliError::Input(msg) | CliError::Serialization(msg) => {
                write!(f, "{msg}")
            }
        }
    }
}

impl From<TrailError> for CliError {
    fn from(e: TrailError) -> Self {
        match e {
            TrailError::Io(msg) => CliError::Io(msg),
            TrailError::UnknownParam(_)
            | TrailError::ParamTypeMismatch { .. }
            | TrailError::ParamOutOfRange { .. }
            | TrailError::InvalidColor(_) => CliError::Input(e.to_string()),
            other => CliError::Trail(other),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}
