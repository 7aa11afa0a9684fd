//! Run manifest for headless renders.
//!
//! A [`RunSpec`] records what a headless run did: canvas size, parameter
//! overrides, PRNG seed, and frame count. Replaying it with the same binary
//! and the same modifier placements reproduces the image.

use crate::error::TrailError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunSpec {
    pub width: u32,
    pub height: u32,
    pub params: serde_json::Value,
    pub seed: u64,
    pub frames: usize,
    /// Virtual frame rate used to advance the clock between frames.
    pub fps: f64,
}

impl RunSpec {
    /// Creates a spec with empty params, zero frames, and a 60 Hz clock.
    pub fn new(width: u32, height: u32, seed: u64) -> Self {
        Self {
            width,
            height,
            params: serde_json::Value::Object(serde_json::Map::new()),
            seed,
            frames: 0,
            fps: 60.0,
        }
    }

    /// Rejects zero or overflowing dimensions and a non-positive frame rate.
    pub fn validate(&self) -> Result<(), TrailError> {
        if self.width == 0 || self.height == 0 {
            return Err(TrailError::InvalidDimensions);
        }
        (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|px| px.checked_mul(4))
            .ok_or(TrailError::InvalidDimensions)?;
        if !(self.fps > 0.0 && self.fps.is_finite()) {
            return Err(TrailError::ParamTypeMismatch {
                name: "fps".into(),
                expected: "positive number".into(),
                got: self.fps.to_string(),
            });
        }
        Ok(())
    }

    /// Seconds between two virtual frames.
    pub fn frame_interval(&self) -> f64 {
        1.0 / self.fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_has_empty_params_and_no_frames() {
        let s = RunSpec::new(800, 600, 42);
        assert_eq!((s.width, s.height, s.seed, s.frames), (800, 600, 42, 0));
        assert_eq!(s.params, serde_json::json!({}));
        assert!((s.frame_interval() - 1.0 / 60.0).abs() < 1e-12);
    }

    #[test]
    fn json_round_trip_with_params() {
        let mut s = RunSpec::new(1200, 600, 8675309);
        s.params = serde_json::json!({"population": 4000, "trail_decay": 0.02});
        s.frames = 900;
        let json = serde_json::to_string_pretty(&s).unwrap();
        let back: RunSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(s, back);
    }

    #[test]
    fn validate_accepts_normal_spec() {
        assert!(RunSpec::new(800, 600, 1).validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_dimensions() {
        assert!(RunSpec::new(0, 600, 1).validate().is_err());
        assert!(RunSpec::new(800, 0, 1).validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_fps() {
        let mut s = RunSpec::new(10, 10, 1);
        s.fps = 0.0;
        assert!(s.validate().is_err());
        s.fps = f64::NAN;
        assert!(s.validate().is_err());
    }
}
