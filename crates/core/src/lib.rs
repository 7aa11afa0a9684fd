#![deny(unsafe_code)]
//! Core types for the trailfield particle trail system.
//!
//! Provides the configuration snapshot and parameter store, color types with
//! OKLCh conversion, the `Xorshift64` PRNG, the per-frame `LineSegment`, the
//! `TrailSink` renderer trait, the `RunSpec` run manifest, and (behind the
//! `render` feature) the GPU trail pipeline.

pub mod color;
pub mod error;
pub mod params;
pub mod prng;
pub mod seed;
pub mod segment;
pub mod sink;

#[cfg(feature = "render")]
pub mod render;

pub use color::{OkLch, Srgb};
pub use error::TrailError;
pub use params::{Config, ConfigChange, JitterMode, ParamStore};
pub use prng::Xorshift64;
pub use seed::RunSpec;
pub use segment::LineSegment;
pub use sink::TrailSink;
