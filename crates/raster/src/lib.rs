#![deny(unsafe_code)]
//! CPU trail rendering: premultiplied surfaces, a thick-segment
//! rasterizer, and the [`SoftwareTrail`] ping-pong sink.
//!
//! The CLI and the test suites use this crate in place of the GL pipeline;
//! both implement the same `TrailSink` contract from `trailfield-core`.

pub mod pixel;
pub mod stroke;
pub mod surface;
pub mod trail;

#[cfg(feature = "png")]
pub mod snapshot;

pub use pixel::composite_rgba8;
pub use stroke::draw_segment;
pub use surface::{Surface, Texel, TRANSPARENT};
pub use trail::SoftwareTrail;
