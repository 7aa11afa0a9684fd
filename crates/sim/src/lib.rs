#![deny(unsafe_code)]
//! Agent simulation for trailfield.
//!
//! Agents move under user-placed modifiers (attractors pull, rotators
//! swirl) and leave brush strokes on a persistent trail. Each frame the
//! [`Simulation`] runs fixed substeps of steering and integration, applies
//! jitter teleports, and emits one [`trailfield_core::LineSegment`] per
//! agent that moved far enough. A [`Session`] couples a simulation with any
//! [`trailfield_core::TrailSink`] and applies configuration changes at frame
//! boundaries.

pub mod agents;
pub mod modifier;
pub mod placement;
pub mod session;
pub mod spatial;
pub mod steering;
pub mod stepper;

pub use agents::{AgentStore, MAX_AGENTS};
pub use modifier::{Falloff, Modifier, ModifierKind, ModifierRegistry, ModifierSpec, Sign};
pub use placement::{AttractorOpts, Placement, PlacementKind, RotatorOpts};
pub use session::{ModifierMarker, Session};
pub use spatial::SpatialHash;
pub use steering::steer;
pub use stepper::Simulation;
