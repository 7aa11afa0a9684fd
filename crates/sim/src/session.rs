//! A simulation bound to a trail renderer, driven by configuration
//! snapshots.
//!
//! The host calls [`Session::frame`] once per displayed frame with the
//! current time and a fresh [`Config`]. Changes relative to the previous
//! snapshot (population, modifier budget, background, clear token) are
//! applied first, so buffers only ever resize between frames.

use glam::Vec2;
use serde::Serialize;
use trailfield_core::color::Srgb;
use trailfield_core::params::{Config, ConfigChange};
use trailfield_core::prng::Xorshift64;
use trailfield_core::TrailSink;

use crate::modifier::ModifierRegistry;
use crate::placement::{AttractorOpts, Placement, RotatorOpts};
use crate::stepper::Simulation;

/// Where a modifier sits, for overlay drawing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModifierMarker {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub rotator: bool,
}

pub struct Session<S: TrailSink> {
    sim: Simulation,
    sink: S,
    config: Config,
}

impl<S: TrailSink> Session<S> {
    /// Starts a simulation sized to the sink.
    pub fn new(sink: S, config: Config, rng: Xorshift64, now: f64) -> Self {
        let (width, height) = sink.size();
        let sim = Simulation::new(width, height, &config, rng, now);
        Self { sim, sink, config }
    }

    /// Applies configuration changes, steps the simulation to `now`, and
    /// paints the resulting segments. Returns the number of segments painted.
    pub fn frame(&mut self, now: f64, config: &Config) -> usize {
        for change in config.changes_since(&self.config) {
            self.apply(change, now, config);
        }
        self.config = config.clone();

        let segments = self.sim.frame(now, config);
        self.sink.paint(segments, config.trail_decay as f32);
        segments.len()
    }

    fn apply(&mut self, change: ConfigChange, now: f64, config: &Config) {
        match change {
            ConfigChange::Population(n) => {
                self.sim.set_population(n, now, config.jitter_mean_s);
            }
            ConfigChange::MaxModifiers(n) => self.sim.modifiers_mut().set_budget(n),
            ConfigChange::Background(color) => {
                tracing::debug!(background = %color.to_hex(), "background changed");
            }
            ConfigChange::ClearRequested => self.clear(),
        }
    }

    /// Blanks both trail surfaces and scatters the agents.
    pub fn clear(&mut self) {
        self.sink.clear();
        self.sim.clear_agents();
        tracing::info!("trail cleared");
    }

    /// Resizes the trail surfaces (keeping painted content at the origin) and
    /// the simulation bounds.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), S::Error> {
        self.sink.resize(width, height)?;
        let (w, h) = self.sink.size();
        self.sim.resize(w, h);
        Ok(())
    }

    pub fn add_attractor(&mut self, pos: Vec2, opts: AttractorOpts) {
        self.sim.modifiers_mut().add_attractor(pos, opts);
    }

    pub fn add_rotator(&mut self, pos: Vec2, opts: RotatorOpts) {
        self.sim.modifiers_mut().add_rotator(pos, opts);
    }

    pub fn add_modifier_at(&mut self, placement: Placement) {
        self.sim.modifiers_mut().add_modifier_at(placement);
    }

    pub fn clear_modifiers(&mut self) {
        self.sim.modifiers_mut().clear_modifiers();
    }

    /// Places a modifier at `pos` using the configured pointer-placement
    /// radius, strength and rotation.
    pub fn place_at(&mut self, pos: Vec2) {
        let placement = Placement {
            pos,
            radius: self.config.mod_radius as f32,
            strength: self.config.mod_strength as f32,
            rotation: self.config.mod_rotation as f32,
            kind: Default::default(),
        };
        self.add_modifier_at(placement);
    }

    pub fn modifier_markers(&self) -> impl Iterator<Item = ModifierMarker> + '_ {
        self.sim.modifiers().iter().map(|m| ModifierMarker {
            x: m.pos.x,
            y: m.pos.y,
            radius: m.radius,
            rotator: m.is_rotator(),
        })
    }

    pub fn modifiers(&self) -> &ModifierRegistry {
        self.sim.modifiers()
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    /// Background the host should present the trail over.
    pub fn background(&self) -> Srgb {
        self.config.background
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Ends the session and hands the renderer back for teardown.
    pub fn into_sink(self) -> S {
        self.sink
    }
}
