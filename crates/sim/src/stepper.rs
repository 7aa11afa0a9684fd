//! Per-frame simulation: fixed substeps, boundary reflection, jitter, and
//! segment emission.
//!
//! The caller supplies the clock. Each [`Simulation::frame`] covers the wall
//! time since the previous call, clamped to [`MAX_FRAME_DT`], split into
//! `max(1, round(dt * fps))` equal substeps. Velocity carries no inertia
//! between frames: it is zeroed at the start of each one and set from the
//! steering acceleration every substep.

use glam::Vec2;
use trailfield_core::color::{oklch_to_packed, tint_packed};
use trailfield_core::params::{Config, JitterMode};
use trailfield_core::prng::Xorshift64;
use trailfield_core::LineSegment;

use crate::agents::{AgentStore, MAX_AGENTS};
use crate::modifier::{Modifier, ModifierRegistry};
use crate::spatial::SpatialHash;
use crate::steering::steer;

/// Longest interval one frame will simulate, in seconds.
pub const MAX_FRAME_DT: f64 = 0.1;
/// Displacements shorter than 0.5 px are not painted.
pub const MIN_SEGMENT_LEN_SQ: f32 = 0.25;
/// Speed normaliser used when no agent moved.
const MIN_PEAK_SPEED: f32 = 1e-6;
/// Brush radius floor in pixels.
const MIN_BRUSH_RADIUS: f32 = 2.0;

pub struct Simulation {
    width: f32,
    height: f32,
    agents: AgentStore,
    modifiers: ModifierRegistry,
    index: SpatialHash<Modifier>,
    rng: Xorshift64,
    last_time: f64,
    segments: Vec<LineSegment>,
}

impl Simulation {
    /// Spawns `config.population` agents at random positions inside
    /// `width x height`, with the clock starting at `now` (seconds).
    pub fn new(width: u32, height: u32, config: &Config, rng: Xorshift64, now: f64) -> Self {
        let mut sim = Self {
            width: width as f32,
            height: height as f32,
            agents: AgentStore::new(MAX_AGENTS),
            modifiers: ModifierRegistry::new(config.max_modifiers),
            index: SpatialHash::default(),
            rng,
            last_time: now,
            segments: Vec::new(),
        };
        let target = config.population.min(MAX_AGENTS);
        while sim.agents.len() < target {
            let pos = sim.random_position();
            sim.agents.spawn(pos, Vec2::ZERO);
        }
        sim.schedule_jitter(0, now, config.jitter_mean_s);
        tracing::info!(
            width,
            height,
            agents = sim.agents.len(),
            "simulation created"
        );
        sim
    }

    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    pub fn agents(&self) -> &AgentStore {
        &self.agents
    }

    pub fn modifiers(&self) -> &ModifierRegistry {
        &self.modifiers
    }

    pub fn modifiers_mut(&mut self) -> &mut ModifierRegistry {
        &mut self.modifiers
    }

    /// Segments from the most recent frame.
    pub fn segments(&self) -> &[LineSegment] {
        &self.segments
    }

    /// Advances to `now` and returns the segments to paint this frame.
    pub fn frame(&mut self, now: f64, config: &Config) -> &[LineSegment] {
        let dt = (now - self.last_time).clamp(0.0, MAX_FRAME_DT);
        self.last_time = now;

        let substeps = substep_count(dt, config);
        let h = (dt / substeps as f64) as f32;
        let gain = config.gain();

        {
            let agents = self.agents.all_mut();
            agents.skip.fill(false);
            agents.vel.fill(Vec2::ZERO);
        }

        for _ in 0..substeps {
            self.substep(h, gain);
        }

        self.jitter(now, config);
        self.emit_segments(config);
        &self.segments
    }

    fn substep(&mut self, h: f32, gain: f32) {
        self.modifiers.rebuild_index(&mut self.index);
        let max_radius = self.modifiers.max_radius();
        let (w, ht) = (self.width, self.height);
        let (pos, vel) = self.agents.motion_mut();
        for (p, v) in pos.iter_mut().zip(vel.iter_mut()) {
            let accel = steer(*p, &self.index, max_radius);
            let mut nv = accel * gain * h;
            let mut np = *p + nv * h;
            if np.x < 0.0 || np.x > w {
                np.x = np.x.clamp(0.0, w);
                nv.x = -nv.x;
            }
            if np.y < 0.0 || np.y > ht {
                np.y = np.y.clamp(0.0, ht);
                nv.y = -nv.y;
            }
            *p = np;
            *v = nv;
        }
    }

    /// Teleports every agent whose jitter time has come, lifts its pen for
    /// this frame, and draws its next wait. With jitter disabled, due agents
    /// are only rescheduled.
    fn jitter(&mut self, now: f64, config: &Config) {
        let (w, h) = (self.width, self.height);
        let nudge = config.jitter_nudge_px as f32;
        let agents = self.agents.all_mut();
        let mut jittered = 0usize;
        for i in 0..agents.pos.len() {
            if now < agents.next_jitter[i] {
                continue;
            }
            agents.next_jitter[i] = now + self.rng.next_exp(config.jitter_mean_s);
            if !config.jitter_enabled {
                continue;
            }
            let p = match config.jitter_mode {
                JitterMode::Relocate => Vec2::new(
                    self.rng.next_range(0.0, w),
                    self.rng.next_range(0.0, h),
                ),
                JitterMode::Nudge => {
                    let offset = Vec2::new(
                        self.rng.next_range(-nudge, nudge),
                        self.rng.next_range(-nudge, nudge),
                    );
                    (agents.pos[i] + offset).clamp(Vec2::ZERO, Vec2::new(w, h))
                }
            };
            agents.pos[i] = p;
            agents.last[i] = p;
            agents.skip[i] = true;
            jittered += 1;
        }
        if jittered > 0 {
            tracing::trace!(jittered, "agents jittered");
        }
    }

    /// Fills `self.segments` from each agent's displacement since it was last
    /// painted, then moves every last-painted position to the current one.
    fn emit_segments(&mut self, config: &Config) {
        self.segments.clear();
        let agents = self.agents.all_mut();

        let peak = agents
            .pos
            .iter()
            .zip(agents.last.iter())
            .map(|(p, l)| p.distance(*l))
            .fold(0.0f32, f32::max);
        let peak = if peak > 0.0 { peak } else { MIN_PEAK_SPEED };

        let brush = (config.point_radius as f32).max(MIN_BRUSH_RADIUS);
        let alpha = config.trail_alpha as f32;

        for i in 0..agents.pos.len() {
            let (from, to) = (agents.last[i], agents.pos[i]);
            agents.last[i] = to;
            if agents.skip[i] || from.distance_squared(to) < MIN_SEGMENT_LEN_SQ {
                continue;
            }
            let hue = 360.0 * (from.distance(to) / peak) as f64;
            let color = tint_packed(
                oklch_to_packed(config.lightness, config.chroma, hue),
                config.tint,
            );
            let width = 2.0 * brush * self.rng.next_f32();
            self.segments
                .push(LineSegment::new(from, to, width, color, alpha));
        }
    }

    /// Grows or shrinks the population to `target` (capped at capacity). New
    /// agents get random positions, zero velocity, a fresh jitter schedule,
    /// and a last-painted position equal to their position.
    pub fn set_population(&mut self, target: usize, now: f64, jitter_mean_s: f64) {
        let before = self.agents.len();
        if target < before {
            self.agents.shrink_to(target);
        } else if target > before {
            let from = self.agents.grow_to(target);
            for i in from..self.agents.len() {
                let p = self.random_position();
                self.agents.positions_mut()[i] = p;
                self.agents.last_painted_mut()[i] = p;
            }
            self.schedule_jitter(from, now, jitter_mean_s);
        }
        tracing::debug!(before, after = self.agents.len(), "population resized");
    }

    /// Scatters every agent to a new random position with zero velocity and
    /// realigns last-painted positions, so the next frame paints nothing
    /// across the jump.
    pub fn clear_agents(&mut self) {
        for i in 0..self.agents.len() {
            let p = self.random_position();
            let agents = self.agents.all_mut();
            agents.pos[i] = p;
            agents.last[i] = p;
            agents.vel[i] = Vec2::ZERO;
        }
        tracing::debug!(agents = self.agents.len(), "agents scattered");
    }

    /// Adopts new bounds, pulling any agent outside them back onto the edge.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width as f32;
        self.height = height as f32;
        let max = Vec2::new(self.width, self.height);
        let agents = self.agents.all_mut();
        for (p, l) in agents.pos.iter_mut().zip(agents.last.iter_mut()) {
            *p = p.clamp(Vec2::ZERO, max);
            *l = l.clamp(Vec2::ZERO, max);
        }
    }

    fn random_position(&mut self) -> Vec2 {
        Vec2::new(
            self.rng.next_range(0.0, self.width),
            self.rng.next_range(0.0, self.height),
        )
    }

    fn schedule_jitter(&mut self, from: usize, now: f64, mean: f64) {
        let agents = self.agents.all_mut();
        for t in &mut agents.next_jitter[from..] {
            *t = now + self.rng.next_exp(mean);
        }
    }
}

/// `max(1, round(dt * fps))`. Bounded because dt is clamped to
/// [`MAX_FRAME_DT`] and `target_fps` is capped.
fn substep_count(dt: f64, config: &Config) -> usize {
    ((dt * config.target_fps()).round() as usize).max(1)
}
