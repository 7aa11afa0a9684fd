//! Per-agent state in parallel arrays.
//!
//! Every buffer is resized only through [`AgentStore::spawn`],
//! [`AgentStore::grow_to`] and [`AgentStore::shrink_to`], so all of them
//! always share one length. Callers get slices, which cannot change length.

use glam::Vec2;

/// Hard ceiling on the number of agents.
pub const MAX_AGENTS: usize = 20_000;

#[derive(Debug, Clone)]
pub struct AgentStore {
    capacity: usize,
    pos: Vec<Vec2>,
    vel: Vec<Vec2>,
    last: Vec<Vec2>,
    next_jitter: Vec<f64>,
    skip: Vec<bool>,
}

impl Default for AgentStore {
    fn default() -> Self {
        Self::new(MAX_AGENTS)
    }
}

impl AgentStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            pos: Vec::new(),
            vel: Vec::new(),
            last: Vec::new(),
            next_jitter: Vec::new(),
            skip: Vec::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.pos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pos.is_empty()
    }

    /// Appends one agent whose last-painted position is its spawn point.
    /// Returns `false` and does nothing once the store is at capacity.
    pub fn spawn(&mut self, pos: Vec2, vel: Vec2) -> bool {
        if self.len() >= self.capacity {
            return false;
        }
        self.pos.push(pos);
        self.vel.push(vel);
        self.last.push(pos);
        self.next_jitter.push(0.0);
        self.skip.push(false);
        true
    }

    /// Extends to `n` agents (capped at capacity). New slots are zeroed; the
    /// caller seeds their positions and jitter schedule. Returns the index of
    /// the first new slot.
    pub fn grow_to(&mut self, n: usize) -> usize {
        let from = self.len();
        let n = n.min(self.capacity);
        if n > from {
            self.pos.resize(n, Vec2::ZERO);
            self.vel.resize(n, Vec2::ZERO);
            self.last.resize(n, Vec2::ZERO);
            self.next_jitter.resize(n, 0.0);
            self.skip.resize(n, false);
        }
        from
    }

    /// Truncates every buffer to `n` agents, dropping from the tail.
    pub fn shrink_to(&mut self, n: usize) {
        if n >= self.len() {
            return;
        }
        self.pos.truncate(n);
        self.vel.truncate(n);
        self.last.truncate(n);
        self.next_jitter.truncate(n);
        self.skip.truncate(n);
    }

    pub fn positions(&self) -> &[Vec2] {
        &self.pos
    }

    pub fn positions_mut(&mut self) -> &mut [Vec2] {
        &mut self.pos
    }

    pub fn velocities(&self) -> &[Vec2] {
        &self.vel
    }

    pub fn velocities_mut(&mut self) -> &mut [Vec2] {
        &mut self.vel
    }

    pub fn last_painted(&self) -> &[Vec2] {
        &self.last
    }

    pub fn last_painted_mut(&mut self) -> &mut [Vec2] {
        &mut self.last
    }

    pub fn next_jitter(&self) -> &[f64] {
        &self.next_jitter
    }

    pub fn skip_draw(&self) -> &[bool] {
        &self.skip
    }

    /// Position and velocity together, for the integrator.
    pub fn motion_mut(&mut self) -> (&mut [Vec2], &mut [Vec2]) {
        (&mut self.pos, &mut self.vel)
    }

    /// Every per-agent buffer at once, for passes that touch several.
    pub fn all_mut(&mut self) -> AgentsMut<'_> {
        AgentsMut {
            pos: &mut self.pos,
            vel: &mut self.vel,
            last: &mut self.last,
            next_jitter: &mut self.next_jitter,
            skip: &mut self.skip,
        }
    }
}

/// Simultaneous mutable view of all per-agent buffers.
pub struct AgentsMut<'a> {
    pub pos: &'a mut [Vec2],
    pub vel: &'a mut [Vec2],
    pub last: &'a mut [Vec2],
    pub next_jitter: &'a mut [f64],
    pub skip: &'a mut [bool],
}
