//! Force sources and the budgeted registry that owns them.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::spatial::SpatialHash;

pub const DEFAULT_RADIUS: f32 = 160.0;
pub const DEFAULT_STRENGTH: f32 = 0.8;
pub const DEFAULT_ROTATION: f32 = 0.0;
pub const DEFAULT_BUDGET: usize = 256;

/// Maps normalized distance `d / radius` to an influence weight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Falloff {
    /// `1 - t`, clamped to `[0, 1]`.
    #[default]
    Linear,
    /// Smoothstep of the linear weight.
    Smoothstep,
}

impl Falloff {
    pub fn weight(self, t: f32) -> f32 {
        let w = (1.0 - t).clamp(0.0, 1.0);
        match self {
            Falloff::Linear => w,
            Falloff::Smoothstep => w * w * (3.0 - 2.0 * w),
        }
    }
}

/// Whether a modifier acts as placed or inverted (repels, counter-rotates).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sign {
    #[default]
    Positive,
    Negative,
}

impl Sign {
    pub fn value(self) -> f32 {
        match self {
            Sign::Positive => 1.0,
            Sign::Negative => -1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModifierKind {
    /// Pulls toward the centre.
    Attractor { strength: f32 },
    /// Pushes tangentially around the centre.
    Rotator { rotation: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Modifier {
    pub pos: Vec2,
    pub radius: f32,
    pub kind: ModifierKind,
    pub falloff: Falloff,
    pub sign: Sign,
}

impl Modifier {
    pub fn is_rotator(&self) -> bool {
        matches!(self.kind, ModifierKind::Rotator { .. })
    }

    /// Acceleration this modifier applies at `p`.
    ///
    /// Zero within one pixel of the centre and beyond `radius`.
    pub fn influence(&self, p: Vec2) -> Vec2 {
        let delta = self.pos - p;
        let d2 = delta.length_squared();
        if d2 <= 1.0 {
            return Vec2::ZERO;
        }
        let d = d2.sqrt();
        if d > self.radius || self.radius.is_nan() {
            return Vec2::ZERO;
        }
        let w = self.falloff.weight(d / self.radius) * self.sign.value();
        let unit = delta / d;
        match self.kind {
            ModifierKind::Attractor { strength } => unit * (strength * w),
            ModifierKind::Rotator { rotation } => unit.perp() * (rotation * w),
        }
    }
}

/// Caller-supplied fields for a new modifier; anything left `None` takes
/// the registry default.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModifierSpec {
    pub pos: Vec2,
    pub rotator: bool,
    pub radius: Option<f32>,
    pub strength: Option<f32>,
    pub rotation: Option<f32>,
    pub falloff: Option<Falloff>,
    pub sign: Option<Sign>,
}

impl ModifierSpec {
    pub fn attractor(pos: Vec2) -> Self {
        Self {
            pos,
            rotator: false,
            radius: None,
            strength: None,
            rotation: None,
            falloff: None,
            sign: None,
        }
    }

    pub fn rotator(pos: Vec2) -> Self {
        Self {
            rotator: true,
            ..Self::attractor(pos)
        }
    }

    pub fn radius(mut self, radius: f32) -> Self {
        self.radius = Some(radius);
        self
    }

    pub fn strength(mut self, strength: f32) -> Self {
        self.strength = Some(strength);
        self
    }

    pub fn rotation(mut self, rotation: f32) -> Self {
        self.rotation = Some(rotation);
        self
    }

    pub fn falloff(mut self, falloff: Falloff) -> Self {
        self.falloff = Some(falloff);
        self
    }

    pub fn sign(mut self, sign: Sign) -> Self {
        self.sign = Some(sign);
        self
    }

    fn resolve(self) -> Modifier {
        let kind = if self.rotator {
            ModifierKind::Rotator {
                rotation: self.rotation.unwrap_or(DEFAULT_ROTATION),
            }
        } else {
            ModifierKind::Attractor {
                strength: self.strength.unwrap_or(DEFAULT_STRENGTH),
            }
        };
        Modifier {
            pos: self.pos,
            radius: self.radius.unwrap_or(DEFAULT_RADIUS),
            kind,
            falloff: self.falloff.unwrap_or_default(),
            sign: self.sign.unwrap_or_default(),
        }
    }
}

/// Active modifiers in placement order, oldest first, plus the largest
/// radius among them.
#[derive(Debug, Clone)]
pub struct ModifierRegistry {
    items: VecDeque<Modifier>,
    max_radius: f32,
    budget: usize,
}

impl Default for ModifierRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_BUDGET)
    }
}

impl ModifierRegistry {
    pub fn new(budget: usize) -> Self {
        Self {
            items: VecDeque::new(),
            max_radius: 0.0,
            budget,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Modifier> + '_ {
        self.items.iter()
    }

    /// Largest radius among the current modifiers, 0 when empty.
    pub fn max_radius(&self) -> f32 {
        self.max_radius
    }

    pub fn budget(&self) -> usize {
        self.budget
    }

    /// Changes the budget and trims to it immediately.
    pub fn set_budget(&mut self, budget: usize) {
        self.budget = budget;
        self.trim(budget);
    }

    /// Appends a modifier built from `spec` and the defaults. Does not trim.
    pub fn add(&mut self, spec: ModifierSpec) -> Modifier {
        let modifier = spec.resolve();
        if modifier.radius > self.max_radius {
            self.max_radius = modifier.radius;
        }
        self.items.push_back(modifier);
        modifier
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.max_radius = 0.0;
    }

    /// Drops the oldest modifiers until at most `budget` remain, then
    /// recomputes `max_radius` over the survivors. Returns how many were
    /// evicted.
    pub fn trim(&mut self, budget: usize) -> usize {
        let excess = self.items.len().saturating_sub(budget);
        if excess == 0 {
            return 0;
        }
        self.items.drain(..excess);
        self.max_radius = self.items.iter().map(|m| m.radius).fold(0.0, f32::max);
        tracing::debug!(
            evicted = excess,
            remaining = self.items.len(),
            max_radius = self.max_radius,
            "modifiers trimmed"
        );
        excess
    }

    /// Refills `index` with a copy of every modifier at its centre.
    pub fn rebuild_index(&self, index: &mut SpatialHash<Modifier>) {
        index.clear();
        for m in &self.items {
            index.insert(m.pos, *m);
        }
    }
}
