//! Placement operations for the UI layer. Each insertion is followed by a
//! trim to the registry's budget.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::modifier::{ModifierRegistry, ModifierSpec};

/// `|rotation|` above this makes an auto placement a rotator.
pub const ROTATION_EPSILON: f32 = 1e-6;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AttractorOpts {
    pub radius: Option<f32>,
    pub strength: Option<f32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RotatorOpts {
    pub radius: Option<f32>,
    pub rotation: Option<f32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementKind {
    /// Rotator if the rotation is non-negligible, else attractor.
    #[default]
    Auto,
    Attractor,
    Rotator,
}

impl PlacementKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "auto" => Some(PlacementKind::Auto),
            "attractor" => Some(PlacementKind::Attractor),
            "rotator" => Some(PlacementKind::Rotator),
            _ => None,
        }
    }
}

/// Everything a pointer placement carries; the unused field for the chosen
/// kind is ignored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub pos: Vec2,
    pub radius: f32,
    pub strength: f32,
    pub rotation: f32,
    pub kind: PlacementKind,
}

impl ModifierRegistry {
    pub fn add_attractor(&mut self, pos: Vec2, opts: AttractorOpts) {
        let mut spec = ModifierSpec::attractor(pos);
        spec.radius = opts.radius;
        spec.strength = opts.strength;
        self.add(spec);
        self.trim(self.budget());
    }

    pub fn add_rotator(&mut self, pos: Vec2, opts: RotatorOpts) {
        let mut spec = ModifierSpec::rotator(pos);
        spec.radius = opts.radius;
        spec.rotation = opts.rotation;
        self.add(spec);
        self.trim(self.budget());
    }

    pub fn add_modifier_at(&mut self, placement: Placement) {
        let rotator = match placement.kind {
            PlacementKind::Rotator => true,
            PlacementKind::Attractor => false,
            PlacementKind::Auto => placement.rotation.abs() > ROTATION_EPSILON,
        };
        let spec = if rotator {
            ModifierSpec::rotator(placement.pos).rotation(placement.rotation)
        } else {
            ModifierSpec::attractor(placement.pos).strength(placement.strength)
        };
        self.add(spec.radius(placement.radius));
        self.trim(self.budget());
    }

    pub fn clear_modifiers(&mut self) {
        self.clear();
        tracing::debug!("modifiers cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modifier::ModifierKind;

    fn placement(rotation: f32, kind: PlacementKind) -> Placement {
        Placement {
            pos: Vec2::new(10.0, 20.0),
            radius: 90.0,
            strength: 0.4,
            rotation,
            kind,
        }
    }

    fn last_kind(reg: &ModifierRegistry) -> Option<ModifierKind> {
        reg.iter().last().map(|m| m.kind)
    }

    #[test]
    fn add_attractor_uses_defaults_for_missing_opts() {
        let mut reg = ModifierRegistry::default();
        reg.add_attractor(Vec2::ZERO, AttractorOpts::default());
        let m = reg.iter().next().copied();
        assert_eq!(m.map(|m| m.radius), Some(160.0));
        assert_eq!(last_kind(&reg), Some(ModifierKind::Attractor { strength: 0.8 }));
    }

    #[test]
    fn add_rotator_takes_opts() {
        let mut reg = ModifierRegistry::default();
        reg.add_rotator(
            Vec2::ZERO,
            RotatorOpts {
                radius: Some(30.0),
                rotation: Some(0.6),
            },
        );
        assert_eq!(reg.max_radius(), 30.0);
        assert_eq!(last_kind(&reg), Some(ModifierKind::Rotator { rotation: 0.6 }));
    }

    #[test]
    fn auto_picks_rotator_for_non_negligible_rotation() {
        let mut reg = ModifierRegistry::default();
        reg.add_modifier_at(placement(0.6, PlacementKind::Auto));
        assert_eq!(last_kind(&reg), Some(ModifierKind::Rotator { rotation: 0.6 }));
        reg.add_modifier_at(placement(-0.6, PlacementKind::Auto));
        assert_eq!(last_kind(&reg), Some(ModifierKind::Rotator { rotation: -0.6 }));
    }

    #[test]
    fn auto_picks_attractor_for_tiny_rotation() {
        let mut reg = ModifierRegistry::default();
        reg.add_modifier_at(placement(1e-7, PlacementKind::Auto));
        assert_eq!(last_kind(&reg), Some(ModifierKind::Attractor { strength: 0.4 }));
    }

    #[test]
    fn explicit_kind_wins_over_rotation() {
        let mut reg = ModifierRegistry::default();
        reg.add_modifier_at(placement(0.6, PlacementKind::Attractor));
        assert_eq!(last_kind(&reg), Some(ModifierKind::Attractor { strength: 0.4 }));
        reg.add_modifier_at(placement(0.0, PlacementKind::Rotator));
        assert_eq!(last_kind(&reg), Some(ModifierKind::Rotator { rotation: 0.0 }));
    }

    #[test]
    fn every_placement_trims_to_budget() {
        let mut reg = ModifierRegistry::new(2);
        reg.add_attractor(Vec2::new(1.0, 0.0), AttractorOpts::default());
        reg.add_rotator(Vec2::new(2.0, 0.0), RotatorOpts::default());
        reg.add_modifier_at(placement(0.0, PlacementKind::Auto));
        assert_eq!(reg.len(), 2);
        let xs: Vec<f32> = reg.iter().map(|m| m.pos.x).collect();
        assert_eq!(xs, vec![2.0, 10.0]);
    }

    #[test]
    fn clear_modifiers_empties_registry() {
        let mut reg = ModifierRegistry::default();
        reg.add_attractor(Vec2::ZERO, AttractorOpts::default());
        reg.clear_modifiers();
        assert!(reg.is_empty());
        assert_eq!(reg.max_radius(), 0.0);
    }

    #[test]
    fn placement_kind_names() {
        assert_eq!(PlacementKind::from_name("auto"), Some(PlacementKind::Auto));
        assert_eq!(PlacementKind::from_name("rotator"), Some(PlacementKind::Rotator));
        assert_eq!(PlacementKind::from_name("spiral"), None);
    }
}
