//! Net acceleration at a point from every nearby modifier.

use glam::Vec2;

use crate::modifier::Modifier;
use crate::spatial::SpatialHash;

/// Sums [`Modifier::influence`] over the modifiers the index returns for
/// `max(max_radius, 1)` around `p`. Read-only against the index.
pub fn steer(p: Vec2, index: &SpatialHash<Modifier>, max_radius: f32) -> Vec2 {
    let mut acc = Vec2::ZERO;
    index.for_each_near(p, max_radius.max(1.0), |m| acc += m.influence(p));
    acc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modifier::{Falloff, ModifierRegistry, ModifierSpec};
    use proptest::prelude::*;

    fn indexed(registry: &ModifierRegistry) -> SpatialHash<Modifier> {
        let mut index = SpatialHash::default();
        registry.rebuild_index(&mut index);
        index
    }

    fn single_attractor(falloff: Falloff) -> ModifierRegistry {
        let mut reg = ModifierRegistry::default();
        reg.add(
            ModifierSpec::attractor(Vec2::new(100.0, 100.0))
                .radius(160.0)
                .strength(1.0)
                .falloff(falloff),
        );
        reg
    }

    #[test]
    fn empty_registry_gives_zero() {
        let reg = ModifierRegistry::default();
        assert_eq!(steer(Vec2::new(5.0, 5.0), &indexed(&reg), reg.max_radius()), Vec2::ZERO);
    }

    #[test]
    fn agent_on_the_radius_boundary_feels_nothing() {
        let reg = single_attractor(Falloff::Linear);
        let a = steer(Vec2::new(100.0, 260.0), &indexed(&reg), reg.max_radius());
        assert!(a.length() < 1e-6, "got {a}");
    }

    #[test]
    fn agent_at_half_radius_feels_half_strength_toward_centre() {
        let reg = single_attractor(Falloff::Linear);
        let a = steer(Vec2::new(100.0, 180.0), &indexed(&reg), reg.max_radius());
        assert!((a.length() - 0.5).abs() < 1e-5, "got {a}");
        assert!(a.abs_diff_eq(Vec2::new(0.0, -0.5), 1e-5), "got {a}");
    }

    #[test]
    fn contributions_sum_linearly() {
        let mut reg = ModifierRegistry::default();
        reg.add(ModifierSpec::attractor(Vec2::new(0.0, 0.0)).radius(100.0).strength(1.0));
        reg.add(ModifierSpec::attractor(Vec2::new(100.0, 0.0)).radius(100.0).strength(1.0));
        // Midpoint: equal and opposite pulls.
        let a = steer(Vec2::new(50.0, 0.0), &indexed(&reg), reg.max_radius());
        assert!(a.length() < 1e-6, "got {a}");
    }

    #[test]
    fn small_modifier_found_beside_large_one() {
        let mut reg = ModifierRegistry::default();
        reg.add(ModifierSpec::attractor(Vec2::new(1000.0, 1000.0)).radius(600.0));
        reg.add(ModifierSpec::attractor(Vec2::new(10.0, 0.0)).radius(20.0).strength(1.0));
        let a = steer(Vec2::ZERO, &indexed(&reg), reg.max_radius());
        assert!(a.x > 0.0, "got {a}");
    }

    proptest! {
        #[test]
        fn zero_beyond_radius_for_both_falloffs(
            angle in 0.0f32..std::f32::consts::TAU,
            extra in 0.01f32..500.0,
            radius in 2.0f32..400.0,
            smooth in any::<bool>(),
            rotator in any::<bool>(),
        ) {
            let falloff = if smooth { Falloff::Smoothstep } else { Falloff::Linear };
            let centre = Vec2::new(300.0, 300.0);
            let spec = if rotator {
                ModifierSpec::rotator(centre).rotation(2.0)
            } else {
                ModifierSpec::attractor(centre).strength(2.0)
            };
            let mut reg = ModifierRegistry::default();
            reg.add(spec.radius(radius).falloff(falloff));
            let p = centre + Vec2::from_angle(angle) * (radius + extra);
            prop_assert_eq!(steer(p, &indexed(&reg), reg.max_radius()), Vec2::ZERO);
        }

        #[test]
        fn attraction_points_at_the_centre(
            px in 0.0f32..600.0,
            py in 0.0f32..600.0,
        ) {
            let reg = single_attractor(Falloff::Smoothstep);
            let p = Vec2::new(px, py);
            let a = steer(p, &indexed(&reg), reg.max_radius());
            if a != Vec2::ZERO {
                let to_centre = Vec2::new(100.0, 100.0) - p;
                prop_assert!(a.dot(to_centre) > 0.0);
                prop_assert!(a.perp_dot(to_centre).abs() <= 1e-3 * to_centre.length());
            }
        }
    }
}
