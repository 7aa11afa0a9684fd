//! Uniform-grid spatial hash.
//!
//! Entities are bucketed by `(floor(x / s), floor(y / s))`. Radius queries
//! return every entity in the square ring of cells that could reach the
//! radius, which is a superset of the exact answer; callers filter by true
//! distance.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::BuildHasherDefault;

use glam::Vec2;

/// Cell size used by the simulation, in pixels.
pub const DEFAULT_CELL_SIZE: f32 = 64.0;

/// Integer grid coordinates of a cell.
pub type CellKey = (i64, i64);

/// Unkeyed hasher so cell iteration order, and with it the summation order
/// of forces, is the same on every run with the same seed.
type FixedState = BuildHasherDefault<DefaultHasher>;

#[derive(Debug, Clone)]
pub struct SpatialHash<T> {
    cell_size: f32,
    cells: HashMap<CellKey, Vec<T>, FixedState>,
    len: usize,
}

impl<T> Default for SpatialHash<T> {
    fn default() -> Self {
        Self::new(DEFAULT_CELL_SIZE)
    }
}

impl<T> SpatialHash<T> {
    /// A hash with the given cell size (non-positive sizes fall back to 64).
    pub fn new(cell_size: f32) -> Self {
        let cell_size = if cell_size > 0.0 {
            cell_size
        } else {
            DEFAULT_CELL_SIZE
        };
        Self {
            cell_size,
            cells: HashMap::default(),
            len: 0,
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Entities inserted since the last clear.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn cell_of(&self, p: Vec2) -> CellKey {
        (
            (p.x / self.cell_size).floor() as i64,
            (p.y / self.cell_size).floor() as i64,
        )
    }

    /// Empties every cell. Cells that were already empty are dropped; the
    /// rest keep their allocation for the next epoch.
    pub fn clear(&mut self) {
        self.cells.retain(|_, cell| {
            let keep = !cell.is_empty();
            cell.clear();
            keep
        });
        self.len = 0;
    }

    /// Adds `item` to the cell containing `p`. No deduplication.
    pub fn insert(&mut self, p: Vec2, item: T) {
        let key = self.cell_of(p);
        self.cells.entry(key).or_default().push(item);
        self.len += 1;
    }

    /// Calls `f` for every entity within `ceil(max(radius, 1) / s)` rings of
    /// the cell containing `p`.
    pub fn for_each_near(&self, p: Vec2, radius: f32, mut f: impl FnMut(&T)) {
        let (kx, ky) = self.cell_of(p);
        let rings = (radius.max(1.0) / self.cell_size).ceil();
        // Saturating float-to-int; rings of that size take the scan path.
        let n = rings as i64;

        let span = n.saturating_mul(2).saturating_add(1);
        if span.saturating_mul(span) > self.cells.len() as i64 {
            for (&(cx, cy), cell) in &self.cells {
                if cx.abs_diff(kx) <= n as u64 && cy.abs_diff(ky) <= n as u64 {
                    cell.iter().for_each(&mut f);
                }
            }
            return;
        }

        for cy in ky - n..=ky + n {
            for cx in kx - n..=kx + n {
                if let Some(cell) = self.cells.get(&(cx, cy)) {
                    cell.iter().for_each(&mut f);
                }
            }
        }
    }

    /// The 3x3 cell neighbourhood of `p`.
    pub fn for_each_adjacent(&self, p: Vec2, f: impl FnMut(&T)) {
        self.for_each_near(p, self.cell_size, f);
    }
}

impl<T: Clone> SpatialHash<T> {
    /// Collects [`SpatialHash::for_each_near`] into a vector.
    pub fn query_radius(&self, p: Vec2, radius: f32) -> Vec<T> {
        let mut out = Vec::new();
        self.for_each_near(p, radius, |item| out.push(item.clone()));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn cell_keys_floor_negative_coordinates() {
        let hash: SpatialHash<u32> = SpatialHash::new(64.0);
        assert_eq!(hash.cell_of(Vec2::new(0.0, 63.9)), (0, 0));
        assert_eq!(hash.cell_of(Vec2::new(64.0, 128.0)), (1, 2));
        assert_eq!(hash.cell_of(Vec2::new(-0.5, -64.0)), (-1, -1));
        assert_eq!(hash.cell_of(Vec2::new(-64.1, 0.0)), (-2, 0));
    }

    #[test]
    fn insert_does_not_deduplicate() {
        let mut hash = SpatialHash::new(64.0);
        hash.insert(Vec2::new(10.0, 10.0), 7u32);
        hash.insert(Vec2::new(10.0, 10.0), 7u32);
        assert_eq!(hash.len(), 2);
        assert_eq!(hash.query_radius(Vec2::new(10.0, 10.0), 1.0), vec![7, 7]);
    }

    #[test]
    fn clear_empties_every_cell() {
        let mut hash = SpatialHash::new(64.0);
        hash.insert(Vec2::new(10.0, 10.0), 1u32);
        hash.insert(Vec2::new(500.0, 10.0), 2u32);
        hash.clear();
        assert!(hash.is_empty());
        assert!(hash.query_radius(Vec2::new(10.0, 10.0), 10_000.0).is_empty());
    }

    #[test]
    fn small_radius_still_covers_one_ring() {
        let mut hash = SpatialHash::new(64.0);
        hash.insert(Vec2::new(70.0, 70.0), 1u32);
        // Query point in cell (0, 0), entity in (1, 1): one ring reaches it.
        assert_eq!(hash.query_radius(Vec2::new(1.0, 1.0), 0.0), vec![1]);
    }

    #[test]
    fn rings_scale_with_radius() {
        let mut hash = SpatialHash::new(64.0);
        hash.insert(Vec2::new(200.0, 0.0), 1u32);
        // Cell 3 is outside the single ring for radius 64 but inside the three for 160.
        assert!(hash.query_radius(Vec2::new(0.0, 0.0), 64.0).is_empty());
        assert_eq!(hash.query_radius(Vec2::new(0.0, 0.0), 160.0), vec![1]);
    }

    #[test]
    fn adjacent_query_is_three_by_three() {
        let mut hash = SpatialHash::new(64.0);
        hash.insert(Vec2::new(100.0, 100.0), 1u32);
        hash.insert(Vec2::new(200.0, 100.0), 2u32);
        let mut seen = Vec::new();
        hash.for_each_adjacent(Vec2::new(10.0, 10.0), |v| seen.push(*v));
        assert_eq!(seen, vec![1]);
    }

    #[test]
    fn huge_radius_scans_instead_of_walking_rings() {
        let mut hash = SpatialHash::new(64.0);
        hash.insert(Vec2::new(-5_000.0, 9_000.0), 1u32);
        hash.insert(Vec2::new(3.0, 3.0), 2u32);
        let mut found = hash.query_radius(Vec2::ZERO, f32::INFINITY);
        found.sort_unstable();
        assert_eq!(found, vec![1, 2]);
    }

    #[test]
    fn non_positive_cell_size_falls_back() {
        let hash: SpatialHash<u8> = SpatialHash::new(0.0);
        assert_eq!(hash.cell_size(), DEFAULT_CELL_SIZE);
    }

    proptest! {
        #[test]
        fn query_is_superset_of_brute_force(
            points in prop::collection::vec((-400.0f32..1200.0, -400.0f32..1200.0), 0..80),
            qx in -200.0f32..1000.0,
            qy in -200.0f32..1000.0,
            radius in 0.0f32..400.0,
        ) {
            let mut hash = SpatialHash::new(64.0);
            for (i, &(x, y)) in points.iter().enumerate() {
                hash.insert(Vec2::new(x, y), i);
            }
            let q = Vec2::new(qx, qy);
            let found = hash.query_radius(q, radius);
            for (i, &(x, y)) in points.iter().enumerate() {
                if Vec2::new(x, y).distance(q) <= radius {
                    prop_assert!(found.contains(&i), "missed point {} at ({}, {})", i, x, y);
                }
            }
        }
    }
}
