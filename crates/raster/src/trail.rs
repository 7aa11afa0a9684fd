//! Software trail renderer: two [`Surface`]s used as a ping-pong pair.

use trailfield_core::error::TrailError;
use trailfield_core::{LineSegment, TrailSink};

use crate::stroke::draw_segment;
use crate::surface::Surface;

/// CPU implementation of [`TrailSink`], used headless and in tests.
#[derive(Debug, Clone)]
pub struct SoftwareTrail {
    surfaces: [Surface; 2],
    front: usize,
}

impl SoftwareTrail {
    pub fn new(width: u32, height: u32) -> Result<Self, TrailError> {
        Ok(Self {
            surfaces: [Surface::new(width, height)?, Surface::new(width, height)?],
            front: 0,
        })
    }

    /// The surface holding the accumulated trail.
    pub fn front(&self) -> &Surface {
        &self.surfaces[self.front]
    }

    fn split(&mut self) -> (&Surface, &mut Surface) {
        let [a, b] = &mut self.surfaces;
        if self.front == 0 {
            (a, b)
        } else {
            (b, a)
        }
    }
}

impl TrailSink for SoftwareTrail {
    type Error = TrailError;

    fn size(&self) -> (u32, u32) {
        let front = self.front();
        (front.width(), front.height())
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), TrailError> {
        if self.size() == (width, height) {
            return Ok(());
        }
        let front = self.front().resized(width, height)?;
        let back = Surface::new(width, height)?;
        self.surfaces = [front, back];
        self.front = 0;
        tracing::debug!(width, height, "software trail resized");
        Ok(())
    }

    fn clear(&mut self) {
        for surface in &mut self.surfaces {
            surface.clear();
        }
    }

    fn paint(&mut self, segments: &[LineSegment], decay: f32) {
        let keep = (1.0 - decay).clamp(0.0, 1.0);
        let (front, back) = self.split();
        back.copy_faded_from(front, keep);
        for seg in segments {
            draw_segment(back, seg);
        }
        self.front ^= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn bar(y: f32) -> LineSegment {
        LineSegment::new(Vec2::new(0.0, y), Vec2::new(16.0, y), 2.0, 0xffffff, 1.0)
    }

    #[test]
    fn paint_accumulates_without_decay() {
        let mut trail = SoftwareTrail::new(16, 16).unwrap();
        trail.paint(&[bar(2.0)], 0.0);
        trail.paint(&[bar(10.0)], 0.0);
        assert_eq!(trail.front().get(4, 2), Some([1.0; 4]));
        assert_eq!(trail.front().get(4, 10), Some([1.0; 4]));
        assert_eq!(trail.front().get(4, 6), Some([0.0; 4]));
    }

    #[test]
    fn empty_frames_keep_the_trail() {
        let mut trail = SoftwareTrail::new(8, 8).unwrap();
        trail.paint(&[bar(4.0)], 0.0);
        let before = trail.front().clone();
        trail.paint(&[], 0.0);
        trail.paint(&[], 0.0);
        assert_eq!(trail.front(), &before);
    }

    #[test]
    fn decay_fades_each_frame() {
        let mut trail = SoftwareTrail::new(8, 8).unwrap();
        trail.paint(&[bar(4.0)], 0.5);
        trail.paint(&[], 0.5);
        assert_eq!(trail.front().get(1, 4), Some([0.5; 4]));
        trail.paint(&[], 0.5);
        assert_eq!(trail.front().get(1, 4), Some([0.25; 4]));
    }

    #[test]
    fn full_decay_leaves_only_the_current_frame() {
        let mut trail = SoftwareTrail::new(8, 8).unwrap();
        trail.paint(&[bar(1.0)], 1.0);
        trail.paint(&[bar(6.0)], 1.0);
        assert_eq!(trail.front().get(3, 1), Some([0.0; 4]));
        assert_eq!(trail.front().get(3, 6), Some([1.0; 4]));
    }

    #[test]
    fn clear_blanks_both_surfaces() {
        let mut trail = SoftwareTrail::new(8, 8).unwrap();
        trail.paint(&[bar(2.0)], 0.0);
        trail.paint(&[bar(5.0)], 0.0);
        trail.clear();
        trail.paint(&[], 0.0);
        assert!(trail.front().texels().iter().all(|t| t[3] == 0.0));
    }

    #[test]
    fn resize_keeps_paint_at_origin_and_exposes_transparent_area() {
        let mut trail = SoftwareTrail::new(800, 600).unwrap();
        trail.paint(&[bar(100.0)], 0.0);
        trail.resize(1200, 600).unwrap();
        assert_eq!(trail.size(), (1200, 600));
        assert_eq!(trail.front().get(8, 100), Some([1.0; 4]));
        assert_eq!(trail.front().get(1000, 100), Some([0.0; 4]));

        // The next frame still reads the preserved trail.
        trail.paint(&[], 0.0);
        assert_eq!(trail.front().get(8, 100), Some([1.0; 4]));
    }

    #[test]
    fn paint_realigns_a_back_surface_of_another_size() {
        let mut trail = SoftwareTrail::new(8, 8).unwrap();
        trail.paint(&[bar(4.0)], 0.0);
        let back = trail.front ^ 1;
        trail.surfaces[back] = Surface::new(3, 3).unwrap();

        trail.paint(&[], 0.5);
        assert_eq!(trail.size(), (8, 8));
        assert_eq!(trail.front().texels().len(), 64);
        assert_eq!(trail.front().get(6, 4), Some([0.5; 4]));
    }

    #[test]
    fn resize_to_zero_fails_and_keeps_state() {
        let mut trail = SoftwareTrail::new(8, 8).unwrap();
        assert!(matches!(trail.resize(0, 8), Err(TrailError::InvalidDimensions)));
        assert_eq!(trail.size(), (8, 8));
    }
}
