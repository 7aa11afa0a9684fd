//! The transient line segment handed from the stepper to a trail renderer.

use glam::Vec2;

/// One brush stroke: an agent's displacement since it was last painted.
///
/// Segments live for a single frame; renderers consume them immediately.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
    /// Full stroke width in pixels.
    pub width: f32,
    /// Packed `0xRRGGBB`.
    pub color: u32,
    pub alpha: f32,
}

impl LineSegment {
    pub fn new(from: Vec2, to: Vec2, width: f32, color: u32, alpha: f32) -> Self {
        Self {
            x0: from.x,
            y0: from.y,
            x1: to.x,
            y1: to.y,
            width,
            color,
            alpha,
        }
    }

    pub fn start(&self) -> Vec2 {
        Vec2::new(self.x0, self.y0)
    }

    pub fn end(&self) -> Vec2 {
        Vec2::new(self.x1, self.y1)
    }

    pub fn length(&self) -> f32 {
        self.start().distance(self.end())
    }

    /// Color as normalized `[r, g, b]`.
    pub fn rgb(&self) -> [f32; 3] {
        [
            ((self.color >> 16) & 0xff) as f32 / 255.0,
            ((self.color >> 8) & 0xff) as f32 / 255.0,
            (self.color & 0xff) as f32 / 255.0,
        ]
    }
}
