//! Thick line segments rasterized as butt-capped rectangles.
//!
//! A pixel is covered when its centre lies inside the rectangle spanned by
//! the segment and its half-width normal, matching the quad the GPU line
//! mesh extrudes. No anti-aliasing.

use glam::Vec2;
use trailfield_core::LineSegment;

use crate::surface::Surface;

/// Segments shorter than this have no direction and are skipped.
const MIN_LENGTH: f32 = 1e-6;

/// Composites `seg` onto `surface` with source-over.
pub fn draw_segment(surface: &mut Surface, seg: &LineSegment) {
    let (p, q) = (seg.start(), seg.end());
    let axis = q - p;
    let len = axis.length();
    let half = seg.width * 0.5;
    if !(len > MIN_LENGTH) || !(half > 0.0) || !(seg.alpha > 0.0) {
        return;
    }
    let dir = axis / len;
    let normal = dir.perp();

    let Some((x0, y0, x1, y1)) = covered_pixels(surface, p, q, normal * half) else {
        return;
    };

    let rgb = seg.rgb();
    let alpha = seg.alpha.min(1.0);
    for y in y0..=y1 {
        for x in x0..=x1 {
            let rel = Vec2::new(x as f32 + 0.5, y as f32 + 0.5) - p;
            let along = rel.dot(dir);
            if along < 0.0 || along > len || rel.dot(normal).abs() > half {
                continue;
            }
            surface.blend(x, y, rgb, alpha);
        }
    }
}

/// Inclusive pixel bounds of the quad, clipped to the surface.
fn covered_pixels(surface: &Surface, p: Vec2, q: Vec2, offset: Vec2) -> Option<(u32, u32, u32, u32)> {
    let corners = [p - offset, p + offset, q - offset, q + offset];
    let min = corners.iter().copied().fold(Vec2::INFINITY, Vec2::min);
    let max = corners.iter().copied().fold(Vec2::NEG_INFINITY, Vec2::max);

    let (w, h) = (surface.width() as f32, surface.height() as f32);
    if max.x < 0.0 || max.y < 0.0 || min.x >= w || min.y >= h {
        return None;
    }
    let x0 = min.x.max(0.0).floor() as u32;
    let y0 = min.y.max(0.0).floor() as u32;
    let x1 = (max.x.min(w - 1.0)).floor() as u32;
    let y1 = (max.y.min(h - 1.0)).floor() as u32;
    Some((x0, y0, x1, y1))
}
