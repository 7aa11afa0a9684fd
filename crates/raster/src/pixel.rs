//! Conversion of a trail [`Surface`] into displayable RGBA8.
//!
//! Always available (no feature gate) so hosts without `image` can still
//! upload the composited buffer themselves.

use trailfield_core::color::Srgb;

use crate::surface::Surface;

/// Composites the premultiplied surface over an opaque background:
/// `out = rgb + background * (1 - a)`. The buffer is `width * height * 4`
/// bytes, top row first, alpha always 255.
pub fn composite_rgba8(surface: &Surface, background: Srgb) -> Vec<u8> {
    let bg = [background.r as f32, background.g as f32, background.b as f32];
    surface
        .texels()
        .iter()
        .flat_map(|t| {
            let cover = 1.0 - t[3].clamp(0.0, 1.0);
            let [r, g, b] = [0, 1, 2].map(|c| to_byte(t[c] + bg[c] * cover));
            [r, g, b, 255u8]
        })
        .collect()
}

fn to_byte(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}
