//! PNG output of a trail surface.
//!
//! Feature-gated behind `png` (default on) so embedders can skip the
//! `image` crate. Compositing lives in [`crate::pixel`].

use std::path::Path;

use trailfield_core::color::Srgb;
use trailfield_core::error::TrailError;

use crate::pixel::composite_rgba8;
use crate::surface::Surface;

/// Writes `surface` composited over `background` as a PNG.
///
/// Returns `TrailError::Io` on encode or write failure.
pub fn write_png(surface: &Surface, background: Srgb, path: &Path) -> Result<(), TrailError> {
    let rgba = composite_rgba8(surface, background);
    let img = image::RgbaImage::from_raw(surface.width(), surface.height(), rgba)
        .ok_or_else(|| TrailError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path).map_err(|e| TrailError::Io(e.to_string()))?;
    tracing::info!(path = %path.display(), "wrote snapshot");
    Ok(())
}
