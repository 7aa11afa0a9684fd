//! The host's GL context plus the limits the trail pipeline depends on.
//!
//! Trail surfaces accumulate thousands of low-alpha strokes, so they are
//! stored as RGBA16F when the driver can render to half floats and RGBA8
//! otherwise. Both limits are read once when the context is adopted.

use super::error::RenderError;

/// Smallest `GL_MAX_TEXTURE_SIZE` an ES 3.0 driver may report.
const ES3_MIN_TEXTURE_SIZE: u32 = 2048;

/// Owns the `glow::Context` for the lifetime of a trail renderer.
pub struct GpuContext {
    gl: glow::Context,
    trail_format: u32,
    max_surface_size: u32,
}

impl GpuContext {
    /// Adopts the host's context and reads its surface limits.
    #[allow(unsafe_code)]
    pub fn new(gl: glow::Context) -> Self {
        use glow::HasContext;

        let extensions = gl.supported_extensions();
        let half_float = extensions.contains("EXT_color_buffer_float")
            || extensions.contains("GL_EXT_color_buffer_float")
            || extensions.contains("EXT_color_buffer_half_float");
        let trail_format = if half_float {
            glow::RGBA16F
        } else {
            glow::RGBA8
        };
        // SAFETY: a plain integer query on a live context.
        let reported = unsafe { gl.get_parameter_i32(glow::MAX_TEXTURE_SIZE) };
        let max_surface_size = u32::try_from(reported)
            .ok()
            .filter(|&n| n > 0)
            .unwrap_or(ES3_MIN_TEXTURE_SIZE);

        tracing::debug!(half_float, max_surface_size, "gl context adopted");

        Self {
            gl,
            trail_format,
            max_surface_size,
        }
    }

    pub fn gl(&self) -> &glow::Context {
        &self.gl
    }

    /// Hands the context back to the host.
    pub fn into_gl(self) -> glow::Context {
        self.gl
    }

    /// Internal format of both trail surfaces.
    pub fn trail_format(&self) -> u32 {
        self.trail_format
    }

    pub fn max_surface_size(&self) -> u32 {
        self.max_surface_size
    }

    /// The surface size to allocate for a requested canvas size.
    pub fn surface_size(&self, width: u32, height: u32) -> Result<(u32, u32), RenderError> {
        fit_surface(width, height, self.max_surface_size)
    }
}

/// Zero extents become 1 px (a minimised canvas still needs a surface);
/// anything past the driver limit is rejected.
fn fit_surface(width: u32, height: u32, max: u32) -> Result<(u32, u32), RenderError> {
    let (w, h) = (width.max(1), height.max(1));
    if w > max || h > max {
        return Err(RenderError::Gl(format!(
            "surface {w}x{h} exceeds max texture size {max}"
        )));
    }
    Ok((w, h))
}
