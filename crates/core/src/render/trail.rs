//! GPU trail renderer: ping-pong surfaces, fading copy, and the line mesh.
//!
//! Per frame: bind the back surface, copy the front into it scaled by
//! `1 - decay` with blending off, draw the frame's segments over it with
//! source-over blending, then swap. The front surface is only ever read
//! during a frame and the back only written.

use super::context::GpuContext;
use super::error::RenderError;
use super::fullscreen::{FADE_FRAGMENT_SHADER, FULLSCREEN_VERTEX_SHADER, PRESENT_FRAGMENT_SHADER};
use super::line_batch::GlLineMesh;
use super::ping_pong::SurfacePair;
use super::shader::compile_program;
use crate::color::Srgb;
use crate::segment::LineSegment;
use crate::sink::TrailSink;

struct FullscreenPass {
    program: glow::Program,
    front_loc: Option<glow::UniformLocation>,
    extra_loc: Option<glow::UniformLocation>,
}

impl FullscreenPass {
    #[allow(unsafe_code)]
    fn new(gl: &glow::Context, fragment: &str, extra_uniform: &str) -> Result<Self, RenderError> {
        use glow::HasContext;

        let program = compile_program(gl, FULLSCREEN_VERTEX_SHADER, fragment)?;
        // SAFETY: `program` was just linked on this context.
        let (front_loc, extra_loc) = unsafe {
            (
                gl.get_uniform_location(program, "u_front"),
                gl.get_uniform_location(program, extra_uniform),
            )
        };
        Ok(Self {
            program,
            front_loc,
            extra_loc,
        })
    }

    /// Binds the program with `front` on texture unit 0.
    #[allow(unsafe_code)]
    fn bind(&self, gl: &glow::Context, front: glow::Texture) {
        use glow::HasContext;

        // SAFETY: program and texture are live objects of this context.
        unsafe {
            gl.use_program(Some(self.program));
            gl.active_texture(glow::TEXTURE0);
            gl.bind_texture(glow::TEXTURE_2D, Some(front));
            gl.uniform_1_i32(self.front_loc.as_ref(), 0);
        }
    }

    #[allow(unsafe_code)]
    fn destroy(self, gl: &glow::Context) {
        use glow::HasContext;

        // SAFETY: the program is owned by this pass, which is consumed.
        unsafe { gl.delete_program(self.program) };
    }
}

/// Owns every GL object of the trail pipeline, and the context itself, so
/// nothing can outlive or be used after [`GlTrailRenderer::destroy`].
pub struct GlTrailRenderer {
    ctx: GpuContext,
    surfaces: SurfacePair,
    fade: FullscreenPass,
    present: FullscreenPass,
    empty_vao: glow::VertexArray,
    lines: GlLineMesh,
}

impl GlTrailRenderer {
    /// Creates both surfaces (cleared), both fullscreen programs and the line
    /// mesh. On failure everything created so far is released.
    #[allow(unsafe_code)]
    pub fn new(
        ctx: GpuContext,
        width: u32,
        height: u32,
        segment_capacity: usize,
    ) -> Result<Self, RenderError> {
        use glow::HasContext;

        let (width, height) = ctx.surface_size(width, height)?;
        let gl = ctx.gl();
        let surfaces = SurfacePair::new(gl, width, height, ctx.trail_format())?;

        let fade = match FullscreenPass::new(gl, FADE_FRAGMENT_SHADER, "u_keep") {
            Ok(p) => p,
            Err(e) => {
                surfaces.destroy(gl);
                return Err(e);
            }
        };
        let present = match FullscreenPass::new(gl, PRESENT_FRAGMENT_SHADER, "u_background") {
            Ok(p) => p,
            Err(e) => {
                fade.destroy(gl);
                surfaces.destroy(gl);
                return Err(e);
            }
        };
        // SAFETY: plain object creation on this context.
        let empty_vao = match unsafe { gl.create_vertex_array() } {
            Ok(vao) => vao,
            Err(e) => {
                present.destroy(gl);
                fade.destroy(gl);
                surfaces.destroy(gl);
                return Err(e.into());
            }
        };
        let lines = match GlLineMesh::new(gl, segment_capacity) {
            Ok(mesh) => mesh,
            Err(e) => {
                // SAFETY: `empty_vao` was created above and is not bound.
                unsafe { gl.delete_vertex_array(empty_vao) };
                present.destroy(gl);
                fade.destroy(gl);
                surfaces.destroy(gl);
                return Err(e);
            }
        };

        tracing::info!(width, height, segment_capacity, "gl trail renderer created");

        Ok(Self {
            ctx,
            surfaces,
            fade,
            present,
            empty_vao,
            lines,
        })
    }

    /// Texture of the front surface, for hosts that composite it themselves.
    /// Valid until the next `paint`, `resize`, or `destroy`.
    pub fn front_texture(&self) -> glow::Texture {
        self.surfaces.front_texture()
    }

    /// Draws the front surface over `background` into the default framebuffer.
    #[allow(unsafe_code)]
    pub fn present(&self, background: Srgb) {
        use glow::HasContext;

        let gl = self.ctx.gl();
        let (w, h) = self.surfaces.size();
        // SAFETY: default framebuffer plus objects owned by `self`.
        unsafe {
            gl.bind_framebuffer(glow::FRAMEBUFFER, None);
            gl.viewport(0, 0, w as i32, h as i32);
            gl.disable(glow::BLEND);
            self.present.bind(gl, self.surfaces.front_texture());
            gl.uniform_3_f32(
                self.present.extra_loc.as_ref(),
                background.r as f32,
                background.g as f32,
                background.b as f32,
            );
            gl.bind_vertex_array(Some(self.empty_vao));
            gl.draw_arrays(glow::TRIANGLES, 0, 3);
            gl.bind_vertex_array(None);
            gl.use_program(None);
        }
    }

    /// Releases both surfaces, programs and mesh buffers, then hands the
    /// context back to the host.
    #[allow(unsafe_code)]
    pub fn destroy(self) -> glow::Context {
        use glow::HasContext;

        let gl = self.ctx.gl();
        self.lines.destroy(gl);
        // SAFETY: the VAO is owned by `self`, which is consumed.
        unsafe { gl.delete_vertex_array(self.empty_vao) };
        self.present.destroy(gl);
        self.fade.destroy(gl);
        self.surfaces.destroy(gl);
        tracing::info!("gl trail renderer destroyed");
        self.ctx.into_gl()
    }
}

impl TrailSink for GlTrailRenderer {
    type Error = RenderError;

    fn size(&self) -> (u32, u32) {
        self.surfaces.size()
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        let (width, height) = self.ctx.surface_size(width, height)?;
        if (width, height) == self.surfaces.size() {
            return Ok(());
        }
        self.surfaces.resize(self.ctx.gl(), width, height)?;
        tracing::info!(width, height, "trail surfaces resized");
        Ok(())
    }

    #[allow(unsafe_code)]
    fn clear(&mut self) {
        use glow::HasContext;

        let gl = self.ctx.gl();
        self.surfaces.clear(gl);
        // SAFETY: unbinding the framebuffer is always valid.
        unsafe { gl.bind_framebuffer(glow::FRAMEBUFFER, None) };
    }

    #[allow(unsafe_code)]
    fn paint(&mut self, segments: &[LineSegment], decay: f32) {
        use glow::HasContext;

        let gl = self.ctx.gl();
        let size = self.surfaces.size();
        let keep = 1.0 - decay.clamp(0.0, 1.0);

        self.surfaces.bind_back(gl);
        // SAFETY: the back surface is bound as target; the front texture is
        // only sampled, never attached, in this frame.
        unsafe {
            gl.disable(glow::BLEND);
            self.fade.bind(gl, self.surfaces.front_texture());
            gl.uniform_1_f32(self.fade.extra_loc.as_ref(), keep);
            gl.bind_vertex_array(Some(self.empty_vao));
            gl.draw_arrays(glow::TRIANGLES, 0, 3);
            gl.bind_vertex_array(None);
            gl.bind_texture(glow::TEXTURE_2D, None);

            gl.enable(glow::BLEND);
            gl.blend_func_separate(
                glow::SRC_ALPHA,
                glow::ONE_MINUS_SRC_ALPHA,
                glow::ONE,
                glow::ONE_MINUS_SRC_ALPHA,
            );
        }

        self.lines.draw(gl, segments, size);

        // SAFETY: state reset only.
        unsafe {
            gl.disable(glow::BLEND);
            gl.bind_framebuffer(glow::FRAMEBUFFER, None);
        }
        self.surfaces.swap();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gl_trail_renderer_is_a_trail_sink() {
        fn _assert_sink<S: TrailSink<Error = RenderError>>() {}
        _assert_sink::<GlTrailRenderer>();
    }

    #[test]
    fn destroy_returns_the_context() {
        fn _assert_api(r: GlTrailRenderer) -> glow::Context {
            let _tex = r.front_texture();
            r.present(Srgb::BLACK);
            r.destroy()
        }
    }

    #[test]
    #[ignore = "requires GL context"]
    fn paint_then_swap_shows_segments_in_front() {
        // Would test: paint one opaque segment, read back the front texture,
        // texels along the segment are the segment color.
    }

    #[test]
    #[ignore = "requires GL context"]
    fn decay_one_erases_previous_frame() {
        // Would test: paint, then paint(&[], 1.0): front is transparent.
    }
}
