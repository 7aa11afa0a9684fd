//! Off-screen render target (FBO + color texture) used for trail surfaces.
//!
//! Rows are stored in canvas order: texture row `y` holds canvas row `y`
//! (y grows downward on the canvas). That keeps the canvas origin at texel
//! (0, 0), so a resize can blit old content at the origin unchanged.

pub struct RenderTarget {
    fbo: glow::Framebuffer,
    texture: glow::Texture,
    width: u32,
    height: u32,
    internal_format: u32,
}

impl RenderTarget {
    /// Creates a target with a fresh texture attached as `COLOR_ATTACHMENT0`
    /// and checks framebuffer completeness. Contents are undefined until
    /// [`RenderTarget::clear`].
    #[allow(unsafe_code)]
    pub fn new(
        gl: &glow::Context,
        width: u32,
        height: u32,
        internal_format: u32,
    ) -> Result<Self, String> {
        use glow::HasContext;

        let texture = allocate_color_texture(gl, width, height, internal_format)?;

        // SAFETY: `texture` was just created on this context; the new FBO is
        // deleted together with it on every error path.
        unsafe {
            let fbo = match gl.create_framebuffer() {
                Ok(fbo) => fbo,
                Err(e) => {
                    gl.delete_texture(texture);
                    return Err(e);
                }
            };
            gl.bind_framebuffer(glow::FRAMEBUFFER, Some(fbo));
            gl.framebuffer_texture_2d(
                glow::FRAMEBUFFER,
                glow::COLOR_ATTACHMENT0,
                glow::TEXTURE_2D,
                Some(texture),
                0,
            );
            let status = gl.check_framebuffer_status(glow::FRAMEBUFFER);
            gl.bind_framebuffer(glow::FRAMEBUFFER, None);

            if status != glow::FRAMEBUFFER_COMPLETE {
                gl.delete_framebuffer(fbo);
                gl.delete_texture(texture);
                return Err(format!("framebuffer incomplete: status 0x{status:04X}"));
            }

            Ok(Self {
                fbo,
                texture,
                width,
                height,
                internal_format,
            })
        }
    }

    /// Binds the FBO as draw target with a full-size viewport.
    #[allow(unsafe_code)]
    pub fn bind(&self, gl: &glow::Context) {
        use glow::HasContext;

        // SAFETY: `self.fbo` is a live framebuffer owned by this target.
        unsafe {
            gl.bind_framebuffer(glow::FRAMEBUFFER, Some(self.fbo));
            gl.viewport(0, 0, self.width as i32, self.height as i32);
        }
    }

    /// Fills the whole target with transparent black.
    #[allow(unsafe_code)]
    pub fn clear(&self, gl: &glow::Context) {
        use glow::HasContext;

        self.bind(gl);
        // SAFETY: plain state calls on the bound framebuffer.
        unsafe {
            gl.clear_color(0.0, 0.0, 0.0, 0.0);
            gl.clear(glow::COLOR_BUFFER_BIT);
        }
    }

    pub fn texture(&self) -> glow::Texture {
        self.texture
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn internal_format(&self) -> u32 {
        self.internal_format
    }

    /// Replaces this target with one of the new size, blitting the
    /// overlapping top-left region of the old content into it. Newly exposed
    /// area is transparent. On error the old target is left untouched.
    #[allow(unsafe_code)]
    pub fn resize_preserving(
        &mut self,
        gl: &glow::Context,
        width: u32,
        height: u32,
    ) -> Result<(), String> {
        use glow::HasContext;

        let next = RenderTarget::new(gl, width, height, self.internal_format)?;
        next.clear(gl);

        let copy_w = self.width.min(width) as i32;
        let copy_h = self.height.min(height) as i32;

        // SAFETY: both framebuffers are complete and owned by this module.
        unsafe {
            gl.bind_framebuffer(glow::READ_FRAMEBUFFER, Some(self.fbo));
            gl.bind_framebuffer(glow::DRAW_FRAMEBUFFER, Some(next.fbo));
            gl.blit_framebuffer(
                0,
                0,
                copy_w,
                copy_h,
                0,
                0,
                copy_w,
                copy_h,
                glow::COLOR_BUFFER_BIT,
                glow::NEAREST,
            );
            gl.bind_framebuffer(glow::READ_FRAMEBUFFER, None);
            gl.bind_framebuffer(glow::DRAW_FRAMEBUFFER, None);
        }

        let old = std::mem::replace(self, next);
        old.destroy(gl);

        tracing::debug!(width, height, "render target resized");
        Ok(())
    }

    /// Deletes the framebuffer and texture. Consumes the target so it cannot
    /// be bound afterwards.
    #[allow(unsafe_code)]
    pub fn destroy(self, gl: &glow::Context) {
        use glow::HasContext;

        // SAFETY: both handles are owned by `self`, which is consumed here.
        unsafe {
            gl.delete_framebuffer(self.fbo);
            gl.delete_texture(self.texture);
        }
    }
}

/// Upload type matching a trail surface format.
fn pixel_type(internal_format: u32) -> u32 {
    match internal_format {
        glow::RGBA16F => glow::HALF_FLOAT,
        glow::RGBA32F => glow::FLOAT,
        _ => glow::UNSIGNED_BYTE,
    }
}

/// Uninitialised RGBA storage sampled 1:1 (nearest, clamped).
#[allow(unsafe_code)]
fn allocate_color_texture(
    gl: &glow::Context,
    width: u32,
    height: u32,
    internal_format: u32,
) -> Result<glow::Texture, String> {
    use glow::HasContext;

    // SAFETY: the texture is created on this context and every parameter is
    // a valid enum; the binding is restored before returning.
    unsafe {
        let texture = gl.create_texture()?;
        gl.bind_texture(glow::TEXTURE_2D, Some(texture));
        for (pname, value) in [
            (glow::TEXTURE_WRAP_S, glow::CLAMP_TO_EDGE),
            (glow::TEXTURE_WRAP_T, glow::CLAMP_TO_EDGE),
            (glow::TEXTURE_MIN_FILTER, glow::NEAREST),
            (glow::TEXTURE_MAG_FILTER, glow::NEAREST),
        ] {
            gl.tex_parameter_i32(glow::TEXTURE_2D, pname, value as i32);
        }
        gl.tex_image_2d(
            glow::TEXTURE_2D,
            0,
            internal_format as i32,
            width as i32,
            height as i32,
            0,
            glow::RGBA,
            pixel_type(internal_format),
            glow::PixelUnpackData::Slice(None),
        );
        gl.bind_texture(glow::TEXTURE_2D, None);
        Ok(texture)
    }
}
