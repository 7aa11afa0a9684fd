//! Front/back pairing for the two trail surfaces.
//!
//! `PingPong` is the pure index bookkeeping; `SurfacePair` owns the two
//! render targets and only hands out the front as a read source and the
//! back as a draw target, so one surface is never both within a frame.

use super::target::RenderTarget;

/// Index of the current front (read) and back (write) buffer.
/// `front_index() + back_index() == 1` always holds.
#[derive(Debug, Default)]
pub struct PingPong {
    current: usize,
}

impl PingPong {
    pub fn new() -> Self {
        Self { current: 0 }
    }

    pub fn front_index(&self) -> usize {
        self.current
    }

    pub fn back_index(&self) -> usize {
        1 - self.current
    }

    pub fn swap(&mut self) {
        self.current = 1 - self.current;
    }
}

/// Two equally sized trail surfaces with an explicit swap.
pub struct SurfacePair {
    targets: [RenderTarget; 2],
    index: PingPong,
}

impl SurfacePair {
    /// Creates and clears both surfaces.
    pub fn new(gl: &glow::Context, width: u32, height: u32, format: u32) -> Result<Self, String> {
        let a = RenderTarget::new(gl, width, height, format)?;
        let b = match RenderTarget::new(gl, width, height, format) {
            Ok(b) => b,
            Err(e) => {
                a.destroy(gl);
                return Err(e);
            }
        };
        a.clear(gl);
        b.clear(gl);
        Ok(Self {
            targets: [a, b],
            index: PingPong::new(),
        })
    }

    /// Texture of the surface the host should display and the copy pass reads.
    pub fn front_texture(&self) -> glow::Texture {
        self.targets[self.index.front_index()].texture()
    }

    /// Binds the back surface as draw target.
    pub fn bind_back(&self, gl: &glow::Context) {
        self.targets[self.index.back_index()].bind(gl);
    }

    pub fn swap(&mut self) {
        self.index.swap();
    }

    pub fn size(&self) -> (u32, u32) {
        let front = &self.targets[self.index.front_index()];
        (front.width(), front.height())
    }

    pub fn clear(&self, gl: &glow::Context) {
        for target in &self.targets {
            target.clear(gl);
        }
    }

    /// Resizes both surfaces, carrying the front's content over. The back is
    /// overwritten by the next copy pass, so it is replaced by a cleared one.
    ///
    /// Both new targets exist before either is swapped in: on error the pair
    /// keeps its old size and content.
    pub fn resize(&mut self, gl: &glow::Context, width: u32, height: u32) -> Result<(), String> {
        let front = self.index.front_index();
        let back = self.index.back_index();

        let fresh = RenderTarget::new(gl, width, height, self.targets[back].internal_format())?;
        fresh.clear(gl);
        if let Err(e) = self.targets[front].resize_preserving(gl, width, height) {
            fresh.destroy(gl);
            return Err(e);
        }
        let old = std::mem::replace(&mut self.targets[back], fresh);
        old.destroy(gl);
        Ok(())
    }

    pub fn destroy(self, gl: &glow::Context) {
        let [a, b] = self.targets;
        a.destroy(gl);
        b.destroy(gl);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_front_zero_back_one() {
        let pp = PingPong::new();
        assert_eq!(pp.front_index(), 0);
        assert_eq!(pp.back_index(), 1);
    }

    #[test]
    fn swap_flips_front_and_back() {
        let mut pp = PingPong::new();
        pp.swap();
        assert_eq!(pp.front_index(), 1);
        assert_eq!(pp.back_index(), 0);
        pp.swap();
        assert_eq!(pp.front_index(), 0);
    }

    #[test]
    fn front_and_back_never_coincide() {
        let mut pp = PingPong::new();
        for i in 0..101 {
            assert_ne!(pp.front_index(), pp.back_index(), "aliased at swap {i}");
            assert_eq!(pp.front_index() + pp.back_index(), 1);
            pp.swap();
        }
        assert_eq!(pp.front_index(), 1, "odd swap count leaves front at 1");
    }

    #[test]
    fn resize_reports_failure_to_the_caller() {
        fn _assert_api(pair: &mut SurfacePair, gl: &glow::Context) -> Result<(), String> {
            pair.resize(gl, 1200, 600)?;
            let (_w, _h) = pair.size();
            Ok(())
        }
    }

    #[test]
    #[ignore = "requires GL context"]
    fn failed_resize_keeps_both_surfaces_at_old_size() {
        // Would test: resize past GL_MAX_TEXTURE_SIZE so allocation fails;
        // size() still reports the old extent, both targets share it, and a
        // following paint copies front into back without a size mismatch.
    }

    #[test]
    #[ignore = "requires GL context"]
    fn resize_carries_front_content() {
        // Would test: after SurfacePair::resize the front texture still holds
        // previously painted texels at their coordinates.
    }
}
