//! CPU trail surface: premultiplied RGBA in `f32`, row-major, row 0 at the
//! top of the canvas.

use trailfield_core::error::TrailError;

/// One premultiplied RGBA texel.
pub type Texel = [f32; 4];

pub const TRANSPARENT: Texel = [0.0; 4];

#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    width: u32,
    height: u32,
    data: Vec<Texel>,
}

impl Surface {
    /// A fully transparent surface. Both dimensions must be non-zero.
    pub fn new(width: u32, height: u32) -> Result<Self, TrailError> {
        if width == 0 || height == 0 {
            return Err(TrailError::InvalidDimensions);
        }
        let len = (width as usize)
            .checked_mul(height as usize)
            .ok_or(TrailError::InvalidDimensions)?;
        Ok(Self {
            width,
            height,
            data: vec![TRANSPARENT; len],
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn texels(&self) -> &[Texel] {
        &self.data
    }

    /// The texel at `(x, y)`, or `None` outside the surface.
    pub fn get(&self, x: u32, y: u32) -> Option<Texel> {
        (x < self.width && y < self.height).then(|| self.data[self.index(x, y)])
    }

    pub fn set(&mut self, x: u32, y: u32, texel: Texel) {
        if x < self.width && y < self.height {
            let i = self.index(x, y);
            self.data[i] = texel;
        }
    }

    pub fn clear(&mut self) {
        self.data.fill(TRANSPARENT);
    }

    /// Source-over of a straight-alpha color onto the texel at `(x, y)`.
    pub fn blend(&mut self, x: u32, y: u32, rgb: [f32; 3], alpha: f32) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = self.index(x, y);
        let dst = &mut self.data[i];
        let keep = 1.0 - alpha;
        for c in 0..3 {
            dst[c] = rgb[c] * alpha + dst[c] * keep;
        }
        dst[3] = alpha + dst[3] * keep;
    }

    /// Overwrites `self` with `src` scaled by `keep` in every channel,
    /// taking on `src`'s size.
    pub fn copy_faded_from(&mut self, src: &Surface, keep: f32) {
        if (self.width, self.height) != (src.width, src.height) {
            self.width = src.width;
            self.height = src.height;
            self.data.resize(src.data.len(), TRANSPARENT);
        }
        for (dst, s) in self.data.iter_mut().zip(&src.data) {
            *dst = s.map(|c| c * keep);
        }
    }

    /// A new surface of the given size holding this one's content at the
    /// origin; anything outside the overlap is transparent.
    pub fn resized(&self, width: u32, height: u32) -> Result<Surface, TrailError> {
        let mut next = Surface::new(width, height)?;
        let copy_w = self.width.min(width) as usize;
        for y in 0..self.height.min(height) {
            let src = self.index(0, y);
            let dst = next.index(0, y);
            next.data[dst..dst + copy_w].copy_from_slice(&self.data[src..src + copy_w]);
        }
        Ok(next)
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}
