//! Batched thick-line mesh: every segment of a frame in one draw call.
//!
//! Each segment becomes a quad of four vertices. Both endpoints are stored on
//! every vertex (`pos` and `other`), and the vertex shader pushes the vertex
//! out along the segment normal by half the stroke width, so extrusion
//! happens in screen space and needs no CPU trigonometry.
//!
//! [`LineBatch`] is the CPU side: a fixed-capacity vertex array and an index
//! array built once. [`GlLineMesh`] mirrors it in GL buffers that are
//! allocated once and refilled by sub-range every frame.

use bytemuck::{Pod, Zeroable};

use super::error::RenderError;
use super::shader::compile_program;
use crate::segment::LineSegment;

/// Segments one batch holds before a frame is split across several draws.
pub const DEFAULT_SEGMENT_CAPACITY: usize = 20_000;

const VERTICES_PER_SEGMENT: usize = 4;
const INDICES_PER_SEGMENT: usize = 6;

/// Extrusion side of the four quad corners. The `q` end sees the segment
/// reversed, which flips its normal, so its sides are mirrored.
const SIDES: [f32; VERTICES_PER_SEGMENT] = [-1.0, 1.0, 1.0, -1.0];

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    /// This corner's endpoint, in canvas pixels.
    pub pos: [f32; 2],
    /// The opposite endpoint.
    pub other: [f32; 2],
    pub side: f32,
    /// Full stroke width in pixels.
    pub width: f32,
    /// Straight (non-premultiplied) RGBA.
    pub color: [f32; 4],
}

/// Byte stride of [`LineVertex`], as GL sees it.
pub const LINE_VERTEX_STRIDE: usize = std::mem::size_of::<LineVertex>();

pub const LINE_VERTEX_SHADER: &str = r#"#version 300 es
layout(location = 0) in vec2 a_pos;
layout(location = 1) in vec2 a_other;
layout(location = 2) in float a_side;
layout(location = 3) in float a_width;
layout(location = 4) in vec4 a_color;
uniform vec2 u_viewport;
out vec4 v_color;
void main() {
    vec2 d = a_other - a_pos;
    float len = length(d);
    vec2 dir = len > 1e-6 ? d / len : vec2(1.0, 0.0);
    vec2 normal = vec2(-dir.y, dir.x);
    vec2 px = a_pos + normal * a_width * 0.5 * a_side;
    v_color = a_color;
    gl_Position = vec4(px / u_viewport * 2.0 - 1.0, 0.0, 1.0);
}
"#;

pub const LINE_FRAGMENT_SHADER: &str = r#"#version 300 es
precision highp float;
in vec4 v_color;
out vec4 frag_color;
void main() {
    frag_color = v_color;
}
"#;

/// CPU staging for one draw call's worth of segments.
#[derive(Debug, Clone)]
pub struct LineBatch {
    capacity: usize,
    vertices: Vec<LineVertex>,
    indices: Vec<u32>,
    len: usize,
}

impl LineBatch {
    /// Allocates room for `capacity` segments (at least one). Nothing is
    /// reallocated afterwards.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let mut indices = Vec::with_capacity(capacity * INDICES_PER_SEGMENT);
        for s in 0..capacity as u32 {
            let base = s * VERTICES_PER_SEGMENT as u32;
            indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 1, base + 3]);
        }
        Self {
            capacity,
            vertices: vec![LineVertex::zeroed(); capacity * VERTICES_PER_SEGMENT],
            indices,
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Segments written by the last [`LineBatch::fill`].
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Writes up to `capacity` segments over the front of the vertex array
    /// and returns how many were taken. Stale vertices past that point are
    /// left in place and never drawn.
    pub fn fill(&mut self, segments: &[LineSegment]) -> usize {
        let n = segments.len().min(self.capacity);
        for (seg, quad) in segments[..n]
            .iter()
            .zip(self.vertices.chunks_exact_mut(VERTICES_PER_SEGMENT))
        {
            let p = [seg.x0, seg.y0];
            let q = [seg.x1, seg.y1];
            let [r, g, b] = seg.rgb();
            let color = [r, g, b, seg.alpha];
            for (i, vertex) in quad.iter_mut().enumerate() {
                let (pos, other) = if i < 2 { (p, q) } else { (q, p) };
                *vertex = LineVertex {
                    pos,
                    other,
                    side: SIDES[i],
                    width: seg.width,
                    color,
                };
            }
        }
        self.len = n;
        n
    }

    /// The vertices in use.
    pub fn vertices(&self) -> &[LineVertex] {
        &self.vertices[..self.len * VERTICES_PER_SEGMENT]
    }

    /// The full index array, valid for any fill.
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Index count to draw for the current fill.
    pub fn index_count(&self) -> usize {
        self.len * INDICES_PER_SEGMENT
    }
}

/// GL buffers and program for [`LineBatch`].
pub struct GlLineMesh {
    batch: LineBatch,
    program: glow::Program,
    viewport_loc: Option<glow::UniformLocation>,
    vao: glow::VertexArray,
    vbo: glow::Buffer,
    ebo: glow::Buffer,
}

impl GlLineMesh {
    /// Compiles the line program and allocates vertex and index buffers for
    /// `capacity` segments. Indices are uploaded here, once.
    #[allow(unsafe_code)]
    pub fn new(gl: &glow::Context, capacity: usize) -> Result<Self, RenderError> {
        use glow::HasContext;

        let batch = LineBatch::new(capacity);
        let program = compile_program(gl, LINE_VERTEX_SHADER, LINE_FRAGMENT_SHADER)?;

        // SAFETY: every handle below is created here and deleted on the error
        // paths; attribute offsets match the `repr(C)` layout of `LineVertex`.
        unsafe {
            let vao = match gl.create_vertex_array() {
                Ok(vao) => vao,
                Err(e) => {
                    gl.delete_program(program);
                    return Err(e.into());
                }
            };
            let buffers = gl
                .create_buffer()
                .and_then(|vbo| gl.create_buffer().map(|ebo| (vbo, ebo)));
            let (vbo, ebo) = match buffers {
                Ok(pair) => pair,
                Err(e) => {
                    gl.delete_vertex_array(vao);
                    gl.delete_program(program);
                    return Err(e.into());
                }
            };

            gl.bind_vertex_array(Some(vao));

            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            gl.buffer_data_size(
                glow::ARRAY_BUFFER,
                (batch.capacity() * VERTICES_PER_SEGMENT * LINE_VERTEX_STRIDE) as i32,
                glow::DYNAMIC_DRAW,
            );
            let stride = LINE_VERTEX_STRIDE as i32;
            for (location, size, offset) in [(0, 2, 0), (1, 2, 8), (2, 1, 16), (3, 1, 20), (4, 4, 24)] {
                gl.enable_vertex_attrib_array(location);
                gl.vertex_attrib_pointer_f32(location, size, glow::FLOAT, false, stride, offset);
            }

            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ebo));
            gl.buffer_data_u8_slice(
                glow::ELEMENT_ARRAY_BUFFER,
                bytemuck::cast_slice(batch.indices()),
                glow::STATIC_DRAW,
            );

            gl.bind_vertex_array(None);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);

            let viewport_loc = gl.get_uniform_location(program, "u_viewport");

            tracing::debug!(capacity = batch.capacity(), "line mesh created");

            Ok(Self {
                batch,
                program,
                viewport_loc,
                vao,
                vbo,
                ebo,
            })
        }
    }

    pub fn capacity(&self) -> usize {
        self.batch.capacity()
    }

    /// Draws `segments` into the bound framebuffer with the current blend
    /// state: one draw call per `capacity` segments, so normally exactly one.
    #[allow(unsafe_code)]
    pub fn draw(&mut self, gl: &glow::Context, segments: &[LineSegment], viewport: (u32, u32)) {
        use glow::HasContext;

        if segments.is_empty() {
            return;
        }

        // SAFETY: all handles are owned by `self`; uploads stay within the
        // buffer allocated in `new` because `fill` never exceeds capacity.
        unsafe {
            gl.use_program(Some(self.program));
            gl.uniform_2_f32(
                self.viewport_loc.as_ref(),
                viewport.0 as f32,
                viewport.1 as f32,
            );
            gl.bind_vertex_array(Some(self.vao));
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(self.vbo));

            for chunk in segments.chunks(self.batch.capacity()) {
                self.batch.fill(chunk);
                gl.buffer_sub_data_u8_slice(
                    glow::ARRAY_BUFFER,
                    0,
                    bytemuck::cast_slice(self.batch.vertices()),
                );
                gl.draw_elements(
                    glow::TRIANGLES,
                    self.batch.index_count() as i32,
                    glow::UNSIGNED_INT,
                    0,
                );
            }

            gl.bind_buffer(glow::ARRAY_BUFFER, None);
            gl.bind_vertex_array(None);
            gl.use_program(None);
        }
    }

    #[allow(unsafe_code)]
    pub fn destroy(self, gl: &glow::Context) {
        use glow::HasContext;

        // SAFETY: handles are owned by `self`, which is consumed.
        unsafe {
            gl.delete_vertex_array(self.vao);
            gl.delete_buffer(self.vbo);
            gl.delete_buffer(self.ebo);
            gl.delete_program(self.program);
        }
    }
}
