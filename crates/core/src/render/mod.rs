//! OpenGL ES 3 / WebGL2 trail pipeline.
//!
//! Only available with the `render` feature.
//!
//! - [`context`] -- GPU context wrapper and trail surface format choice.
//! - [`shader`] -- Shader compilation, linking, and error formatting.
//! - [`target`] -- FBO render targets backing each trail surface.
//! - [`ping_pong`] -- The owned front/back surface pair.
//! - [`fullscreen`] -- Fade-copy and present passes.
//! - [`line_batch`] -- Single-draw-call thick line mesh.
//! - [`trail`] -- [`GlTrailRenderer`], the GPU [`crate::TrailSink`].

pub mod context;
pub mod error;
pub mod fullscreen;
pub mod line_batch;
pub mod ping_pong;
pub mod shader;
pub mod target;
pub mod trail;

pub use context::GpuContext;
pub use error::RenderError;
pub use line_batch::{GlLineMesh, LineBatch, LineVertex, DEFAULT_SEGMENT_CAPACITY};
pub use ping_pong::{PingPong, SurfacePair};
pub use shader::{compile_program, compile_shader, format_shader_error, ShaderError};
pub use target::RenderTarget;
pub use trail::GlTrailRenderer;
