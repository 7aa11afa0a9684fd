//! Fullscreen-triangle passes: the fading ping-pong copy and presentation.
//!
//! Both passes draw three vertices generated from `gl_VertexID` with an
//! empty VAO bound (`draw_arrays(TRIANGLES, 0, 3)`); the oversized triangle
//! is clipped to the viewport.

/// GLSL ES 3.0 vertex shader for a fullscreen triangle with `v_uv` in `[0, 1]`
/// over the viewport.
pub const FULLSCREEN_VERTEX_SHADER: &str = r#"#version 300 es
out vec2 v_uv;
void main() {
    v_uv = vec2((gl_VertexID << 1) & 2, gl_VertexID & 2);
    gl_Position = vec4(v_uv * 2.0 - 1.0, 0.0, 1.0);
}
"#;

/// Copies the front surface into the bound back surface, scaling every
/// premultiplied channel by `u_keep` (`1 - decay`). Blending must be off.
pub const FADE_FRAGMENT_SHADER: &str = r#"#version 300 es
precision highp float;
in vec2 v_uv;
uniform sampler2D u_front;
uniform float u_keep;
out vec4 frag_color;
void main() {
    frag_color = texture(u_front, v_uv) * u_keep;
}
"#;

/// Composites the front surface over an opaque background. Surfaces store
/// canvas row 0 at texel row 0, so `v` is flipped for the window.
pub const PRESENT_FRAGMENT_SHADER: &str = r#"#version 300 es
precision highp float;
in vec2 v_uv;
uniform sampler2D u_front;
uniform vec3 u_background;
out vec4 frag_color;
void main() {
    vec4 trail = texture(u_front, vec2(v_uv.x, 1.0 - v_uv.y));
    frag_color = vec4(trail.rgb + u_background * (1.0 - trail.a), 1.0);
}
"#;
