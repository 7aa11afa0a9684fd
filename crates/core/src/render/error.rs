use thiserror::Error;

use super::shader::ShaderError;

/// Failure while creating or resizing GPU trail resources.
#[derive(Debug, Clone, Error)]
pub enum RenderError {
    #[error(transparent)]
    Shader(#[from] ShaderError),
    /// A GL object could not be created, or a framebuffer was incomplete.
    #[error("gl: {0}")]
    Gl(String),
}

impl From<String> for RenderError {
    fn from(msg: String) -> Self {
        RenderError::Gl(msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gl_strings_convert_with_prefix() {
        let err: RenderError = String::from("framebuffer incomplete").into();
        assert_eq!(err.to_string(), "gl: framebuffer incomplete");
    }

    #[test]
    fn shader_errors_pass_through() {
        let err: RenderError = ShaderError::LinkError("bad varying".into()).into();
        assert!(err.to_string().contains("bad varying"));
    }
}
