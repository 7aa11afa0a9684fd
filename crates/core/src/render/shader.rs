//! Shader compilation and linking.

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ShaderError {
    /// A shader stage failed to compile.
    #[error("shader compile error ({stage}):\n{log}")]
    CompileError { stage: String, log: String },
    /// A program failed to link.
    #[error("shader link error:\n{0}")]
    LinkError(String),
}

/// Prefixes each source line with a right-aligned line number and appends
/// the driver log, so log line references can be matched by eye.
pub fn format_shader_error(source: &str, log: &str) -> String {
    let lines: Vec<&str> = source.lines().collect();
    let width = lines.len().max(1).to_string().len();
    let numbered = lines
        .iter()
        .enumerate()
        .map(|(i, line)| format!("{:>width$}: {line}", i + 1))
        .collect::<Vec<_>>()
        .join("\n");

    match (numbered.is_empty(), log.is_empty()) {
        (true, _) => log.to_string(),
        (false, true) => numbered,
        (false, false) => format!("{numbered}\n\n{log}"),
    }
}

fn stage_name(shader_type: u32) -> &'static str {
    match shader_type {
        glow::VERTEX_SHADER => "vertex",
        glow::FRAGMENT_SHADER => "fragment",
        _ => "unknown",
    }
}

/// Compiles one shader stage.
#[allow(unsafe_code)]
pub fn compile_shader(
    gl: &glow::Context,
    shader_type: u32,
    source: &str,
) -> Result<glow::Shader, ShaderError> {
    use glow::HasContext;

    let stage = stage_name(shader_type);
    // SAFETY: `shader_type` is a GL stage enum; the shader is deleted on failure.
    unsafe {
        let shader = gl
            .create_shader(shader_type)
            .map_err(|log| ShaderError::CompileError {
                stage: stage.to_string(),
                log,
            })?;
        gl.shader_source(shader, source);
        gl.compile_shader(shader);
        if gl.get_shader_compile_status(shader) {
            return Ok(shader);
        }
        let log = gl.get_shader_info_log(shader);
        gl.delete_shader(shader);
        Err(ShaderError::CompileError {
            stage: stage.to_string(),
            log: format_shader_error(source, &log),
        })
    }
}

/// Compiles both stages and links them. Stage objects are always released;
/// the program keeps what it needs.
#[allow(unsafe_code)]
pub fn compile_program(
    gl: &glow::Context,
    vertex_src: &str,
    fragment_src: &str,
) -> Result<glow::Program, ShaderError> {
    use glow::HasContext;

    let vert = compile_shader(gl, glow::VERTEX_SHADER, vertex_src)?;
    let frag = match compile_shader(gl, glow::FRAGMENT_SHADER, fragment_src) {
        Ok(f) => f,
        Err(e) => {
            // SAFETY: `vert` is a live shader from the call above.
            unsafe { gl.delete_shader(vert) };
            return Err(e);
        }
    };

    // SAFETY: all handles are live objects of this context; every one is
    // detached or deleted before returning.
    let result = unsafe {
        match gl.create_program() {
            Ok(program) => {
                gl.attach_shader(program, vert);
                gl.attach_shader(program, frag);
                gl.link_program(program);
                gl.detach_shader(program, vert);
                gl.detach_shader(program, frag);
                if gl.get_program_link_status(program) {
                    Ok(program)
                } else {
                    let log = gl.get_program_info_log(program);
                    gl.delete_program(program);
                    Err(ShaderError::LinkError(log))
                }
            }
            Err(log) => Err(ShaderError::LinkError(log)),
        }
    };

    // SAFETY: stage objects are no longer attached to anything.
    unsafe {
        gl.delete_shader(vert);
        gl.delete_shader(frag);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_shader_error_numbers_lines_and_appends_log() {
        let formatted = format_shader_error("#version 300 es\nvoid main() {\n}", "ERROR: 0:2");
        assert!(formatted.contains("1: #version 300 es"), "got:\n{formatted}");
        assert!(formatted.contains("2: void main() {"), "got:\n{formatted}");
        assert!(formatted.ends_with("ERROR: 0:2"), "got:\n{formatted}");
    }

    #[test]
    fn format_shader_error_right_aligns_numbers() {
        let source = (1..=12)
            .map(|i| format!("line {i}"))
            .collect::<Vec<_>>()
            .join("\n");
        let formatted = format_shader_error(&source, "");
        let lines: Vec<&str> = formatted.lines().collect();
        assert!(lines[0].starts_with(" 1: "), "got '{}'", lines[0]);
        assert!(lines[11].starts_with("12: "), "got '{}'", lines[11]);
    }

    #[test]
    fn format_shader_error_handles_empty_inputs() {
        assert_eq!(format_shader_error("", ""), "");
        assert_eq!(format_shader_error("", "boom"), "boom");
    }

    #[test]
    fn compile_error_display_names_stage() {
        let msg = ShaderError::CompileError {
            stage: "vertex".into(),
            log: "undeclared identifier".into(),
        }
        .to_string();
        assert!(msg.contains("vertex") && msg.contains("undeclared identifier"));
    }

    #[test]
    fn stage_names() {
        assert_eq!(stage_name(glow::VERTEX_SHADER), "vertex");
        assert_eq!(stage_name(glow::FRAGMENT_SHADER), "fragment");
    }
}
