use crate::api::{GraphicsApi, ObjectKind, ShaderStage};
use crate::error::{GlError, Result};

use super::{GlObject, Handle, Lifecycle};

/// Where a shader is in its one-way lifecycle.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderState {
    Unallocated,
    Created,
    Compiled,
    Deleted,
}

/// Shader source for one stage.
///
/// `Unallocated → Created → Compiled → Deleted`. Compilation happens once;
/// a failed compile leaves the shader `Created`. A deleted shader cannot be
/// brought back.
#[derive(Debug)]
pub struct Shader {
    life: Lifecycle,
    stage: ShaderStage,
    source: String,
    state: ShaderState,
}

impl Shader {
    pub fn new(stage: ShaderStage, source: impl Into<String>) -> Self {
        Self {
            life: Lifecycle::new(ObjectKind::Shader(stage)),
            stage,
            source: source.into(),
            state: ShaderState::Unallocated,
        }
    }

    #[inline]
    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    #[inline]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[inline]
    pub fn state(&self) -> ShaderState {
        self.state
    }

    #[inline]
    pub fn is_compiled(&self) -> bool {
        self.state == ShaderState::Compiled
    }

    /// Uploads the source and compiles it.
    ///
    /// On failure the driver log is returned verbatim inside
    /// [`GlError::ShaderCompilation`] and the shader stays `Created`.
    pub fn compile(&mut self, gl: &mut dyn GraphicsApi) -> Result<()> {
        let handle = match self.state {
            ShaderState::Created => self.life.require("compile")?,
            ShaderState::Unallocated => {
                return Err(GlError::invalid_state("shader", "cannot compile before create"));
            }
            ShaderState::Compiled => {
                return Err(GlError::invalid_state("shader", "already compiled"));
            }
            ShaderState::Deleted => {
                return Err(GlError::invalid_state("shader", "cannot compile a deleted shader"));
            }
        };

        gl.shader_source(handle, &self.source);
        let status = gl.compile_shader(handle);
        if !status.success {
            return Err(GlError::ShaderCompilation { stage: self.stage, log: status.log });
        }

        self.state = ShaderState::Compiled;
        log::debug!("compiled {} shader {}", self.stage.name(), self.life.handle());
        Ok(())
    }
}

impl GlObject for Shader {
    fn handle(&self) -> Handle {
        self.life.handle()
    }

    fn is_valid(&self) -> bool {
        self.life.is_live() && self.is_compiled()
    }

    fn create(&mut self, gl: &mut dyn GraphicsApi) -> Result<()> {
        if self.state == ShaderState::Deleted {
            return Err(GlError::invalid_state("shader", "a deleted shader cannot be recreated"));
        }
        self.life.create(gl)?;
        self.state = ShaderState::Created;
        Ok(())
    }

    /// The driver may keep the object alive while it is attached to a
    /// program; the handle reads 0 here either way.
    fn delete(&mut self, gl: &mut dyn GraphicsApi) {
        if self.life.delete(gl) {
            self.state = ShaderState::Deleted;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessGl;

    const VALID: &str = "#version 450\nuniform vec4 tint;\nvoid main() {}\n";

    fn created(gl: &mut HeadlessGl, source: &str) -> Shader {
        let mut shader = Shader::new(ShaderStage::Fragment, source);
        shader.create(gl).unwrap();
        shader
    }

    #[test]
    fn compile_transitions_once() {
        let mut gl = HeadlessGl::default();
        let mut shader = created(&mut gl, VALID);
        assert_eq!(shader.state(), ShaderState::Created);
        assert!(!shader.is_valid());

        shader.compile(&mut gl).unwrap();
        assert_eq!(shader.state(), ShaderState::Compiled);
        assert!(shader.is_valid());

        let again = shader.compile(&mut gl).unwrap_err();
        assert!(matches!(again, GlError::InvalidState { .. }));
    }

    #[test]
    fn failed_compile_keeps_created_and_reports_log() {
        let mut gl = HeadlessGl::default();
        let mut shader = created(&mut gl, "void main() { vec3 x = ; ");
        let err = shader.compile(&mut gl).unwrap_err();

        let GlError::ShaderCompilation { stage, log } = &err else {
            panic!("unexpected error: {err}");
        };
        assert_eq!(*stage, ShaderStage::Fragment);
        assert!(!log.is_empty());
        assert!(err.to_string().starts_with("fragment shader compilation failed."));
        assert_eq!(shader.state(), ShaderState::Created);
        assert!(!shader.is_valid());
    }

    #[test]
    fn compile_requires_create() {
        let mut gl = HeadlessGl::default();
        let mut shader = Shader::new(ShaderStage::Vertex, VALID);
        assert!(matches!(shader.compile(&mut gl), Err(GlError::InvalidState { .. })));
        assert!(gl.calls().is_empty());
    }

    #[test]
    fn deleted_is_terminal() {
        let mut gl = HeadlessGl::default();
        let mut shader = created(&mut gl, VALID);
        shader.compile(&mut gl).unwrap();
        shader.delete(&mut gl);
        shader.delete(&mut gl);
        assert_eq!(shader.state(), ShaderState::Deleted);
        assert!(shader.handle().is_none());

        assert!(matches!(shader.compile(&mut gl), Err(GlError::InvalidState { .. })));
        assert!(matches!(shader.create(&mut gl), Err(GlError::InvalidState { .. })));
    }
}
