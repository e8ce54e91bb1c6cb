use crate::api::{BindTarget, GraphicsApi, ObjectKind, ProgramStages, UniformTarget};
use crate::error::{GlError, Result};
use crate::marshal::{self, DEFAULT_TRANSPOSE, Uniform, WireData};
use crate::types::TypeDescriptor;

use super::{Bindable, GlObject, Handle, Lifecycle, Shader, UniformLocationCache};

/// Linked shader program with a uniform location cache.
///
/// Uniform setters resolve names through the cache and write through the
/// marshalling dispatcher. Matrix setters without a transpose argument use
/// [`DEFAULT_TRANSPOSE`] (`false`, column-major upload).
#[derive(Debug)]
pub struct Program {
    life: Lifecycle,
    separable: bool,
    linked: bool,
    attached: Vec<Handle>,
    stages: ProgramStages,
    uniforms: UniformLocationCache,
}

impl Program {
    /// A standalone program, used through [`Bindable::bind`].
    pub fn new() -> Self {
        Self::with_separable(false)
    }

    /// A program usable as one stage set of a [`ProgramPipeline`](super::ProgramPipeline).
    pub fn separable() -> Self {
        Self::with_separable(true)
    }

    fn with_separable(separable: bool) -> Self {
        Self {
            life: Lifecycle::new(ObjectKind::Program),
            separable,
            linked: false,
            attached: Vec::new(),
            stages: ProgramStages::empty(),
            uniforms: UniformLocationCache::new(),
        }
    }

    #[inline]
    pub fn is_separable(&self) -> bool {
        self.separable
    }

    #[inline]
    pub fn is_linked(&self) -> bool {
        self.linked
    }

    /// Stages of every shader attached since creation.
    #[inline]
    pub fn stages(&self) -> ProgramStages {
        self.stages
    }

    pub fn attached_shaders(&self) -> &[Handle] {
        &self.attached
    }

    pub fn uniform_cache(&self) -> &UniformLocationCache {
        &self.uniforms
    }

    /// Drops every cached location. Call after a relink that may move uniforms.
    pub fn clear_uniform_cache(&mut self) {
        self.uniforms.clear();
    }

    pub fn attach(&mut self, gl: &mut dyn GraphicsApi, shader: &Shader) -> Result<()> {
        let program = self.life.require("attach a shader")?;
        if !shader.is_valid() {
            return Err(GlError::invalid_state("shader", "only compiled shaders can be attached"));
        }
        gl.attach_shader(program, shader.handle().get());
        if !self.attached.contains(&shader.handle()) {
            self.attached.push(shader.handle());
        }
        self.stages |= shader.stage().stage_bit();
        Ok(())
    }

    pub fn detach(&mut self, gl: &mut dyn GraphicsApi, shader: &Shader) -> Result<()> {
        let program = self.life.require("detach a shader")?;
        let handle = shader.handle();
        if handle.is_none() {
            return Err(GlError::invalid_state("shader", "cannot detach: handle is 0"));
        }
        gl.detach_shader(program, handle.get());
        self.attached.retain(|h| *h != handle);
        Ok(())
    }

    /// Links the attached shaders. Relinking is allowed; the uniform cache
    /// is left untouched.
    pub fn link(&mut self, gl: &mut dyn GraphicsApi) -> Result<()> {
        let program = self.life.require("link")?;
        let status = gl.link_program(program);
        self.linked = status.success;
        if !status.success {
            return Err(GlError::ProgramLink { log: status.log });
        }
        log::debug!("linked program {}", self.life.handle());
        Ok(())
    }

    fn require_linked(&self, operation: &str) -> Result<u32> {
        let program = self.life.require(operation)?;
        if !self.linked {
            return Err(GlError::invalid_state("program", format!("cannot {operation}: not linked")));
        }
        Ok(program)
    }

    /// Location of `name`, from the cache or the driver.
    pub fn uniform_location(&mut self, gl: &mut dyn GraphicsApi, name: &str) -> Result<i32> {
        Ok(self.uniform_target(gl, name)?.location)
    }

    fn uniform_target(&mut self, gl: &mut dyn GraphicsApi, name: &str) -> Result<UniformTarget> {
        let program = self.require_linked("look up uniforms")?;
        let location = self
            .uniforms
            .resolve(name, |n| gl.uniform_location(program, n))
            .ok_or_else(|| GlError::UniformNotFound { name: name.to_owned() })?;
        Ok(UniformTarget { program, location })
    }

    // ── typed uniforms ────────────────────────────────────────────────────

    /// Writes one value. Matrices use [`DEFAULT_TRANSPOSE`].
    pub fn set_uniform<U: Uniform>(&mut self, gl: &mut dyn GraphicsApi, name: &str, value: U) -> Result<()> {
        self.set_uniform_array_transposed(gl, name, &[value], DEFAULT_TRANSPOSE)
    }

    pub fn set_uniform_transposed<U: Uniform>(
        &mut self,
        gl: &mut dyn GraphicsApi,
        name: &str,
        value: U,
        transpose: bool,
    ) -> Result<()> {
        self.set_uniform_array_transposed(gl, name, &[value], transpose)
    }

    /// Writes consecutive array elements starting at `name`. Matrices use
    /// [`DEFAULT_TRANSPOSE`].
    pub fn set_uniform_array<U: Uniform>(&mut self, gl: &mut dyn GraphicsApi, name: &str, values: &[U]) -> Result<()> {
        self.set_uniform_array_transposed(gl, name, values, DEFAULT_TRANSPOSE)
    }

    pub fn set_uniform_array_transposed<U: Uniform>(
        &mut self,
        gl: &mut dyn GraphicsApi,
        name: &str,
        values: &[U],
        transpose: bool,
    ) -> Result<()> {
        if values.is_empty() {
            return Err(marshal::empty_array(&U::TYPE.glsl_name()));
        }
        let target = self.uniform_target(gl, name)?;
        marshal::write(gl, target, values, transpose)
    }

    pub fn get_uniform<U: Uniform>(&mut self, gl: &mut dyn GraphicsApi, name: &str) -> Result<U> {
        self.get_uniform_array::<U>(gl, name, 1)?
            .into_iter()
            .next()
            .ok_or_else(|| GlError::UniformNotFound { name: name.to_owned() })
    }

    /// Reads `len` consecutive array elements starting at `name`.
    pub fn get_uniform_array<U: Uniform>(&mut self, gl: &mut dyn GraphicsApi, name: &str, len: usize) -> Result<Vec<U>> {
        if len == 0 {
            return Err(marshal::empty_array(&U::TYPE.glsl_name()));
        }
        let target = self.uniform_target(gl, name)?;
        marshal::read(gl, target, len)
    }

    // ── pre-flattened uniforms ────────────────────────────────────────────

    pub fn set_uniform_raw(
        &mut self,
        gl: &mut dyn GraphicsApi,
        name: &str,
        descriptor: &TypeDescriptor,
        data: &WireData,
        transpose: bool,
    ) -> Result<()> {
        marshal::check_raw(descriptor, data)?;
        let target = self.uniform_target(gl, name)?;
        marshal::write_raw(gl, target, descriptor, data, transpose)
    }

    pub fn get_uniform_raw(
        &mut self,
        gl: &mut dyn GraphicsApi,
        name: &str,
        descriptor: &TypeDescriptor,
    ) -> Result<WireData> {
        let target = self.uniform_target(gl, name)?;
        marshal::read_raw(gl, target, descriptor)
    }
}

impl Default for Program {
    fn default() -> Self {
        Self::new()
    }
}

impl GlObject for Program {
    fn handle(&self) -> Handle {
        self.life.handle()
    }

    fn is_valid(&self) -> bool {
        self.life.is_live() && self.linked
    }

    fn create(&mut self, gl: &mut dyn GraphicsApi) -> Result<()> {
        let handle = self.life.create(gl)?;
        if self.separable {
            gl.program_separable(handle.get(), true);
        }
        Ok(())
    }

    fn delete(&mut self, gl: &mut dyn GraphicsApi) {
        if self.life.delete(gl) {
            self.linked = false;
            self.attached.clear();
            self.stages = ProgramStages::empty();
            self.uniforms.clear();
        }
    }
}

/// Binding a program makes it the standalone program in use.
impl Bindable for Program {
    fn bind(&self, gl: &mut dyn GraphicsApi) -> Result<()> {
        let program = self.require_linked("use")?;
        gl.bind_object(BindTarget::Program, program);
        Ok(())
    }

    fn unbind(&self, gl: &mut dyn GraphicsApi) -> Result<()> {
        self.life.require("unbind")?;
        gl.bind_object(BindTarget::Program, 0);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ShaderStage;
    use crate::headless::{Call, HeadlessGl};
    use crate::math::{DMat3, Mat2x3, Mat4};

    const VERTEX: &str = "\
#version 450
uniform mat4 model;
uniform mat2x3 skew;
uniform dmat3 basis;
uniform vec3 lights[4];
uniform bool flags[3];
uniform uvec2 mask;
uniform ivec4 ids;
void main() {}
";

    fn compiled(gl: &mut HeadlessGl, stage: ShaderStage, source: &str) -> Shader {
        let mut shader = Shader::new(stage, source);
        shader.create(gl).unwrap();
        shader.compile(gl).unwrap();
        shader
    }

    fn linked(gl: &mut HeadlessGl) -> Program {
        let shader = compiled(gl, ShaderStage::Vertex, VERTEX);
        let mut program = Program::new();
        program.create(gl).unwrap();
        program.attach(gl, &shader).unwrap();
        program.link(gl).unwrap();
        program
    }

    fn lookups(gl: &HeadlessGl) -> usize {
        gl.calls().iter().filter(|c| matches!(c, Call::UniformLocation { .. })).count()
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    #[test]
    fn use_requires_link() {
        let mut gl = HeadlessGl::default();
        let mut program = Program::new();
        assert!(matches!(program.bind(&mut gl), Err(GlError::InvalidState { .. })));

        program.create(&mut gl).unwrap();
        assert!(!program.is_valid());
        assert!(matches!(program.bind(&mut gl), Err(GlError::InvalidState { .. })));

        let shader = compiled(&mut gl, ShaderStage::Vertex, VERTEX);
        program.attach(&mut gl, &shader).unwrap();
        program.link(&mut gl).unwrap();
        assert!(program.is_valid());
        program.bind(&mut gl).unwrap();
        assert_eq!(gl.bound(BindTarget::Program), program.handle().get());
    }

    #[test]
    fn attach_requires_compiled_shader() {
        let mut gl = HeadlessGl::default();
        let mut program = Program::new();
        program.create(&mut gl).unwrap();
        let mut shader = Shader::new(ShaderStage::Fragment, "void main() {}");
        shader.create(&mut gl).unwrap();
        assert!(matches!(program.attach(&mut gl, &shader), Err(GlError::InvalidState { object: "shader", .. })));
        assert!(program.attached_shaders().is_empty());
    }

    #[test]
    fn link_failure_reports_log() {
        let mut gl = HeadlessGl::default();
        let mut program = Program::new();
        program.create(&mut gl).unwrap();
        let err = program.link(&mut gl).unwrap_err();
        assert!(matches!(&err, GlError::ProgramLink { log } if !log.is_empty()));
        assert!(!program.is_linked());
    }

    #[test]
    fn separable_flag_is_sent_on_create() {
        let mut gl = HeadlessGl::default();
        let mut program = Program::separable();
        program.create(&mut gl).unwrap();
        assert!(gl.calls().contains(&Call::ProgramSeparable { program: program.handle().get(), separable: true }));
    }

    // ── uniforms ──────────────────────────────────────────────────────────

    #[test]
    fn unknown_uniform_is_not_cached() {
        let mut gl = HeadlessGl::default();
        let mut program = linked(&mut gl);

        for _ in 0..2 {
            let err = program.set_uniform(&mut gl, "missing", 1.0f32).unwrap_err();
            assert_eq!(err, GlError::UniformNotFound { name: "missing".into() });
        }
        assert!(program.uniform_cache().is_empty());
        assert_eq!(lookups(&gl), 2);
    }

    #[test]
    fn locations_are_looked_up_once() {
        let mut gl = HeadlessGl::default();
        let mut program = linked(&mut gl);
        program.set_uniform(&mut gl, "mask", [1u32, 2]).unwrap();
        program.set_uniform(&mut gl, "mask", [3u32, 4]).unwrap();
        assert_eq!(program.get_uniform::<[u32; 2]>(&mut gl, "mask").unwrap(), [3, 4]);
        assert_eq!(lookups(&gl), 1);
        assert_eq!(program.uniform_cache().len(), 1);
    }

    #[test]
    fn uniforms_round_trip_by_name() {
        let mut gl = HeadlessGl::default();
        let mut program = linked(&mut gl);

        let model = Mat4::from_rows([
            [1.0, 2.0, 3.0, 4.0],
            [5.0, 6.0, 7.0, 8.0],
            [9.0, 10.0, 11.0, 12.0],
            [13.0, 14.0, 15.0, 16.0],
        ]);
        program.set_uniform(&mut gl, "model", model).unwrap();
        assert_eq!(program.get_uniform::<Mat4>(&mut gl, "model").unwrap(), model);

        let basis = DMat3::identity();
        program.set_uniform(&mut gl, "basis", basis).unwrap();
        assert_eq!(program.get_uniform::<DMat3>(&mut gl, "basis").unwrap(), basis);

        program.set_uniform(&mut gl, "ids", [-1i32, 0, 1, 2]).unwrap();
        assert_eq!(program.get_uniform::<[i32; 4]>(&mut gl, "ids").unwrap(), [-1, 0, 1, 2]);

        let lights = [[1.0f32, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [1.0, 1.0, 1.0]];
        program.set_uniform_array(&mut gl, "lights", &lights).unwrap();
        assert_eq!(program.get_uniform_array::<[f32; 3]>(&mut gl, "lights", 4).unwrap(), lights);

        program.set_uniform_array(&mut gl, "flags", &[true, false, true]).unwrap();
        assert_eq!(program.get_uniform_array::<bool>(&mut gl, "flags", 3).unwrap(), [true, false, true]);
    }

    #[test]
    fn transposed_write_reads_back_transposed() {
        let mut gl = HeadlessGl::default();
        let mut program = linked(&mut gl);
        let skew = Mat2x3::from_rows([[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]);

        program.set_uniform_transposed(&mut gl, "skew", skew, true).unwrap();
        let stored = program.get_uniform_raw(&mut gl, "skew", &TypeDescriptor::parse("mat2x3").unwrap()).unwrap();
        // Column-major storage of the row-major input.
        assert_eq!(stored, WireData::Float(vec![1.0, 3.0, 5.0, 2.0, 4.0, 6.0]));
    }

    #[test]
    fn empty_array_fails_before_lookup() {
        let mut gl = HeadlessGl::default();
        let mut program = linked(&mut gl);
        let err = program.set_uniform_array::<[f32; 3]>(&mut gl, "lights", &[]).unwrap_err();
        assert!(matches!(err, GlError::UnsupportedType { .. }));
        let err = program.get_uniform_array::<[f32; 3]>(&mut gl, "lights", 0).unwrap_err();
        assert!(matches!(err, GlError::UnsupportedType { .. }));
        assert_eq!(lookups(&gl), 0);
    }

    #[test]
    fn raw_mismatch_fails_before_lookup() {
        let mut gl = HeadlessGl::default();
        let mut program = linked(&mut gl);
        let descriptor = TypeDescriptor::parse("vec3[4]").unwrap();
        let err = program
            .set_uniform_raw(&mut gl, "lights", &descriptor, &WireData::Float(vec![0.0; 11]), false)
            .unwrap_err();
        assert!(matches!(err, GlError::UnsupportedType { .. }));
        assert_eq!(lookups(&gl), 0);

        let data = WireData::Float((0..12).map(|i| i as f32).collect());
        program.set_uniform_raw(&mut gl, "lights", &descriptor, &data, false).unwrap();
        assert_eq!(program.get_uniform_raw(&mut gl, "lights", &descriptor).unwrap(), data);
    }

    #[test]
    fn relink_keeps_cache_until_cleared() {
        let mut gl = HeadlessGl::default();
        let mut program = linked(&mut gl);
        program.uniform_location(&mut gl, "ids").unwrap();
        program.link(&mut gl).unwrap();
        assert_eq!(program.uniform_cache().len(), 1);
        program.clear_uniform_cache();
        assert!(program.uniform_cache().is_empty());
    }

    #[test]
    fn uniforms_need_a_linked_program() {
        let mut gl = HeadlessGl::default();
        let mut program = Program::new();
        program.create(&mut gl).unwrap();
        let err = program.set_uniform(&mut gl, "model", Mat4::identity()).unwrap_err();
        assert!(matches!(err, GlError::InvalidState { object: "program", .. }));
    }
}
