use crate::api::{BindTarget, GraphicsApi, ObjectKind, ProgramStages};
use crate::error::{GlError, Result};

use super::{Bindable, GlObject, Handle, Lifecycle, Program, Shader, ShaderState};

/// Program pipeline owning one separable program per stage set.
///
/// The pipeline is usable only while every owned program is valid.
/// Deleting the pipeline deletes its programs.
#[derive(Debug)]
pub struct ProgramPipeline {
    life: Lifecycle,
    stages: Vec<Program>,
}

impl ProgramPipeline {
    pub const fn new() -> Self {
        Self { life: Lifecycle::new(ObjectKind::ProgramPipeline), stages: Vec::new() }
    }

    pub fn stages(&self) -> &[Program] {
        &self.stages
    }

    pub fn stage_mut(&mut self, index: usize) -> Option<&mut Program> {
        self.stages.get_mut(index)
    }

    /// Builds a separable program from `shaders` and takes ownership of it.
    ///
    /// See [`add_stage_with`](Self::add_stage_with).
    pub fn add_stage(&mut self, gl: &mut dyn GraphicsApi, shaders: &mut [Shader]) -> Result<&mut Program> {
        self.add_stage_with(gl, shaders, |_, _| Ok(()))
    }

    /// Builds a separable program from `shaders`, running `pre_link` between
    /// attach and link.
    ///
    /// Shaders that are not compiled yet are created and compiled first.
    /// After a successful link every shader is detached and deleted. On any
    /// failure the half-built program is deleted and the pipeline is left
    /// unchanged.
    pub fn add_stage_with<F>(
        &mut self,
        gl: &mut dyn GraphicsApi,
        shaders: &mut [Shader],
        pre_link: F,
    ) -> Result<&mut Program>
    where
        F: FnOnce(&mut Program, &mut dyn GraphicsApi) -> Result<()>,
    {
        if shaders.is_empty() {
            return Err(GlError::invalid_state("program pipeline", "a stage needs at least one shader"));
        }

        let mut program = Program::separable();
        program.create(gl)?;
        if let Err(err) = build_stage(&mut program, gl, shaders, pre_link) {
            program.delete(gl);
            return Err(err);
        }

        log::debug!("pipeline {} gained stage program {} ({:?})", self.life.handle(), program.handle(), program.stages());
        let index = self.stages.len();
        self.stages.push(program);
        Ok(&mut self.stages[index])
    }

    /// Activates `stages` of the program at `index` on this pipeline.
    pub fn use_stages(&self, gl: &mut dyn GraphicsApi, stages: ProgramStages, index: usize) -> Result<()> {
        let pipeline = self.life.require("use stages")?;
        let program = self.stages.get(index).ok_or_else(|| {
            GlError::invalid_state("program pipeline", format!("no stage program at index {index}"))
        })?;
        if !program.is_valid() {
            return Err(GlError::invalid_state("program", "stage program is not linked"));
        }
        gl.use_program_stages(pipeline, stages, program.handle().get());
        Ok(())
    }

    /// Activates every owned program for the stages it was built from.
    pub fn use_all_stages(&self, gl: &mut dyn GraphicsApi) -> Result<()> {
        for index in 0..self.stages.len() {
            self.use_stages(gl, self.stages[index].stages(), index)?;
        }
        Ok(())
    }
}

fn build_stage<F>(program: &mut Program, gl: &mut dyn GraphicsApi, shaders: &mut [Shader], pre_link: F) -> Result<()>
where
    F: FnOnce(&mut Program, &mut dyn GraphicsApi) -> Result<()>,
{
    for shader in shaders.iter_mut() {
        if shader.state() == ShaderState::Unallocated {
            shader.create(gl)?;
        }
        if !shader.is_compiled() {
            shader.compile(gl)?;
        }
        program.attach(gl, shader)?;
    }

    pre_link(&mut *program, &mut *gl)?;
    program.link(gl)?;

    for shader in shaders.iter_mut() {
        program.detach(gl, shader)?;
        shader.delete(gl);
    }
    Ok(())
}

impl Default for ProgramPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl GlObject for ProgramPipeline {
    fn handle(&self) -> Handle {
        self.life.handle()
    }

    fn is_valid(&self) -> bool {
        self.life.is_live() && self.stages.iter().all(Program::is_valid)
    }

    fn create(&mut self, gl: &mut dyn GraphicsApi) -> Result<()> {
        self.life.create(gl).map(|_| ())
    }

    fn delete(&mut self, gl: &mut dyn GraphicsApi) {
        for program in &mut self.stages {
            program.delete(gl);
        }
        self.stages.clear();
        self.life.delete(gl);
    }
}

impl Bindable for ProgramPipeline {
    fn bind(&self, gl: &mut dyn GraphicsApi) -> Result<()> {
        let pipeline = self.life.require("bind")?;
        if let Some(index) = self.stages.iter().position(|p| !p.is_valid()) {
            return Err(GlError::invalid_state(
                "program pipeline",
                format!("stage program {index} is not valid"),
            ));
        }
        gl.bind_object(BindTarget::ProgramPipeline, pipeline);
        Ok(())
    }

    fn unbind(&self, gl: &mut dyn GraphicsApi) -> Result<()> {
        self.life.require("unbind")?;
        gl.bind_object(BindTarget::ProgramPipeline, 0);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ShaderStage;
    use crate::headless::{Call, HeadlessGl};

    const VERTEX: &str = "uniform mat4 view_proj;\nvoid main() {}\n";
    const FRAGMENT: &str = "uniform vec4 tint;\nvoid main() {}\n";

    fn pipeline(gl: &mut HeadlessGl) -> ProgramPipeline {
        let mut pipeline = ProgramPipeline::new();
        pipeline.create(gl).unwrap();
        pipeline
    }

    #[test]
    fn add_stage_compiles_links_and_releases_shaders() {
        let mut gl = HeadlessGl::default();
        let mut pipeline = pipeline(&mut gl);
        let mut shaders = [Shader::new(ShaderStage::Vertex, VERTEX)];

        let program = pipeline.add_stage(&mut gl, &mut shaders).unwrap();
        assert!(program.is_valid());
        assert!(program.is_separable());
        assert_eq!(program.stages(), ProgramStages::VERTEX);
        assert!(program.attached_shaders().is_empty());

        assert_eq!(shaders[0].state(), ShaderState::Deleted);
        assert_eq!(pipeline.stages().len(), 1);
        assert!(pipeline.is_valid());
    }

    #[test]
    fn pre_link_runs_between_attach_and_link() {
        let mut gl = HeadlessGl::default();
        let mut pipeline = pipeline(&mut gl);
        let mut shaders = [Shader::new(ShaderStage::Fragment, FRAGMENT)];

        let mut ran = false;
        pipeline
            .add_stage_with(&mut gl, &mut shaders, |program, _gl| {
                ran = true;
                assert_eq!(program.attached_shaders().len(), 1);
                assert!(!program.is_linked());
                Ok(())
            })
            .unwrap();
        assert!(ran);

        let calls = gl.calls();
        let attach = calls.iter().position(|c| matches!(c, Call::AttachShader { .. })).unwrap();
        let link = calls.iter().position(|c| matches!(c, Call::LinkProgram { .. })).unwrap();
        let detach = calls.iter().position(|c| matches!(c, Call::DetachShader { .. })).unwrap();
        assert!(attach < link && link < detach);
    }

    #[test]
    fn failed_stage_is_deleted_and_not_added() {
        let mut gl = HeadlessGl::default();
        let mut pipeline = pipeline(&mut gl);
        let mut shaders = [Shader::new(ShaderStage::Fragment, "void main( {")];

        let err = pipeline.add_stage(&mut gl, &mut shaders).unwrap_err();
        assert!(matches!(err, GlError::ShaderCompilation { stage: ShaderStage::Fragment, .. }));
        assert!(pipeline.stages().is_empty());

        let deleted_program = gl
            .calls()
            .iter()
            .any(|c| matches!(c, Call::DeleteObject { kind: ObjectKind::Program, .. }));
        assert!(deleted_program);
    }

    #[test]
    fn failing_pre_link_aborts_stage() {
        let mut gl = HeadlessGl::default();
        let mut pipeline = pipeline(&mut gl);
        let mut shaders = [Shader::new(ShaderStage::Vertex, VERTEX)];

        let err = pipeline
            .add_stage_with(&mut gl, &mut shaders, |_, _| {
                Err(GlError::invalid_state("program", "rejected by pre-link hook"))
            })
            .unwrap_err();
        assert!(matches!(err, GlError::InvalidState { .. }));
        assert!(pipeline.stages().is_empty());
        // Compiled but never consumed by a link.
        assert_eq!(shaders[0].state(), ShaderState::Compiled);
    }

    #[test]
    fn use_stages_names_pipeline_and_program() {
        let mut gl = HeadlessGl::default();
        let mut pipeline = pipeline(&mut gl);
        let mut vs = [Shader::new(ShaderStage::Vertex, VERTEX)];
        let mut fs = [Shader::new(ShaderStage::Fragment, FRAGMENT)];
        pipeline.add_stage(&mut gl, &mut vs).unwrap();
        pipeline.add_stage(&mut gl, &mut fs).unwrap();
        gl.clear_calls();

        pipeline.use_all_stages(&mut gl).unwrap();
        let handle = pipeline.handle().get();
        let vertex = pipeline.stages()[0].handle().get();
        let fragment = pipeline.stages()[1].handle().get();
        assert_eq!(
            gl.calls(),
            &[
                Call::UseProgramStages { pipeline: handle, stages: ProgramStages::VERTEX, program: vertex },
                Call::UseProgramStages { pipeline: handle, stages: ProgramStages::FRAGMENT, program: fragment },
            ]
        );

        assert!(pipeline.use_stages(&mut gl, ProgramStages::VERTEX, 5).is_err());
        pipeline.bind(&mut gl).unwrap();
        assert_eq!(gl.bound(BindTarget::ProgramPipeline), handle);
    }

    #[test]
    fn use_stages_requires_created_pipeline() {
        let mut gl = HeadlessGl::default();
        let mut pipeline = ProgramPipeline::new();
        let mut shaders = [Shader::new(ShaderStage::Vertex, VERTEX)];
        pipeline.add_stage(&mut gl, &mut shaders).unwrap();
        let err = pipeline.use_stages(&mut gl, ProgramStages::VERTEX, 0).unwrap_err();
        assert!(matches!(err, GlError::InvalidState { object: "program pipeline", .. }));
    }

    #[test]
    fn delete_releases_stage_programs() {
        let mut gl = HeadlessGl::default();
        let mut pipeline = pipeline(&mut gl);
        let mut shaders = [Shader::new(ShaderStage::Vertex, VERTEX)];
        let program = pipeline.add_stage(&mut gl, &mut shaders).unwrap().handle().get();

        pipeline.delete(&mut gl);
        pipeline.delete(&mut gl);
        assert!(!gl.is_alive(program));
        assert!(pipeline.handle().is_none());
        assert!(pipeline.stages().is_empty());
    }
}
