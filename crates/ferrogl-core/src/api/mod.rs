//! Graphics-API seam.
//!
//! [`GraphicsApi`] is the complete vocabulary of driver calls the resource
//! layer issues. Calls are direct-state-access style: each names the object it
//! acts on by handle, so nothing depends on hidden "current object" state
//! except the explicit [`GraphicsApi::bind_object`] slots.
//!
//! Implementations report driver-side conditions (double deletes, writes to
//! unknown locations) through their own debug output. They never panic on
//! them: every argument validation that matters happens before the call.

mod object;
mod texture;
mod uniform;
mod vertex;

pub use object::{BindTarget, BufferTarget, BufferUsage, ObjectKind, ProgramStages, ShaderStage, StorageFlags};
pub use texture::{
    InternalFormat, PixelFormat, PixelType, TexImage, TextureFilter, TextureParameter, TextureTarget, TextureWrap,
};
pub use uniform::{UniformShape, UniformTarget, UniformWrite};
pub use vertex::{AttribFormat, VertexAttribType};

use crate::marshal::WireSliceMut;

/// Outcome of a compile or link request.
#[derive(Debug, Clone, Eq, PartialEq, Default)]
pub struct BuildStatus {
    pub success: bool,
    /// Driver info log, possibly empty on success.
    pub log: String,
}

impl BuildStatus {
    pub fn ok() -> Self {
        Self { success: true, log: String::new() }
    }

    pub fn failed(log: impl Into<String>) -> Self {
        Self { success: false, log: log.into() }
    }
}

/// Driver calls consumed by the resource and marshalling layer.
///
/// Handles are plain `u32` names; 0 never names a live object.
pub trait GraphicsApi {
    // ── objects ───────────────────────────────────────────────────────────

    /// Allocates a new object name. Returns 0 when the driver is out of names.
    fn create_object(&mut self, kind: ObjectKind) -> u32;

    fn delete_object(&mut self, kind: ObjectKind, handle: u32);

    /// Makes `handle` current for `target`. Handle 0 clears the slot.
    fn bind_object(&mut self, target: BindTarget, handle: u32);

    // ── buffers ───────────────────────────────────────────────────────────

    fn buffer_data(&mut self, buffer: u32, data: &[u8], usage: BufferUsage);

    fn buffer_storage(&mut self, buffer: u32, data: &[u8], flags: StorageFlags);

    // ── shaders and programs ──────────────────────────────────────────────

    fn shader_source(&mut self, shader: u32, source: &str);

    fn compile_shader(&mut self, shader: u32) -> BuildStatus;

    fn attach_shader(&mut self, program: u32, shader: u32);

    fn detach_shader(&mut self, program: u32, shader: u32);

    fn program_separable(&mut self, program: u32, separable: bool);

    fn link_program(&mut self, program: u32) -> BuildStatus;

    /// Location of an active uniform, `None` if the linked program has none by that name.
    fn uniform_location(&mut self, program: u32, name: &str) -> Option<i32>;

    fn program_uniform(&mut self, target: UniformTarget, write: UniformWrite<'_>);

    /// Fills `out` with consecutive uniform elements starting at `target.location`.
    fn get_uniform(&mut self, target: UniformTarget, out: WireSliceMut<'_>);

    fn use_program_stages(&mut self, pipeline: u32, stages: ProgramStages, program: u32);

    // ── vertex arrays ─────────────────────────────────────────────────────

    fn enable_vertex_attrib(&mut self, vao: u32, location: u32);

    fn vertex_attrib_format(&mut self, vao: u32, location: u32, format: AttribFormat);

    fn vertex_attrib_binding(&mut self, vao: u32, location: u32, binding: u32);

    fn vertex_buffer(&mut self, vao: u32, binding: u32, buffer: u32, offset: usize, stride: u32);

    /// Number of attribute locations the implementation supports.
    fn max_vertex_attribs(&self) -> u32;

    // ── textures ──────────────────────────────────────────────────────────

    /// Selects texture unit `unit` (0-based) for subsequent texture binds.
    fn active_texture(&mut self, unit: u32);

    fn max_texture_units(&self) -> u32;

    fn texture_parameter(&mut self, texture: u32, parameter: TextureParameter);

    fn generate_mipmap(&mut self, texture: u32);

    fn texture_image(&mut self, texture: u32, image: TexImage<'_>);

    fn texture_storage_2d(&mut self, texture: u32, levels: u32, format: InternalFormat, width: u32, height: u32);
}
