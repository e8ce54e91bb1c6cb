//! In-process [`GraphicsApi`](crate::api::GraphicsApi) implementation.
//!
//! `HeadlessGl` keeps the object model of a GL 4.5 context in plain Rust
//! collections: buffers, shaders, programs with linked uniform storage,
//! pipelines, vertex arrays and textures. Every entry point is recorded as a
//! [`Call`], and conditions a driver would flag through its debug output are
//! collected as [`DriverMessage`]s and logged at `warn`.
//!
//! It backs the test suite and the demo binary; no window or GPU is needed.

mod call;
mod driver;
mod glsl;
mod init;
mod state;

use std::collections::HashMap;

use crate::api::{BindTarget, ShaderStage, TextureParameter};
use crate::marshal::WireData;

pub use call::{Call, DriverMessage};
pub use init::HeadlessInit;
pub use state::{TextureLevel, VertexAttribState, VertexBufferBinding};

use state::Object;

/// A software GL context.
#[derive(Debug)]
pub struct HeadlessGl {
    init: HeadlessInit,
    next_name: u32,
    objects: HashMap<u32, Object>,
    /// Bindings keyed by target and texture unit (0 for non-texture targets).
    bound: HashMap<(BindTarget, u32), u32>,
    active_unit: u32,
    calls: Vec<Call>,
    messages: Vec<DriverMessage>,
}

impl Default for HeadlessGl {
    fn default() -> Self {
        Self::new(HeadlessInit::default())
    }
}

impl HeadlessGl {
    pub fn new(init: HeadlessInit) -> Self {
        log::debug!(
            "headless context: {} vertex attribs, {} texture units",
            init.max_vertex_attribs,
            init.max_texture_units
        );
        Self {
            init,
            next_name: 1,
            objects: HashMap::new(),
            bound: HashMap::new(),
            active_unit: 0,
            calls: Vec::new(),
            messages: Vec::new(),
        }
    }

    pub fn init(&self) -> &HeadlessInit {
        &self.init
    }

    // ── call log ─────────────────────────────────────────────────────────

    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    pub fn messages(&self) -> &[DriverMessage] {
        &self.messages
    }

    pub fn take_messages(&mut self) -> Vec<DriverMessage> {
        std::mem::take(&mut self.messages)
    }

    // ── object state ─────────────────────────────────────────────────────

    /// Object bound to `target`; texture targets are looked up on the active unit.
    pub fn bound(&self, target: BindTarget) -> u32 {
        self.bound.get(&self.binding_key(target)).copied().unwrap_or(0)
    }

    pub fn active_unit(&self) -> u32 {
        self.active_unit
    }

    /// `true` if `handle` names an object that is neither deleted nor pending deletion.
    pub fn is_alive(&self, handle: u32) -> bool {
        match self.objects.get(&handle) {
            Some(Object::Shader(shader)) => !shader.pending_delete,
            Some(_) => true,
            None => false,
        }
    }

    /// `true` for a shader deleted while still attached to a program.
    pub fn is_pending_delete(&self, handle: u32) -> bool {
        matches!(self.objects.get(&handle), Some(Object::Shader(shader)) if shader.pending_delete)
    }

    pub fn buffer_contents(&self, buffer: u32) -> Option<&[u8]> {
        match self.objects.get(&buffer) {
            Some(Object::Buffer(b)) => Some(&b.data),
            _ => None,
        }
    }

    pub fn vertex_attrib(&self, vao: u32, location: u32) -> Option<&VertexAttribState> {
        match self.objects.get(&vao) {
            Some(Object::VertexArray(v)) => v.attribs.get(&location),
            _ => None,
        }
    }

    pub fn vertex_buffer_binding(&self, vao: u32, binding: u32) -> Option<VertexBufferBinding> {
        match self.objects.get(&vao) {
            Some(Object::VertexArray(v)) => v.buffers.get(&binding).copied(),
            _ => None,
        }
    }

    pub fn texture_level(&self, texture: u32, level: u32) -> Option<&TextureLevel> {
        match self.objects.get(&texture) {
            Some(Object::Texture(t)) => t.levels.get(&level),
            _ => None,
        }
    }

    /// Parameters set on `texture`, last value per parameter name.
    pub fn texture_parameters(&self, texture: u32) -> &[TextureParameter] {
        match self.objects.get(&texture) {
            Some(Object::Texture(t)) => &t.parameters,
            _ => &[],
        }
    }

    /// Level count of immutable storage, if any was allocated.
    pub fn texture_storage_levels(&self, texture: u32) -> Option<u32> {
        match self.objects.get(&texture) {
            Some(Object::Texture(t)) => t.storage.map(|s| s.levels),
            _ => None,
        }
    }

    pub fn mipmap_generations(&self, texture: u32) -> u32 {
        match self.objects.get(&texture) {
            Some(Object::Texture(t)) => t.mipmap_generations,
            _ => 0,
        }
    }

    /// Program installed for `stage` in `pipeline`.
    pub fn pipeline_program(&self, pipeline: u32, stage: ShaderStage) -> Option<u32> {
        match self.objects.get(&pipeline) {
            Some(Object::Pipeline(p)) => p.stages.get(&stage).copied(),
            _ => None,
        }
    }

    /// Stored value of a linked uniform, all array elements flattened.
    pub fn uniform_value(&self, program: u32, name: &str) -> Option<&WireData> {
        match self.objects.get(&program) {
            Some(Object::Program(p)) => p.uniforms.iter().find(|u| u.name == name).map(|u| &u.values),
            _ => None,
        }
    }

    fn binding_key(&self, target: BindTarget) -> (BindTarget, u32) {
        match target {
            BindTarget::Texture(_) => (target, self.active_unit),
            _ => (target, 0),
        }
    }
}

fn report(messages: &mut Vec<DriverMessage>, call: &'static str, text: String) {
    log::warn!("{call}: {text}");
    messages.push(DriverMessage { call, text });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{
        BufferTarget, BufferUsage, GraphicsApi, ObjectKind, ProgramStages, StorageFlags, UniformTarget, UniformWrite,
    };
    use crate::marshal::{WireSlice, WireSliceMut};
    use crate::types::ElementType;

    fn compiled(gl: &mut HeadlessGl, stage: ShaderStage, source: &str) -> u32 {
        let shader = gl.create_object(ObjectKind::Shader(stage));
        gl.shader_source(shader, source);
        assert!(gl.compile_shader(shader).success);
        shader
    }

    fn linked(gl: &mut HeadlessGl, source: &str) -> u32 {
        let shader = compiled(gl, ShaderStage::Vertex, source);
        let program = gl.create_object(ObjectKind::Program);
        gl.attach_shader(program, shader);
        assert!(gl.link_program(program).success);
        program
    }

    fn write(gl: &mut HeadlessGl, program: u32, location: i32, ty: &str, data: WireSlice<'_>, transpose: bool) {
        let element = ElementType::parse(ty).unwrap();
        let write = UniformWrite::new(element, data, transpose).unwrap();
        gl.program_uniform(UniformTarget { program, location }, write);
    }

    // ── objects ──────────────────────────────────────────────────────────

    #[test]
    fn names_start_at_one_and_are_not_reused() {
        let mut gl = HeadlessGl::default();
        let a = gl.create_object(ObjectKind::Buffer);
        gl.delete_object(ObjectKind::Buffer, a);
        let b = gl.create_object(ObjectKind::Buffer);
        assert_eq!((a, b), (1, 2));
        assert!(!gl.is_alive(a));
        assert!(gl.is_alive(b));
    }

    #[test]
    fn double_delete_is_reported() {
        let mut gl = HeadlessGl::default();
        let buffer = gl.create_object(ObjectKind::Buffer);
        gl.delete_object(ObjectKind::Buffer, buffer);
        gl.delete_object(ObjectKind::Buffer, buffer);
        gl.delete_object(ObjectKind::Buffer, 0);
        let messages = gl.take_messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].call, "glDeleteBuffers");

        let mut quiet = HeadlessGl::new(HeadlessInit { report_double_delete: false, ..Default::default() });
        quiet.delete_object(ObjectKind::Texture, 7);
        assert!(quiet.messages().is_empty());
    }

    #[test]
    fn deleting_unbinds() {
        let mut gl = HeadlessGl::default();
        let buffer = gl.create_object(ObjectKind::Buffer);
        let target = BindTarget::Buffer(BufferTarget::Array);
        gl.bind_object(target, buffer);
        assert_eq!(gl.bound(target), buffer);
        gl.delete_object(ObjectKind::Buffer, buffer);
        assert_eq!(gl.bound(target), 0);
    }

    #[test]
    fn binding_wrong_kind_is_reported() {
        let mut gl = HeadlessGl::default();
        let texture = gl.create_object(ObjectKind::Texture);
        gl.bind_object(BindTarget::VertexArray, texture);
        assert_eq!(gl.bound(BindTarget::VertexArray), 0);
        assert_eq!(gl.messages().len(), 1);
    }

    #[test]
    fn immutable_buffer_rejects_respecification() {
        let mut gl = HeadlessGl::default();
        let buffer = gl.create_object(ObjectKind::Buffer);
        gl.buffer_storage(buffer, &[1, 2], StorageFlags::empty());
        gl.buffer_data(buffer, &[3], BufferUsage::StaticDraw);
        assert_eq!(gl.buffer_contents(buffer), Some(&[1u8, 2][..]));
        assert_eq!(gl.messages().len(), 1);
    }

    #[test]
    fn attached_shader_deletion_is_deferred() {
        let mut gl = HeadlessGl::default();
        let shader = compiled(&mut gl, ShaderStage::Vertex, "void main() {}");
        let program = gl.create_object(ObjectKind::Program);
        gl.attach_shader(program, shader);

        gl.delete_object(ObjectKind::Shader(ShaderStage::Vertex), shader);
        assert!(gl.is_pending_delete(shader));
        assert!(!gl.is_alive(shader));

        gl.detach_shader(program, shader);
        assert!(!gl.is_pending_delete(shader));
        assert!(gl.messages().is_empty());
    }

    // ── compile & link ───────────────────────────────────────────────────

    #[test]
    fn compile_failure_returns_log() {
        let mut gl = HeadlessGl::default();
        let shader = gl.create_object(ObjectKind::Shader(ShaderStage::Fragment));
        gl.shader_source(shader, "void main() {");
        let status = gl.compile_shader(shader);
        assert!(!status.success);
        assert!(status.log.contains("unclosed"));
        assert_eq!(gl.calls().last(), Some(&Call::CompileShader { shader, success: false }));
    }

    #[test]
    fn link_requires_compiled_shaders() {
        let mut gl = HeadlessGl::default();
        let program = gl.create_object(ObjectKind::Program);
        assert!(gl.link_program(program).log.contains("no shaders attached"));

        let shader = gl.create_object(ObjectKind::Shader(ShaderStage::Vertex));
        gl.attach_shader(program, shader);
        assert!(!gl.link_program(program).success);
    }

    #[test]
    fn link_rejects_compute_mixed_with_graphics() {
        let mut gl = HeadlessGl::default();
        let vertex = compiled(&mut gl, ShaderStage::Vertex, "void main() {}");
        let compute = compiled(&mut gl, ShaderStage::Compute, "void main() {}");
        let program = gl.create_object(ObjectKind::Program);
        gl.attach_shader(program, vertex);
        gl.attach_shader(program, compute);
        assert!(gl.link_program(program).log.contains("compute"));
    }

    #[test]
    fn link_rejects_conflicting_uniform_types() {
        let mut gl = HeadlessGl::default();
        let vertex = compiled(&mut gl, ShaderStage::Vertex, "uniform vec3 tint;\nvoid main() {}");
        let fragment = compiled(&mut gl, ShaderStage::Fragment, "uniform vec4 tint;\nvoid main() {}");
        let program = gl.create_object(ObjectKind::Program);
        gl.attach_shader(program, vertex);
        gl.attach_shader(program, fragment);
        let status = gl.link_program(program);
        assert!(!status.success);
        assert!(status.log.contains("`tint`"));
    }

    #[test]
    fn arrays_consume_one_location_per_element() {
        let mut gl = HeadlessGl::default();
        let program = linked(&mut gl, "uniform float a[3];\nuniform mat4 m;\nvoid main() {}");
        assert_eq!(gl.uniform_location(program, "a"), Some(0));
        assert_eq!(gl.uniform_location(program, "a[0]"), Some(0));
        assert_eq!(gl.uniform_location(program, "a[2]"), Some(2));
        assert_eq!(gl.uniform_location(program, "a[3]"), None);
        assert_eq!(gl.uniform_location(program, "m"), Some(3));
        assert_eq!(gl.uniform_location(program, "m[0]"), None);
        assert_eq!(gl.uniform_location(program, "missing"), None);
    }

    // ── uniforms ─────────────────────────────────────────────────────────

    #[test]
    fn writes_land_at_element_offset_and_clamp() {
        let mut gl = HeadlessGl::default();
        let program = linked(&mut gl, "uniform vec2 v[3];\nvoid main() {}");
        write(&mut gl, program, 1, "vec2", WireSlice::Float(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]), false);
        assert_eq!(gl.uniform_value(program, "v"), Some(&WireData::Float(vec![0.0, 0.0, 1.0, 2.0, 3.0, 4.0])));

        let mut out = [0.0f32; 4];
        gl.get_uniform(UniformTarget { program, location: 1 }, WireSliceMut::Float(&mut out));
        assert_eq!(out, [1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn location_minus_one_is_ignored() {
        let mut gl = HeadlessGl::default();
        let program = linked(&mut gl, "uniform float x;\nvoid main() {}");
        write(&mut gl, program, -1, "float", WireSlice::Float(&[1.0]), false);
        assert!(gl.messages().is_empty());
        assert_eq!(gl.uniform_value(program, "x"), Some(&WireData::Float(vec![0.0])));
    }

    #[test]
    fn mismatched_writes_are_reported() {
        let mut gl = HeadlessGl::default();
        let program = linked(&mut gl, "uniform vec3 v;\nuniform int i;\nvoid main() {}");
        write(&mut gl, program, 0, "vec4", WireSlice::Float(&[1.0; 4]), false);
        write(&mut gl, program, 1, "float", WireSlice::Float(&[1.0]), false);
        write(&mut gl, program, 0, "vec3", WireSlice::Float(&[1.0; 6]), false);
        assert_eq!(gl.take_messages().len(), 3);
        assert_eq!(gl.uniform_value(program, "v"), Some(&WireData::Float(vec![0.0; 3])));
    }

    #[test]
    fn bools_are_normalized() {
        let mut gl = HeadlessGl::default();
        let program = linked(&mut gl, "uniform bvec2 b;\nvoid main() {}");
        write(&mut gl, program, 0, "bvec2", WireSlice::Int(&[0, 42]), false);
        assert_eq!(gl.uniform_value(program, "b"), Some(&WireData::Int(vec![0, 1])));
    }

    #[test]
    fn transposed_matrix_is_stored_column_major() {
        let mut gl = HeadlessGl::default();
        let program = linked(&mut gl, "uniform mat2x3 m;\nvoid main() {}");
        // 2 columns, 3 rows, supplied row by row.
        write(&mut gl, program, 0, "mat2x3", WireSlice::Float(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]), true);
        assert_eq!(gl.uniform_value(program, "m"), Some(&WireData::Float(vec![1.0, 3.0, 5.0, 2.0, 4.0, 6.0])));
    }

    // ── pipelines, vertex arrays & textures ──────────────────────────────

    #[test]
    fn pipeline_stages_require_separable_programs() {
        let mut gl = HeadlessGl::default();
        let pipeline = gl.create_object(ObjectKind::ProgramPipeline);
        let program = linked(&mut gl, "void main() {}");
        gl.use_program_stages(pipeline, ProgramStages::VERTEX, program);
        assert_eq!(gl.pipeline_program(pipeline, ShaderStage::Vertex), None);
        assert_eq!(gl.take_messages().len(), 1);

        let shader = compiled(&mut gl, ShaderStage::Vertex, "void main() {}");
        let separable = gl.create_object(ObjectKind::Program);
        gl.program_separable(separable, true);
        gl.attach_shader(separable, shader);
        assert!(gl.link_program(separable).success);
        gl.use_program_stages(pipeline, ProgramStages::VERTEX | ProgramStages::FRAGMENT, separable);
        assert_eq!(gl.pipeline_program(pipeline, ShaderStage::Vertex), Some(separable));
        assert_eq!(gl.pipeline_program(pipeline, ShaderStage::Fragment), Some(separable));
        assert_eq!(gl.pipeline_program(pipeline, ShaderStage::Geometry), None);
    }

    #[test]
    fn vertex_attrib_locations_are_bounded() {
        let mut gl = HeadlessGl::new(HeadlessInit { max_vertex_attribs: 2, ..Default::default() });
        let vao = gl.create_object(ObjectKind::VertexArray);
        gl.enable_vertex_attrib(vao, 1);
        gl.enable_vertex_attrib(vao, 2);
        assert!(gl.vertex_attrib(vao, 1).is_some_and(|a| a.enabled));
        assert!(gl.vertex_attrib(vao, 2).is_none());
        assert_eq!(gl.messages().len(), 1);
    }

    #[test]
    fn texture_bindings_are_per_unit() {
        let mut gl = HeadlessGl::default();
        let texture = gl.create_object(ObjectKind::Texture);
        let target = BindTarget::Texture(crate::api::TextureTarget::Texture2D);
        gl.active_texture(2);
        gl.bind_object(target, texture);
        assert_eq!(gl.bound(target), texture);
        gl.active_texture(0);
        assert_eq!(gl.bound(target), 0);
    }

    #[test]
    fn mipmap_generation_needs_a_base_level() {
        let mut gl = HeadlessGl::default();
        let texture = gl.create_object(ObjectKind::Texture);
        gl.generate_mipmap(texture);
        assert_eq!(gl.mipmap_generations(texture), 0);
        assert_eq!(gl.messages().len(), 1);

        gl.texture_storage_2d(texture, 3, crate::api::InternalFormat::Rgba8, 4, 4);
        gl.generate_mipmap(texture);
        assert_eq!(gl.texture_storage_levels(texture), Some(3));
        assert_eq!(gl.mipmap_generations(texture), 1);
    }
}
