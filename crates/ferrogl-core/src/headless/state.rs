use std::collections::{BTreeMap, HashMap};

use crate::api::{
    AttribFormat, InternalFormat, ObjectKind, PixelFormat, PixelType, ShaderStage, TextureParameter, TextureTarget,
};
use crate::marshal::WireData;
use crate::types::TypeDescriptor;

use super::glsl::UniformDecl;

/// Per-location vertex attribute state of a vertex array.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct VertexAttribState {
    pub enabled: bool,
    pub format: Option<AttribFormat>,
    pub binding: Option<u32>,
}

/// Buffer bound to a vertex array binding point.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct VertexBufferBinding {
    pub buffer: u32,
    pub offset: usize,
    pub stride: u32,
}

/// One uploaded texture image level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureLevel {
    pub target: TextureTarget,
    pub internal_format: InternalFormat,
    pub format: PixelFormat,
    pub pixel_type: PixelType,
    pub dimensions: Vec<u32>,
    pub data: Vec<u8>,
}

#[derive(Debug, Default)]
pub(crate) struct BufferObject {
    pub data: Vec<u8>,
    pub immutable: bool,
}

#[derive(Debug)]
pub(crate) struct ShaderObject {
    pub stage: ShaderStage,
    pub source: String,
    pub compiled: bool,
    pub uniforms: Vec<UniformDecl>,
    pub attachments: usize,
    pub pending_delete: bool,
}

/// A linked uniform: one location per array element.
#[derive(Debug)]
pub(crate) struct ActiveUniform {
    pub name: String,
    pub ty: TypeDescriptor,
    pub location: i32,
    pub values: WireData,
}

impl ActiveUniform {
    pub fn len(&self) -> usize {
        self.ty.array_length().unwrap_or(1)
    }

    /// Element index addressed by `location`, if it falls inside this uniform.
    pub fn element_at(&self, location: i32) -> Option<usize> {
        let index = usize::try_from(location.checked_sub(self.location)?).ok()?;
        (index < self.len()).then_some(index)
    }
}

#[derive(Debug, Default)]
pub(crate) struct ProgramObject {
    pub attached: Vec<u32>,
    pub separable: bool,
    pub linked: bool,
    pub uniforms: Vec<ActiveUniform>,
}

#[derive(Debug, Default)]
pub(crate) struct PipelineObject {
    pub stages: HashMap<ShaderStage, u32>,
}

#[derive(Debug, Default)]
pub(crate) struct VertexArrayObject {
    pub attribs: BTreeMap<u32, VertexAttribState>,
    pub buffers: BTreeMap<u32, VertexBufferBinding>,
}

#[derive(Debug, Copy, Clone)]
pub(crate) struct TextureStorage {
    pub levels: u32,
}

#[derive(Debug, Default)]
pub(crate) struct TextureObject {
    pub levels: BTreeMap<u32, TextureLevel>,
    pub parameters: Vec<TextureParameter>,
    pub storage: Option<TextureStorage>,
    pub mipmap_generations: u32,
}

#[derive(Debug)]
pub(crate) enum Object {
    Buffer(BufferObject),
    Shader(ShaderObject),
    Program(ProgramObject),
    Pipeline(PipelineObject),
    VertexArray(VertexArrayObject),
    Texture(TextureObject),
}

impl Object {
    pub fn new(kind: ObjectKind) -> Self {
        match kind {
            ObjectKind::Buffer => Object::Buffer(BufferObject::default()),
            ObjectKind::Shader(stage) => Object::Shader(ShaderObject {
                stage,
                source: String::new(),
                compiled: false,
                uniforms: Vec::new(),
                attachments: 0,
                pending_delete: false,
            }),
            ObjectKind::Program => Object::Program(ProgramObject::default()),
            ObjectKind::ProgramPipeline => Object::Pipeline(PipelineObject::default()),
            ObjectKind::VertexArray => Object::VertexArray(VertexArrayObject::default()),
            ObjectKind::Texture => Object::Texture(TextureObject::default()),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Object::Buffer(_) => ObjectKind::Buffer.name(),
            Object::Shader(s) => ObjectKind::Shader(s.stage).name(),
            Object::Program(_) => ObjectKind::Program.name(),
            Object::Pipeline(_) => ObjectKind::ProgramPipeline.name(),
            Object::VertexArray(_) => ObjectKind::VertexArray.name(),
            Object::Texture(_) => ObjectKind::Texture.name(),
        }
    }
}
