use crate::api::{
    AttribFormat, BindTarget, BufferUsage, InternalFormat, ObjectKind, ProgramStages, StorageFlags, TextureParameter,
    TextureTarget, UniformTarget,
};

/// One recorded driver call, in issue order.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateObject { kind: ObjectKind, handle: u32 },
    DeleteObject { kind: ObjectKind, handle: u32 },
    BindObject { target: BindTarget, handle: u32 },
    BufferData { buffer: u32, len: usize, usage: BufferUsage },
    BufferStorage { buffer: u32, len: usize, flags: StorageFlags },
    ShaderSource { shader: u32 },
    CompileShader { shader: u32, success: bool },
    AttachShader { program: u32, shader: u32 },
    DetachShader { program: u32, shader: u32 },
    ProgramSeparable { program: u32, separable: bool },
    LinkProgram { program: u32, success: bool },
    UniformLocation { program: u32, name: String },
    ProgramUniform { target: UniformTarget, entry_point: String, count: usize },
    GetUniform { target: UniformTarget, len: usize },
    UseProgramStages { pipeline: u32, stages: ProgramStages, program: u32 },
    EnableVertexAttrib { vao: u32, location: u32 },
    VertexAttribFormat { vao: u32, location: u32, format: AttribFormat },
    VertexAttribBinding { vao: u32, location: u32, binding: u32 },
    VertexBuffer { vao: u32, binding: u32, buffer: u32, offset: usize, stride: u32 },
    ActiveTexture { unit: u32 },
    TextureParameter { texture: u32, parameter: TextureParameter },
    GenerateMipmap { texture: u32 },
    TextureImage { texture: u32, target: TextureTarget, level: u32, dimensions: Vec<u32> },
    TextureStorage2D { texture: u32, levels: u32, format: InternalFormat, width: u32, height: u32 },
}

/// A condition a real driver would report through its debug output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverMessage {
    /// Entry point that raised it, e.g. `glDeleteBuffers`.
    pub call: &'static str,
    pub text: String,
}
