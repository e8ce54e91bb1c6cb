use bitflags::bitflags;

/// Programmable pipeline stage a shader is compiled for.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Vertex,
    TessControl,
    TessEvaluation,
    Geometry,
    Fragment,
    Compute,
}

impl ShaderStage {
    pub const ALL: [ShaderStage; 6] = [
        ShaderStage::Vertex,
        ShaderStage::TessControl,
        ShaderStage::TessEvaluation,
        ShaderStage::Geometry,
        ShaderStage::Fragment,
        ShaderStage::Compute,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::TessControl => "tessellation control",
            ShaderStage::TessEvaluation => "tessellation evaluation",
            ShaderStage::Geometry => "geometry",
            ShaderStage::Fragment => "fragment",
            ShaderStage::Compute => "compute",
        }
    }

    /// Pipeline stage bit matching this shader stage.
    pub const fn stage_bit(self) -> ProgramStages {
        match self {
            ShaderStage::Vertex => ProgramStages::VERTEX,
            ShaderStage::TessControl => ProgramStages::TESS_CONTROL,
            ShaderStage::TessEvaluation => ProgramStages::TESS_EVALUATION,
            ShaderStage::Geometry => ProgramStages::GEOMETRY,
            ShaderStage::Fragment => ProgramStages::FRAGMENT,
            ShaderStage::Compute => ProgramStages::COMPUTE,
        }
    }
}

bitflags! {
    /// Stage mask for `use_program_stages`.
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
    pub struct ProgramStages: u32 {
        const VERTEX          = 0x01;
        const FRAGMENT        = 0x02;
        const GEOMETRY        = 0x04;
        const TESS_CONTROL    = 0x08;
        const TESS_EVALUATION = 0x10;
        const COMPUTE         = 0x20;
    }
}

/// Kind of driver object a handle names.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ObjectKind {
    Buffer,
    Shader(ShaderStage),
    Program,
    ProgramPipeline,
    VertexArray,
    Texture,
}

impl ObjectKind {
    pub const fn name(self) -> &'static str {
        match self {
            ObjectKind::Buffer => "buffer",
            ObjectKind::Shader(_) => "shader",
            ObjectKind::Program => "program",
            ObjectKind::ProgramPipeline => "program pipeline",
            ObjectKind::VertexArray => "vertex array",
            ObjectKind::Texture => "texture",
        }
    }
}

/// Memory binding a buffer is attached to.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BufferTarget {
    Array,
    ElementArray,
    Uniform,
    ShaderStorage,
    CopyRead,
    CopyWrite,
    PixelPack,
    PixelUnpack,
    DrawIndirect,
}

/// Slot an object is bound to. Binding handle 0 clears the slot.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BindTarget {
    Buffer(BufferTarget),
    /// The standalone program in use.
    Program,
    ProgramPipeline,
    VertexArray,
    /// Texture target on the active texture unit.
    Texture(super::TextureTarget),
}

/// Usage hint for a mutable buffer store.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum BufferUsage {
    StreamDraw,
    StreamRead,
    StreamCopy,
    #[default]
    StaticDraw,
    StaticRead,
    StaticCopy,
    DynamicDraw,
    DynamicRead,
    DynamicCopy,
}

bitflags! {
    /// Usage flags of an immutable buffer store.
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
    pub struct StorageFlags: u32 {
        const MAP_READ        = 0x0001;
        const MAP_WRITE       = 0x0002;
        const MAP_PERSISTENT  = 0x0040;
        const MAP_COHERENT    = 0x0080;
        const DYNAMIC_STORAGE = 0x0100;
        const CLIENT_STORAGE  = 0x0200;
    }
}

impl StorageFlags {
    /// Returns the first rule the flag set breaks, if any.
    pub fn violation(self) -> Option<&'static str> {
        if self.contains(Self::MAP_PERSISTENT) && !self.intersects(Self::MAP_READ | Self::MAP_WRITE) {
            return Some("MAP_PERSISTENT requires MAP_READ or MAP_WRITE");
        }
        if self.contains(Self::MAP_COHERENT) && !self.contains(Self::MAP_PERSISTENT) {
            return Some("MAP_COHERENT requires MAP_PERSISTENT");
        }
        None
    }
}
