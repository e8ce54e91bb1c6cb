/// Component type of a vertex attribute as stored in the source buffer.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum VertexAttribType {
    Byte,
    UnsignedByte,
    Short,
    UnsignedShort,
    Int,
    UnsignedInt,
    Float,
    Double,
}

impl VertexAttribType {
    #[inline]
    pub const fn byte_size(self) -> u32 {
        match self {
            VertexAttribType::Byte | VertexAttribType::UnsignedByte => 1,
            VertexAttribType::Short | VertexAttribType::UnsignedShort => 2,
            VertexAttribType::Int | VertexAttribType::UnsignedInt | VertexAttribType::Float => 4,
            VertexAttribType::Double => 8,
        }
    }
}

/// Format registered for one attribute location.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct AttribFormat {
    pub components: u8,
    pub ty: VertexAttribType,
    pub normalized: bool,
    /// Byte offset of the attribute inside one vertex record.
    pub relative_offset: u32,
}
