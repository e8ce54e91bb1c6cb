/// Base element kind of a shading-language value.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ElementKind {
    Bool,
    Int,
    UInt,
    Float,
    Double,
}

impl ElementKind {
    pub const ALL: [ElementKind; 5] = [
        ElementKind::Bool,
        ElementKind::Int,
        ElementKind::UInt,
        ElementKind::Float,
        ElementKind::Double,
    ];

    /// Size of one element on the wire, in bytes.
    ///
    /// Booleans have no native wire form and travel as 4-byte integers.
    #[inline]
    pub const fn byte_size(self) -> usize {
        match self {
            ElementKind::Bool | ElementKind::Int | ElementKind::UInt | ElementKind::Float => 4,
            ElementKind::Double => 8,
        }
    }

    /// Primitive buffer kind used to carry this element.
    #[inline]
    pub const fn wire_kind(self) -> WireKind {
        match self {
            ElementKind::Bool | ElementKind::Int => WireKind::Int,
            ElementKind::UInt => WireKind::UInt,
            ElementKind::Float => WireKind::Float,
            ElementKind::Double => WireKind::Double,
        }
    }

    /// Only floating-point kinds have matrix types.
    #[inline]
    pub const fn has_matrices(self) -> bool {
        matches!(self, ElementKind::Float | ElementKind::Double)
    }

    /// Shading-language scalar keyword.
    pub const fn scalar_name(self) -> &'static str {
        match self {
            ElementKind::Bool => "bool",
            ElementKind::Int => "int",
            ElementKind::UInt => "uint",
            ElementKind::Float => "float",
            ElementKind::Double => "double",
        }
    }

    /// Prefix used by vector and matrix keywords (`ivec3`, `dmat4`, ...).
    pub(crate) const fn prefix(self) -> &'static str {
        match self {
            ElementKind::Bool => "b",
            ElementKind::Int => "i",
            ElementKind::UInt => "u",
            ElementKind::Float => "",
            ElementKind::Double => "d",
        }
    }

    pub(crate) fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "b" => Some(ElementKind::Bool),
            "i" => Some(ElementKind::Int),
            "u" => Some(ElementKind::UInt),
            "" => Some(ElementKind::Float),
            "d" => Some(ElementKind::Double),
            _ => None,
        }
    }
}

/// Primitive element kind of a flat wire buffer.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum WireKind {
    Int,
    UInt,
    Float,
    Double,
}

impl WireKind {
    pub const fn name(self) -> &'static str {
        match self {
            WireKind::Int => "i32",
            WireKind::UInt => "u32",
            WireKind::Float => "f32",
            WireKind::Double => "f64",
        }
    }

    /// Suffix of the matching `glProgramUniform*` entry point.
    pub(crate) const fn suffix(self) -> &'static str {
        match self {
            WireKind::Int => "i",
            WireKind::UInt => "ui",
            WireKind::Float => "f",
            WireKind::Double => "d",
        }
    }
}
