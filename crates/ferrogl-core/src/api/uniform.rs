use crate::error::{GlError, Result};
use crate::marshal::WireSlice;
use crate::types::{ElementType, WireKind};

/// Explicit destination of a uniform transfer.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct UniformTarget {
    pub program: u32,
    pub location: i32,
}

/// Shape of one element of a uniform write.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum UniformShape {
    /// 1..=4 components; scalars are one-component vectors.
    Vector { components: u8 },
    Matrix { columns: u8, rows: u8, transpose: bool },
}

impl UniformShape {
    #[inline]
    pub const fn components(self) -> usize {
        match self {
            UniformShape::Vector { components } => components as usize,
            UniformShape::Matrix { columns, rows, .. } => columns as usize * rows as usize,
        }
    }
}

/// A typed `glProgramUniform*` call: shape, wire data and element count.
///
/// Construction guarantees the data is non-empty and a whole number of
/// elements of `shape`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct UniformWrite<'a> {
    shape: UniformShape,
    data: WireSlice<'a>,
}

impl<'a> UniformWrite<'a> {
    pub fn new(element: ElementType, data: WireSlice<'a>, transpose: bool) -> Result<Self> {
        let shape = match element {
            ElementType::Scalar(_) => UniformShape::Vector { components: 1 },
            ElementType::Vector(v) => UniformShape::Vector { components: v.components() },
            ElementType::Matrix(m) => UniformShape::Matrix { columns: m.columns(), rows: m.rows(), transpose },
        };

        let expected = element.kind().wire_kind();
        if data.kind() != expected {
            return Err(GlError::unsupported(
                element.glsl_name(),
                format!("expected {} wire data, got {}", expected.name(), data.kind().name()),
            ));
        }
        let n = shape.components();
        if data.is_empty() || data.len() % n != 0 {
            return Err(GlError::unsupported(
                element.glsl_name(),
                format!("{} wire elements do not form whole values of {n}", data.len()),
            ));
        }

        Ok(Self { shape, data })
    }

    #[inline]
    pub fn shape(&self) -> UniformShape {
        self.shape
    }

    #[inline]
    pub fn data(&self) -> WireSlice<'a> {
        self.data
    }

    #[inline]
    pub fn kind(&self) -> WireKind {
        self.data.kind()
    }

    /// Number of uniform elements written (array length, 1 for plain values).
    #[inline]
    pub fn count(&self) -> usize {
        self.data.len() / self.shape.components()
    }

    /// Name of the narrowest driver entry point for this write.
    pub fn entry_point(&self) -> String {
        let suffix = self.kind().suffix();
        match self.shape {
            UniformShape::Vector { components } => format!("glProgramUniform{components}{suffix}v"),
            UniformShape::Matrix { columns, rows, .. } if columns == rows => {
                format!("glProgramUniformMatrix{columns}{suffix}v")
            }
            UniformShape::Matrix { columns, rows, .. } => {
                format!("glProgramUniformMatrix{columns}x{rows}{suffix}v")
            }
        }
    }
}
