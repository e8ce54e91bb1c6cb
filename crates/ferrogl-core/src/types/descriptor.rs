use std::fmt;

use crate::error::{GlError, Result};

use super::ElementKind;

/// Single scalar value (`bool`, `int`, `uint`, `float`, `double`).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ScalarType {
    kind: ElementKind,
}

impl ScalarType {
    #[inline]
    pub const fn new(kind: ElementKind) -> Self {
        Self { kind }
    }

    #[inline]
    pub const fn kind(self) -> ElementKind {
        self.kind
    }

    #[inline]
    pub const fn total_size(self) -> usize {
        self.kind.byte_size()
    }

    #[inline]
    pub const fn layout_slots(self) -> usize {
        1
    }
}

/// Vector of 2 to 4 components of one element kind.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct VectorType {
    kind: ElementKind,
    components: u8,
}

impl VectorType {
    /// Returns `None` unless `components` is in `2..=4`.
    pub const fn new(kind: ElementKind, components: u8) -> Option<Self> {
        if components >= 2 && components <= 4 {
            Some(Self { kind, components })
        } else {
            None
        }
    }

    pub(crate) const fn new_unchecked(kind: ElementKind, components: u8) -> Self {
        Self { kind, components }
    }

    #[inline]
    pub const fn kind(self) -> ElementKind {
        self.kind
    }

    #[inline]
    pub const fn components(self) -> u8 {
        self.components
    }

    #[inline]
    pub const fn total_size(self) -> usize {
        self.kind.byte_size() * self.components as usize
    }

    /// A vector fits one 16-byte slot unless it holds more than two doubles.
    #[inline]
    pub const fn layout_slots(self) -> usize {
        if matches!(self.kind, ElementKind::Double) && self.components > 2 { 2 } else { 1 }
    }
}

/// Matrix of `columns` × `rows` floats or doubles (`matCxR`).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct MatrixType {
    kind: ElementKind,
    columns: u8,
    rows: u8,
}

impl MatrixType {
    /// Returns `None` for non-floating kinds or dimensions outside `2..=4`.
    pub const fn new(kind: ElementKind, columns: u8, rows: u8) -> Option<Self> {
        if kind.has_matrices() && columns >= 2 && columns <= 4 && rows >= 2 && rows <= 4 {
            Some(Self { kind, columns, rows })
        } else {
            None
        }
    }

    pub(crate) const fn new_unchecked(kind: ElementKind, columns: u8, rows: u8) -> Self {
        Self { kind, columns, rows }
    }

    #[inline]
    pub const fn kind(self) -> ElementKind {
        self.kind
    }

    #[inline]
    pub const fn columns(self) -> u8 {
        self.columns
    }

    #[inline]
    pub const fn rows(self) -> u8 {
        self.rows
    }

    #[inline]
    pub const fn total_size(self) -> usize {
        self.kind.byte_size() * self.columns as usize * self.rows as usize
    }

    /// One slot per column; a double column longer than two needs two.
    #[inline]
    pub const fn layout_slots(self) -> usize {
        let per_column = if matches!(self.kind, ElementKind::Double) && self.rows > 2 { 2 } else { 1 };
        self.columns as usize * per_column
    }
}

/// Any non-array type: the unit the marshalling layer flattens.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ElementType {
    Scalar(ScalarType),
    Vector(VectorType),
    Matrix(MatrixType),
}

const fn s(kind: ElementKind) -> ElementType {
    ElementType::Scalar(ScalarType::new(kind))
}

const fn v(kind: ElementKind, n: u8) -> ElementType {
    ElementType::Vector(VectorType::new_unchecked(kind, n))
}

const fn m(kind: ElementKind, columns: u8, rows: u8) -> ElementType {
    ElementType::Matrix(MatrixType::new_unchecked(kind, columns, rows))
}

use ElementKind::{Bool, Double, Float, Int, UInt};

impl ElementType {
    /// Every scalar, vector and matrix type the registry knows about.
    pub const SUPPORTED: [ElementType; 38] = [
        s(Bool), s(Int), s(UInt), s(Float), s(Double),
        v(Bool, 2), v(Bool, 3), v(Bool, 4),
        v(Int, 2), v(Int, 3), v(Int, 4),
        v(UInt, 2), v(UInt, 3), v(UInt, 4),
        v(Float, 2), v(Float, 3), v(Float, 4),
        v(Double, 2), v(Double, 3), v(Double, 4),
        m(Float, 2, 2), m(Float, 2, 3), m(Float, 2, 4),
        m(Float, 3, 2), m(Float, 3, 3), m(Float, 3, 4),
        m(Float, 4, 2), m(Float, 4, 3), m(Float, 4, 4),
        m(Double, 2, 2), m(Double, 2, 3), m(Double, 2, 4),
        m(Double, 3, 2), m(Double, 3, 3), m(Double, 3, 4),
        m(Double, 4, 2), m(Double, 4, 3), m(Double, 4, 4),
    ];

    #[inline]
    pub const fn kind(self) -> ElementKind {
        match self {
            ElementType::Scalar(t) => t.kind(),
            ElementType::Vector(t) => t.kind(),
            ElementType::Matrix(t) => t.kind(),
        }
    }

    #[inline]
    pub const fn element_size(self) -> usize {
        self.kind().byte_size()
    }

    /// Number of primitive elements in one value.
    #[inline]
    pub const fn component_count(self) -> usize {
        match self {
            ElementType::Scalar(_) => 1,
            ElementType::Vector(t) => t.components() as usize,
            ElementType::Matrix(t) => t.columns() as usize * t.rows() as usize,
        }
    }

    #[inline]
    pub const fn total_size(self) -> usize {
        match self {
            ElementType::Scalar(t) => t.total_size(),
            ElementType::Vector(t) => t.total_size(),
            ElementType::Matrix(t) => t.total_size(),
        }
    }

    #[inline]
    pub const fn layout_slots(self) -> usize {
        match self {
            ElementType::Scalar(t) => t.layout_slots(),
            ElementType::Vector(t) => t.layout_slots(),
            ElementType::Matrix(t) => t.layout_slots(),
        }
    }

    pub fn glsl_name(self) -> String {
        self.to_string()
    }

    /// Resolves a shading-language keyword (`float`, `uvec3`, `mat4x2`, `dmat3`, ...).
    pub fn parse(name: &str) -> Result<Self> {
        let name = name.trim();
        if let Some(kind) = ElementKind::ALL.into_iter().find(|k| k.scalar_name() == name) {
            return Ok(s(kind));
        }

        let unsupported = || GlError::unsupported(name, "not a scalar, vector or matrix type");

        if let Some(at) = name.find("vec") {
            let kind = ElementKind::from_prefix(&name[..at]).ok_or_else(unsupported)?;
            let n = parse_dim(&name[at + 3..]).ok_or_else(unsupported)?;
            return VectorType::new(kind, n).map(ElementType::Vector).ok_or_else(unsupported);
        }

        if let Some(at) = name.find("mat") {
            let kind = ElementKind::from_prefix(&name[..at]).ok_or_else(unsupported)?;
            let dims = &name[at + 3..];
            let (columns, rows) = match dims.split_once('x') {
                Some((c, r)) => (parse_dim(c), parse_dim(r)),
                None => (parse_dim(dims), parse_dim(dims)),
            };
            let (Some(columns), Some(rows)) = (columns, rows) else {
                return Err(unsupported());
            };
            return MatrixType::new(kind, columns, rows)
                .map(ElementType::Matrix)
                .ok_or_else(unsupported);
        }

        Err(unsupported())
    }
}

fn parse_dim(s: &str) -> Option<u8> {
    match s {
        "2" => Some(2),
        "3" => Some(3),
        "4" => Some(4),
        _ => None,
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementType::Scalar(t) => f.write_str(t.kind().scalar_name()),
            ElementType::Vector(t) => write!(f, "{}vec{}", t.kind().prefix(), t.components()),
            ElementType::Matrix(t) if t.columns() == t.rows() => {
                write!(f, "{}mat{}", t.kind().prefix(), t.columns())
            }
            ElementType::Matrix(t) => {
                write!(f, "{}mat{}x{}", t.kind().prefix(), t.columns(), t.rows())
            }
        }
    }
}

/// Fixed-length array of a non-array type.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ArrayType {
    element: ElementType,
    length: usize,
}

impl ArrayType {
    /// Returns `None` for zero-length arrays and for lengths whose byte size
    /// does not fit in `usize`. Slot and component counts never exceed the
    /// byte size, so every accessor stays in range.
    pub const fn new(element: ElementType, length: usize) -> Option<Self> {
        if length == 0 || element.total_size().checked_mul(length).is_none() {
            return None;
        }
        Some(Self { element, length })
    }

    #[inline]
    pub const fn element(self) -> ElementType {
        self.element
    }

    #[inline]
    pub const fn length(self) -> usize {
        self.length
    }

    #[inline]
    pub const fn total_size(self) -> usize {
        self.element.total_size() * self.length
    }

    #[inline]
    pub const fn layout_slots(self) -> usize {
        self.element.layout_slots() * self.length
    }
}

/// Immutable description of a shading-language value type.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TypeDescriptor {
    Scalar(ScalarType),
    Vector(VectorType),
    Matrix(MatrixType),
    Array(ArrayType),
}

impl TypeDescriptor {
    /// The non-array part of the type (the array element for arrays).
    pub const fn element_type(self) -> ElementType {
        match self {
            TypeDescriptor::Scalar(t) => ElementType::Scalar(t),
            TypeDescriptor::Vector(t) => ElementType::Vector(t),
            TypeDescriptor::Matrix(t) => ElementType::Matrix(t),
            TypeDescriptor::Array(t) => t.element(),
        }
    }

    #[inline]
    pub const fn kind(self) -> ElementKind {
        self.element_type().kind()
    }

    #[inline]
    pub const fn element_size(self) -> usize {
        self.kind().byte_size()
    }

    /// Primitive elements per value (per array element for arrays).
    #[inline]
    pub const fn component_count(self) -> usize {
        self.element_type().component_count()
    }

    /// `None` for non-array types.
    pub const fn array_length(self) -> Option<usize> {
        match self {
            TypeDescriptor::Array(t) => Some(t.length()),
            _ => None,
        }
    }

    /// Primitive elements in the whole value, arrays included.
    #[inline]
    pub const fn flat_len(self) -> usize {
        match self {
            TypeDescriptor::Array(t) => t.element().component_count() * t.length(),
            _ => self.component_count(),
        }
    }

    pub const fn total_size(self) -> usize {
        match self {
            TypeDescriptor::Array(t) => t.total_size(),
            _ => self.element_type().total_size(),
        }
    }

    pub const fn layout_slots(self) -> usize {
        match self {
            TypeDescriptor::Array(t) => t.layout_slots(),
            _ => self.element_type().layout_slots(),
        }
    }

    pub fn glsl_name(self) -> String {
        self.to_string()
    }

    /// Resolves a shading-language type name, with at most one `[N]` suffix.
    pub fn parse(name: &str) -> Result<Self> {
        let name = name.trim();
        let Some(open) = name.find('[') else {
            return ElementType::parse(name).map(Into::into);
        };

        let (base, suffix) = (name[..open].trim_end(), &name[open + 1..]);
        let Some(length) = suffix.strip_suffix(']') else {
            return Err(GlError::unsupported(name, "unterminated array suffix"));
        };
        if length.contains('[') || length.contains(']') {
            return Err(GlError::unsupported(name, "arrays of arrays are not supported"));
        }
        let length: usize = length
            .trim()
            .parse()
            .map_err(|_| GlError::unsupported(name, "array length is not an integer literal"))?;

        let element = ElementType::parse(base)?;
        if length == 0 {
            return Err(GlError::unsupported(name, "array length must be at least 1"));
        }
        ArrayType::new(element, length)
            .map(TypeDescriptor::Array)
            .ok_or_else(|| GlError::unsupported(name, format!("array length {length} overflows the byte size")))
    }
}

impl From<ElementType> for TypeDescriptor {
    fn from(element: ElementType) -> Self {
        match element {
            ElementType::Scalar(t) => TypeDescriptor::Scalar(t),
            ElementType::Vector(t) => TypeDescriptor::Vector(t),
            ElementType::Matrix(t) => TypeDescriptor::Matrix(t),
        }
    }
}

impl From<ArrayType> for TypeDescriptor {
    fn from(array: ArrayType) -> Self {
        TypeDescriptor::Array(array)
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Array(t) => write!(f, "{}[{}]", t.element(), t.length()),
            _ => fmt::Display::fmt(&self.element_type(), f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vector(kind: ElementKind, n: u8) -> VectorType {
        VectorType::new(kind, n).unwrap()
    }

    fn matrix(kind: ElementKind, columns: u8, rows: u8) -> MatrixType {
        MatrixType::new(kind, columns, rows).unwrap()
    }

    // ── layout slots ──────────────────────────────────────────────────────

    #[test]
    fn double_vectors_wider_than_two_take_two_slots() {
        assert_eq!(vector(Double, 2).layout_slots(), 1);
        assert_eq!(vector(Double, 3).layout_slots(), 2);
        assert_eq!(vector(Double, 4).layout_slots(), 2);
    }

    #[test]
    fn single_precision_vectors_take_one_slot() {
        for kind in [Bool, Int, UInt, Float] {
            for n in 2..=4 {
                assert_eq!(vector(kind, n).layout_slots(), 1, "{kind:?} x{n}");
            }
        }
    }

    #[test]
    fn scalars_take_one_slot() {
        for kind in ElementKind::ALL {
            assert_eq!(ScalarType::new(kind).layout_slots(), 1);
        }
    }

    #[test]
    fn matrix_slots_follow_column_rule() {
        assert_eq!(matrix(Double, 4, 4).layout_slots(), 8);
        assert_eq!(matrix(Float, 4, 4).layout_slots(), 4);
        assert_eq!(matrix(Double, 2, 2).layout_slots(), 2);
        // dmat2x3: two columns of three doubles.
        assert_eq!(matrix(Double, 2, 3).layout_slots(), 4);
        // dmat3x2: three columns of two doubles.
        assert_eq!(matrix(Double, 3, 2).layout_slots(), 3);
        assert_eq!(matrix(Float, 3, 4).layout_slots(), 3);
    }

    #[test]
    fn array_slots_multiply_by_length() {
        let array = ArrayType::new(ElementType::Vector(vector(Double, 3)), 5).unwrap();
        assert_eq!(array.layout_slots(), 10);
        let array = ArrayType::new(ElementType::Matrix(matrix(Float, 4, 4)), 3).unwrap();
        assert_eq!(array.layout_slots(), 12);
    }

    // ── sizes ─────────────────────────────────────────────────────────────

    #[test]
    fn total_sizes() {
        assert_eq!(ScalarType::new(Bool).total_size(), 4);
        assert_eq!(vector(Float, 3).total_size(), 12);
        assert_eq!(vector(Double, 4).total_size(), 32);
        assert_eq!(matrix(Float, 2, 3).total_size(), 24);
        assert_eq!(matrix(Double, 4, 4).total_size(), 128);

        let array: TypeDescriptor =
            ArrayType::new(ElementType::Vector(vector(Float, 2)), 4).unwrap().into();
        assert_eq!(array.total_size(), 32);
        assert_eq!(array.flat_len(), 8);
        assert_eq!(array.component_count(), 2);
    }

    #[test]
    fn invalid_shapes_are_rejected() {
        assert!(VectorType::new(Float, 1).is_none());
        assert!(VectorType::new(Float, 5).is_none());
        assert!(MatrixType::new(Int, 2, 2).is_none());
        assert!(MatrixType::new(Bool, 3, 3).is_none());
        assert!(MatrixType::new(Float, 1, 4).is_none());
        assert!(ArrayType::new(s(Float), 0).is_none());
    }

    #[test]
    fn registry_has_every_type_once() {
        let all = ElementType::SUPPORTED;
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a, b);
            }
        }
        let matrices = all.iter().filter(|t| matches!(t, ElementType::Matrix(_))).count();
        assert_eq!(matrices, 18);
    }

    // ── names ─────────────────────────────────────────────────────────────

    #[test]
    fn glsl_names() {
        assert_eq!(s(UInt).glsl_name(), "uint");
        assert_eq!(v(Bool, 3).glsl_name(), "bvec3");
        assert_eq!(v(Bool, 4).glsl_name(), "bvec4");
        assert_eq!(v(Float, 3).glsl_name(), "vec3");
        assert_eq!(m(Float, 4, 4).glsl_name(), "mat4");
        assert_eq!(m(Double, 2, 4).glsl_name(), "dmat2x4");
        let array: TypeDescriptor = ArrayType::new(v(Int, 2), 8).unwrap().into();
        assert_eq!(array.glsl_name(), "ivec2[8]");
    }

    #[test]
    fn names_parse_back_for_every_supported_type() {
        for element in ElementType::SUPPORTED {
            assert_eq!(ElementType::parse(&element.glsl_name()).unwrap(), element);
        }
    }

    #[test]
    fn parse_accepts_long_square_matrix_names_and_arrays() {
        assert_eq!(ElementType::parse("mat3x3").unwrap(), m(Float, 3, 3));
        let parsed = TypeDescriptor::parse("dvec3[ 4 ]").unwrap();
        assert_eq!(parsed.array_length(), Some(4));
        assert_eq!(parsed.element_type(), v(Double, 3));
        assert_eq!(parsed.layout_slots(), 8);
    }

    #[test]
    fn parse_rejects_unknown_names() {
        for name in ["vec5", "imat2", "sampler2D", "float[0]", "vec2[2][2]", "mat4[", "half"] {
            let err = TypeDescriptor::parse(name).unwrap_err();
            assert!(matches!(err, GlError::UnsupportedType { .. }), "{name}: {err}");
        }
    }

    #[test]
    fn oversized_arrays_are_rejected_before_any_query() {
        assert!(ArrayType::new(m(Double, 4, 4), usize::MAX / 128 + 1).is_none());
        let largest = ArrayType::new(m(Double, 4, 4), usize::MAX / 128).unwrap();
        assert_eq!(largest.total_size(), usize::MAX / 128 * 128);
        assert!(largest.layout_slots() <= largest.total_size());

        for name in ["dmat4[1152921504606846976]", "dvec4[18446744073709551615]"] {
            let err = TypeDescriptor::parse(name).unwrap_err();
            assert!(err.to_string().contains("overflows"), "{name}: {err}");
        }
    }
}
