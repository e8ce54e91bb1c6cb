use crate::api::VertexAttribType;

/// Host scalar that can be read as a vertex attribute component.
pub trait VertexScalar: Copy + 'static {
    const TYPE: VertexAttribType;
}

/// Host type describing a whole vertex attribute (a scalar or 2..=4 vector).
pub trait VertexFormat {
    const COMPONENTS: u8;
    const TYPE: VertexAttribType;
}

macro_rules! impl_vertex_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {$(
        impl VertexScalar for $ty {
            const TYPE: VertexAttribType = VertexAttribType::$variant;
        }

        impl VertexFormat for $ty {
            const COMPONENTS: u8 = 1;
            const TYPE: VertexAttribType = VertexAttribType::$variant;
        }
    )*};
}

impl_vertex_scalar!(
    i8 => Byte,
    u8 => UnsignedByte,
    i16 => Short,
    u16 => UnsignedShort,
    i32 => Int,
    u32 => UnsignedInt,
    f32 => Float,
    f64 => Double,
);

macro_rules! impl_vertex_vector {
    ($($n:literal),*) => {$(
        impl<T: VertexScalar> VertexFormat for [T; $n] {
            const COMPONENTS: u8 = $n;
            const TYPE: VertexAttribType = T::TYPE;
        }
    )*};
}

impl_vertex_vector!(2, 3, 4);

/// One attribute declaration: where it goes and how to read it.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct VertexAttribute {
    location: u32,
    components: u8,
    ty: VertexAttribType,
    normalized: bool,
}

impl VertexAttribute {
    /// Returns `None` unless `components` is in `1..=4`.
    pub const fn new(location: u32, components: u8, ty: VertexAttribType) -> Option<Self> {
        if components >= 1 && components <= 4 {
            Some(Self { location, components, ty, normalized: false })
        } else {
            None
        }
    }

    /// Attribute whose shape comes from a host type, e.g. `[f32; 3]`.
    pub const fn of<T: VertexFormat>(location: u32) -> Self {
        Self { location, components: T::COMPONENTS, ty: T::TYPE, normalized: false }
    }

    /// Integer data is mapped to `[0, 1]` / `[-1, 1]` when read as float.
    #[must_use]
    pub const fn normalized(mut self) -> Self {
        self.normalized = true;
        self
    }

    #[inline]
    pub const fn location(&self) -> u32 {
        self.location
    }

    #[inline]
    pub const fn components(&self) -> u8 {
        self.components
    }

    #[inline]
    pub const fn ty(&self) -> VertexAttribType {
        self.ty
    }

    #[inline]
    pub const fn is_normalized(&self) -> bool {
        self.normalized
    }

    /// Bytes this attribute occupies in one vertex record.
    #[inline]
    pub const fn size(&self) -> u32 {
        self.components as u32 * self.ty.byte_size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_from_host_type() {
        let position = VertexAttribute::of::<[f32; 3]>(0);
        assert_eq!(position.components(), 3);
        assert_eq!(position.ty(), VertexAttribType::Float);
        assert_eq!(position.size(), 12);

        let color = VertexAttribute::of::<[u8; 4]>(2).normalized();
        assert!(color.is_normalized());
        assert_eq!(color.size(), 4);

        assert_eq!(VertexAttribute::of::<f64>(1).size(), 8);
        assert_eq!(VertexAttribute::of::<[i16; 2]>(3).ty(), VertexAttribType::Short);
    }

    #[test]
    fn component_count_is_checked() {
        assert!(VertexAttribute::new(0, 0, VertexAttribType::Float).is_none());
        assert!(VertexAttribute::new(0, 5, VertexAttribType::Float).is_none());
        assert_eq!(VertexAttribute::new(0, 4, VertexAttribType::Int).map(|a| a.size()), Some(16));
    }
}
