use crate::types::ElementKind;

use super::WireElement;

/// Host scalar with a fixed wire encoding.
///
/// `bool` has no native wire form: it travels as an `i32` holding 1 or 0,
/// and any nonzero value decodes back to `true`.
pub trait Primitive: Copy + PartialEq + std::fmt::Debug + 'static {
    const KIND: ElementKind;
    type Wire: WireElement;

    fn encode(self) -> Self::Wire;
    fn decode(wire: Self::Wire) -> Self;
}

macro_rules! impl_identity_primitive {
    ($($ty:ty => $kind:ident),* $(,)?) => {$(
        impl Primitive for $ty {
            const KIND: ElementKind = ElementKind::$kind;
            type Wire = $ty;

            #[inline]
            fn encode(self) -> Self::Wire {
                self
            }

            #[inline]
            fn decode(wire: Self::Wire) -> Self {
                wire
            }
        }
    )*};
}

impl_identity_primitive!(i32 => Int, u32 => UInt, f32 => Float, f64 => Double);

impl Primitive for bool {
    const KIND: ElementKind = ElementKind::Bool;
    type Wire = i32;

    #[inline]
    fn encode(self) -> i32 {
        i32::from(self)
    }

    #[inline]
    fn decode(wire: i32) -> bool {
        wire != 0
    }
}
