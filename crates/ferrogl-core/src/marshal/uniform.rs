use crate::math::{Matrix, MatrixElement};
use crate::types::{ElementType, MatrixType, ScalarType, VectorType};

use super::Primitive;

/// Wire element type of a uniform value.
pub type WireOf<U> = <<U as Uniform>::Element as Primitive>::Wire;

/// Host value with a fixed shading-language type.
///
/// The implementing type decides its [`ElementType`] at compile time, so the
/// dispatcher never inspects values at run time. Host types without an impl
/// cannot reach the driver at all.
pub trait Uniform: Copy + 'static {
    type Element: Primitive;
    const TYPE: ElementType;

    /// Appends `TYPE.component_count()` wire elements, vectors in XYZW order
    /// and matrices row by row.
    fn flatten_into(&self, out: &mut Vec<WireOf<Self>>);

    /// Rebuilds a value from exactly `TYPE.component_count()` wire elements.
    fn unflatten_from(wire: &[WireOf<Self>]) -> Self;
}

macro_rules! impl_scalar_uniform {
    ($($ty:ty),*) => {$(
        impl Uniform for $ty {
            type Element = $ty;
            const TYPE: ElementType = ElementType::Scalar(ScalarType::new(<$ty as Primitive>::KIND));

            #[inline]
            fn flatten_into(&self, out: &mut Vec<WireOf<Self>>) {
                out.push(self.encode());
            }

            #[inline]
            fn unflatten_from(wire: &[WireOf<Self>]) -> Self {
                <$ty as Primitive>::decode(wire[0])
            }
        }
    )*};
}

impl_scalar_uniform!(bool, i32, u32, f32, f64);

macro_rules! impl_vector_uniform {
    ($($n:literal),*) => {$(
        impl<P: Primitive> Uniform for [P; $n] {
            type Element = P;
            const TYPE: ElementType =
                ElementType::Vector(VectorType::new_unchecked(P::KIND, $n));

            fn flatten_into(&self, out: &mut Vec<WireOf<Self>>) {
                out.extend(self.iter().map(|c| c.encode()));
            }

            fn unflatten_from(wire: &[WireOf<Self>]) -> Self {
                std::array::from_fn(|i| P::decode(wire[i]))
            }
        }
    )*};
}

impl_vector_uniform!(2, 3, 4);

macro_rules! impl_matrix_uniform {
    ($(($c:literal, $r:literal)),*) => {$(
        impl<T: MatrixElement + Primitive> Uniform for Matrix<T, $c, $r> {
            type Element = T;
            const TYPE: ElementType =
                ElementType::Matrix(MatrixType::new_unchecked(T::KIND, $c, $r));

            fn flatten_into(&self, out: &mut Vec<WireOf<Self>>) {
                out.extend(self.iter().map(|v| v.encode()));
            }

            fn unflatten_from(wire: &[WireOf<Self>]) -> Self {
                Matrix::from_rows(std::array::from_fn(|r| {
                    std::array::from_fn(|c| T::decode(wire[r * $c + c]))
                }))
            }
        }
    )*};
}

impl_matrix_uniform!((2, 2), (2, 3), (2, 4), (3, 2), (3, 3), (3, 4), (4, 2), (4, 3), (4, 4));
