//! Type descriptor registry.
//!
//! Describes every shading-language value type the marshalling layer can move
//! (scalars, vectors, matrices and single-level arrays of those) together with
//! their byte sizes and the number of 16-byte layout slots they occupy.

mod descriptor;
mod kind;

pub use descriptor::{ArrayType, ElementType, MatrixType, ScalarType, TypeDescriptor, VectorType};
pub use kind::{ElementKind, WireKind};
