//! Marshalling between host values and flat wire buffers.
//!
//! | Item | Role |
//! |------|------|
//! | [`Primitive`] | scalar encoding (`bool` as a 4-byte int) |
//! | [`Uniform`] | compile-time type binding plus flatten/unflatten |
//! | [`WireData`] | owned flat buffer of one primitive kind |
//! | [`write`] / [`read`] | typed uniform transfers through a [`GraphicsApi`](crate::api::GraphicsApi) |
//! | [`write_raw`] / [`read_raw`] | descriptor-checked transfers of pre-flattened data |

mod dispatch;
mod primitive;
mod uniform;
mod wire;

pub use dispatch::{DEFAULT_TRANSPOSE, flatten, read, read_raw, unflatten, write, write_raw};
pub use primitive::Primitive;
pub use uniform::{Uniform, WireOf};
pub use wire::{WireData, WireElement, WireSlice, WireSliceMut};

pub(crate) use dispatch::{check_raw, empty_array};
