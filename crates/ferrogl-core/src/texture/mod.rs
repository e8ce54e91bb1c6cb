//! Texture image validation and pixel sources.

mod shape;
mod source;

pub use shape::{Pixel, validate_image};
pub use source::{ImageSource, SourceImage, TextureSource};
