use bytemuck::Pod;

use crate::api::{PixelFormat, PixelType, TextureTarget};
use crate::error::{GlError, Result};

/// Host pixel element: a single component or a packed 2..=4 channel pixel.
pub trait Pixel: Pod {
    const PIXEL_TYPE: PixelType;
    const CHANNELS: usize;
}

macro_rules! impl_pixel {
    ($($ty:ty => $variant:ident),* $(,)?) => {$(
        impl Pixel for $ty {
            const PIXEL_TYPE: PixelType = PixelType::$variant;
            const CHANNELS: usize = 1;
        }

        impl Pixel for [$ty; 2] {
            const PIXEL_TYPE: PixelType = PixelType::$variant;
            const CHANNELS: usize = 2;
        }

        impl Pixel for [$ty; 3] {
            const PIXEL_TYPE: PixelType = PixelType::$variant;
            const CHANNELS: usize = 3;
        }

        impl Pixel for [$ty; 4] {
            const PIXEL_TYPE: PixelType = PixelType::$variant;
            const CHANNELS: usize = 4;
        }
    )*};
}

impl_pixel!(
    u8 => UnsignedByte,
    i8 => Byte,
    u16 => UnsignedShort,
    i16 => Short,
    u32 => UnsignedInt,
    i32 => Int,
    f32 => Float,
);

/// Checks an image upload against the texture target before any driver call.
///
/// - `dimensions.len()` must equal the target's image rank;
/// - every dimension must be nonzero;
/// - `P` must be single-component or carry exactly `format.channels()`;
/// - the data must hold exactly one `format` pixel per texel.
pub fn validate_image<P: Pixel>(
    target: TextureTarget,
    format: PixelFormat,
    dimensions: &[u32],
    data: &[P],
) -> Result<()> {
    let Some(rank) = target.image_rank() else {
        return Err(GlError::texture_shape(format!("{target:?} does not take full image uploads")));
    };
    if dimensions.len() != rank {
        return Err(GlError::texture_shape(format!(
            "{target:?} expects {rank} dimensions, got {}",
            dimensions.len()
        )));
    }
    if dimensions.contains(&0) {
        return Err(GlError::texture_shape(format!("zero-sized dimension in {dimensions:?}")));
    }
    if P::CHANNELS != 1 && P::CHANNELS != format.channels() {
        return Err(GlError::texture_shape(format!(
            "{}-channel pixels do not match {format:?}",
            P::CHANNELS
        )));
    }

    let texels = dimensions
        .iter()
        .try_fold(1usize, |acc, &d| acc.checked_mul(d as usize))
        .ok_or_else(|| GlError::texture_shape(format!("{dimensions:?} overflows")))?;
    let components = texels
        .checked_mul(format.channels())
        .ok_or_else(|| GlError::texture_shape(format!("{dimensions:?} overflows")))?;
    let supplied = data.len() * P::CHANNELS;
    if supplied != components {
        return Err(GlError::texture_shape(format!(
            "{dimensions:?} {format:?} needs {components} components, got {supplied}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_matching_shapes() {
        validate_image(TextureTarget::Texture2D, PixelFormat::Rgba, &[4, 2], &[[0u8; 4]; 8]).unwrap();
        validate_image(TextureTarget::Texture2D, PixelFormat::Rgba, &[4, 2], &[0u8; 32]).unwrap();
        validate_image(TextureTarget::Texture1D, PixelFormat::Red, &[16], &[0.0f32; 16]).unwrap();
        validate_image(TextureTarget::Texture3D, PixelFormat::Rg, &[2, 2, 2], &[[0u16; 2]; 8]).unwrap();
    }

    #[test]
    fn rank_must_match_target() {
        let err = validate_image(TextureTarget::Texture2D, PixelFormat::Red, &[4, 4, 1], &[0u8; 16]).unwrap_err();
        assert!(matches!(err, GlError::TextureShape { .. }));
        let err = validate_image(TextureTarget::Texture2DArray, PixelFormat::Red, &[4, 4], &[0u8; 16]).unwrap_err();
        assert!(matches!(err, GlError::TextureShape { .. }));
        assert!(validate_image(TextureTarget::CubeMap, PixelFormat::Red, &[1, 1], &[0u8]).is_err());
    }

    #[test]
    fn data_length_must_equal_texel_count() {
        let err = validate_image(TextureTarget::Texture2D, PixelFormat::Rgba, &[4, 2], &[[0u8; 4]; 7]).unwrap_err();
        assert!(err.to_string().contains("needs 32 components, got 28"));
        assert!(validate_image(TextureTarget::Texture2D, PixelFormat::Red, &[0, 2], &[0u8; 0]).is_err());
    }

    #[test]
    fn channel_count_must_match_format() {
        let err = validate_image(TextureTarget::Texture2D, PixelFormat::Rgb, &[1, 1], &[[0u8; 4]]).unwrap_err();
        assert!(matches!(err, GlError::TextureShape { .. }));
    }
}
