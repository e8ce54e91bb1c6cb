use std::path::{Path, PathBuf};

use crate::error::{GlError, Result};

/// Decoded RGBA8 image, row by row from the top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 4]>,
}

impl SourceImage {
    pub fn new(width: u32, height: u32, pixels: Vec<[u8; 4]>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(GlError::texture_shape(format!(
                "{width}x{height} image needs {expected} pixels, got {}",
                pixels.len()
            )));
        }
        Ok(Self { width, height, pixels })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn pixels(&self) -> &[[u8; 4]] {
        &self.pixels
    }
}

/// Producer of pixel data for a 2D texture.
pub trait TextureSource {
    fn load(&self) -> Result<SourceImage>;
}

impl TextureSource for SourceImage {
    fn load(&self) -> Result<SourceImage> {
        Ok(self.clone())
    }
}

#[derive(Debug, Clone)]
enum Encoded {
    File(PathBuf),
    Memory(Vec<u8>),
}

/// PNG or JPEG data decoded with the `image` crate.
#[derive(Debug, Clone)]
pub struct ImageSource {
    encoded: Encoded,
}

impl ImageSource {
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        Self { encoded: Encoded::File(path.as_ref().to_path_buf()) }
    }

    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self { encoded: Encoded::Memory(bytes.into()) }
    }
}

impl TextureSource for ImageSource {
    fn load(&self) -> Result<SourceImage> {
        let decoded = match &self.encoded {
            Encoded::File(path) => image::open(path).map_err(|e| GlError::TextureSource {
                message: format!("{}: {e}", path.display()),
            })?,
            Encoded::Memory(bytes) => image::load_from_memory(bytes)
                .map_err(|e| GlError::TextureSource { message: e.to_string() })?,
        };

        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();
        let pixels = rgba.pixels().map(|p| p.0).collect();
        log::debug!("decoded {width}x{height} texture source");
        SourceImage::new(width, height, pixels)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let image = image::RgbaImage::from_fn(width, height, |x, y| image::Rgba([x as u8, y as u8, 7, 255]));
        let mut bytes = Vec::new();
        image.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png).unwrap();
        bytes
    }

    #[test]
    fn decodes_png_from_memory() {
        let image = ImageSource::from_bytes(png(3, 2)).load().unwrap();
        assert_eq!((image.width(), image.height()), (3, 2));
        assert_eq!(image.pixels()[0], [0, 0, 7, 255]);
        assert_eq!(image.pixels()[5], [2, 1, 7, 255]);
    }

    #[test]
    fn garbage_is_a_source_error() {
        let err = ImageSource::from_bytes(vec![1u8, 2, 3]).load().unwrap_err();
        assert!(matches!(err, GlError::TextureSource { .. }));
    }

    #[test]
    fn missing_file_is_a_source_error() {
        let err = ImageSource::from_path("/definitely/not/here.png").load().unwrap_err();
        assert!(err.to_string().contains("not/here.png"));
    }

    #[test]
    fn pixel_count_must_match() {
        assert!(SourceImage::new(2, 2, vec![[0; 4]; 3]).is_err());
        assert!(SourceImage::new(2, 2, vec![[0; 4]; 4]).is_ok());
    }
}
