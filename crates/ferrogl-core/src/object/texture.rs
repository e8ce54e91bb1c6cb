use crate::api::{
    BindTarget, GraphicsApi, InternalFormat, ObjectKind, PixelFormat, TexImage, TextureParameter, TextureTarget,
};
use crate::error::{GlError, Result};
use crate::texture::{Pixel, TextureSource, validate_image};

use super::{Bindable, GlObject, Handle, Lifecycle};

/// Texture object bound to one [`TextureTarget`].
#[derive(Debug)]
pub struct Texture {
    life: Lifecycle,
    target: TextureTarget,
    mipmaps: bool,
}

impl Texture {
    /// Fails if mipmaps are requested for a single-level target.
    pub fn new(target: TextureTarget, mipmaps: bool) -> Result<Self> {
        if mipmaps && !target.supports_mipmaps() {
            return Err(GlError::invalid_state("texture", format!("{target:?} cannot have mipmaps")));
        }
        Ok(Self { life: Lifecycle::new(ObjectKind::Texture), target, mipmaps })
    }

    #[inline]
    pub fn target(&self) -> TextureTarget {
        self.target
    }

    #[inline]
    pub fn has_mipmaps(&self) -> bool {
        self.mipmaps
    }

    pub fn set_parameter(&self, gl: &mut dyn GraphicsApi, parameter: TextureParameter) -> Result<()> {
        let texture = self.life.require("set a parameter")?;
        match parameter {
            TextureParameter::MagFilter(filter) if filter.uses_mipmaps() => {
                return Err(GlError::invalid_state("texture", "magnification filters cannot use mipmaps"));
            }
            TextureParameter::MinFilter(filter) if filter.uses_mipmaps() && !self.mipmaps => {
                return Err(GlError::invalid_state("texture", "mipmap filter on a texture without mipmaps"));
            }
            _ => {}
        }
        gl.texture_parameter(texture, parameter);
        Ok(())
    }

    pub fn generate_mipmaps(&self, gl: &mut dyn GraphicsApi) -> Result<()> {
        let texture = self.life.require("generate mipmaps")?;
        if !self.mipmaps {
            return Err(GlError::invalid_state("texture", "created without mipmaps"));
        }
        gl.generate_mipmap(texture);
        Ok(())
    }

    /// Uploads a full image for `level`.
    ///
    /// Shape is checked by [`validate_image`] first. A level-0 upload on a
    /// mipmapped texture regenerates the chain.
    pub fn upload<P: Pixel>(
        &self,
        gl: &mut dyn GraphicsApi,
        level: u32,
        internal_format: InternalFormat,
        format: PixelFormat,
        dimensions: &[u32],
        data: &[P],
    ) -> Result<()> {
        let texture = self.life.require("upload an image")?;
        if level > 0 && !self.mipmaps {
            return Err(GlError::invalid_state("texture", format!("level {level} on a texture without mipmaps")));
        }
        validate_image(self.target, format, dimensions, data)?;

        gl.texture_image(
            texture,
            TexImage {
                target: self.target,
                level,
                internal_format,
                format,
                pixel_type: P::PIXEL_TYPE,
                dimensions,
                data: bytemuck::cast_slice(data),
            },
        );
        if level == 0 && self.mipmaps {
            gl.generate_mipmap(texture);
        }
        Ok(())
    }

    /// Allocates immutable 2D storage for `levels` mip levels.
    pub fn storage_2d(
        &self,
        gl: &mut dyn GraphicsApi,
        levels: u32,
        format: InternalFormat,
        width: u32,
        height: u32,
    ) -> Result<()> {
        let texture = self.life.require("allocate storage")?;
        if self.target.image_rank() != Some(2) {
            return Err(GlError::texture_shape(format!("{:?} has no 2D storage", self.target)));
        }
        if width == 0 || height == 0 {
            return Err(GlError::texture_shape(format!("zero-sized storage {width}x{height}")));
        }
        let max_levels = 32 - width.max(height).leading_zeros();
        if levels == 0 || levels > max_levels || (!self.mipmaps && levels != 1) {
            return Err(GlError::invalid_state("texture", format!("{levels} storage levels for {width}x{height}")));
        }
        gl.texture_storage_2d(texture, levels, format, width, height);
        Ok(())
    }

    /// Binds the texture on texture unit `unit`.
    pub fn bind_unit(&self, gl: &mut dyn GraphicsApi, unit: u32) -> Result<()> {
        let texture = self.life.require("bind")?;
        let max = gl.max_texture_units();
        if unit >= max {
            return Err(GlError::invalid_state("texture", format!("unit {unit} exceeds the limit of {max}")));
        }
        gl.active_texture(unit);
        gl.bind_object(BindTarget::Texture(self.target), texture);
        Ok(())
    }
}

impl GlObject for Texture {
    fn handle(&self) -> Handle {
        self.life.handle()
    }

    fn create(&mut self, gl: &mut dyn GraphicsApi) -> Result<()> {
        self.life.create(gl).map(|_| ())
    }

    fn delete(&mut self, gl: &mut dyn GraphicsApi) {
        self.life.delete(gl);
    }
}

/// Binds on the active texture unit.
impl Bindable for Texture {
    fn bind(&self, gl: &mut dyn GraphicsApi) -> Result<()> {
        let texture = self.life.require("bind")?;
        gl.bind_object(BindTarget::Texture(self.target), texture);
        Ok(())
    }

    fn unbind(&self, gl: &mut dyn GraphicsApi) -> Result<()> {
        self.life.require("unbind")?;
        gl.bind_object(BindTarget::Texture(self.target), 0);
        Ok(())
    }
}

/// 2D RGBA8 texture filled from a [`TextureSource`] on create.
#[derive(Debug)]
pub struct Texture2D<S> {
    texture: Texture,
    source: S,
}

impl<S: TextureSource> Texture2D<S> {
    pub fn new(source: S, mipmaps: bool) -> Self {
        Self {
            texture: Texture { life: Lifecycle::new(ObjectKind::Texture), target: TextureTarget::Texture2D, mipmaps },
            source,
        }
    }

    pub fn texture(&self) -> &Texture {
        &self.texture
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

impl<S: TextureSource> GlObject for Texture2D<S> {
    fn handle(&self) -> Handle {
        self.texture.handle()
    }

    /// Loads the source, then creates and fills the texture. A failed load
    /// leaves the texture unallocated.
    fn create(&mut self, gl: &mut dyn GraphicsApi) -> Result<()> {
        let image = self.source.load()?;
        self.texture.create(gl)?;
        let uploaded = self.texture.upload(
            gl,
            0,
            InternalFormat::Rgba8,
            PixelFormat::Rgba,
            &[image.width(), image.height()],
            image.pixels(),
        );
        if let Err(err) = uploaded {
            self.texture.delete(gl);
            return Err(err);
        }
        Ok(())
    }

    fn delete(&mut self, gl: &mut dyn GraphicsApi) {
        self.texture.delete(gl);
    }
}

impl<S: TextureSource> Bindable for Texture2D<S> {
    fn bind(&self, gl: &mut dyn GraphicsApi) -> Result<()> {
        self.texture.bind(gl)
    }

    fn unbind(&self, gl: &mut dyn GraphicsApi) -> Result<()> {
        self.texture.unbind(gl)
    }
}
