/// Texture binding target, which also fixes the image rank.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TextureTarget {
    Texture1D,
    Texture2D,
    Texture3D,
    Texture1DArray,
    Texture2DArray,
    Rectangle,
    CubeMap,
    CubeMapArray,
    Buffer,
    Texture2DMultisample,
    Texture2DMultisampleArray,
}

impl TextureTarget {
    /// Multisample, rectangle and buffer textures have a single level.
    pub const fn supports_mipmaps(self) -> bool {
        !matches!(
            self,
            TextureTarget::Rectangle
                | TextureTarget::Buffer
                | TextureTarget::Texture2DMultisample
                | TextureTarget::Texture2DMultisampleArray
        )
    }

    /// Number of dimensions a full image upload names, or `None` when the
    /// target is not uploaded through `texture_image`.
    pub const fn image_rank(self) -> Option<usize> {
        match self {
            TextureTarget::Texture1D => Some(1),
            TextureTarget::Texture2D | TextureTarget::Texture1DArray | TextureTarget::Rectangle => Some(2),
            TextureTarget::Texture3D | TextureTarget::Texture2DArray => Some(3),
            _ => None,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TextureFilter {
    Nearest,
    Linear,
    NearestMipmapNearest,
    LinearMipmapNearest,
    NearestMipmapLinear,
    LinearMipmapLinear,
}

impl TextureFilter {
    #[inline]
    pub const fn uses_mipmaps(self) -> bool {
        !matches!(self, TextureFilter::Nearest | TextureFilter::Linear)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TextureWrap {
    Repeat,
    MirroredRepeat,
    ClampToEdge,
    ClampToBorder,
}

/// One typed sampler parameter.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum TextureParameter {
    MinFilter(TextureFilter),
    MagFilter(TextureFilter),
    WrapS(TextureWrap),
    WrapT(TextureWrap),
    WrapR(TextureWrap),
    BaseLevel(i32),
    MaxLevel(i32),
    MinLod(f32),
    MaxLod(f32),
    LodBias(f32),
    BorderColor([f32; 4]),
}

impl TextureParameter {
    pub const fn name(&self) -> &'static str {
        match self {
            TextureParameter::MinFilter(_) => "TEXTURE_MIN_FILTER",
            TextureParameter::MagFilter(_) => "TEXTURE_MAG_FILTER",
            TextureParameter::WrapS(_) => "TEXTURE_WRAP_S",
            TextureParameter::WrapT(_) => "TEXTURE_WRAP_T",
            TextureParameter::WrapR(_) => "TEXTURE_WRAP_R",
            TextureParameter::BaseLevel(_) => "TEXTURE_BASE_LEVEL",
            TextureParameter::MaxLevel(_) => "TEXTURE_MAX_LEVEL",
            TextureParameter::MinLod(_) => "TEXTURE_MIN_LOD",
            TextureParameter::MaxLod(_) => "TEXTURE_MAX_LOD",
            TextureParameter::LodBias(_) => "TEXTURE_LOD_BIAS",
            TextureParameter::BorderColor(_) => "TEXTURE_BORDER_COLOR",
        }
    }
}

/// Sized internal storage format.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum InternalFormat {
    R8,
    Rg8,
    Rgb8,
    Rgba8,
    Srgb8Alpha8,
    R16F,
    Rgba16F,
    R32F,
    Rg32F,
    Rgba32F,
    R32I,
    R32UI,
    DepthComponent32F,
    Depth24Stencil8,
}

/// Channel layout of client pixel data.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PixelFormat {
    Red,
    Rg,
    Rgb,
    Bgr,
    Rgba,
    Bgra,
    RedInteger,
    RgbaInteger,
    DepthComponent,
}

impl PixelFormat {
    pub const fn channels(self) -> usize {
        match self {
            PixelFormat::Red | PixelFormat::RedInteger | PixelFormat::DepthComponent => 1,
            PixelFormat::Rg => 2,
            PixelFormat::Rgb | PixelFormat::Bgr => 3,
            PixelFormat::Rgba | PixelFormat::Bgra | PixelFormat::RgbaInteger => 4,
        }
    }
}

/// Component type of client pixel data.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PixelType {
    UnsignedByte,
    Byte,
    UnsignedShort,
    Short,
    UnsignedInt,
    Int,
    Float,
}

impl PixelType {
    pub const fn byte_size(self) -> usize {
        match self {
            PixelType::UnsignedByte | PixelType::Byte => 1,
            PixelType::UnsignedShort | PixelType::Short => 2,
            PixelType::UnsignedInt | PixelType::Int | PixelType::Float => 4,
        }
    }
}

/// A validated full-image upload for one mip level.
#[derive(Debug, Clone, PartialEq)]
pub struct TexImage<'a> {
    pub target: TextureTarget,
    pub level: u32,
    pub internal_format: InternalFormat,
    pub format: PixelFormat,
    pub pixel_type: PixelType,
    /// Width, then height and depth as the target's rank requires.
    pub dimensions: &'a [u32],
    pub data: &'a [u8],
}
