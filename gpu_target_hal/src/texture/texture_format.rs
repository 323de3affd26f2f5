/// Pixel layout types shared by texture storage and render targets

/// Per-component data type of a texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PixelType {
    /// 8-bit unsigned normalized
    #[default]
    UnsignedByte,
    /// 16-bit float
    HalfFloat,
    /// 32-bit float
    Float,
}

impl PixelType {
    /// Whether the type stores floating point data
    pub fn is_floating_point(&self) -> bool {
        matches!(self, PixelType::HalfFloat | PixelType::Float)
    }

    /// Size of one component in bytes
    pub fn bytes_per_component(&self) -> u32 {
        match self {
            PixelType::UnsignedByte => 1,
            PixelType::HalfFloat => 2,
            PixelType::Float => 4,
        }
    }
}

/// Channel layout of a texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PixelFormat {
    Red,
    Rg,
    Rgb,
    #[default]
    Rgba,
}

impl PixelFormat {
    /// Number of channels
    pub fn channel_count(&self) -> u32 {
        match self {
            PixelFormat::Red => 1,
            PixelFormat::Rg => 2,
            PixelFormat::Rgb => 3,
            PixelFormat::Rgba => 4,
        }
    }
}

/// Sized internal storage format, derived from a pixel type and format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types)]
pub enum InternalFormat {
    R8,
    RG8,
    RGB8,
    RGBA8,
    R16F,
    RG16F,
    RGB16F,
    RGBA16F,
    R32F,
    RG32F,
    RGB32F,
    RGBA32F,
}

impl InternalFormat {
    /// Sized format used to allocate storage for `pixel_type` / `pixel_format`
    pub fn sized(pixel_type: PixelType, pixel_format: PixelFormat) -> Self {
        match (pixel_type, pixel_format) {
            (PixelType::UnsignedByte, PixelFormat::Red) => InternalFormat::R8,
            (PixelType::UnsignedByte, PixelFormat::Rg) => InternalFormat::RG8,
            (PixelType::UnsignedByte, PixelFormat::Rgb) => InternalFormat::RGB8,
            (PixelType::UnsignedByte, PixelFormat::Rgba) => InternalFormat::RGBA8,
            (PixelType::HalfFloat, PixelFormat::Red) => InternalFormat::R16F,
            (PixelType::HalfFloat, PixelFormat::Rg) => InternalFormat::RG16F,
            (PixelType::HalfFloat, PixelFormat::Rgb) => InternalFormat::RGB16F,
            (PixelType::HalfFloat, PixelFormat::Rgba) => InternalFormat::RGBA16F,
            (PixelType::Float, PixelFormat::Red) => InternalFormat::R32F,
            (PixelType::Float, PixelFormat::Rg) => InternalFormat::RG32F,
            (PixelType::Float, PixelFormat::Rgb) => InternalFormat::RGB32F,
            (PixelType::Float, PixelFormat::Rgba) => InternalFormat::RGBA32F,
        }
    }

    /// Size of one texel in bytes
    pub fn bytes_per_pixel(&self) -> u32 {
        match self {
            InternalFormat::R8 => 1,
            InternalFormat::RG8 => 2,
            InternalFormat::RGB8 => 3,
            InternalFormat::RGBA8 => 4,
            InternalFormat::R16F => 2,
            InternalFormat::RG16F => 4,
            InternalFormat::RGB16F => 6,
            InternalFormat::RGBA16F => 8,
            InternalFormat::R32F => 4,
            InternalFormat::RG32F => 8,
            InternalFormat::RGB32F => 12,
            InternalFormat::RGBA32F => 16,
        }
    }
}

#[cfg(test)]
#[path = "texture_format_tests.rs"]
mod tests;
