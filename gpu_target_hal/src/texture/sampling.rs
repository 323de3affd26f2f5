/// Sampling modes and the filter pairs they translate to
///
/// Mode names read MAG_MIN_MIP: `LinearNearestMipLinear` magnifies with a
/// linear filter, minifies with nearest and blends between mip levels.

/// Texture magnification filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MagFilter {
    Nearest,
    Linear,
}

/// Texture minification filter, optionally selecting between mip levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MinFilter {
    Nearest,
    Linear,
    NearestMipmapNearest,
    LinearMipmapNearest,
    NearestMipmapLinear,
    LinearMipmapLinear,
}

impl MinFilter {
    /// Whether the filter reads mip levels other than the base level
    pub fn uses_mipmaps(&self) -> bool {
        !matches!(self, MinFilter::Nearest | MinFilter::Linear)
    }
}

/// Filtering strategy requested for a texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SamplingMode {
    /// Nearest mag, nearest min, linear between mips
    Nearest,
    /// Linear mag, linear min, nearest mip
    Bilinear,
    /// Linear mag, linear min, linear between mips
    #[default]
    Trilinear,
    NearestNearestMipNearest,
    NearestLinearMipNearest,
    NearestLinearMipLinear,
    NearestLinear,
    NearestNearest,
    LinearNearestMipNearest,
    LinearNearestMipLinear,
    LinearLinear,
    LinearNearest,
}

impl SamplingMode {
    /// Whether the mode filters linearly within a mip level (mag or min).
    ///
    /// Float and half-float textures need the matching linear-filter
    /// capability for these modes.
    pub fn requests_linear_filtering(&self) -> bool {
        let params = sampling_parameters(*self, false);
        params.mag == MagFilter::Linear || params.min == MinFilter::Linear
    }
}

/// Mag/min filter pair applied to a bound texture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplingParameters {
    pub mag: MagFilter,
    pub min: MinFilter,
}

/// Translate a sampling mode into filter parameters.
///
/// Without mip-maps the mip component of the min filter is dropped.
pub fn sampling_parameters(mode: SamplingMode, generate_mipmaps: bool) -> SamplingParameters {
    use MagFilter as Mag;
    use MinFilter as Min;

    let (mag, min_with_mips, min_without_mips) = match mode {
        SamplingMode::Bilinear => (Mag::Linear, Min::LinearMipmapNearest, Min::Linear),
        SamplingMode::Trilinear => (Mag::Linear, Min::LinearMipmapLinear, Min::Linear),
        SamplingMode::Nearest => (Mag::Nearest, Min::NearestMipmapLinear, Min::Nearest),
        SamplingMode::NearestNearestMipNearest => (Mag::Nearest, Min::NearestMipmapNearest, Min::Nearest),
        SamplingMode::NearestLinearMipNearest => (Mag::Nearest, Min::LinearMipmapNearest, Min::Linear),
        SamplingMode::NearestLinearMipLinear => (Mag::Nearest, Min::LinearMipmapLinear, Min::Linear),
        SamplingMode::NearestLinear => (Mag::Nearest, Min::Linear, Min::Linear),
        SamplingMode::NearestNearest => (Mag::Nearest, Min::Nearest, Min::Nearest),
        SamplingMode::LinearNearestMipNearest => (Mag::Linear, Min::NearestMipmapNearest, Min::Nearest),
        SamplingMode::LinearNearestMipLinear => (Mag::Linear, Min::NearestMipmapLinear, Min::Nearest),
        SamplingMode::LinearLinear => (Mag::Linear, Min::Linear, Min::Linear),
        SamplingMode::LinearNearest => (Mag::Linear, Min::Nearest, Min::Nearest),
    };

    SamplingParameters {
        mag,
        min: if generate_mipmaps { min_with_mips } else { min_without_mips },
    }
}

#[cfg(test)]
#[path = "sampling_tests.rs"]
mod tests;
