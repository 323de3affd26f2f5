/// Render target creation options and their capability-aware resolution
///
/// `RenderTargetOptions` is what a caller asks for; every field is optional.
/// `OptionsResolver::resolve` overlays it on the defaults and rewrites what
/// the device cannot honor. The result, `ResolvedOptions`, is the only input
/// the allocator accepts.

use crate::driver::CapabilityTable;
use crate::texture::{PixelFormat, PixelType, SamplingMode};

/// Partial render target options supplied by a caller
///
/// Unset fields take the defaults: mip-maps on, depth buffer on, stencil
/// buffer off, 8-bit unsigned RGBA, trilinear sampling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderTargetOptions {
    pub generate_mipmaps: Option<bool>,
    pub generate_depth_buffer: Option<bool>,
    pub generate_stencil_buffer: Option<bool>,
    pub pixel_type: Option<PixelType>,
    pub sampling_mode: Option<SamplingMode>,
    pub pixel_format: Option<PixelFormat>,
}

impl RenderTargetOptions {
    /// Options with every field unset
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mipmaps(mut self, generate: bool) -> Self {
        self.generate_mipmaps = Some(generate);
        self
    }

    pub fn with_depth_buffer(mut self, generate: bool) -> Self {
        self.generate_depth_buffer = Some(generate);
        self
    }

    pub fn with_stencil_buffer(mut self, generate: bool) -> Self {
        self.generate_stencil_buffer = Some(generate);
        self
    }

    pub fn with_pixel_type(mut self, pixel_type: PixelType) -> Self {
        self.pixel_type = Some(pixel_type);
        self
    }

    pub fn with_sampling_mode(mut self, sampling_mode: SamplingMode) -> Self {
        self.sampling_mode = Some(sampling_mode);
        self
    }

    pub fn with_pixel_format(mut self, pixel_format: PixelFormat) -> Self {
        self.pixel_format = Some(pixel_format);
        self
    }
}

/// A substitution made because the device lacks a capability
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Degradation {
    /// Float pixel type replaced by 8-bit unsigned
    FloatTextureUnsupported,
    /// Linear sampling on float data replaced by nearest
    FloatLinearFilterUnsupported,
    /// Linear sampling on half-float data replaced by nearest
    HalfFloatLinearFilterUnsupported,
}

/// Fully populated, capability-validated options
///
/// Guarantees:
/// - a stencil buffer is only requested together with a depth buffer
/// - the pixel type is supported by the device
/// - float / half-float data is only sampled linearly when the device can
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOptions {
    generate_mipmaps: bool,
    generate_depth_buffer: bool,
    generate_stencil_buffer: bool,
    pixel_type: PixelType,
    sampling_mode: SamplingMode,
    pixel_format: PixelFormat,
    degradations: Vec<Degradation>,
}

impl ResolvedOptions {
    pub fn generate_mipmaps(&self) -> bool {
        self.generate_mipmaps
    }

    pub fn generate_depth_buffer(&self) -> bool {
        self.generate_depth_buffer
    }

    pub fn generate_stencil_buffer(&self) -> bool {
        self.generate_stencil_buffer
    }

    pub fn pixel_type(&self) -> PixelType {
        self.pixel_type
    }

    pub fn sampling_mode(&self) -> SamplingMode {
        self.sampling_mode
    }

    pub fn pixel_format(&self) -> PixelFormat {
        self.pixel_format
    }

    /// Substitutions applied during resolution, in the order they happened
    pub fn degradations(&self) -> &[Degradation] {
        &self.degradations
    }
}

/// Merges caller options with defaults and applies capability fallbacks
pub struct OptionsResolver;

impl OptionsResolver {
    /// Resolve `requested` against `caps`.
    ///
    /// Fallback order is fixed: an unsupported float type is downgraded to
    /// 8-bit first, and only a type that survived is checked for linear
    /// filtering support. Only the type downgrade is logged.
    pub fn resolve(requested: &RenderTargetOptions, caps: &CapabilityTable) -> ResolvedOptions {
        let generate_depth_buffer = requested.generate_depth_buffer.unwrap_or(true);
        let mut resolved = ResolvedOptions {
            generate_mipmaps: requested.generate_mipmaps.unwrap_or(true),
            generate_depth_buffer,
            generate_stencil_buffer: generate_depth_buffer
                && requested.generate_stencil_buffer.unwrap_or(false),
            pixel_type: requested.pixel_type.unwrap_or_default(),
            sampling_mode: requested.sampling_mode.unwrap_or_default(),
            pixel_format: requested.pixel_format.unwrap_or_default(),
            degradations: Vec::new(),
        };

        let linear = resolved.sampling_mode.requests_linear_filtering();

        if resolved.pixel_type == PixelType::Float && !caps.supports_float_texture() {
            resolved.pixel_type = PixelType::UnsignedByte;
            resolved.degradations.push(Degradation::FloatTextureUnsupported);
            crate::hal_warn!(
                "hal::OptionsResolver",
                "Float textures are not supported. Cube render target forced to 8-bit unsigned type"
            );
        } else if resolved.pixel_type == PixelType::Float && !caps.supports_float_linear_filter() && linear {
            resolved.sampling_mode = SamplingMode::Nearest;
            resolved.degradations.push(Degradation::FloatLinearFilterUnsupported);
        } else if resolved.pixel_type == PixelType::HalfFloat && !caps.supports_half_float_linear_filter() && linear {
            resolved.sampling_mode = SamplingMode::Nearest;
            resolved.degradations.push(Degradation::HalfFloatLinearFilterUnsupported);
        }

        resolved
    }
}

#[cfg(test)]
#[path = "options_tests.rs"]
mod tests;
