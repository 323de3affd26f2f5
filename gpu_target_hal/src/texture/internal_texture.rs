/// InternalTexture - metadata and driver handle of one texture object
///
/// Created empty right after the driver object exists, populated while the
/// allocation protocol runs, and marked ready only once the texture is fully
/// configured and unbound. After that it is shared (`Arc`) between the
/// texture registry and the render target it is attached to.

use std::sync::atomic::{AtomicBool, Ordering};
use crate::driver::TextureHandle;
use crate::target::ResolvedOptions;
use crate::texture::{InternalFormat, PixelFormat, PixelType, SamplingMode};

#[derive(Debug)]
pub struct InternalTexture {
    handle: TextureHandle,
    width: u32,
    height: u32,
    is_cube: bool,
    is_ready: AtomicBool,
    generate_mipmaps: bool,
    mip_level_count: u32,
    sampling_mode: SamplingMode,
    pixel_type: PixelType,
    pixel_format: PixelFormat,
    sample_count: u32,
}

impl InternalTexture {
    /// Empty record for a freshly created driver texture
    pub(crate) fn new(handle: TextureHandle) -> Self {
        Self {
            handle,
            width: 0,
            height: 0,
            is_cube: false,
            is_ready: AtomicBool::new(false),
            generate_mipmaps: false,
            mip_level_count: 1,
            sampling_mode: SamplingMode::default(),
            pixel_type: PixelType::default(),
            pixel_format: PixelFormat::default(),
            sample_count: 1,
        }
    }

    /// Record the layout of a `size` x `size` cube texture
    pub(crate) fn populate_cube(&mut self, size: u32, resolved: &ResolvedOptions) {
        self.width = size;
        self.height = size;
        self.is_cube = true;
        self.sample_count = 1;
        self.generate_mipmaps = resolved.generate_mipmaps();
        self.mip_level_count = if resolved.generate_mipmaps() { mip_chain_length(size) } else { 1 };
        self.sampling_mode = resolved.sampling_mode();
        self.pixel_type = resolved.pixel_type();
        self.pixel_format = resolved.pixel_format();
    }

    pub(crate) fn mark_ready(&self) {
        self.is_ready.store(true, Ordering::Release);
    }

    /// Called when the registry deletes the driver object
    pub(crate) fn mark_released(&self) {
        self.is_ready.store(false, Ordering::Release);
    }

    pub fn handle(&self) -> TextureHandle {
        self.handle
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_cube(&self) -> bool {
        self.is_cube
    }

    /// Whether the texture is fully configured and its driver object alive
    pub fn is_ready(&self) -> bool {
        self.is_ready.load(Ordering::Acquire)
    }

    pub fn generate_mipmaps(&self) -> bool {
        self.generate_mipmaps
    }

    /// Number of mip levels, base level included
    pub fn mip_level_count(&self) -> u32 {
        self.mip_level_count
    }

    pub fn sampling_mode(&self) -> SamplingMode {
        self.sampling_mode
    }

    pub fn pixel_type(&self) -> PixelType {
        self.pixel_type
    }

    pub fn pixel_format(&self) -> PixelFormat {
        self.pixel_format
    }

    /// Sized storage format
    pub fn internal_format(&self) -> InternalFormat {
        InternalFormat::sized(self.pixel_type, self.pixel_format)
    }

    /// 1 for non-multisampled textures
    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    /// Approximate GPU memory held by the texture, mip chain and faces included.
    /// Saturates at `u64::MAX`.
    pub fn memory_size(&self) -> u64 {
        let bytes_per_pixel = self.internal_format().bytes_per_pixel() as u64;
        let faces = if self.is_cube { 6 } else { 1 };
        let texels = (0..self.mip_level_count)
            .map(|level| {
                let w = (self.width >> level).max(1) as u64;
                let h = (self.height >> level).max(1) as u64;
                w.saturating_mul(h)
            })
            .fold(0u64, u64::saturating_add);
        texels.saturating_mul(bytes_per_pixel).saturating_mul(faces)
    }
}

/// floor(log2(size)) + 1
fn mip_chain_length(size: u32) -> u32 {
    u32::BITS - size.max(1).leading_zeros()
}

#[cfg(test)]
#[path = "internal_texture_tests.rs"]
mod tests;
