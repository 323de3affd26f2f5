/// GraphicsDriver trait - the resource-creation interface of a device context

use std::num::NonZeroU32;
use crate::error::Result;
use crate::driver::CapabilityTable;
use crate::texture::{InternalFormat, MagFilter, MinFilter, PixelFormat, PixelType};

// ============================================================================
// Handles
// ============================================================================

macro_rules! gpu_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(NonZeroU32);

        impl $name {
            /// Wrap a raw driver name. Zero is the driver's null object.
            pub fn new(raw: u32) -> Option<Self> {
                NonZeroU32::new(raw).map(Self)
            }

            /// Raw driver name
            pub fn raw(&self) -> u32 {
                self.0.get()
            }
        }
    };
}

gpu_handle!(
    /// Driver name of a texture object
    TextureHandle
);

gpu_handle!(
    /// Driver name of a framebuffer object
    FramebufferHandle
);

gpu_handle!(
    /// Driver name of a depth / stencil buffer (render buffer)
    DepthStencilHandle
);

// ============================================================================
// Parameter types
// ============================================================================

/// Bind point of a texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureTarget {
    CubeMap,
}

/// Face of a cube texture, in allocation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CubeFace {
    PositiveX,
    NegativeX,
    PositiveY,
    NegativeY,
    PositiveZ,
    NegativeZ,
}

impl CubeFace {
    /// The six faces in fixed order: +X, -X, +Y, -Y, +Z, -Z
    pub const ALL: [CubeFace; 6] = [
        CubeFace::PositiveX,
        CubeFace::NegativeX,
        CubeFace::PositiveY,
        CubeFace::NegativeY,
        CubeFace::PositiveZ,
        CubeFace::NegativeZ,
    ];

    /// Position of the face in `ALL`
    pub fn index(&self) -> u32 {
        *self as u32
    }
}

/// Texture coordinate wrapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WrapMode {
    ClampToEdge,
}

/// One sampler parameter applied to the bound texture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureParameter {
    MagFilter(MagFilter),
    MinFilter(MinFilter),
    WrapS(WrapMode),
    WrapT(WrapMode),
}

/// Image that receives storage in `allocate_texture_storage`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageTarget {
    CubeFace(CubeFace),
}

/// Storage allocation request (no initial pixel data)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureStorageDesc {
    /// Image receiving the storage
    pub target: StorageTarget,
    /// Mip level
    pub level: u32,
    /// Sized internal format
    pub internal_format: InternalFormat,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Channel layout
    pub pixel_format: PixelFormat,
    /// Component type
    pub pixel_type: PixelType,
}

/// Storage format of a depth / stencil buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DepthStencilFormat {
    /// 16-bit depth only
    Depth16,
    /// 24-bit depth + 8-bit stencil sharing one buffer
    Depth24Stencil8,
    /// 8-bit stencil only
    Stencil8,
}

/// Framebuffer attachment point of a depth / stencil buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DepthStencilAttachment {
    Depth,
    Stencil,
    DepthStencil,
}

impl DepthStencilFormat {
    /// Buffer format and attachment point for a depth/stencil request.
    ///
    /// Returns `None` when neither depth nor stencil is requested.
    pub fn for_request(depth: bool, stencil: bool) -> Option<(DepthStencilFormat, DepthStencilAttachment)> {
        match (depth, stencil) {
            (true, true) => Some((DepthStencilFormat::Depth24Stencil8, DepthStencilAttachment::DepthStencil)),
            (true, false) => Some((DepthStencilFormat::Depth16, DepthStencilAttachment::Depth)),
            (false, true) => Some((DepthStencilFormat::Stencil8, DepthStencilAttachment::Stencil)),
            (false, false) => None,
        }
    }
}

// ============================================================================
// GraphicsDriver trait
// ============================================================================

/// Driver binding consumed by the HAL
///
/// Implemented by backend bindings (GL-style state machines). Every call
/// operates on the device context that is current on the calling thread and
/// fails loudly with a driver error instead of failing silently.
///
/// Bind points are global driver state: callers must restore the
/// no-resource-bound state after configuring a resource.
pub trait GraphicsDriver: Send + Sync {
    /// Whether the device context is current on the calling thread
    fn is_context_current(&self) -> bool;

    /// Probe the device for its capability flags and limits
    fn probe_capabilities(&self) -> CapabilityTable;

    /// Create an empty texture object
    fn create_texture(&mut self) -> Result<TextureHandle>;

    /// Bind `texture` to `target`, or unbind the target with `None`
    fn bind_texture(&mut self, target: TextureTarget, texture: Option<TextureHandle>) -> Result<()>;

    /// Apply a sampler parameter to the texture bound at `target`
    fn set_texture_parameter(&mut self, target: TextureTarget, parameter: TextureParameter) -> Result<()>;

    /// Allocate storage for one image of the bound texture
    fn allocate_texture_storage(&mut self, desc: &TextureStorageDesc) -> Result<()>;

    /// Generate the full mip chain of the texture bound at `target`
    fn generate_mipmaps(&mut self, target: TextureTarget) -> Result<()>;

    /// Delete a texture object
    fn delete_texture(&mut self, texture: TextureHandle) -> Result<()>;

    /// Create a framebuffer object
    fn create_framebuffer(&mut self) -> Result<FramebufferHandle>;

    /// Bind a framebuffer as the active render target, or restore the default with `None`
    fn bind_framebuffer(&mut self, framebuffer: Option<FramebufferHandle>) -> Result<()>;

    /// Delete a framebuffer object
    fn delete_framebuffer(&mut self, framebuffer: FramebufferHandle) -> Result<()>;

    /// Create a depth / stencil buffer of the given size
    fn create_depth_stencil_buffer(
        &mut self,
        format: DepthStencilFormat,
        width: u32,
        height: u32,
    ) -> Result<DepthStencilHandle>;

    /// Attach a depth / stencil buffer to the bound framebuffer
    fn attach_depth_stencil_buffer(
        &mut self,
        attachment: DepthStencilAttachment,
        buffer: DepthStencilHandle,
    ) -> Result<()>;

    /// Delete a depth / stencil buffer
    fn delete_depth_stencil_buffer(&mut self, buffer: DepthStencilHandle) -> Result<()>;
}
