//! Texture module
//!
//! Pixel formats, sampling modes, the `InternalTexture` metadata record and
//! the texture registry that tracks every texture a device context created.

pub mod texture_format;
pub mod sampling;
mod internal_texture;
mod texture_registry;

pub use texture_format::{InternalFormat, PixelFormat, PixelType};
pub use sampling::{sampling_parameters, MagFilter, MinFilter, SamplingMode, SamplingParameters};
pub use internal_texture::InternalTexture;
pub use texture_registry::{TextureKey, TextureRegistry};
