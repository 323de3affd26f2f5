/*!
# GPU Target HAL

Hardware abstraction layer that turns a declarative render target request
into configured driver objects.

Given a size and a partial set of options, a `DeviceContext` negotiates the
options against the device's capabilities, drives the bind → configure →
attach → unbind allocation protocol through a `GraphicsDriver` binding and
returns a `RenderTargetWrapper` owning the framebuffer, the optional
depth/stencil buffer and the cube texture.

## Architecture

- **GraphicsDriver**: driver binding trait (capability probe + resource primitives)
- **CapabilityTable**: probed, read-only device capabilities
- **OptionsResolver**: defaults and capability fallbacks, as a pure function
- **CubeAllocator**: the ordered allocation protocol with bind-state guards
- **RenderTargetWrapper**: caller-owned handle with explicit dispose
- **InternalTexture / TextureRegistry**: texture metadata and lifetime tracking
*/

// Internal modules
mod error;
mod hal_state;
mod context;
pub mod log;
pub mod driver;
pub mod texture;
pub mod target;

// Main hal namespace module
pub mod hal {
    // Error types
    pub use crate::error::{AllocationStep, Error, Result};

    // Logging façade
    pub use crate::hal_state::Hal;

    // Device context (entry point)
    pub use crate::context::{DeviceContext, DeviceContextConfig};

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // Driver binding sub-module
    pub mod driver {
        pub use crate::driver::*;
    }

    // Texture sub-module
    pub mod texture {
        pub use crate::texture::*;
    }

    // Render target sub-module
    pub mod target {
        pub use crate::target::*;
    }
}
