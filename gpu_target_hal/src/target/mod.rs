//! Render target module
//!
//! Options resolution, the cube allocation protocol and the wrapper handed
//! back to callers.

mod options;
mod allocator;
mod render_target_wrapper;

pub use options::{Degradation, OptionsResolver, RenderTargetOptions, ResolvedOptions};
pub use allocator::{BindState, CubeAllocator};
pub use render_target_wrapper::RenderTargetWrapper;
