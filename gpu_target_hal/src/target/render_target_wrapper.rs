/// RenderTargetWrapper - the handle returned to callers for a render target
///
/// Bundles the framebuffer, the optional depth/stencil buffer and the
/// attached textures. Disposal is explicit and caller-driven: dropping a
/// wrapper does not release its driver objects.

use std::sync::{Arc, Mutex};
use crate::driver::{DepthStencilHandle, FramebufferHandle, GraphicsDriver};
use crate::error::{Error, Result};
use crate::texture::InternalTexture;

pub struct RenderTargetWrapper {
    /// Driver that created the framebuffer and depth/stencil buffer
    driver: Arc<Mutex<dyn GraphicsDriver>>,
    /// `None` only after dispose
    framebuffer: Option<FramebufferHandle>,
    depth_stencil_buffer: Option<DepthStencilHandle>,
    generate_depth_buffer: bool,
    generate_stencil_buffer: bool,
    size: u32,
    is_cube: bool,
    textures: Vec<Arc<InternalTexture>>,
}

impl RenderTargetWrapper {
    pub(crate) fn new(
        driver: Arc<Mutex<dyn GraphicsDriver>>,
        framebuffer: FramebufferHandle,
        depth_stencil_buffer: Option<DepthStencilHandle>,
        generate_depth_buffer: bool,
        generate_stencil_buffer: bool,
        size: u32,
        is_cube: bool,
    ) -> Self {
        Self {
            driver,
            framebuffer: Some(framebuffer),
            depth_stencil_buffer,
            generate_depth_buffer,
            generate_stencil_buffer,
            size,
            is_cube,
            textures: Vec::new(),
        }
    }

    /// First attached texture
    pub fn texture(&self) -> Option<&Arc<InternalTexture>> {
        self.textures.first()
    }

    /// Attached textures, in attachment order
    pub fn textures(&self) -> &[Arc<InternalTexture>] {
        &self.textures
    }

    /// Replace the attachment list with a single texture
    pub fn set_texture(&mut self, texture: Arc<InternalTexture>) -> Result<()> {
        self.set_textures(vec![texture])
    }

    /// Replace the attachment list.
    ///
    /// Previously attached textures are detached, not destroyed.
    ///
    /// # Errors
    ///
    /// `InvalidResource` if the wrapper was disposed.
    pub fn set_textures(&mut self, textures: Vec<Arc<InternalTexture>>) -> Result<()> {
        if self.is_disposed() {
            return Err(Error::InvalidResource(
                "cannot attach textures to a disposed render target".to_string(),
            ));
        }
        self.textures = textures;
        Ok(())
    }

    pub fn framebuffer(&self) -> Option<FramebufferHandle> {
        self.framebuffer
    }

    pub fn depth_stencil_buffer(&self) -> Option<DepthStencilHandle> {
        self.depth_stencil_buffer
    }

    pub fn generate_depth_buffer(&self) -> bool {
        self.generate_depth_buffer
    }

    pub fn generate_stencil_buffer(&self) -> bool {
        self.generate_stencil_buffer
    }

    /// Edge length in pixels
    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn is_cube(&self) -> bool {
        self.is_cube
    }

    pub fn is_disposed(&self) -> bool {
        self.framebuffer.is_none()
    }

    /// Release the framebuffer and depth/stencil buffer and detach every texture.
    ///
    /// Idempotent. Both deletions are attempted even if one fails; handles
    /// and attachments are cleared either way and the first failure is
    /// returned. Textures stay alive in the texture registry.
    ///
    /// If the driver lock is poisoned nothing is released and the wrapper
    /// keeps its handles, so a later call can retry.
    pub fn dispose(&mut self) -> Result<()> {
        if self.framebuffer.is_none() && self.depth_stencil_buffer.is_none() {
            self.textures.clear();
            return Ok(());
        }

        let mut driver = self.driver.lock().map_err(|_| {
            crate::hal_err!("hal::RenderTargetWrapper", "Driver lock poisoned during dispose")
        })?;

        self.textures.clear();
        let framebuffer = self.framebuffer.take();
        let depth_stencil_buffer = self.depth_stencil_buffer.take();

        let mut first_error: Option<Error> = None;

        if let Some(buffer) = depth_stencil_buffer {
            if let Err(e) = driver.delete_depth_stencil_buffer(buffer) {
                crate::hal_error!("hal::RenderTargetWrapper",
                    "Failed to delete depth/stencil buffer {}: {}", buffer.raw(), e);
                first_error.get_or_insert(e);
            }
        }

        if let Some(framebuffer) = framebuffer {
            if let Err(e) = driver.delete_framebuffer(framebuffer) {
                crate::hal_error!("hal::RenderTargetWrapper",
                    "Failed to delete framebuffer {}: {}", framebuffer.raw(), e);
                first_error.get_or_insert(e);
            }
            crate::hal_trace!("hal::RenderTargetWrapper",
                "Disposed render target (framebuffer {})", framebuffer.raw());
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for RenderTargetWrapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderTargetWrapper")
            .field("framebuffer", &self.framebuffer)
            .field("depth_stencil_buffer", &self.depth_stencil_buffer)
            .field("size", &self.size)
            .field("is_cube", &self.is_cube)
            .field("textures", &self.textures.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "render_target_wrapper_tests.rs"]
mod tests;
