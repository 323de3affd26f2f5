/// CubeAllocator - creates and configures the driver objects of a cube render target
///
/// The allocation protocol is a fixed sequence of driver calls:
///
/// ```text
/// Unbound ──create+bind texture──▶ TextureBound
///         ──configure sampler, allocate 6 faces, create+bind framebuffer──▶ FramebufferBound
///         ──attach depth/stencil, generate mipmaps, unbind both──▶ Unbound
/// ```
///
/// Every call is checked against the current `BindState`; a call issued in
/// the wrong state fails instead of reaching the driver. On any failure the
/// objects created so far are deleted and the bind points restored before
/// the error propagates, so a failed allocation leaves no wrapper and no
/// registered texture behind.

use std::sync::{Arc, Mutex};
use crate::driver::{
    CapabilityTable, CubeFace, DepthStencilFormat, DepthStencilHandle, FramebufferHandle,
    GraphicsDriver, StorageTarget, TextureHandle, TextureParameter, TextureStorageDesc,
    TextureTarget, WrapMode,
};
use crate::error::{AllocationStep, Error, Result};
use crate::target::{RenderTargetWrapper, ResolvedOptions};
use crate::texture::{sampling_parameters, InternalFormat, InternalTexture, TextureRegistry};

const LOG_SOURCE: &str = "hal::CubeAllocator";

// ============================================================================
// Bind state
// ============================================================================

/// Driver bind points owned by an allocation in progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindState {
    /// Nothing bound
    Unbound,
    /// The new texture is bound at the cube-map target
    TextureBound,
    /// The new framebuffer is bound too
    FramebufferBound,
}

/// Driver objects and bind state of one allocation
struct AllocationSession<'a> {
    driver: &'a mut dyn GraphicsDriver,
    state: BindState,
    texture: Option<TextureHandle>,
    framebuffer: Option<FramebufferHandle>,
    depth_stencil_buffer: Option<DepthStencilHandle>,
}

impl<'a> AllocationSession<'a> {
    fn new(driver: &'a mut dyn GraphicsDriver) -> Self {
        Self {
            driver,
            state: BindState::Unbound,
            texture: None,
            framebuffer: None,
            depth_stencil_buffer: None,
        }
    }

    fn require(&self, required: BindState, step: AllocationStep) -> Result<()> {
        if self.state != required {
            let cause = crate::hal_err!(LOG_SOURCE,
                "Cannot {} in state {:?} (requires {:?})", step, self.state, required);
            return Err(Error::creation_failure(step, cause));
        }
        Ok(())
    }

    fn create_texture(&mut self) -> Result<TextureHandle> {
        let step = AllocationStep::CreateTexture;
        self.require(BindState::Unbound, step)?;
        if self.texture.is_some() {
            let cause = crate::hal_err!(LOG_SOURCE, "Texture already created for this allocation");
            return Err(Error::creation_failure(step, cause));
        }
        let texture = self.driver.create_texture().map_err(|e| Error::creation_failure(step, e))?;
        self.texture = Some(texture);
        Ok(texture)
    }

    fn bind_texture(&mut self) -> Result<()> {
        let step = AllocationStep::BindTexture;
        self.require(BindState::Unbound, step)?;
        let texture = self.texture.ok_or_else(|| {
            Error::creation_failure(step, crate::hal_err!(LOG_SOURCE, "No texture to bind"))
        })?;
        self.driver
            .bind_texture(TextureTarget::CubeMap, Some(texture))
            .map_err(|e| Error::creation_failure(step, e))?;
        self.state = BindState::TextureBound;
        Ok(())
    }

    fn set_texture_parameter(&mut self, parameter: TextureParameter) -> Result<()> {
        let step = AllocationStep::SetTextureParameters;
        self.require(BindState::TextureBound, step)?;
        self.driver
            .set_texture_parameter(TextureTarget::CubeMap, parameter)
            .map_err(|e| Error::creation_failure(step, e))
    }

    fn allocate_face_storage(&mut self, desc: &TextureStorageDesc) -> Result<()> {
        let StorageTarget::CubeFace(face) = desc.target;
        let step = AllocationStep::AllocateFaceStorage(face.index());
        self.require(BindState::TextureBound, step)?;
        self.driver
            .allocate_texture_storage(desc)
            .map_err(|e| Error::creation_failure(step, e))
    }

    fn create_and_bind_framebuffer(&mut self) -> Result<FramebufferHandle> {
        self.require(BindState::TextureBound, AllocationStep::CreateFramebuffer)?;
        let framebuffer = self
            .driver
            .create_framebuffer()
            .map_err(|e| Error::creation_failure(AllocationStep::CreateFramebuffer, e))?;
        self.framebuffer = Some(framebuffer);

        self.driver
            .bind_framebuffer(Some(framebuffer))
            .map_err(|e| Error::creation_failure(AllocationStep::BindFramebuffer, e))?;
        self.state = BindState::FramebufferBound;
        Ok(framebuffer)
    }

    fn attach_depth_stencil(&mut self, depth: bool, stencil: bool, size: u32) -> Result<()> {
        let Some((format, attachment)) = DepthStencilFormat::for_request(depth, stencil) else {
            return Ok(());
        };

        self.require(BindState::FramebufferBound, AllocationStep::CreateDepthStencilBuffer)?;
        let buffer = self
            .driver
            .create_depth_stencil_buffer(format, size, size)
            .map_err(|e| Error::creation_failure(AllocationStep::CreateDepthStencilBuffer, e))?;
        self.depth_stencil_buffer = Some(buffer);

        self.driver
            .attach_depth_stencil_buffer(attachment, buffer)
            .map_err(|e| Error::creation_failure(AllocationStep::AttachDepthStencilBuffer, e))
    }

    fn generate_mipmaps(&mut self) -> Result<()> {
        let step = AllocationStep::GenerateMipmaps;
        self.require(BindState::FramebufferBound, step)?;
        self.driver
            .generate_mipmaps(TextureTarget::CubeMap)
            .map_err(|e| Error::creation_failure(step, e))
    }

    fn unbind(&mut self) -> Result<()> {
        let step = AllocationStep::Unbind;
        self.require(BindState::FramebufferBound, step)?;
        self.driver
            .bind_texture(TextureTarget::CubeMap, None)
            .map_err(|e| Error::creation_failure(step, e))?;
        self.driver
            .bind_framebuffer(None)
            .map_err(|e| Error::creation_failure(step, e))?;
        self.state = BindState::Unbound;
        Ok(())
    }

    /// Created handles, available once the protocol completed
    fn completed_handles(&self) -> Result<(TextureHandle, FramebufferHandle, Option<DepthStencilHandle>)> {
        match (self.state, self.texture, self.framebuffer) {
            (BindState::Unbound, Some(texture), Some(framebuffer)) => {
                Ok((texture, framebuffer, self.depth_stencil_buffer))
            }
            (state, _, _) => Err(crate::hal_err!(LOG_SOURCE,
                "Allocation finished in an incomplete state ({:?})", state)),
        }
    }

    /// Restore the bind points and, if `release` is set, delete every object
    /// created so far. Failures here are logged and otherwise ignored.
    fn abort(mut self, release: bool) {
        if self.state != BindState::Unbound {
            if let Err(e) = self.driver.bind_texture(TextureTarget::CubeMap, None) {
                crate::hal_error!(LOG_SOURCE, "Cleanup: failed to unbind texture: {}", e);
            }
            if self.state == BindState::FramebufferBound {
                if let Err(e) = self.driver.bind_framebuffer(None) {
                    crate::hal_error!(LOG_SOURCE, "Cleanup: failed to unbind framebuffer: {}", e);
                }
            }
            self.state = BindState::Unbound;
        }

        if !release {
            return;
        }

        if let Some(buffer) = self.depth_stencil_buffer.take() {
            if let Err(e) = self.driver.delete_depth_stencil_buffer(buffer) {
                crate::hal_error!(LOG_SOURCE,
                    "Cleanup: failed to delete depth/stencil buffer {}: {}", buffer.raw(), e);
            }
        }
        if let Some(framebuffer) = self.framebuffer.take() {
            if let Err(e) = self.driver.delete_framebuffer(framebuffer) {
                crate::hal_error!(LOG_SOURCE,
                    "Cleanup: failed to delete framebuffer {}: {}", framebuffer.raw(), e);
            }
        }
        if let Some(texture) = self.texture.take() {
            if let Err(e) = self.driver.delete_texture(texture) {
                crate::hal_error!(LOG_SOURCE,
                    "Cleanup: failed to delete texture {}: {}", texture.raw(), e);
            }
        }
    }
}

// ============================================================================
// Allocator
// ============================================================================

/// Drives the cube render target allocation protocol on one device context
pub struct CubeAllocator {
    driver: Arc<Mutex<dyn GraphicsDriver>>,
    capabilities: CapabilityTable,
    registry: Arc<Mutex<TextureRegistry>>,
    label: String,
    enforce_max_cube_size: bool,
    release_partial_on_failure: bool,
}

impl CubeAllocator {
    /// Create an allocator
    ///
    /// # Arguments
    ///
    /// * `driver` - Driver binding of the device context
    /// * `capabilities` - Capability table probed at context creation
    /// * `registry` - Registry receiving every created texture
    pub fn new(
        driver: Arc<Mutex<dyn GraphicsDriver>>,
        capabilities: CapabilityTable,
        registry: Arc<Mutex<TextureRegistry>>,
    ) -> Self {
        Self {
            driver,
            capabilities,
            registry,
            label: String::from("default"),
            enforce_max_cube_size: true,
            release_partial_on_failure: true,
        }
    }

    /// Context label included in log messages
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Reject sizes above the device's maximum cube texture size
    pub fn with_max_size_check(mut self, enforce: bool) -> Self {
        self.enforce_max_cube_size = enforce;
        self
    }

    /// Delete already created objects when a protocol step fails
    pub fn with_partial_release(mut self, release: bool) -> Self {
        self.release_partial_on_failure = release;
        self
    }

    pub fn capabilities(&self) -> &CapabilityTable {
        &self.capabilities
    }

    /// Check `size` without touching the driver
    pub fn validate(&self, size: u32) -> Result<()> {
        if size == 0 {
            return Err(Error::InvalidArgument(
                "cube render target size must be positive".to_string(),
            ));
        }
        let max = self.capabilities.max_cube_texture_size();
        if self.enforce_max_cube_size && size > max {
            return Err(Error::InvalidArgument(format!(
                "cube render target size {} exceeds the device maximum of {}",
                size, max
            )));
        }
        Ok(())
    }

    /// Create a `size` x `size` cube render target.
    ///
    /// Fails with `InvalidArgument` or `ContextInvalid` before any driver
    /// call, and with `ResourceCreationFailure` naming the failed step once
    /// the protocol started. The returned wrapper carries one ready texture
    /// that is also registered in the texture registry.
    pub fn allocate(&self, size: u32, resolved: &ResolvedOptions) -> Result<RenderTargetWrapper> {
        self.validate(size)?;

        let mut driver = self.driver.lock().map_err(|_| {
            crate::hal_err!(LOG_SOURCE, "[{}] Driver lock poisoned", self.label)
        })?;
        if !driver.is_context_current() {
            return Err(Error::ContextInvalid);
        }

        let mut session = AllocationSession::new(&mut *driver);

        let completed = Self::run_protocol(&mut session, size, resolved).and_then(|texture| {
            session.completed_handles().map(|handles| (Arc::new(texture), handles))
        });
        let (texture, (texture_handle, framebuffer, depth_stencil_buffer)) = match completed {
            Ok(completed) => completed,
            Err(e) => {
                crate::hal_error!(LOG_SOURCE,
                    "[{}] Cube render target creation failed: {}", self.label, e);
                session.abort(self.release_partial_on_failure);
                return Err(e);
            }
        };

        // Registration is the last fallible step that can still be undone
        if let Err(e) = self.register(texture.clone()) {
            crate::hal_error!(LOG_SOURCE,
                "[{}] Cube render target creation failed: {}", self.label, e);
            texture.mark_released();
            session.abort(self.release_partial_on_failure);
            return Err(e);
        }

        drop(session);
        drop(driver);

        let mut wrapper = RenderTargetWrapper::new(
            self.driver.clone(),
            framebuffer,
            depth_stencil_buffer,
            resolved.generate_depth_buffer(),
            resolved.generate_stencil_buffer(),
            size,
            true,
        );
        wrapper.set_texture(texture)?;

        crate::hal_debug!(LOG_SOURCE,
            "[{}] Created cube render target {}x{} (texture {}, framebuffer {}, {:?}/{:?}, {:?})",
            self.label, size, size, texture_handle.raw(), framebuffer.raw(),
            resolved.pixel_format(), resolved.pixel_type(), resolved.sampling_mode());

        Ok(wrapper)
    }

    /// Steps 1 to 9: driver calls and metadata, ending with every bind point released
    fn run_protocol(
        session: &mut AllocationSession<'_>,
        size: u32,
        resolved: &ResolvedOptions,
    ) -> Result<InternalTexture> {
        let handle = session.create_texture()?;
        let mut texture = InternalTexture::new(handle);
        session.bind_texture()?;

        let filters = sampling_parameters(resolved.sampling_mode(), resolved.generate_mipmaps());
        session.set_texture_parameter(TextureParameter::MagFilter(filters.mag))?;
        session.set_texture_parameter(TextureParameter::MinFilter(filters.min))?;
        session.set_texture_parameter(TextureParameter::WrapS(WrapMode::ClampToEdge))?;
        session.set_texture_parameter(TextureParameter::WrapT(WrapMode::ClampToEdge))?;

        let internal_format = InternalFormat::sized(resolved.pixel_type(), resolved.pixel_format());
        for face in CubeFace::ALL {
            session.allocate_face_storage(&TextureStorageDesc {
                target: StorageTarget::CubeFace(face),
                level: 0,
                internal_format,
                width: size,
                height: size,
                pixel_format: resolved.pixel_format(),
                pixel_type: resolved.pixel_type(),
            })?;
        }

        session.create_and_bind_framebuffer()?;
        session.attach_depth_stencil(
            resolved.generate_depth_buffer(),
            resolved.generate_stencil_buffer(),
            size,
        )?;

        if resolved.generate_mipmaps() {
            session.generate_mipmaps()?;
        }

        session.unbind()?;

        texture.populate_cube(size, resolved);
        texture.mark_ready();
        Ok(texture)
    }

    fn register(&self, texture: Arc<InternalTexture>) -> Result<()> {
        let mut registry = self.registry.lock().map_err(|_| {
            Error::creation_failure(
                AllocationStep::Register,
                crate::hal_err!(LOG_SOURCE, "[{}] Texture registry lock poisoned", self.label),
            )
        })?;
        registry
            .register(texture)
            .map(|_| ())
            .map_err(|e| Error::creation_failure(AllocationStep::Register, e))
    }
}

#[cfg(test)]
#[path = "allocator_tests.rs"]
mod tests;
