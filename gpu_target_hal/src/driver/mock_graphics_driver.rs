/// Mock GraphicsDriver for unit tests (no GPU required)
///
/// Records every driver primitive as a `DriverCall`, tracks live objects and
/// bind points, and can be told to fail a given call.

use rustc_hash::FxHashSet;
use crate::driver::{
    CapabilityFlags, CapabilityTable, DepthStencilAttachment, DepthStencilFormat,
    DepthStencilHandle, FramebufferHandle, GraphicsDriver, TextureHandle,
    TextureParameter, TextureStorageDesc, TextureTarget,
};
use crate::error::{Error, Result};

// ============================================================================
// Recorded calls
// ============================================================================

/// One recorded driver primitive
#[derive(Debug, Clone, PartialEq)]
pub enum DriverCall {
    CreateTexture(TextureHandle),
    BindTexture(TextureTarget, Option<TextureHandle>),
    SetTextureParameter(TextureTarget, TextureParameter),
    AllocateTextureStorage(TextureStorageDesc),
    GenerateMipmaps(TextureTarget),
    DeleteTexture(TextureHandle),
    CreateFramebuffer(FramebufferHandle),
    BindFramebuffer(Option<FramebufferHandle>),
    DeleteFramebuffer(FramebufferHandle),
    CreateDepthStencilBuffer {
        format: DepthStencilFormat,
        width: u32,
        height: u32,
        buffer: DepthStencilHandle,
    },
    AttachDepthStencilBuffer(DepthStencilAttachment, DepthStencilHandle),
    DeleteDepthStencilBuffer(DepthStencilHandle),
}

/// Kind of a driver primitive, used for failure injection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverCallKind {
    CreateTexture,
    BindTexture,
    SetTextureParameter,
    AllocateTextureStorage,
    GenerateMipmaps,
    DeleteTexture,
    CreateFramebuffer,
    BindFramebuffer,
    DeleteFramebuffer,
    CreateDepthStencilBuffer,
    AttachDepthStencilBuffer,
    DeleteDepthStencilBuffer,
}

impl DriverCall {
    pub fn kind(&self) -> DriverCallKind {
        match self {
            DriverCall::CreateTexture(_) => DriverCallKind::CreateTexture,
            DriverCall::BindTexture(..) => DriverCallKind::BindTexture,
            DriverCall::SetTextureParameter(..) => DriverCallKind::SetTextureParameter,
            DriverCall::AllocateTextureStorage(_) => DriverCallKind::AllocateTextureStorage,
            DriverCall::GenerateMipmaps(_) => DriverCallKind::GenerateMipmaps,
            DriverCall::DeleteTexture(_) => DriverCallKind::DeleteTexture,
            DriverCall::CreateFramebuffer(_) => DriverCallKind::CreateFramebuffer,
            DriverCall::BindFramebuffer(_) => DriverCallKind::BindFramebuffer,
            DriverCall::DeleteFramebuffer(_) => DriverCallKind::DeleteFramebuffer,
            DriverCall::CreateDepthStencilBuffer { .. } => DriverCallKind::CreateDepthStencilBuffer,
            DriverCall::AttachDepthStencilBuffer(..) => DriverCallKind::AttachDepthStencilBuffer,
            DriverCall::DeleteDepthStencilBuffer(_) => DriverCallKind::DeleteDepthStencilBuffer,
        }
    }
}

// ============================================================================
// Mock driver
// ============================================================================

/// Failure to inject on the `occurrence`-th call (0-based) of `kind`
#[derive(Debug, Clone)]
struct InjectedFailure {
    kind: DriverCallKind,
    occurrence: usize,
    error: Error,
}

/// Mock driver that records calls without a GPU
#[derive(Debug)]
pub struct MockGraphicsDriver {
    /// Every successful call, in order
    pub calls: Vec<DriverCall>,
    capabilities: CapabilityTable,
    context_current: bool,
    next_name: u32,
    failure: Option<InjectedFailure>,
    seen: Vec<DriverCallKind>,
    live_textures: FxHashSet<TextureHandle>,
    live_framebuffers: FxHashSet<FramebufferHandle>,
    live_depth_stencil_buffers: FxHashSet<DepthStencilHandle>,
    bound_texture: Option<(TextureTarget, TextureHandle)>,
    bound_framebuffer: Option<FramebufferHandle>,
}

impl MockGraphicsDriver {
    /// Mock with every capability and a 16384 cube size limit
    pub fn new() -> Self {
        Self::with_capabilities(CapabilityTable::new(CapabilityFlags::all(), 16384))
    }

    /// Mock reporting the given capabilities
    pub fn with_capabilities(capabilities: CapabilityTable) -> Self {
        Self {
            calls: Vec::new(),
            capabilities,
            context_current: true,
            next_name: 1,
            failure: None,
            seen: Vec::new(),
            live_textures: FxHashSet::default(),
            live_framebuffers: FxHashSet::default(),
            live_depth_stencil_buffers: FxHashSet::default(),
            bound_texture: None,
            bound_framebuffer: None,
        }
    }

    /// Make the context current / not current
    pub fn set_context_current(&mut self, current: bool) {
        self.context_current = current;
    }

    /// Fail the `occurrence`-th (0-based) call of `kind` with `error`
    pub fn fail_on(&mut self, kind: DriverCallKind, occurrence: usize, error: Error) {
        self.failure = Some(InjectedFailure { kind, occurrence, error });
    }

    /// Kinds of the recorded calls, in order
    pub fn call_kinds(&self) -> Vec<DriverCallKind> {
        self.calls.iter().map(DriverCall::kind).collect()
    }

    /// Number of recorded calls of `kind`
    pub fn count(&self, kind: DriverCallKind) -> usize {
        self.calls.iter().filter(|c| c.kind() == kind).count()
    }

    pub fn live_texture_count(&self) -> usize {
        self.live_textures.len()
    }

    pub fn live_framebuffer_count(&self) -> usize {
        self.live_framebuffers.len()
    }

    pub fn live_depth_stencil_buffer_count(&self) -> usize {
        self.live_depth_stencil_buffers.len()
    }

    pub fn bound_texture(&self) -> Option<(TextureTarget, TextureHandle)> {
        self.bound_texture
    }

    pub fn bound_framebuffer(&self) -> Option<FramebufferHandle> {
        self.bound_framebuffer
    }

    fn enter(&mut self, kind: DriverCallKind) -> Result<()> {
        let occurrence = self.seen.iter().filter(|k| **k == kind).count();
        self.seen.push(kind);
        match &self.failure {
            Some(failure) if failure.kind == kind && failure.occurrence == occurrence => {
                Err(failure.error.clone())
            }
            _ => Ok(()),
        }
    }

    fn next_name(&mut self) -> u32 {
        let name = self.next_name;
        self.next_name += 1;
        name
    }
}

impl Default for MockGraphicsDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphicsDriver for MockGraphicsDriver {
    fn is_context_current(&self) -> bool {
        self.context_current
    }

    fn probe_capabilities(&self) -> CapabilityTable {
        self.capabilities
    }

    fn create_texture(&mut self) -> Result<TextureHandle> {
        self.enter(DriverCallKind::CreateTexture)?;
        let name = self.next_name();
        let texture = TextureHandle::new(name).expect("mock names start at 1");
        self.live_textures.insert(texture);
        self.calls.push(DriverCall::CreateTexture(texture));
        Ok(texture)
    }

    fn bind_texture(&mut self, target: TextureTarget, texture: Option<TextureHandle>) -> Result<()> {
        self.enter(DriverCallKind::BindTexture)?;
        self.bound_texture = texture.map(|t| (target, t));
        self.calls.push(DriverCall::BindTexture(target, texture));
        Ok(())
    }

    fn set_texture_parameter(&mut self, target: TextureTarget, parameter: TextureParameter) -> Result<()> {
        self.enter(DriverCallKind::SetTextureParameter)?;
        self.calls.push(DriverCall::SetTextureParameter(target, parameter));
        Ok(())
    }

    fn allocate_texture_storage(&mut self, desc: &TextureStorageDesc) -> Result<()> {
        self.enter(DriverCallKind::AllocateTextureStorage)?;
        self.calls.push(DriverCall::AllocateTextureStorage(*desc));
        Ok(())
    }

    fn generate_mipmaps(&mut self, target: TextureTarget) -> Result<()> {
        self.enter(DriverCallKind::GenerateMipmaps)?;
        self.calls.push(DriverCall::GenerateMipmaps(target));
        Ok(())
    }

    fn delete_texture(&mut self, texture: TextureHandle) -> Result<()> {
        self.enter(DriverCallKind::DeleteTexture)?;
        self.live_textures.remove(&texture);
        self.calls.push(DriverCall::DeleteTexture(texture));
        Ok(())
    }

    fn create_framebuffer(&mut self) -> Result<FramebufferHandle> {
        self.enter(DriverCallKind::CreateFramebuffer)?;
        let name = self.next_name();
        let framebuffer = FramebufferHandle::new(name).expect("mock names start at 1");
        self.live_framebuffers.insert(framebuffer);
        self.calls.push(DriverCall::CreateFramebuffer(framebuffer));
        Ok(framebuffer)
    }

    fn bind_framebuffer(&mut self, framebuffer: Option<FramebufferHandle>) -> Result<()> {
        self.enter(DriverCallKind::BindFramebuffer)?;
        self.bound_framebuffer = framebuffer;
        self.calls.push(DriverCall::BindFramebuffer(framebuffer));
        Ok(())
    }

    fn delete_framebuffer(&mut self, framebuffer: FramebufferHandle) -> Result<()> {
        self.enter(DriverCallKind::DeleteFramebuffer)?;
        self.live_framebuffers.remove(&framebuffer);
        self.calls.push(DriverCall::DeleteFramebuffer(framebuffer));
        Ok(())
    }

    fn create_depth_stencil_buffer(
        &mut self,
        format: DepthStencilFormat,
        width: u32,
        height: u32,
    ) -> Result<DepthStencilHandle> {
        self.enter(DriverCallKind::CreateDepthStencilBuffer)?;
        let name = self.next_name();
        let buffer = DepthStencilHandle::new(name).expect("mock names start at 1");
        self.live_depth_stencil_buffers.insert(buffer);
        self.calls.push(DriverCall::CreateDepthStencilBuffer { format, width, height, buffer });
        Ok(buffer)
    }

    fn attach_depth_stencil_buffer(
        &mut self,
        attachment: DepthStencilAttachment,
        buffer: DepthStencilHandle,
    ) -> Result<()> {
        self.enter(DriverCallKind::AttachDepthStencilBuffer)?;
        self.calls.push(DriverCall::AttachDepthStencilBuffer(attachment, buffer));
        Ok(())
    }

    fn delete_depth_stencil_buffer(&mut self, buffer: DepthStencilHandle) -> Result<()> {
        self.enter(DriverCallKind::DeleteDepthStencilBuffer)?;
        self.live_depth_stencil_buffers.remove(&buffer);
        self.calls.push(DriverCall::DeleteDepthStencilBuffer(buffer));
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "mock_graphics_driver_tests.rs"]
mod tests;
