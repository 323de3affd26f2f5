//! Error types for the GPU target HAL
//!
//! This module defines the error types returned by the driver binding,
//! the cube render target allocator, and the texture registry.

use std::fmt;

/// Result type for HAL operations
pub type Result<T> = std::result::Result<T, Error>;

/// Step of the cube render target allocation protocol.
///
/// Carried by `Error::ResourceCreationFailure` so callers know exactly which
/// driver primitive failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocationStep {
    /// Creating the empty texture object
    CreateTexture,
    /// Binding the texture as the active cube-map target
    BindTexture,
    /// Applying filter and wrap parameters
    SetTextureParameters,
    /// Allocating storage for one cube face (0 = +X .. 5 = -Z)
    AllocateFaceStorage(u32),
    /// Creating the framebuffer object
    CreateFramebuffer,
    /// Binding the framebuffer as the active render target
    BindFramebuffer,
    /// Creating the depth / stencil buffer
    CreateDepthStencilBuffer,
    /// Attaching the depth / stencil buffer to the bound framebuffer
    AttachDepthStencilBuffer,
    /// Generating the mip chain
    GenerateMipmaps,
    /// Restoring the no-resource-bound state
    Unbind,
    /// Registering the texture in the texture registry
    Register,
}

impl fmt::Display for AllocationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocationStep::CreateTexture => write!(f, "create texture"),
            AllocationStep::BindTexture => write!(f, "bind texture"),
            AllocationStep::SetTextureParameters => write!(f, "set texture parameters"),
            AllocationStep::AllocateFaceStorage(face) => write!(f, "allocate storage for cube face {}", face),
            AllocationStep::CreateFramebuffer => write!(f, "create framebuffer"),
            AllocationStep::BindFramebuffer => write!(f, "bind framebuffer"),
            AllocationStep::CreateDepthStencilBuffer => write!(f, "create depth/stencil buffer"),
            AllocationStep::AttachDepthStencilBuffer => write!(f, "attach depth/stencil buffer"),
            AllocationStep::GenerateMipmaps => write!(f, "generate mipmaps"),
            AllocationStep::Unbind => write!(f, "unbind"),
            AllocationStep::Register => write!(f, "register texture"),
        }
    }
}

/// HAL errors
#[derive(Debug, Clone)]
pub enum Error {
    /// Driver-level error (or poisoned lock around the driver)
    BackendError(String),

    /// Out of GPU memory
    OutOfMemory,

    /// The device was lost; every handle created on it is invalid
    DeviceLost,

    /// Caller supplied an invalid argument (e.g. a zero size)
    InvalidArgument(String),

    /// The device context is not current on the calling thread
    ContextInvalid,

    /// Invalid resource (disposed wrapper, unknown registry key, etc.)
    InvalidResource(String),

    /// A driver primitive failed while creating a render target
    ResourceCreationFailure {
        /// Protocol step that failed
        step: AllocationStep,
        /// Error reported by the driver
        cause: Box<Error>,
    },
}

impl Error {
    /// Wrap a driver error as a creation failure at `step`
    pub fn creation_failure(step: AllocationStep, cause: Error) -> Self {
        Error::ResourceCreationFailure {
            step,
            cause: Box::new(cause),
        }
    }

    /// Protocol step that failed, for `ResourceCreationFailure` errors
    pub fn failed_step(&self) -> Option<AllocationStep> {
        match self {
            Error::ResourceCreationFailure { step, .. } => Some(*step),
            _ => None,
        }
    }

    /// Whether a higher layer can recover from this error.
    ///
    /// Nothing in this crate is fatal to the process; device loss is
    /// recovered by recreating the context.
    pub fn is_recoverable(&self) -> bool {
        true
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::OutOfMemory => write!(f, "Out of GPU memory"),
            Error::DeviceLost => write!(f, "Device lost"),
            Error::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            Error::ContextInvalid => write!(f, "Device context is not current"),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::ResourceCreationFailure { step, cause } => {
                write!(f, "Resource creation failed at step '{}': {}", step, cause)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::ResourceCreationFailure { cause, .. } => Some(cause.as_ref()),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
