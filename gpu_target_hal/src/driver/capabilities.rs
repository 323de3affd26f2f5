/// Capability table of a device context
///
/// Probed once when a device context is created and read-only afterwards.
/// `CapabilityTable` is `Copy`, so every component that needs it keeps its
/// own snapshot and nothing can mutate the shared table.

use bitflags::bitflags;

bitflags! {
    /// Boolean device capabilities
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CapabilityFlags: u32 {
        /// 32-bit float textures can be allocated and rendered to
        const FLOAT_TEXTURE = 1 << 0;
        /// 32-bit float textures support linear filtering
        const FLOAT_LINEAR_FILTER = 1 << 1;
        /// 16-bit float textures support linear filtering
        const HALF_FLOAT_LINEAR_FILTER = 1 << 2;
    }
}

/// Supported features and limits of one device context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapabilityTable {
    flags: CapabilityFlags,
    max_cube_texture_size: u32,
}

impl CapabilityTable {
    /// Build a table from probed values
    pub fn new(flags: CapabilityFlags, max_cube_texture_size: u32) -> Self {
        Self {
            flags,
            max_cube_texture_size,
        }
    }

    /// Whether every flag in `flag` is supported
    pub fn query(&self, flag: CapabilityFlags) -> bool {
        self.flags.contains(flag)
    }

    /// All supported flags
    pub fn flags(&self) -> CapabilityFlags {
        self.flags
    }

    /// Largest edge length of a cube texture face
    pub fn max_cube_texture_size(&self) -> u32 {
        self.max_cube_texture_size
    }

    pub fn supports_float_texture(&self) -> bool {
        self.query(CapabilityFlags::FLOAT_TEXTURE)
    }

    pub fn supports_float_linear_filter(&self) -> bool {
        self.query(CapabilityFlags::FLOAT_LINEAR_FILTER)
    }

    pub fn supports_half_float_linear_filter(&self) -> bool {
        self.query(CapabilityFlags::HALF_FLOAT_LINEAR_FILTER)
    }
}

#[cfg(test)]
#[path = "capabilities_tests.rs"]
mod tests;
