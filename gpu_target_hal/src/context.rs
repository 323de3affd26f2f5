/// DeviceContext - entry point for creating render targets on one device
///
/// Owns the driver binding, the capability table probed at creation and a
/// handle to the texture registry. All calls must come from the thread the
/// device context is current on; the mutexes only serialize access, they do
/// not make the driver usable from other threads.

use std::sync::{Arc, Mutex};
use crate::driver::{CapabilityTable, GraphicsDriver};
use crate::error::{Error, Result};
use crate::target::{CubeAllocator, OptionsResolver, RenderTargetOptions, RenderTargetWrapper};
use crate::texture::TextureRegistry;

/// Device context configuration
#[derive(Debug, Clone)]
pub struct DeviceContextConfig {
    /// Name shown in log messages
    pub label: String,
    /// Reject cube sizes above the device maximum before any driver call
    pub enforce_max_cube_size: bool,
    /// Delete already created objects when an allocation step fails
    pub release_partial_on_failure: bool,
}

impl Default for DeviceContextConfig {
    fn default() -> Self {
        Self {
            label: String::from("default"),
            enforce_max_cube_size: true,
            release_partial_on_failure: true,
        }
    }
}

pub struct DeviceContext {
    driver: Arc<Mutex<dyn GraphicsDriver>>,
    registry: Arc<Mutex<TextureRegistry>>,
    allocator: CubeAllocator,
    config: DeviceContextConfig,
}

impl DeviceContext {
    /// Create a device context and probe its capabilities.
    ///
    /// # Arguments
    ///
    /// * `driver` - Driver binding whose context is current on this thread
    /// * `registry` - Texture registry, possibly shared with other contexts
    /// * `config` - Context configuration
    ///
    /// # Errors
    ///
    /// `ContextInvalid` if the driver's context is not current.
    pub fn new(
        driver: Arc<Mutex<dyn GraphicsDriver>>,
        registry: Arc<Mutex<TextureRegistry>>,
        config: DeviceContextConfig,
    ) -> Result<Self> {
        let capabilities = {
            let driver = driver.lock().map_err(|_| {
                crate::hal_err!("hal::DeviceContext", "[{}] Driver lock poisoned", config.label)
            })?;
            if !driver.is_context_current() {
                return Err(Error::ContextInvalid);
            }
            driver.probe_capabilities()
        };

        crate::hal_info!("hal::DeviceContext",
            "[{}] Device context created (capabilities {:?}, max cube size {})",
            config.label, capabilities.flags(), capabilities.max_cube_texture_size());

        let allocator = CubeAllocator::new(driver.clone(), capabilities, registry.clone())
            .with_label(config.label.clone())
            .with_max_size_check(config.enforce_max_cube_size)
            .with_partial_release(config.release_partial_on_failure);

        Ok(Self {
            driver,
            registry,
            allocator,
            config,
        })
    }

    /// Create a `size` x `size` cube render target.
    ///
    /// Unset options take their defaults and options the device cannot
    /// honor are downgraded. The size is checked before anything else, so
    /// an invalid size neither logs a downgrade nor touches the driver.
    pub fn create_cube_render_target(
        &self,
        size: u32,
        options: &RenderTargetOptions,
    ) -> Result<RenderTargetWrapper> {
        self.allocator.validate(size)?;
        let resolved = OptionsResolver::resolve(options, self.allocator.capabilities());
        self.allocator.allocate(size, &resolved)
    }

    pub fn capabilities(&self) -> &CapabilityTable {
        self.allocator.capabilities()
    }

    pub fn registry(&self) -> &Arc<Mutex<TextureRegistry>> {
        &self.registry
    }

    pub fn driver(&self) -> &Arc<Mutex<dyn GraphicsDriver>> {
        &self.driver
    }

    pub fn config(&self) -> &DeviceContextConfig {
        &self.config
    }

    /// Delete textures no render target or caller references anymore.
    ///
    /// Returns the number of textures released.
    pub fn sweep_textures(&self) -> Result<usize> {
        let (mut driver, mut registry) = self.lock_driver_and_registry()?;
        registry.sweep_unreferenced(&mut *driver)
    }

    /// Delete every registered texture (context teardown or device loss)
    pub fn release_all_textures(&self) -> Result<usize> {
        let (mut driver, mut registry) = self.lock_driver_and_registry()?;
        registry.release_all(&mut *driver)
    }

    /// Driver first, registry second, as during allocation
    fn lock_driver_and_registry(
        &self,
    ) -> Result<(
        std::sync::MutexGuard<'_, dyn GraphicsDriver + 'static>,
        std::sync::MutexGuard<'_, TextureRegistry>,
    )> {
        let driver = self.driver.lock().map_err(|_| {
            crate::hal_err!("hal::DeviceContext", "[{}] Driver lock poisoned", self.config.label)
        })?;
        let registry = self.registry.lock().map_err(|_| {
            crate::hal_err!("hal::DeviceContext", "[{}] Texture registry lock poisoned", self.config.label)
        })?;
        Ok((driver, registry))
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
