/// TextureRegistry - every texture created through a device context
///
/// Textures are stored in a SlotMap for O(1) insert/remove with stable keys,
/// plus a handle index so a driver name maps back to its record. The
/// registry owns one `Arc` per texture; render targets hold the others.

use std::sync::Arc;
use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use crate::driver::{GraphicsDriver, TextureHandle};
use crate::error::{Error, Result};
use crate::texture::InternalTexture;

new_key_type! {
    /// Stable key of a texture within a TextureRegistry.
    ///
    /// A key becomes invalid only when its own texture is removed.
    pub struct TextureKey;
}

pub struct TextureRegistry {
    textures: SlotMap<TextureKey, Arc<InternalTexture>>,
    by_handle: FxHashMap<TextureHandle, TextureKey>,
}

impl TextureRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            textures: SlotMap::with_key(),
            by_handle: FxHashMap::default(),
        }
    }

    /// Track a texture
    ///
    /// # Errors
    ///
    /// `InvalidResource` if a texture with the same driver handle is
    /// already registered.
    pub fn register(&mut self, texture: Arc<InternalTexture>) -> Result<TextureKey> {
        let handle = texture.handle();
        if self.by_handle.contains_key(&handle) {
            return Err(Error::InvalidResource(format!(
                "texture {} is already registered",
                handle.raw()
            )));
        }
        let key = self.textures.insert(texture);
        self.by_handle.insert(handle, key);
        Ok(key)
    }

    pub fn get(&self, key: TextureKey) -> Option<&Arc<InternalTexture>> {
        self.textures.get(key)
    }

    /// Key of the texture owning `handle`
    pub fn key_of(&self, handle: TextureHandle) -> Option<TextureKey> {
        self.by_handle.get(&handle).copied()
    }

    pub fn contains(&self, handle: TextureHandle) -> bool {
        self.by_handle.contains_key(&handle)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TextureKey, &Arc<InternalTexture>)> + '_ {
        self.textures.iter()
    }

    /// Stop tracking a texture without touching its driver object
    pub fn remove(&mut self, key: TextureKey) -> Option<Arc<InternalTexture>> {
        let texture = self.textures.remove(key)?;
        self.by_handle.remove(&texture.handle());
        Some(texture)
    }

    /// Sum of `memory_size` over every tracked texture, saturating at `u64::MAX`
    pub fn total_memory_size(&self) -> u64 {
        self.textures
            .values()
            .map(|t| t.memory_size())
            .fold(0u64, u64::saturating_add)
    }

    /// Delete the driver objects of textures nothing but the registry references.
    ///
    /// Returns the number of textures released. Textures whose deletion
    /// failed stay registered; the first failure is returned after every
    /// candidate was attempted.
    pub fn sweep_unreferenced(&mut self, driver: &mut dyn GraphicsDriver) -> Result<usize> {
        let candidates: Vec<TextureKey> = self
            .textures
            .iter()
            .filter(|(_, texture)| Arc::strong_count(texture) == 1)
            .map(|(key, _)| key)
            .collect();
        self.release(candidates, driver)
    }

    /// Delete the driver object of every tracked texture.
    ///
    /// Render targets still holding one of these textures see it as not ready.
    pub fn release_all(&mut self, driver: &mut dyn GraphicsDriver) -> Result<usize> {
        let keys: Vec<TextureKey> = self.textures.keys().collect();
        self.release(keys, driver)
    }

    fn release(&mut self, keys: Vec<TextureKey>, driver: &mut dyn GraphicsDriver) -> Result<usize> {
        let mut released = 0;
        let mut first_error = None;

        for key in keys {
            let Some(handle) = self.textures.get(key).map(|t| t.handle()) else {
                continue;
            };
            match driver.delete_texture(handle) {
                Ok(()) => {
                    if let Some(texture) = self.remove(key) {
                        texture.mark_released();
                    }
                    released += 1;
                }
                Err(e) => {
                    crate::hal_error!("hal::TextureRegistry",
                        "Failed to delete texture {}: {}", handle.raw(), e);
                    first_error.get_or_insert(e);
                }
            }
        }

        if released > 0 {
            crate::hal_trace!("hal::TextureRegistry", "Released {} texture(s)", released);
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(released),
        }
    }
}

impl Default for TextureRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "texture_registry_tests.rs"]
mod tests;
