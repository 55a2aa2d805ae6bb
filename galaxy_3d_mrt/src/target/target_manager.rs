/// Central render target manager for the engine.
///
/// Manages named multi render targets (G-buffers, light accumulation,
/// post-processing chains). Removing a target disposes it.

use std::collections::hash_map::Entry;
use std::sync::{Arc, Mutex};
use glam::UVec2;
use rustc_hash::FxHashMap;
use crate::error::Result;
use crate::graphics_device::GraphicsDevice;
use crate::{engine_bail, engine_debug};
use super::multi_render_target::MultiRenderTarget;
use super::multi_render_target_options::MultiRenderTargetOptions;

/// Target manager singleton (managed by Engine)
///
/// Stores named multi render targets. Multiple targets can exist
/// simultaneously, possibly on different graphics devices.
pub struct TargetManager {
    multi_render_targets: FxHashMap<String, MultiRenderTarget>,
}

impl TargetManager {
    /// Create a new empty target manager
    pub fn new() -> Self {
        Self {
            multi_render_targets: FxHashMap::default(),
        }
    }

    /// Create a new named multi render target
    ///
    /// Returns a mutable reference to the created target.
    ///
    /// # Errors
    ///
    /// Returns an error if a target with the same name already exists, or
    /// if the device fails to allocate the framebuffer.
    pub fn create_multi_render_target(
        &mut self,
        name: &str,
        graphics_device: Arc<Mutex<dyn GraphicsDevice>>,
        size: impl Into<UVec2>,
        count: usize,
        options: Option<MultiRenderTargetOptions>,
        texture_names: Option<Vec<String>>,
    ) -> Result<&mut MultiRenderTarget> {
        match self.multi_render_targets.entry(name.to_string()) {
            Entry::Occupied(_) => {
                engine_bail!("galaxy3d::TargetManager",
                    "MultiRenderTarget '{}' already exists", name);
            }
            Entry::Vacant(entry) => {
                let target = MultiRenderTarget::new(
                    name, graphics_device, size, count, options, texture_names,
                )?;
                engine_debug!("galaxy3d::TargetManager",
                    "MultiRenderTarget '{}' created", name);
                Ok(entry.insert(target))
            }
        }
    }

    /// Get a multi render target by name
    pub fn multi_render_target(&self, name: &str) -> Option<&MultiRenderTarget> {
        self.multi_render_targets.get(name)
    }

    /// Get a mutable multi render target by name
    pub fn multi_render_target_mut(&mut self, name: &str) -> Option<&mut MultiRenderTarget> {
        self.multi_render_targets.get_mut(name)
    }

    /// Remove and dispose a multi render target
    ///
    /// Returns false if no target has this name.
    pub fn remove_multi_render_target(&mut self, name: &str) -> bool {
        match self.multi_render_targets.remove(name) {
            Some(mut target) => {
                target.dispose(false);
                engine_debug!("galaxy3d::TargetManager",
                    "MultiRenderTarget '{}' removed", name);
                true
            }
            None => false,
        }
    }

    /// Get the number of multi render targets
    pub fn multi_render_target_count(&self) -> usize {
        self.multi_render_targets.len()
    }

    /// Get all multi render target names
    pub fn multi_render_target_names(&self) -> Vec<&str> {
        self.multi_render_targets.keys().map(|k| k.as_str()).collect()
    }

    /// Resize every target (e.g. after the window size changed)
    ///
    /// Stops at the first device failure.
    pub fn resize_all(&mut self, size: impl Into<UVec2>) -> Result<()> {
        let size: UVec2 = size.into();
        for target in self.multi_render_targets.values_mut() {
            target.resize(size)?;
        }
        Ok(())
    }

    /// Dispose and remove all targets
    pub fn clear(&mut self) {
        for (_, mut target) in self.multi_render_targets.drain() {
            target.dispose(false);
        }
    }
}

impl Default for TargetManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "target_manager_tests.rs"]
mod tests;
