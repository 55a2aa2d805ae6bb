/// Resource-level texture handle.
///
/// A `Texture` is a thin facade over one GPU texture owned by someone else
/// (usually the framebuffer of a multi render target). Materials and other
/// consumers hold an `Arc<Texture>`; when the render target is rebuilt, the
/// facade is reseated onto the new GPU texture so every holder sees the
/// change without re-fetching anything.
///
/// The facade never releases the GPU texture it points to.

use std::sync::{Arc, PoisonError, RwLock};
use std::sync::atomic::{AtomicBool, Ordering};
use crate::graphics_device::{
    AddressMode,
    Texture as GraphicsDeviceTexture,
    TextureInfo,
};

// ===== SAMPLER STATE =====

/// Sampling properties applied when a consumer samples the facade
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplerState {
    /// Addressing along U
    pub wrap_u: AddressMode,
    /// Addressing along V
    pub wrap_v: AddressMode,
    /// Addressing along W
    pub wrap_w: AddressMode,
    /// Anisotropic filtering level (1 = disabled)
    pub anisotropic_filtering_level: u32,
}

impl Default for SamplerState {
    fn default() -> Self {
        Self {
            wrap_u: AddressMode::ClampToEdge,
            wrap_v: AddressMode::ClampToEdge,
            wrap_w: AddressMode::ClampToEdge,
            anisotropic_filtering_level: 4,
        }
    }
}

// ===== TEXTURE =====

/// Reseatable handle to one GPU texture.
///
/// Identity is the `Arc` itself: compare handles with `Arc::ptr_eq`.
pub struct Texture {
    /// Optional logical name (e.g. "albedo", "normal")
    name: RwLock<Option<String>>,
    /// The GPU texture currently referenced (not owned)
    internal_texture: RwLock<Option<Arc<dyn GraphicsDeviceTexture>>>,
    /// Pass-through sampling properties
    sampler: RwLock<SamplerState>,
    /// Set once the owning render target releases this handle
    released: AtomicBool,
}

impl Texture {
    /// Create an unbound handle (internal: created by render targets)
    pub(crate) fn new(name: Option<String>) -> Self {
        Self {
            name: RwLock::new(name),
            internal_texture: RwLock::new(None),
            sampler: RwLock::new(SamplerState::default()),
            released: AtomicBool::new(false),
        }
    }

    /// Get the logical name
    pub fn name(&self) -> Option<String> {
        self.name.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Set the logical name
    pub fn set_name(&self, name: impl Into<String>) {
        *self.name.write().unwrap_or_else(PoisonError::into_inner) = Some(name.into());
    }

    /// Get the GPU texture currently referenced, if any
    pub fn internal_texture(&self) -> Option<Arc<dyn GraphicsDeviceTexture>> {
        self.internal_texture.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Properties of the referenced GPU texture, if any
    pub fn info(&self) -> Option<TextureInfo> {
        self.internal_texture().map(|texture| texture.info().clone())
    }

    /// Whether this handle currently references a GPU texture
    pub fn is_bound(&self) -> bool {
        self.internal_texture.read().unwrap_or_else(PoisonError::into_inner).is_some()
    }

    /// Reseat the handle onto another GPU texture (or detach it with `None`)
    pub(crate) fn bind(&self, texture: Option<Arc<dyn GraphicsDeviceTexture>>) {
        *self.internal_texture.write().unwrap_or_else(PoisonError::into_inner) = texture;
    }

    /// Detach and mark released. The GPU texture is left to its owner.
    pub(crate) fn release(&self) {
        self.bind(None);
        self.released.store(true, Ordering::Release);
    }

    /// Whether the owning render target has released this handle
    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::Acquire)
    }

    // ===== SAMPLING =====

    /// Snapshot of the sampling properties
    pub fn sampler_state(&self) -> SamplerState {
        *self.sampler.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn wrap_u(&self) -> AddressMode {
        self.sampler_state().wrap_u
    }

    pub fn set_wrap_u(&self, mode: AddressMode) {
        self.sampler.write().unwrap_or_else(PoisonError::into_inner).wrap_u = mode;
    }

    pub fn wrap_v(&self) -> AddressMode {
        self.sampler_state().wrap_v
    }

    pub fn set_wrap_v(&self, mode: AddressMode) {
        self.sampler.write().unwrap_or_else(PoisonError::into_inner).wrap_v = mode;
    }

    pub fn wrap_w(&self) -> AddressMode {
        self.sampler_state().wrap_w
    }

    pub fn set_wrap_w(&self, mode: AddressMode) {
        self.sampler.write().unwrap_or_else(PoisonError::into_inner).wrap_w = mode;
    }

    /// Set the anisotropic filtering level (clamped to at least 1)
    pub fn set_anisotropic_filtering_level(&self, level: u32) {
        self.sampler.write().unwrap_or_else(PoisonError::into_inner)
            .anisotropic_filtering_level = level.max(1);
    }
}

impl std::fmt::Debug for Texture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Texture")
            .field("name", &self.name())
            .field("bound", &self.is_bound())
            .field("released", &self.is_released())
            .field("sampler", &self.sampler_state())
            .finish()
    }
}

#[cfg(test)]
#[path = "texture_tests.rs"]
mod tests;
