/// Multi render target: one render pass writing several color attachments.
///
/// A `MultiRenderTarget` owns a multi-attachment framebuffer allocated by a
/// `GraphicsDevice`, and exposes one stable `Arc<Texture>` facade per
/// attachment. Materials keep those facades across resizes: a rebuild
/// allocates a new framebuffer and reseats the facades onto its textures.
///
/// Hardware without multiple draw buffers yields an inert target: it is
/// created disposed, with zero attachments, and every later operation is
/// a no-op.

use std::sync::{Arc, Mutex, MutexGuard};
use glam::UVec2;
use crate::error::Result;
use crate::graphics_device::{
    GraphicsDevice, MultiAttachmentFramebuffer,
    AddressMode, Texture as GraphicsDeviceTexture,
};
use crate::resource::Texture;
use crate::utils::Observable;
use crate::{engine_debug, engine_err, engine_trace, engine_warn};
use super::multi_render_target_options::{MultiRenderTargetConfig, MultiRenderTargetOptions};

const SOURCE: &str = "galaxy3d::MultiRenderTarget";

fn lock_device(
    device: &Arc<Mutex<dyn GraphicsDevice>>,
) -> Result<MutexGuard<'_, dyn GraphicsDevice + 'static>> {
    device.lock()
        .map_err(|_| engine_err!(SOURCE, "GraphicsDevice lock poisoned"))
}

/// Render target with several color attachments and an optional depth texture
pub struct MultiRenderTarget {
    name: String,
    graphics_device: Arc<Mutex<dyn GraphicsDevice>>,
    size: UVec2,
    config: MultiRenderTargetConfig,
    /// Names applied to the facades on the last full rebuild
    texture_names: Option<Vec<String>>,
    /// GPU-side storage, exclusively owned
    framebuffer: Option<Box<dyn MultiAttachmentFramebuffer>>,
    /// Texture of color slot 0 (what a single-output consumer samples)
    primary_texture: Option<Arc<dyn GraphicsDeviceTexture>>,
    /// One facade per framebuffer texture, same order
    textures: Vec<Arc<Texture>>,
    /// Fired with the face index once attachments are unbound after rendering
    on_after_render: Observable<u32>,
    is_supported: bool,
    is_cube: bool,
    disposed: bool,
}

impl MultiRenderTarget {
    /// Create a multi render target
    ///
    /// # Arguments
    ///
    /// * `name` - Debug name, also used as the framebuffer label
    /// * `graphics_device` - Device allocating the framebuffer
    /// * `size` - Width and height in pixels (each clamped to at least 1)
    /// * `count` - Number of color attachments (`options.texture_count` wins)
    /// * `options` - Slot overrides (defaults when `None`)
    /// * `texture_names` - Names given to the facades, by slot
    ///
    /// A count of zero defers allocation until `update_count()`.
    ///
    /// # Errors
    ///
    /// Returns an error if the device fails to allocate the framebuffer.
    pub fn new(
        name: &str,
        graphics_device: Arc<Mutex<dyn GraphicsDevice>>,
        size: impl Into<UVec2>,
        count: usize,
        options: Option<MultiRenderTargetOptions>,
        texture_names: Option<Vec<String>>,
    ) -> Result<Self> {
        let size: UVec2 = size.into();
        let is_supported = lock_device(&graphics_device)?.supports_multiple_draw_buffers();

        let mut target = Self {
            name: name.to_string(),
            graphics_device,
            size: size.max(UVec2::ONE),
            config: MultiRenderTargetConfig::default(),
            texture_names: None,
            framebuffer: None,
            primary_texture: None,
            textures: Vec::new(),
            on_after_render: Observable::new(),
            is_supported,
            is_cube: false,
            disposed: false,
        };

        if !is_supported {
            engine_warn!(SOURCE,
                "'{}': multiple draw buffers are not supported, target is inert", name);
            target.dispose(false);
            return Ok(target);
        }

        target.config = MultiRenderTargetConfig::from_options(count, &options.unwrap_or_default());
        target.texture_names = texture_names;

        if target.config.count() > 0 {
            target.create_internal_textures()?;
            let names = target.texture_names.clone();
            target.create_textures(names.as_deref());
        }

        engine_debug!(SOURCE, "'{}': created with {} attachments ({}x{})",
            target.name, target.config.count(), target.size.x, target.size.y);
        Ok(target)
    }

    // ===== ALLOCATION =====

    /// Allocate a fresh framebuffer from the current configuration
    ///
    /// Any framebuffer still owned is released first.
    fn create_internal_textures(&mut self) -> Result<()> {
        self.release_framebuffer();

        let device = Arc::clone(&self.graphics_device);
        let mut device = lock_device(&device)?;
        let desc = self.config.target_desc(&self.name, self.size);
        let framebuffer = device.create_multiple_attachment_target(&desc)?;

        self.primary_texture = framebuffer.primary_texture().cloned();
        engine_trace!(SOURCE, "'{}': allocated framebuffer with {} textures",
            self.name, framebuffer.textures().len());
        self.framebuffer = Some(framebuffer);
        Ok(())
    }

    fn release_framebuffer(&mut self) {
        if let Some(mut framebuffer) = self.framebuffer.take() {
            framebuffer.dispose();
        }
        self.primary_texture = None;
    }

    /// Replace every facade with a fresh one per framebuffer texture
    fn create_textures(&mut self, names: Option<&[String]>) {
        self.release_textures();

        let Some(framebuffer) = self.framebuffer.as_ref() else {
            return;
        };
        self.textures = framebuffer.textures().iter()
            .enumerate()
            .map(|(index, internal)| {
                let name = names.and_then(|names| names.get(index)).cloned();
                let texture = Arc::new(Texture::new(name));
                texture.bind(Some(Arc::clone(internal)));
                texture
            })
            .collect();
    }

    /// Detach and release every facade
    fn release_textures(&mut self) {
        for texture in self.textures.drain(..) {
            texture.release();
        }
    }

    /// Reseat existing facades onto the current framebuffer textures
    ///
    /// Missing facades are created, surplus facades are detached.
    fn rebind_textures(&mut self) {
        let Some(framebuffer) = self.framebuffer.as_ref() else {
            return;
        };
        let internals = framebuffer.textures();

        for (index, texture) in self.textures.iter().enumerate() {
            texture.bind(internals.get(index).cloned());
        }
        for index in self.textures.len()..internals.len() {
            let name = self.texture_names.as_ref()
                .and_then(|names| names.get(index))
                .cloned();
            let texture = Arc::new(Texture::new(name));
            texture.bind(Some(Arc::clone(&internals[index])));
            self.textures.push(texture);
        }
    }

    /// Reallocate GPU storage from the current configuration
    ///
    /// With `force_full_rebuild`, facades are replaced (named from
    /// `texture_names`). Otherwise the existing facades are reseated, so
    /// every holder of an `Arc<Texture>` keeps a valid handle.
    ///
    /// No-op when disposed or when the configured count is zero.
    pub fn rebuild(&mut self, force_full_rebuild: bool, texture_names: Option<Vec<String>>) -> Result<()> {
        if self.disposed || self.config.count() < 1 {
            return Ok(());
        }

        self.release_internal_textures();
        self.create_internal_textures()?;

        if force_full_rebuild {
            self.texture_names = texture_names;
            let names = self.texture_names.clone();
            self.create_textures(names.as_deref());
        } else {
            self.rebind_textures();
        }

        if self.config.samples() != 1 {
            let samples = self.config.samples();
            let draw_to_all = self.config.draw_to_all_attachments();
            if let Some(framebuffer) = self.framebuffer.as_mut() {
                let applied = framebuffer.set_sample_count(samples, draw_to_all);
                self.config.set_samples(applied);
            }
        }

        engine_trace!(SOURCE, "'{}': rebuilt ({}x{}, full: {})",
            self.name, self.size.x, self.size.y, force_full_rebuild);
        Ok(())
    }

    // ===== SHAPE CHANGES =====

    /// Change the pixel size and reallocate, keeping facade identity
    ///
    /// # Errors
    ///
    /// Returns an error if the device fails to allocate the new framebuffer.
    pub fn resize(&mut self, size: impl Into<UVec2>) -> Result<()> {
        if self.disposed {
            return Ok(());
        }
        let size: UVec2 = size.into();
        self.size = size.max(UVec2::ONE);
        engine_debug!(SOURCE, "'{}': resize to {}x{}", self.name, self.size.x, self.size.y);
        self.rebuild(false, None)
    }

    /// Resize by a ratio of the current size (each dimension floored, min 1)
    pub fn scale(&mut self, ratio: f32) -> Result<()> {
        let size = (self.size.as_vec2() * ratio).floor().as_uvec2();
        self.resize(size)
    }

    /// Change the number of color attachments
    ///
    /// Per-slot settings are re-derived from `options` (defaults for every
    /// slot it does not cover) and the facades are replaced. Dropping to
    /// zero attachments releases the framebuffer and every facade.
    ///
    /// # Errors
    ///
    /// Returns an error if the device fails to allocate the new framebuffer.
    /// The previous configuration is then kept, with its facades detached
    /// until the next successful `rebuild()`.
    pub fn update_count(
        &mut self,
        count: usize,
        options: Option<&MultiRenderTargetOptions>,
        texture_names: Option<Vec<String>>,
    ) -> Result<()> {
        if self.disposed {
            return Ok(());
        }

        let previous = self.config.clone();
        self.config.update_count(count, options);
        engine_debug!(SOURCE, "'{}': attachment count set to {}", self.name, count);

        if count == 0 {
            self.release_textures();
            self.release_internal_textures();
            self.texture_names = texture_names;
            return Ok(());
        }
        if let Err(error) = self.rebuild(true, texture_names) {
            self.config = previous;
            return Err(error);
        }
        Ok(())
    }

    /// Substitute an externally created texture into a color slot
    ///
    /// `index` is clamped to the current color count: an index at or past it
    /// appends a slot (before the depth texture, if any). Only the touched
    /// slot of the configuration is updated from the texture.
    ///
    /// No-op when there is no framebuffer.
    pub fn set_internal_texture(
        &mut self,
        texture: Arc<dyn GraphicsDeviceTexture>,
        index: usize,
        dispose_previous: bool,
    ) {
        let Some(framebuffer) = self.framebuffer.as_mut() else {
            return;
        };

        let color_count = framebuffer.color_attachment_count();
        let slot = index.min(color_count);

        if slot == 0 {
            self.primary_texture = Some(Arc::clone(&texture));
        }
        framebuffer.set_texture(Arc::clone(&texture), slot, dispose_previous);

        let position = slot.min(self.textures.len());
        if slot == color_count || self.textures.len() <= slot {
            let name = self.texture_names.as_ref()
                .and_then(|names| names.get(slot))
                .cloned();
            self.textures.insert(position, Arc::new(Texture::new(name)));
        }
        self.textures[position].bind(Some(Arc::clone(&texture)));

        self.config.sync_slot(slot, texture.info());
        self.config.set_count(framebuffer.color_attachment_count());

        engine_debug!(SOURCE, "'{}': texture set on slot {} ({} attachments)",
            self.name, slot, self.config.count());
    }

    // ===== RELEASE =====

    /// Release the GPU storage, keeping the facades (detached)
    ///
    /// The facades are reattached by the next `rebuild()`.
    pub fn release_internal_textures(&mut self) {
        let Some(mut framebuffer) = self.framebuffer.take() else {
            return;
        };
        for texture in &self.textures {
            texture.bind(None);
        }
        framebuffer.dispose();
        self.primary_texture = None;
    }

    /// Dispose of the target
    ///
    /// Releases every facade. With `do_not_dispose_internal_textures` the
    /// framebuffer is NOT released and is handed back to the caller instead.
    /// Disposing twice is a no-op.
    pub fn dispose(&mut self, do_not_dispose_internal_textures: bool) -> Option<Box<dyn MultiAttachmentFramebuffer>> {
        if self.disposed {
            return None;
        }

        self.release_textures();
        let retained = if do_not_dispose_internal_textures {
            self.primary_texture = None;
            self.framebuffer.take()
        } else {
            self.release_internal_textures();
            None
        };

        self.on_after_render.clear();
        self.disposed = true;
        engine_debug!(SOURCE, "'{}': disposed (framebuffer kept: {})",
            self.name, retained.is_some());
        retained
    }

    // ===== RENDERING =====

    /// Unbind every color attachment after rendering
    ///
    /// After-render observers are notified with `face_index` once the
    /// device has unbound the attachments and its lock is released. No-op
    /// without a framebuffer.
    ///
    /// # Errors
    ///
    /// Returns an error if the device lock is poisoned.
    pub fn unbind_frame_buffer(&mut self, face_index: u32) -> Result<()> {
        let Some(framebuffer) = self.framebuffer.as_ref() else {
            return Ok(());
        };

        let mut unbound = false;
        lock_device(&self.graphics_device)?.unbind_all_color_attachments(
            framebuffer.as_ref(),
            self.is_cube,
            &mut || unbound = true,
        );

        // Device released: observers may use it
        if unbound {
            self.on_after_render.notify(&face_index);
        }
        Ok(())
    }

    /// Observers fired after attachments are unbound
    pub fn on_after_render(&self) -> &Observable<u32> {
        &self.on_after_render
    }

    /// Observers fired after attachments are unbound (mutable, to add or remove)
    pub fn on_after_render_mut(&mut self) -> &mut Observable<u32> {
        &mut self.on_after_render
    }

    // ===== SAMPLING =====

    /// Set the U addressing mode of every facade
    pub fn set_wrap_u(&self, mode: AddressMode) {
        for texture in &self.textures {
            texture.set_wrap_u(mode);
        }
    }

    /// Set the V addressing mode of every facade
    pub fn set_wrap_v(&self, mode: AddressMode) {
        for texture in &self.textures {
            texture.set_wrap_v(mode);
        }
    }

    /// MSAA samples per pixel
    pub fn samples(&self) -> u32 {
        self.config.samples()
    }

    /// Change the MSAA sample count
    ///
    /// Applied immediately when a framebuffer exists (the stored value is
    /// what the framebuffer accepted). Otherwise the value is clamped to the
    /// device's `max_samples()` and remembered for the next allocation.
    /// No-op once disposed.
    ///
    /// # Errors
    ///
    /// Returns an error if the device lock is poisoned.
    pub fn set_samples(&mut self, samples: u32) -> Result<()> {
        if self.disposed {
            return Ok(());
        }

        let draw_to_all = self.config.draw_to_all_attachments();
        let applied = match self.framebuffer.as_mut() {
            Some(framebuffer) => framebuffer.set_sample_count(samples, draw_to_all),
            None => {
                let max_samples = lock_device(&self.graphics_device)?.max_samples();
                samples.min(max_samples)
            }
        };
        self.config.set_samples(applied);
        Ok(())
    }

    // ===== ACCESSORS =====

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the device supports multiple draw buffers
    pub fn is_supported(&self) -> bool {
        self.is_supported
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Whether the target renders to cube faces
    pub fn is_cube(&self) -> bool {
        self.is_cube
    }

    /// Facades in framebuffer order (color slots, then the optional depth texture)
    pub fn textures(&self) -> &[Arc<Texture>] {
        &self.textures
    }

    /// Number of color attachments
    pub fn count(&self) -> usize {
        self.config.count()
    }

    /// Facade of the depth texture, if one was requested
    pub fn depth_texture(&self) -> Option<&Arc<Texture>> {
        if self.config.generate_depth_texture() {
            self.textures.get(self.config.count())
        } else {
            None
        }
    }

    pub fn size(&self) -> UVec2 {
        self.size
    }

    pub fn config(&self) -> &MultiRenderTargetConfig {
        &self.config
    }

    /// Names applied to the facades on the last full rebuild
    pub fn texture_names(&self) -> Option<&[String]> {
        self.texture_names.as_deref()
    }

    /// GPU texture of color slot 0
    pub fn primary_texture(&self) -> Option<&Arc<dyn GraphicsDeviceTexture>> {
        self.primary_texture.as_ref()
    }

    /// The owned framebuffer, if allocated
    pub fn framebuffer(&self) -> Option<&dyn MultiAttachmentFramebuffer> {
        self.framebuffer.as_deref()
    }

    /// The device this target allocates from
    pub fn graphics_device(&self) -> &Arc<Mutex<dyn GraphicsDevice>> {
        &self.graphics_device
    }
}

impl Drop for MultiRenderTarget {
    fn drop(&mut self) {
        self.dispose(false);
    }
}

#[cfg(test)]
#[path = "multi_render_target_tests.rs"]
mod tests;
