/// Mock GraphicsDevice for unit tests (no GPU required)
///
/// Tracks every texture and framebuffer it hands out so tests can assert
/// that multi render targets never leak or double-release GPU resources.

use std::sync::{Arc, Mutex};
use rustc_hash::FxHashSet;
use crate::graphics_device::{
    GraphicsDevice, Texture, TextureDesc, TextureInfo, TextureUsage,
    MultiAttachmentFramebuffer, MultiAttachmentTargetDesc,
};
use crate::error::{Error, Result};

// ============================================================================
// Mock device statistics
// ============================================================================

/// Bookkeeping shared between the mock device, its framebuffers and the test
#[derive(Debug, Default)]
pub struct MockDeviceStats {
    /// Addresses of textures created and not yet released
    pub live_textures: FxHashSet<usize>,
    pub textures_created: usize,
    pub textures_released: usize,
    /// Releases of a texture that was not live
    pub double_releases: usize,
    pub framebuffers_created: usize,
    pub framebuffers_disposed: usize,
    /// dispose() called on an already disposed framebuffer
    pub framebuffer_double_disposals: usize,
    pub unbind_calls: usize,
    /// (requested, draw_to_all_attachments) for every set_sample_count call
    pub sample_requests: Vec<(u32, bool)>,
    /// draw_to_all_attachments of the last allocation request
    pub last_draw_to_all_attachments: Option<bool>,
}

impl MockDeviceStats {
    pub fn live_texture_count(&self) -> usize {
        self.live_textures.len()
    }

    pub fn live_framebuffer_count(&self) -> usize {
        self.framebuffers_created - self.framebuffers_disposed
    }
}

fn texture_address(texture: &Arc<dyn Texture>) -> usize {
    Arc::as_ptr(texture) as *const () as usize
}

fn register_texture(stats: &Mutex<MockDeviceStats>, texture: &Arc<dyn Texture>) {
    let mut stats = stats.lock().unwrap();
    stats.textures_created += 1;
    stats.live_textures.insert(texture_address(texture));
}

fn release_texture(stats: &Mutex<MockDeviceStats>, texture: &Arc<dyn Texture>) {
    let mut stats = stats.lock().unwrap();
    if stats.live_textures.remove(&texture_address(texture)) {
        stats.textures_released += 1;
    } else {
        stats.double_releases += 1;
    }
}

// ============================================================================
// Mock Texture
// ============================================================================

#[derive(Debug)]
pub struct MockTexture {
    pub info: TextureInfo,
    pub name: String,
}

impl MockTexture {
    pub fn new(info: TextureInfo, name: String) -> Self {
        Self { info, name }
    }
}

impl Texture for MockTexture {
    fn info(&self) -> &TextureInfo {
        &self.info
    }
}

// ============================================================================
// Mock Framebuffer
// ============================================================================

pub struct MockFramebuffer {
    pub width: u32,
    pub height: u32,
    pub textures: Vec<Arc<dyn Texture>>,
    pub color_count: usize,
    pub samples: u32,
    pub max_samples: u32,
    pub disposed: bool,
    stats: Arc<Mutex<MockDeviceStats>>,
}

impl MultiAttachmentFramebuffer for MockFramebuffer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn textures(&self) -> &[Arc<dyn Texture>] {
        &self.textures
    }

    fn color_attachment_count(&self) -> usize {
        self.color_count
    }

    fn samples(&self) -> u32 {
        self.samples
    }

    fn set_sample_count(&mut self, samples: u32, draw_to_all_attachments: bool) -> u32 {
        self.stats.lock().unwrap().sample_requests.push((samples, draw_to_all_attachments));
        self.samples = samples.clamp(1, self.max_samples);
        self.samples
    }

    fn set_texture(&mut self, texture: Arc<dyn Texture>, index: usize, dispose_previous: bool) {
        if index < self.color_count {
            let previous = std::mem::replace(&mut self.textures[index], texture);
            if dispose_previous {
                release_texture(&self.stats, &previous);
            }
        } else {
            self.textures.insert(self.color_count, texture);
            self.color_count += 1;
        }
    }

    fn dispose(&mut self) {
        if self.disposed {
            self.stats.lock().unwrap().framebuffer_double_disposals += 1;
            return;
        }
        for texture in self.textures.drain(..) {
            release_texture(&self.stats, &texture);
        }
        self.color_count = 0;
        self.disposed = true;
        self.stats.lock().unwrap().framebuffers_disposed += 1;
    }

    fn is_disposed(&self) -> bool {
        self.disposed
    }
}

// ============================================================================
// Mock GraphicsDevice
// ============================================================================

/// Mock GraphicsDevice that tracks created resources without GPU
pub struct MockGraphicsDevice {
    /// Answer to supports_multiple_draw_buffers()
    pub supports_multiple_draw_buffers: bool,
    /// Clamp applied by set_sample_count()
    pub max_samples: u32,
    /// Fail the next framebuffer allocation with OutOfMemory
    pub fail_next_allocation: bool,
    stats: Arc<Mutex<MockDeviceStats>>,
}

impl MockGraphicsDevice {
    /// Create a mock device supporting multiple draw buffers and 8x MSAA
    pub fn new() -> Self {
        Self {
            supports_multiple_draw_buffers: true,
            max_samples: 8,
            fail_next_allocation: false,
            stats: Arc::new(Mutex::new(MockDeviceStats::default())),
        }
    }

    /// Create a mock device reporting no multiple draw buffer support
    pub fn unsupported() -> Self {
        Self {
            supports_multiple_draw_buffers: false,
            ..Self::new()
        }
    }

    /// Shared handle to the statistics, usable after the device is boxed
    pub fn stats(&self) -> Arc<Mutex<MockDeviceStats>> {
        Arc::clone(&self.stats)
    }
}

impl GraphicsDevice for MockGraphicsDevice {
    fn supports_multiple_draw_buffers(&self) -> bool {
        self.supports_multiple_draw_buffers
    }

    fn max_samples(&self) -> u32 {
        self.max_samples
    }

    fn create_texture(&mut self, desc: TextureDesc) -> Result<Arc<dyn Texture>> {
        let info = TextureInfo {
            width: desc.width,
            height: desc.height,
            format: desc.format,
            usage: desc.usage,
            data_type: desc.data_type,
            sampling_mode: desc.sampling_mode,
            use_srgb_buffer: desc.use_srgb_buffer,
            mip_levels: if desc.generate_mip_maps { 4 } else { 1 },
            sample_count: 1,
        };
        let texture: Arc<dyn Texture> = Arc::new(MockTexture::new(
            info,
            format!("texture_{}x{}", desc.width, desc.height),
        ));
        register_texture(&self.stats, &texture);
        Ok(texture)
    }

    fn create_multiple_attachment_target(
        &mut self,
        desc: &MultiAttachmentTargetDesc,
    ) -> Result<Box<dyn MultiAttachmentFramebuffer>> {
        if self.fail_next_allocation {
            self.fail_next_allocation = false;
            return Err(Error::OutOfMemory);
        }

        let samples = desc.samples.clamp(1, self.max_samples);
        let mut textures: Vec<Arc<dyn Texture>> = Vec::with_capacity(desc.attachment_count() + 1);

        for index in 0..desc.attachment_count() {
            let info = TextureInfo {
                width: desc.width,
                height: desc.height,
                format: desc.formats[index],
                usage: TextureUsage::SampledAndRenderTarget,
                data_type: desc.data_types[index],
                sampling_mode: desc.sampling_modes[index],
                use_srgb_buffer: desc.use_srgb_buffers[index],
                mip_levels: if desc.generate_mip_maps { 4 } else { 1 },
                sample_count: samples,
            };
            textures.push(Arc::new(MockTexture::new(
                info,
                format!("{}_attachment{}", desc.label, index),
            )));
        }

        if desc.generate_depth_texture {
            let info = TextureInfo {
                width: desc.width,
                height: desc.height,
                format: desc.depth_texture_format,
                usage: TextureUsage::DepthStencil,
                data_type: crate::graphics_device::TextureDataType::UnsignedInt,
                sampling_mode: crate::graphics_device::SamplingMode::Nearest,
                use_srgb_buffer: false,
                mip_levels: 1,
                sample_count: samples,
            };
            textures.push(Arc::new(MockTexture::new(info, format!("{}_depth", desc.label))));
        }

        for texture in &textures {
            register_texture(&self.stats, texture);
        }
        {
            let mut stats = self.stats.lock().unwrap();
            stats.framebuffers_created += 1;
            stats.last_draw_to_all_attachments = Some(desc.draw_to_all_attachments);
        }

        Ok(Box::new(MockFramebuffer {
            width: desc.width,
            height: desc.height,
            textures,
            color_count: desc.attachment_count(),
            samples,
            max_samples: self.max_samples,
            disposed: false,
            stats: Arc::clone(&self.stats),
        }))
    }

    fn unbind_all_color_attachments(
        &mut self,
        _framebuffer: &dyn MultiAttachmentFramebuffer,
        _is_cube: bool,
        on_unbound: &mut dyn FnMut(),
    ) {
        self.stats.lock().unwrap().unbind_calls += 1;
        on_unbound();
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "mock_graphics_device_tests.rs"]
mod tests;
