/// Slot configuration of a multi render target.
///
/// `MultiRenderTargetOptions` is what callers pass in: every field is an
/// optional override. `MultiRenderTargetConfig` is the resolved state the
/// render target keeps for its whole lifetime, with defaults applied and the
/// per-slot arrays kept at exactly `count` entries.

use glam::UVec2;
use crate::graphics_device::{
    MultiAttachmentTargetDesc, SamplingMode, TextureDataType, TextureFormat, TextureInfo,
};

/// Format of a color slot when none is given
pub const DEFAULT_SLOT_FORMAT: TextureFormat = TextureFormat::R8G8B8A8_UNORM;

/// Format of the optional depth texture when none is given
pub const DEFAULT_DEPTH_TEXTURE_FORMAT: TextureFormat = TextureFormat::D16_UNORM;

// ===== OPTIONS =====

/// Optional overrides for creating (or re-counting) a multi render target
///
/// Per-slot vectors may be shorter or longer than the attachment count:
/// missing entries take the defaults, extra entries are ignored.
#[derive(Debug, Clone, Default)]
pub struct MultiRenderTargetOptions {
    /// Per-slot channel storage type (default: `default_type`)
    pub types: Option<Vec<TextureDataType>>,
    /// Per-slot sampling filter (default: Bilinear)
    pub sampling_modes: Option<Vec<SamplingMode>>,
    /// Per-slot sRGB flag (default: false)
    pub use_srgb_buffers: Option<Vec<bool>>,
    /// Per-slot pixel format (default: R8G8B8A8_UNORM)
    pub formats: Option<Vec<TextureFormat>>,
    /// Channel storage type for slots without an explicit type (default: UnsignedInt)
    pub default_type: Option<TextureDataType>,
    /// Allocate mip chains (default: false)
    pub generate_mip_maps: Option<bool>,
    /// Attach a depth buffer (default: true)
    pub generate_depth_buffer: Option<bool>,
    /// Attach a stencil buffer (default: false)
    pub generate_stencil_buffer: Option<bool>,
    /// Create a sampleable depth texture after the color slots (default: false)
    pub generate_depth_texture: Option<bool>,
    /// Format of the depth texture (default: D16_UNORM)
    pub depth_texture_format: Option<TextureFormat>,
    /// Keep the aspect ratio of the camera when rendering (default: true)
    pub do_not_change_aspect_ratio: Option<bool>,
    /// Draw only to attachment 0 unless told otherwise (default: false)
    pub draw_only_on_first_attachment_by_default: Option<bool>,
    /// MSAA samples per pixel (default: 1)
    pub samples: Option<u32>,
    /// Overrides the attachment count given to the constructor
    pub texture_count: Option<usize>,
}

// ===== CONFIG =====

/// Resolved slot configuration
#[derive(Debug, Clone, PartialEq)]
pub struct MultiRenderTargetConfig {
    count: usize,
    types: Vec<TextureDataType>,
    sampling_modes: Vec<SamplingMode>,
    use_srgb_buffers: Vec<bool>,
    formats: Vec<TextureFormat>,
    default_type: TextureDataType,
    generate_mip_maps: bool,
    generate_depth_buffer: bool,
    generate_stencil_buffer: bool,
    generate_depth_texture: bool,
    depth_texture_format: TextureFormat,
    do_not_change_aspect_ratio: bool,
    draw_only_on_first_attachment_by_default: bool,
    samples: u32,
}

impl Default for MultiRenderTargetConfig {
    fn default() -> Self {
        Self {
            count: 0,
            types: Vec::new(),
            sampling_modes: Vec::new(),
            use_srgb_buffers: Vec::new(),
            formats: Vec::new(),
            default_type: TextureDataType::UnsignedInt,
            generate_mip_maps: false,
            generate_depth_buffer: true,
            generate_stencil_buffer: false,
            generate_depth_texture: false,
            depth_texture_format: DEFAULT_DEPTH_TEXTURE_FORMAT,
            do_not_change_aspect_ratio: true,
            draw_only_on_first_attachment_by_default: false,
            samples: 1,
        }
    }
}

impl MultiRenderTargetConfig {
    /// Resolve a configuration from overrides
    ///
    /// `options.texture_count` wins over `count` when set.
    pub fn from_options(count: usize, options: &MultiRenderTargetOptions) -> Self {
        let defaults = Self::default();
        let mut config = Self {
            count: options.texture_count.unwrap_or(count),
            default_type: options.default_type.unwrap_or(defaults.default_type),
            generate_mip_maps: options.generate_mip_maps.unwrap_or(defaults.generate_mip_maps),
            generate_depth_buffer: options.generate_depth_buffer.unwrap_or(defaults.generate_depth_buffer),
            generate_stencil_buffer: options.generate_stencil_buffer.unwrap_or(defaults.generate_stencil_buffer),
            generate_depth_texture: options.generate_depth_texture.unwrap_or(defaults.generate_depth_texture),
            depth_texture_format: options.depth_texture_format.unwrap_or(defaults.depth_texture_format),
            do_not_change_aspect_ratio: options.do_not_change_aspect_ratio
                .unwrap_or(defaults.do_not_change_aspect_ratio),
            draw_only_on_first_attachment_by_default: options.draw_only_on_first_attachment_by_default
                .unwrap_or(defaults.draw_only_on_first_attachment_by_default),
            samples: options.samples.unwrap_or(defaults.samples).max(1),
            ..defaults
        };
        config.init_slots(Some(options));
        config
    }

    /// Change the attachment count and re-derive every per-slot array
    ///
    /// Per-slot entries come from `options` when given, otherwise from the
    /// defaults. Global flags are left untouched.
    pub fn update_count(&mut self, count: usize, options: Option<&MultiRenderTargetOptions>) {
        self.count = count;
        if let Some(default_type) = options.and_then(|o| o.default_type) {
            self.default_type = default_type;
        }
        self.init_slots(options);
    }

    /// Rebuild the per-slot arrays at exactly `count` entries
    fn init_slots(&mut self, options: Option<&MultiRenderTargetOptions>) {
        let count = self.count;
        let default_type = self.default_type;

        self.types = (0..count)
            .map(|i| options
                .and_then(|o| o.types.as_ref())
                .and_then(|v| v.get(i).copied())
                .unwrap_or(default_type))
            .collect();
        self.sampling_modes = (0..count)
            .map(|i| options
                .and_then(|o| o.sampling_modes.as_ref())
                .and_then(|v| v.get(i).copied())
                .unwrap_or_default())
            .collect();
        self.use_srgb_buffers = (0..count)
            .map(|i| options
                .and_then(|o| o.use_srgb_buffers.as_ref())
                .and_then(|v| v.get(i).copied())
                .unwrap_or(false))
            .collect();
        self.formats = (0..count)
            .map(|i| options
                .and_then(|o| o.formats.as_ref())
                .and_then(|v| v.get(i).copied())
                .unwrap_or(DEFAULT_SLOT_FORMAT))
            .collect();
    }

    /// Copy the properties of an injected texture into one slot
    ///
    /// Only the touched slot changes. An `index` at or past the end appends.
    pub(crate) fn sync_slot(&mut self, index: usize, info: &TextureInfo) {
        fn put<T>(values: &mut Vec<T>, index: usize, value: T) {
            match values.get_mut(index) {
                Some(slot) => *slot = value,
                None => values.push(value),
            }
        }

        put(&mut self.types, index, info.data_type);
        put(&mut self.sampling_modes, index, info.sampling_mode);
        put(&mut self.use_srgb_buffers, index, info.use_srgb_buffer);
        put(&mut self.formats, index, info.format);
    }

    pub(crate) fn set_count(&mut self, count: usize) {
        self.count = count;
    }

    pub(crate) fn set_samples(&mut self, samples: u32) {
        self.samples = samples.max(1);
    }

    /// Build the allocation descriptor for the graphics device
    pub fn target_desc<'a>(&'a self, label: &'a str, size: UVec2) -> MultiAttachmentTargetDesc<'a> {
        MultiAttachmentTargetDesc {
            label,
            width: size.x,
            height: size.y,
            data_types: &self.types,
            sampling_modes: &self.sampling_modes,
            use_srgb_buffers: &self.use_srgb_buffers,
            formats: &self.formats,
            generate_mip_maps: self.generate_mip_maps,
            generate_depth_buffer: self.generate_depth_buffer,
            generate_stencil_buffer: self.generate_stencil_buffer,
            generate_depth_texture: self.generate_depth_texture,
            depth_texture_format: self.depth_texture_format,
            samples: self.samples,
            draw_to_all_attachments: self.draw_to_all_attachments(),
        }
    }

    // ===== ACCESSORS =====

    /// Number of color attachments
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn types(&self) -> &[TextureDataType] {
        &self.types
    }

    pub fn sampling_modes(&self) -> &[SamplingMode] {
        &self.sampling_modes
    }

    pub fn use_srgb_buffers(&self) -> &[bool] {
        &self.use_srgb_buffers
    }

    pub fn formats(&self) -> &[TextureFormat] {
        &self.formats
    }

    pub fn default_type(&self) -> TextureDataType {
        self.default_type
    }

    pub fn generate_mip_maps(&self) -> bool {
        self.generate_mip_maps
    }

    pub fn generate_depth_buffer(&self) -> bool {
        self.generate_depth_buffer
    }

    pub fn generate_stencil_buffer(&self) -> bool {
        self.generate_stencil_buffer
    }

    pub fn generate_depth_texture(&self) -> bool {
        self.generate_depth_texture
    }

    pub fn depth_texture_format(&self) -> TextureFormat {
        self.depth_texture_format
    }

    pub fn do_not_change_aspect_ratio(&self) -> bool {
        self.do_not_change_aspect_ratio
    }

    pub fn draw_only_on_first_attachment_by_default(&self) -> bool {
        self.draw_only_on_first_attachment_by_default
    }

    /// Inverse of `draw_only_on_first_attachment_by_default`
    pub fn draw_to_all_attachments(&self) -> bool {
        !self.draw_only_on_first_attachment_by_default
    }

    /// Desired (or last applied) MSAA sample count
    pub fn samples(&self) -> u32 {
        self.samples
    }
}

#[cfg(test)]
#[path = "multi_render_target_options_tests.rs"]
mod tests;
