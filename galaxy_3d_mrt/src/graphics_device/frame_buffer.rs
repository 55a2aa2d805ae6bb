/// Multi-attachment framebuffer trait - the GPU side of a multi render target
///
/// A framebuffer aggregates every color attachment written by one render
/// pass, plus an optional depth texture. It owns the attachment textures:
/// disposing the framebuffer releases them.
///
/// Created via `GraphicsDevice::create_multiple_attachment_target()` and
/// recreated whenever the shape of the target changes (resize, attachment
/// count change).

use std::sync::Arc;
use crate::graphics_device::{
    Texture, TextureDataType, TextureFormat, SamplingMode,
};

/// Framebuffer with several color attachments and an optional depth texture
///
/// Texture layout: `textures()[0..color_attachment_count()]` are the color
/// attachments in slot order; if a depth texture was requested it follows
/// at index `color_attachment_count()`.
pub trait MultiAttachmentFramebuffer: Send + Sync {
    /// Get the width in pixels
    fn width(&self) -> u32;

    /// Get the height in pixels
    fn height(&self) -> u32;

    /// All attachment textures (color slots, then the optional depth texture)
    fn textures(&self) -> &[Arc<dyn Texture>];

    /// Number of color attachments
    fn color_attachment_count(&self) -> usize;

    /// The texture bound to color slot 0
    fn primary_texture(&self) -> Option<&Arc<dyn Texture>> {
        if self.color_attachment_count() > 0 {
            self.textures().first()
        } else {
            None
        }
    }

    /// The depth texture, if one was requested
    ///
    /// Anything stored past the color slots that is not a depth texture is
    /// not reported.
    fn depth_texture(&self) -> Option<&Arc<dyn Texture>> {
        self.textures()
            .get(self.color_attachment_count())
            .filter(|texture| texture.info().is_depth())
    }

    /// Current samples per pixel
    fn samples(&self) -> u32;

    /// Change the MSAA sample count
    ///
    /// # Arguments
    ///
    /// * `samples` - Requested samples per pixel
    /// * `draw_to_all_attachments` - Resolve every color attachment (true)
    ///   or only the first one (false)
    ///
    /// # Returns
    ///
    /// The sample count actually applied (may be clamped to hardware limits)
    fn set_sample_count(&mut self, samples: u32, draw_to_all_attachments: bool) -> u32;

    /// Replace the texture bound to a color slot
    ///
    /// An `index` at or beyond `color_attachment_count()` appends a new color
    /// attachment (placed before the depth texture, if any).
    ///
    /// # Arguments
    ///
    /// * `texture` - New texture; the framebuffer takes ownership of it
    /// * `index` - Color slot index
    /// * `dispose_previous` - Release the texture being replaced
    fn set_texture(&mut self, texture: Arc<dyn Texture>, index: usize, dispose_previous: bool);

    /// Release the framebuffer and every texture it owns
    fn dispose(&mut self);

    /// Whether `dispose()` has been called
    fn is_disposed(&self) -> bool;
}

/// Descriptor for creating a multi-attachment framebuffer
///
/// Per-slot slices all have one entry per color attachment.
#[derive(Debug, Clone)]
pub struct MultiAttachmentTargetDesc<'a> {
    /// Debug label (the render target name)
    pub label: &'a str,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Per-slot channel storage type
    pub data_types: &'a [TextureDataType],
    /// Per-slot sampling filter
    pub sampling_modes: &'a [SamplingMode],
    /// Per-slot sRGB flag
    pub use_srgb_buffers: &'a [bool],
    /// Per-slot pixel format
    pub formats: &'a [TextureFormat],
    /// Allocate mip chains for the color attachments
    pub generate_mip_maps: bool,
    /// Attach a depth renderbuffer
    pub generate_depth_buffer: bool,
    /// Attach a stencil renderbuffer
    pub generate_stencil_buffer: bool,
    /// Create a sampleable depth texture after the color attachments
    pub generate_depth_texture: bool,
    /// Format of the depth texture
    pub depth_texture_format: TextureFormat,
    /// Requested samples per pixel
    pub samples: u32,
    /// Draw to every attachment by default (false = first attachment only)
    pub draw_to_all_attachments: bool,
}

impl<'a> MultiAttachmentTargetDesc<'a> {
    /// Number of color attachments described
    pub fn attachment_count(&self) -> usize {
        self.data_types.len()
    }
}
