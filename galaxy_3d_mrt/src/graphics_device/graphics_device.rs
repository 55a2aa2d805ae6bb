/// GraphicsDevice trait - the engine collaborator a multi render target talks to

use std::sync::Arc;
use crate::error::Result;
use crate::graphics_device::{
    Texture, TextureDesc,
    MultiAttachmentFramebuffer, MultiAttachmentTargetDesc,
};

/// Graphics device trait
///
/// Factory for the GPU objects backing render targets. Implemented by
/// backend-specific devices. All calls are synchronous and must be made
/// from the thread owning the GPU context.
pub trait GraphicsDevice: Send + Sync {
    /// Whether the device can write several color attachments in one pass
    fn supports_multiple_draw_buffers(&self) -> bool;

    /// Highest MSAA sample count the device supports
    fn max_samples(&self) -> u32;

    /// Create a standalone texture
    ///
    /// # Arguments
    ///
    /// * `desc` - Texture descriptor
    fn create_texture(&mut self, desc: TextureDesc) -> Result<Arc<dyn Texture>>;

    /// Allocate a framebuffer with one texture per color slot
    ///
    /// # Arguments
    ///
    /// * `desc` - Size, per-slot configuration, and global flags
    ///
    /// # Returns
    ///
    /// The framebuffer, exclusively owned by the caller
    fn create_multiple_attachment_target(
        &mut self,
        desc: &MultiAttachmentTargetDesc,
    ) -> Result<Box<dyn MultiAttachmentFramebuffer>>;

    /// Unbind every color attachment of a framebuffer after a pass
    ///
    /// # Arguments
    ///
    /// * `framebuffer` - The framebuffer that was rendered into
    /// * `is_cube` - Whether the target is a cube map
    /// * `on_unbound` - Invoked once the attachments are unbound
    fn unbind_all_color_attachments(
        &mut self,
        framebuffer: &dyn MultiAttachmentFramebuffer,
        is_cube: bool,
        on_unbound: &mut dyn FnMut(),
    );
}
