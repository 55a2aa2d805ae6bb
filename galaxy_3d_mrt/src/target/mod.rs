//! Render target management module
//!
//! Provides multi render targets (several color attachments written by one
//! pass) and the manager that names them.

mod multi_render_target;
mod multi_render_target_options;
mod target_manager;

pub use multi_render_target::MultiRenderTarget;
pub use multi_render_target_options::{
    MultiRenderTargetConfig, MultiRenderTargetOptions,
    DEFAULT_DEPTH_TEXTURE_FORMAT, DEFAULT_SLOT_FORMAT,
};
pub use target_manager::TargetManager;
