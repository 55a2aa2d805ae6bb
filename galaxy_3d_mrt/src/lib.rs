/*!
# Galaxy 3D Multi Render Target

Multi render targets for the Galaxy 3D rendering engine: one render pass
writing several color attachments (G-buffers, light accumulation, ...).

The GPU backend stays behind traits (similar to C++ virtual inheritance):
a backend implements `GraphicsDevice` and `MultiAttachmentFramebuffer`,
this crate manages attachment configuration, allocation and rebuilds.

## Architecture

- **GraphicsDevice**: Factory trait allocating textures and framebuffers
- **MultiAttachmentFramebuffer**: GPU storage of all attachments of one target
- **Texture** (resource): Stable, reseatable handle given to consumers
- **MultiRenderTarget**: Owns one framebuffer and keeps the handles bound to it
- **TargetManager**: Named registry of multi render targets
- **Engine**: Singletons (devices, target manager, logger)
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod graphics_device;
pub mod resource;
pub mod target;
pub mod utils;

// Main galaxy3d namespace module
pub mod galaxy3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Engine singleton
    pub use crate::engine::Engine;

    // Graphics device factory trait
    pub use crate::graphics_device::GraphicsDevice;

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // Render sub-module with all backend-facing types
    pub mod render {
        pub use crate::graphics_device::*;
    }

    // Resource sub-module
    pub mod resource {
        pub use crate::resource::*;
    }

    // Target sub-module
    pub mod target {
        pub use crate::target::*;
    }

    // Utility sub-module
    pub mod utils {
        pub use crate::utils::*;
    }
}

// Re-export math library at crate root
pub use glam;
