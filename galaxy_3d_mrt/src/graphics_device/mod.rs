/// Graphics device module - the boundary between render target management
/// and the GPU backend.
///
/// Everything here is a trait or a plain descriptor. Backends (Vulkan, GL,
/// WebGPU, ...) implement the traits; this crate only consumes them.

// Module declarations
pub mod graphics_device;
pub mod texture;
pub mod frame_buffer;

// Re-export everything from graphics_device.rs
pub use graphics_device::*;

// Re-export from other modules
pub use texture::*;
pub use frame_buffer::*;

// Mock graphics device for tests (no GPU required)
#[cfg(test)]
pub mod mock_graphics_device;
