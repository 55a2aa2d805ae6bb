//! Resource module
//!
//! Resource-level handles exposed to materials and other consumers.

pub mod texture;

pub use texture::{SamplerState, Texture};
