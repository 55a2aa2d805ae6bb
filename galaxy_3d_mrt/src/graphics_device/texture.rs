/// Texture trait, texture descriptor, and texture info

/// Texture pixel format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types)]
pub enum TextureFormat {
    // Color formats
    R8_UNORM,
    R8G8_UNORM,
    R8G8B8A8_SRGB,
    R8G8B8A8_UNORM,
    B8G8R8A8_SRGB,
    B8G8R8A8_UNORM,
    R16G16B16A16_SFLOAT,
    R32_SFLOAT,
    R32G32B32A32_SFLOAT,

    // Depth/stencil formats
    D16_UNORM,
    D32_FLOAT,
    D24_UNORM_S8_UINT,
    D32_FLOAT_S8_UINT,
}

impl TextureFormat {
    /// Returns true for depth and depth/stencil formats
    pub fn is_depth(&self) -> bool {
        matches!(
            self,
            TextureFormat::D16_UNORM
                | TextureFormat::D32_FLOAT
                | TextureFormat::D24_UNORM_S8_UINT
                | TextureFormat::D32_FLOAT_S8_UINT
        )
    }
}

/// Texture usage flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureUsage {
    /// Texture can be sampled in shaders
    Sampled,
    /// Texture can be used as render target
    RenderTarget,
    /// Texture can be used for both
    SampledAndRenderTarget,
    /// Texture can be used as depth/stencil attachment
    DepthStencil,
}

/// Per-channel storage type of a texture (the "pixel type" of an attachment slot)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextureDataType {
    /// 8-bit unsigned integer channels (default for render target slots)
    #[default]
    UnsignedInt,
    Byte,
    Short,
    UnsignedShort,
    Int,
    HalfFloat,
    Float,
}

/// Filtering used when sampling a texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SamplingMode {
    /// Nearest texel, no mip interpolation
    Nearest,
    /// Linear filtering within the base level (default for render target slots)
    #[default]
    Bilinear,
    /// Linear filtering across mip levels
    Trilinear,
}

/// Texture coordinate addressing (wrap) mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AddressMode {
    Repeat,
    /// Render target outputs clamp by default
    #[default]
    ClampToEdge,
    MirroredRepeat,
}

// ===== TEXTURE DESC =====

/// Descriptor for creating a standalone texture
///
/// Used by callers that build a texture themselves and then inject it into
/// a multi render target with `MultiRenderTarget::set_internal_texture()`.
#[derive(Debug, Clone)]
pub struct TextureDesc {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Pixel format
    pub format: TextureFormat,
    /// Usage flags
    pub usage: TextureUsage,
    /// Per-channel storage type
    pub data_type: TextureDataType,
    /// Sampling filter
    pub sampling_mode: SamplingMode,
    /// Store the texture in an sRGB buffer
    pub use_srgb_buffer: bool,
    /// Allocate a full mip chain
    pub generate_mip_maps: bool,
}

impl Default for TextureDesc {
    fn default() -> Self {
        Self {
            width: 1,
            height: 1,
            format: TextureFormat::R8G8B8A8_UNORM,
            usage: TextureUsage::SampledAndRenderTarget,
            data_type: TextureDataType::UnsignedInt,
            sampling_mode: SamplingMode::Bilinear,
            use_srgb_buffer: false,
            generate_mip_maps: false,
        }
    }
}

// ===== TEXTURE INFO =====

/// Read-only properties of a created texture.
///
/// Returned by `Texture::info()`. A multi render target reads these back when
/// a texture is injected so that a later rebuild reproduces the slot.
#[derive(Debug, Clone)]
pub struct TextureInfo {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Pixel format
    pub format: TextureFormat,
    /// Usage flags
    pub usage: TextureUsage,
    /// Per-channel storage type
    pub data_type: TextureDataType,
    /// Sampling filter
    pub sampling_mode: SamplingMode,
    /// Stored in an sRGB buffer
    pub use_srgb_buffer: bool,
    /// Number of mip levels (1 = no mipmaps)
    pub mip_levels: u32,
    /// Samples per pixel (1 = no MSAA)
    pub sample_count: u32,
}

impl TextureInfo {
    /// Returns true if the texture is a depth/stencil attachment
    pub fn is_depth(&self) -> bool {
        self.usage == TextureUsage::DepthStencil || self.format.is_depth()
    }
}

// ===== TEXTURE TRAIT =====

/// GPU texture trait
///
/// Implemented by backend-specific texture types. The GPU memory is owned by
/// whoever created the texture: for attachments, the framebuffer that
/// allocated them.
pub trait Texture: Send + Sync {
    /// Get the read-only properties of this texture
    fn info(&self) -> &TextureInfo;
}
