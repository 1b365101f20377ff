//! Pixel format tags

use image_dds::ddsfile::DxgiFormat;
use image_dds::ImageFormat;

/// Channel layout and bit depth of a texture's images
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// 8-bit RGBA unsigned normalized
    Rgba8Unorm,
    /// 8-bit BGRA unsigned normalized
    Bgra8Unorm,
    /// 32-bit float per channel RGBA (the pipeline's working format)
    Rgba32Float,
    /// 4-bit BGRA packed into 16 bits (B in the low nibble)
    Bgra4Unorm,
    /// BC1 / DXT1 - opaque or 1-bit alpha
    Bc1,
    /// BC2 / DXT3 - explicit 4-bit alpha
    Bc2,
    /// BC3 / DXT5 - interpolated alpha
    Bc3,
    /// BC4 - single channel
    Bc4,
    /// BC5 - two channels
    Bc5,
    /// BC7 - high quality RGBA
    Bc7,
    /// ETC1 RGB (no alpha), encode only
    Etc1,
    /// PVRTC 4 bits per pixel RGBA, encode only
    Pvrtc4,
    /// No recognized channel layout
    Unknown,
}

impl PixelFormat {
    /// Get format name for logging
    pub fn name(&self) -> &'static str {
        match self {
            PixelFormat::Rgba8Unorm => "R8G8B8A8_UNORM",
            PixelFormat::Bgra8Unorm => "B8G8R8A8_UNORM",
            PixelFormat::Rgba32Float => "R32G32B32A32_FLOAT",
            PixelFormat::Bgra4Unorm => "B4G4R4A4_UNORM",
            PixelFormat::Bc1 => "BC1",
            PixelFormat::Bc2 => "BC2",
            PixelFormat::Bc3 => "BC3",
            PixelFormat::Bc4 => "BC4",
            PixelFormat::Bc5 => "BC5",
            PixelFormat::Bc7 => "BC7",
            PixelFormat::Etc1 => "ETC1",
            PixelFormat::Pvrtc4 => "PVRTC_4BPP",
            PixelFormat::Unknown => "UNKNOWN",
        }
    }

    /// False only for [`PixelFormat::Unknown`]
    pub fn is_classified(self) -> bool {
        self != PixelFormat::Unknown
    }

    /// DXT/BC block formats (the "already compressed" set for the early-out)
    pub fn is_bc(self) -> bool {
        matches!(
            self,
            PixelFormat::Bc1
                | PixelFormat::Bc2
                | PixelFormat::Bc3
                | PixelFormat::Bc4
                | PixelFormat::Bc5
                | PixelFormat::Bc7
        )
    }

    pub fn is_block_compressed(self) -> bool {
        self.is_bc() || matches!(self, PixelFormat::Etc1 | PixelFormat::Pvrtc4)
    }

    /// Byte size of one 2D image at the given dimensions
    pub fn image_size(self, width: u32, height: u32) -> usize {
        let (w, h) = (width as usize, height as usize);
        match self {
            PixelFormat::Rgba8Unorm | PixelFormat::Bgra8Unorm => w * h * 4,
            PixelFormat::Rgba32Float => w * h * 16,
            PixelFormat::Bgra4Unorm => w * h * 2,
            PixelFormat::Bc1 | PixelFormat::Bc4 | PixelFormat::Etc1 => {
                w.div_ceil(4) * h.div_ceil(4) * 8
            }
            PixelFormat::Bc2 | PixelFormat::Bc3 | PixelFormat::Bc5 | PixelFormat::Bc7 => {
                w.div_ceil(4) * h.div_ceil(4) * 16
            }
            // PVRTC images are never smaller than 2×2 blocks of 4×4
            PixelFormat::Pvrtc4 => w.max(8) * h.max(8) / 2,
            PixelFormat::Unknown => 0,
        }
    }

    /// Map to the image_dds format used for BC encode/decode
    pub fn to_image_format(self) -> Option<ImageFormat> {
        match self {
            PixelFormat::Rgba8Unorm => Some(ImageFormat::Rgba8Unorm),
            PixelFormat::Bgra8Unorm => Some(ImageFormat::Bgra8Unorm),
            PixelFormat::Bc1 => Some(ImageFormat::BC1RgbaUnorm),
            PixelFormat::Bc2 => Some(ImageFormat::BC2RgbaUnorm),
            PixelFormat::Bc3 => Some(ImageFormat::BC3RgbaUnorm),
            PixelFormat::Bc4 => Some(ImageFormat::BC4RUnorm),
            PixelFormat::Bc5 => Some(ImageFormat::BC5RgUnorm),
            PixelFormat::Bc7 => Some(ImageFormat::BC7RgbaUnorm),
            _ => None,
        }
    }

    /// Classify an image_dds format; sRGB variants map onto their UNORM layout
    pub fn from_image_format(format: ImageFormat) -> Self {
        match format {
            ImageFormat::Rgba8Unorm | ImageFormat::Rgba8UnormSrgb => PixelFormat::Rgba8Unorm,
            ImageFormat::Bgra8Unorm | ImageFormat::Bgra8UnormSrgb => PixelFormat::Bgra8Unorm,
            ImageFormat::Rgba32Float => PixelFormat::Rgba32Float,
            ImageFormat::BC1RgbaUnorm | ImageFormat::BC1RgbaUnormSrgb => PixelFormat::Bc1,
            ImageFormat::BC2RgbaUnorm | ImageFormat::BC2RgbaUnormSrgb => PixelFormat::Bc2,
            ImageFormat::BC3RgbaUnorm | ImageFormat::BC3RgbaUnormSrgb => PixelFormat::Bc3,
            ImageFormat::BC4RUnorm => PixelFormat::Bc4,
            ImageFormat::BC5RgUnorm => PixelFormat::Bc5,
            ImageFormat::BC7RgbaUnorm | ImageFormat::BC7RgbaUnormSrgb => PixelFormat::Bc7,
            _ => PixelFormat::Unknown,
        }
    }

    /// DXGI format written into DX10 DDS headers
    pub fn to_dxgi(self) -> Option<DxgiFormat> {
        match self {
            PixelFormat::Rgba8Unorm => Some(DxgiFormat::R8G8B8A8_UNorm),
            PixelFormat::Bgra8Unorm => Some(DxgiFormat::B8G8R8A8_UNorm),
            PixelFormat::Rgba32Float => Some(DxgiFormat::R32G32B32A32_Float),
            PixelFormat::Bgra4Unorm => Some(DxgiFormat::B4G4R4A4_UNorm),
            PixelFormat::Bc1 => Some(DxgiFormat::BC1_UNorm),
            PixelFormat::Bc2 => Some(DxgiFormat::BC2_UNorm),
            PixelFormat::Bc3 => Some(DxgiFormat::BC3_UNorm),
            PixelFormat::Bc4 => Some(DxgiFormat::BC4_UNorm),
            PixelFormat::Bc5 => Some(DxgiFormat::BC5_UNorm),
            PixelFormat::Bc7 => Some(DxgiFormat::BC7_UNorm),
            PixelFormat::Etc1 | PixelFormat::Pvrtc4 | PixelFormat::Unknown => None,
        }
    }

    /// Classify a DXGI format read from a DX10 DDS header
    pub fn from_dxgi(format: DxgiFormat) -> Self {
        match format {
            DxgiFormat::B4G4R4A4_UNorm => PixelFormat::Bgra4Unorm,
            DxgiFormat::R32G32B32A32_Float => PixelFormat::Rgba32Float,
            _ => PixelFormat::Unknown,
        }
    }
}

impl std::fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
