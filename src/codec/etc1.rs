//! ETC1 encoding through intel_tex_2 (ISPC texcomp)

use intel_tex_2::{etc1, RgbaSurface};

use super::pad_rgba;

/// Compress RGBA8 pixels to ETC1 blocks; alpha is discarded
pub fn encode(width: u32, height: u32, rgba: &[u8]) -> Vec<u8> {
    let padded_width = width.div_ceil(4) * 4;
    let padded_height = height.div_ceil(4) * 4;
    let padded = pad_rgba(rgba, (width, height), (padded_width, padded_height));

    let surface = RgbaSurface {
        width: padded_width,
        height: padded_height,
        stride: padded_width * 4,
        data: &padded,
    };

    etc1::compress_blocks(&etc1::slow_settings(), &surface)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::PixelFormat;

    #[test]
    fn test_encode_size() {
        let rgba = vec![200u8; 8 * 8 * 4];
        assert_eq!(encode(8, 8, &rgba).len(), PixelFormat::Etc1.image_size(8, 8));
    }

    #[test]
    fn test_encode_pads_small_images() {
        let rgba = vec![50u8; 2 * 2 * 4];
        assert_eq!(encode(2, 2, &rgba).len(), 8);
    }
}
