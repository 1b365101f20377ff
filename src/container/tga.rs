//! TGA input through the image crate

use image::ImageFormat;

use crate::error::{Result, TextureError};
use crate::texture::Texture;

/// Decode a TGA file to a single-level RGBA8 texture
pub fn read(bytes: &[u8]) -> Result<Texture> {
    let rgba = image::load_from_memory_with_format(bytes, ImageFormat::Tga)
        .map_err(|e| TextureError::Decode(format!("failed to decode TGA: {e}")))?
        .to_rgba8();
    let (width, height) = rgba.dimensions();
    Texture::from_rgba8(width, height, rgba.into_raw())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::PixelFormat;
    use image::{ImageBuffer, Rgba};

    #[test]
    fn test_read_tga() {
        let img: ImageBuffer<Rgba<u8>, Vec<u8>> =
            ImageBuffer::from_fn(3, 2, |x, y| Rgba([x as u8 * 10, y as u8 * 10, 0, 128]));
        let mut bytes = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut bytes), ImageFormat::Tga)
            .unwrap();

        let tex = read(&bytes).unwrap();
        assert_eq!(tex.format(), PixelFormat::Rgba8Unorm);
        assert_eq!((tex.width(), tex.height()), (3, 2));
        assert_eq!(&tex.images()[0].data[12..16], &[0, 10, 0, 128]);
    }

    #[test]
    fn test_read_rejects_truncated() {
        assert!(matches!(read(&[0u8; 4]), Err(TextureError::Decode(_))));
    }
}
