//! KTX 1.1 writer for mobile deployment profiles

use std::io::{Cursor, Write};

use binrw::prelude::*;

use crate::error::{Result, TextureError};
use crate::texture::{PixelFormat, Texture};

const ENDIANNESS: u32 = 0x0403_0201;

// OpenGL enums
const GL_UNSIGNED_BYTE: u32 = 0x1401;
const GL_FLOAT: u32 = 0x1406;
const GL_UNSIGNED_SHORT_4_4_4_4_REV: u32 = 0x8365;
const GL_RGB: u32 = 0x1907;
const GL_RGBA: u32 = 0x1908;
const GL_BGRA: u32 = 0x80E1;
const GL_RGBA4: u32 = 0x8056;
const GL_RGBA8: u32 = 0x8058;
const GL_RGBA32F: u32 = 0x8814;
const GL_ETC1_RGB8_OES: u32 = 0x8D64;
const GL_COMPRESSED_RGBA_PVRTC_4BPPV1_IMG: u32 = 0x8C02;
const GL_COMPRESSED_RGBA_S3TC_DXT1_EXT: u32 = 0x83F1;
const GL_COMPRESSED_RGBA_S3TC_DXT3_EXT: u32 = 0x83F2;
const GL_COMPRESSED_RGBA_S3TC_DXT5_EXT: u32 = 0x83F3;

/// Fixed 64-byte KTX 1.1 header following the 12-byte identifier
#[binrw]
#[brw(little, magic = b"\xABKTX 11\xBB\r\n\x1A\n")]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KtxHeader {
    pub endianness: u32,
    pub gl_type: u32,
    pub gl_type_size: u32,
    pub gl_format: u32,
    pub gl_internal_format: u32,
    pub gl_base_internal_format: u32,
    pub pixel_width: u32,
    pub pixel_height: u32,
    pub pixel_depth: u32,
    pub number_of_array_elements: u32,
    pub number_of_faces: u32,
    pub number_of_mipmap_levels: u32,
    pub bytes_of_key_value_data: u32,
}

/// (glType, glTypeSize, glFormat, glInternalFormat, glBaseInternalFormat)
fn gl_formats(format: PixelFormat) -> Option<(u32, u32, u32, u32, u32)> {
    let formats = match format {
        PixelFormat::Rgba8Unorm => (GL_UNSIGNED_BYTE, 1, GL_RGBA, GL_RGBA8, GL_RGBA),
        PixelFormat::Bgra8Unorm => (GL_UNSIGNED_BYTE, 1, GL_BGRA, GL_RGBA8, GL_RGBA),
        PixelFormat::Rgba32Float => (GL_FLOAT, 4, GL_RGBA, GL_RGBA32F, GL_RGBA),
        PixelFormat::Bgra4Unorm => (GL_UNSIGNED_SHORT_4_4_4_4_REV, 2, GL_BGRA, GL_RGBA4, GL_RGBA),
        PixelFormat::Etc1 => (0, 1, 0, GL_ETC1_RGB8_OES, GL_RGB),
        PixelFormat::Pvrtc4 => (0, 1, 0, GL_COMPRESSED_RGBA_PVRTC_4BPPV1_IMG, GL_RGBA),
        PixelFormat::Bc1 => (0, 1, 0, GL_COMPRESSED_RGBA_S3TC_DXT1_EXT, GL_RGBA),
        PixelFormat::Bc2 => (0, 1, 0, GL_COMPRESSED_RGBA_S3TC_DXT3_EXT, GL_RGBA),
        PixelFormat::Bc3 => (0, 1, 0, GL_COMPRESSED_RGBA_S3TC_DXT5_EXT, GL_RGBA),
        _ => return None,
    };
    Some(formats)
}

fn pad4(len: usize) -> usize {
    (4 - len % 4) % 4
}

/// Image bytes with uncompressed rows padded to 4-byte alignment
fn aligned_rows(format: PixelFormat, width: u32, height: u32, data: &[u8]) -> Vec<u8> {
    if format.is_block_compressed() {
        return data.to_vec();
    }
    let row = format.image_size(width, 1);
    let padding = pad4(row);
    if padding == 0 {
        return data.to_vec();
    }
    let mut out = Vec::with_capacity((row + padding) * height as usize);
    for line in data.chunks(row) {
        out.extend_from_slice(line);
        out.extend(std::iter::repeat_n(0u8, padding));
    }
    out
}

fn encode_error(e: impl std::fmt::Display) -> TextureError {
    TextureError::Encode(format!("failed to write KTX: {e}"))
}

/// Serialize a texture as KTX 1.1 (mip-major, then face, then slice)
pub fn write(texture: &Texture) -> Result<Vec<u8>> {
    let format = texture.format();
    let (gl_type, gl_type_size, gl_format, gl_internal_format, gl_base_internal_format) =
        gl_formats(format).ok_or_else(|| {
            TextureError::UnsupportedFormat(format!("{format} cannot be stored in KTX"))
        })?;

    let header = KtxHeader {
        endianness: ENDIANNESS,
        gl_type,
        gl_type_size,
        gl_format,
        gl_internal_format,
        gl_base_internal_format,
        pixel_width: texture.width(),
        pixel_height: texture.height(),
        pixel_depth: if texture.is_volume() { texture.depth() } else { 0 },
        number_of_array_elements: 0,
        number_of_faces: texture.faces(),
        number_of_mipmap_levels: texture.mip_levels(),
        bytes_of_key_value_data: 0,
    };

    let mut out = Cursor::new(Vec::new());
    header.write(&mut out).map_err(encode_error)?;

    let cube = texture.faces() == 6;
    for mip in 0..texture.mip_levels() {
        let faces: Vec<Vec<u8>> = (0..texture.faces())
            .map(|face| {
                texture
                    .level(face, mip)
                    .iter()
                    .flat_map(|image| aligned_rows(format, image.width, image.height, &image.data))
                    .collect()
            })
            .collect();

        // Non-array cubemaps record the size of one face
        let image_size = if cube {
            faces.first().map(|f| f.len()).unwrap_or(0)
        } else {
            faces.iter().map(|f| f.len()).sum()
        };
        out.write_all(&(image_size as u32).to_le_bytes())?;

        for face in &faces {
            out.write_all(face)?;
            if cube {
                out.write_all(&[0u8; 3][..pad4(face.len())])?;
            }
        }
        out.write_all(&[0u8; 3][..pad4(image_size)])?;
    }

    Ok(out.into_inner())
}
