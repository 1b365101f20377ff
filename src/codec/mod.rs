//! Pixel format conversion
//!
//! Converts single images between pixel formats. BCn goes through
//! image_dds, ETC1 through intel_tex_2, and PVRTC and packed 4444 are
//! handled here. BC1 blocks with transparent texels are rewritten to keep
//! their 1-bit alpha. Every conversion passes through RGBA8 or RGBA32F.

mod bc1;
mod etc1;
mod packed;
mod pvrtc;

use image_dds::{Mipmaps, Quality, Surface, SurfaceRgba8};
use tracing::debug;

use crate::error::{Result, TextureError};
use crate::texture::{Image, PixelFormat, Texel, Texture};

/// Copy `rgba` into a larger buffer, replicating the last row and column
pub(crate) fn pad_rgba(rgba: &[u8], (w, h): (u32, u32), (pw, ph): (u32, u32)) -> Vec<u8> {
    if (w, h) == (pw, ph) {
        return rgba.to_vec();
    }
    let (w, h, pw, ph) = (w as usize, h as usize, pw as usize, ph as usize);
    let mut padded = vec![0u8; pw * ph * 4];
    for y in 0..ph {
        for x in 0..pw {
            let src = (y.min(h - 1) * w + x.min(w - 1)) * 4;
            let dst = (y * pw + x) * 4;
            padded[dst..dst + 4].copy_from_slice(&rgba[src..src + 4]);
        }
    }
    padded
}

fn quantize(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn swizzle_rb(data: &[u8]) -> Vec<u8> {
    data.chunks_exact(4)
        .flat_map(|px| [px[2], px[1], px[0], px[3]])
        .collect()
}

fn unsupported(action: &str, format: PixelFormat) -> TextureError {
    TextureError::UnsupportedFormat(format!("cannot {action} {format}"))
}

/// Decode one image to tightly packed RGBA8
pub fn decode_rgba8(image: &Image, format: PixelFormat) -> Result<Vec<u8>> {
    match format {
        PixelFormat::Rgba8Unorm => Ok(image.data.clone()),
        PixelFormat::Bgra8Unorm => Ok(swizzle_rb(&image.data)),
        PixelFormat::Rgba32Float => Ok(image
            .texels()
            .into_iter()
            .flat_map(|t| t.map(quantize))
            .collect()),
        PixelFormat::Bgra4Unorm => Ok(packed::decode(&image.data)),
        bc if bc.is_bc() => {
            let image_format = bc.to_image_format().ok_or_else(|| unsupported("decode", bc))?;
            let surface = Surface {
                width: image.width,
                height: image.height,
                depth: 1,
                layers: 1,
                mipmaps: 1,
                image_format,
                data: image.data.as_slice(),
            };
            let rgba = surface
                .decode_rgba8()
                .map_err(|e| TextureError::Decode(format!("{bc}: {e}")))?;
            Ok(rgba.data)
        }
        other => Err(unsupported("decode", other)),
    }
}

/// Decode one image to float texels
pub fn decode_texels(image: &Image, format: PixelFormat) -> Result<Vec<Texel>> {
    if format == PixelFormat::Rgba32Float {
        return Ok(image.texels());
    }
    let rgba = decode_rgba8(image, format)?;
    Ok(rgba
        .chunks_exact(4)
        .map(|px| [px[0], px[1], px[2], px[3]].map(|c| c as f32 / 255.0))
        .collect())
}

/// Encode tightly packed RGBA8 into `format`
pub fn encode_rgba8(width: u32, height: u32, rgba: &[u8], format: PixelFormat) -> Result<Vec<u8>> {
    match format {
        PixelFormat::Rgba8Unorm => Ok(rgba.to_vec()),
        PixelFormat::Bgra8Unorm => Ok(swizzle_rb(rgba)),
        PixelFormat::Rgba32Float => {
            let texels: Vec<Texel> = rgba
                .chunks_exact(4)
                .map(|px| [px[0], px[1], px[2], px[3]].map(|c| c as f32 / 255.0))
                .collect();
            Ok(bytemuck::cast_slice(&texels).to_vec())
        }
        PixelFormat::Bgra4Unorm => Ok(packed::encode(rgba)),
        PixelFormat::Etc1 => Ok(etc1::encode(width, height, rgba)),
        PixelFormat::Pvrtc4 => pvrtc::encode(width, height, rgba),
        bc if bc.is_bc() => {
            let image_format = bc.to_image_format().ok_or_else(|| unsupported("encode", bc))?;
            let surface = SurfaceRgba8 {
                width,
                height,
                depth: 1,
                layers: 1,
                mipmaps: 1,
                data: rgba,
            };
            let mut encoded = surface
                .encode(image_format, Quality::Normal, Mipmaps::Disabled)
                .map_err(|e| TextureError::Encode(format!("{bc}: {e}")))?;
            if bc == PixelFormat::Bc1 {
                bc1::punch_through(width, height, rgba, &mut encoded.data);
            }
            Ok(encoded.data)
        }
        other => Err(unsupported("encode", other)),
    }
}

impl Texture {
    /// Convert every image to `format` in one pass
    pub fn convert(&self, format: PixelFormat) -> Result<Texture> {
        if format == self.format() {
            return Ok(self.clone());
        }
        debug!("Converting {} -> {}", self.format(), format);

        let source = self.format();
        self.map_images(format, |image| {
            let data = if format == PixelFormat::Rgba32Float {
                let texels = decode_texels(image, source)?;
                bytemuck::cast_slice(&texels).to_vec()
            } else {
                let rgba = decode_rgba8(image, source)?;
                encode_rgba8(image.width, image.height, &rgba, format)?
            };
            Ok(Image::new(image.width, image.height, data))
        })
    }
}
