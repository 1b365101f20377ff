//! Per-texel transforms: gamma, premultiplication, normal packing, color key

use super::{Image, PixelFormat, Texture};
use crate::error::{Result, TextureError};
use crate::math::{clamp_vec, normalize3, Tolerance};

impl Texture {
    /// Gamma space to linear: `rgb = rgb^gamma`, alpha untouched
    pub fn to_linear(&self, gamma: f32) -> Result<Texture> {
        self.map_texels(|[r, g, b, a]| {
            [
                r.max(0.0).powf(gamma),
                g.max(0.0).powf(gamma),
                b.max(0.0).powf(gamma),
                a,
            ]
        })
    }

    /// Linear to gamma space: `rgb = rgb^(1/gamma)`, alpha untouched
    pub fn to_gamma(&self, gamma: f32) -> Result<Texture> {
        let inv = 1.0 / gamma;
        self.map_texels(|[r, g, b, a]| {
            [
                r.max(0.0).powf(inv),
                g.max(0.0).powf(inv),
                b.max(0.0).powf(inv),
                a,
            ]
        })
    }

    pub fn premultiply_alpha(&self) -> Result<Texture> {
        self.map_texels(|[r, g, b, a]| [r * a, g * a, b * a, a])
    }

    /// Unpack normal directions from `[0, 1]` storage to `[-1, 1]`
    pub fn expand_normals(&self) -> Result<Texture> {
        self.map_texels(|[x, y, z, a]| [x * 2.0 - 1.0, y * 2.0 - 1.0, z * 2.0 - 1.0, a])
    }

    /// Renormalize directions to unit length and pack them back into `[0, 1]`
    ///
    /// With `invert_y` the green channel is flipped before packing.
    pub fn pack_normals(&self, invert_y: bool, tolerance: Tolerance) -> Result<Texture> {
        self.map_texels(|[x, y, z, a]| {
            let [x, y, z] = normalize3([x, y, z], tolerance);
            let y = if invert_y { -y } else { y };
            let [x, y, z] = clamp_vec([x * 0.5 + 0.5, y * 0.5 + 0.5, z * 0.5 + 0.5], 0.0, 1.0);
            [x, y, z, a]
        })
    }

    /// Replace opaque texels of colour `key` with transparent black; requires RGBA8
    pub fn apply_color_key(&self, key: [u8; 3]) -> Result<Texture> {
        let [r, g, b] = key;
        let key = [r, g, b, u8::MAX];
        if self.format() != PixelFormat::Rgba8Unorm {
            return Err(TextureError::UnsupportedFormat(format!(
                "color key needs {}, texture is {}",
                PixelFormat::Rgba8Unorm,
                self.format()
            )));
        }

        self.map_images(PixelFormat::Rgba8Unorm, |image| {
            let mut data = image.data.clone();
            for px in data.chunks_exact_mut(4) {
                if *px == key {
                    px.fill(0);
                }
            }
            Ok(Image::new(image.width, image.height, data))
        })
    }
}
