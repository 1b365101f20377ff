//! Separable polyphase resampling and mip chain generation
//!
//! Kernels are built once per axis: for every destination index, the list
//! of (source index, weight) taps after border addressing. Downsampling
//! widens the filter by the scale factor, upsampling uses it as-is.

use std::f32::consts::PI;

use super::{full_mip_count, mip_extent, Image, PixelFormat, Texel, Texture};
use crate::error::{Result, TextureError};
use tracing::debug;

/// Reconstruction filter
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Filter {
    /// Unit box of half-width 0.5
    Box,
    /// Kaiser-windowed sinc
    Kaiser { width: f32, alpha: f32, stretch: f32 },
}

impl Filter {
    /// High-quality resize filter
    pub const KAISER: Filter = Filter::Kaiser {
        width: 3.0,
        alpha: 4.0,
        stretch: 1.0,
    };

    fn support(&self) -> f32 {
        match self {
            Filter::Box => 0.5,
            Filter::Kaiser { width, .. } => *width,
        }
    }

    fn evaluate(&self, x: f32) -> f32 {
        match *self {
            Filter::Box => {
                if x.abs() <= 0.5 {
                    1.0
                } else {
                    0.0
                }
            }
            Filter::Kaiser {
                width,
                alpha,
                stretch,
            } => {
                let t = x / width;
                if t.abs() >= 1.0 {
                    return 0.0;
                }
                let window = bessel0(alpha * (1.0 - t * t).sqrt()) / bessel0(alpha);
                sinc(x * stretch) * window
            }
        }
    }
}

/// Border addressing for taps that fall outside the image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapMode {
    Clamp,
    Repeat,
    Mirror,
}

impl WrapMode {
    fn apply(self, i: i64, len: u32) -> usize {
        let len = len as i64;
        let idx = match self {
            WrapMode::Clamp => i.clamp(0, len - 1),
            WrapMode::Repeat => i.rem_euclid(len),
            WrapMode::Mirror => {
                let m = i.rem_euclid(2 * len);
                if m >= len {
                    2 * len - 1 - m
                } else {
                    m
                }
            }
        };
        idx as usize
    }
}

fn sinc(x: f32) -> f32 {
    if x.abs() < 1.0e-4 {
        1.0
    } else {
        (PI * x).sin() / (PI * x)
    }
}

/// Zeroth-order modified Bessel function of the first kind
fn bessel0(x: f32) -> f32 {
    let half = x * 0.5;
    let mut sum = 1.0f32;
    let mut term = 1.0f32;
    let mut k = 1.0f32;
    loop {
        term *= (half / k) * (half / k);
        sum += term;
        if term <= sum * 1.0e-7 {
            break;
        }
        k += 1.0;
    }
    sum
}

type Taps = Vec<(usize, f32)>;

fn build_kernel(src_len: u32, dst_len: u32, filter: Filter, wrap: WrapMode) -> Vec<Taps> {
    let scale = src_len as f32 / dst_len as f32;
    let filter_scale = scale.max(1.0);
    let support = filter.support() * filter_scale;

    (0..dst_len)
        .map(|x| {
            let center = (x as f32 + 0.5) * scale;
            let left = (center - support).floor() as i64;
            let right = (center + support).ceil() as i64;

            let mut taps: Taps = (left..=right)
                .filter_map(|i| {
                    let w = filter.evaluate((i as f32 + 0.5 - center) / filter_scale);
                    (w != 0.0).then(|| (wrap.apply(i, src_len), w))
                })
                .collect();

            let sum: f32 = taps.iter().map(|(_, w)| w).sum();
            if taps.is_empty() || sum == 0.0 {
                // Nearest sample when the filter misses every source texel
                let nearest = wrap.apply(center.floor() as i64, src_len);
                taps = vec![(nearest, 1.0)];
            } else {
                for (_, w) in &mut taps {
                    *w /= sum;
                }
            }
            taps
        })
        .collect()
}

/// Weighted sum of texels. In alpha-transparency mode color is weighted by
/// alpha so fully transparent neighbours contribute no color.
fn convolve<F>(taps: &[(usize, f32)], sample: F, alpha_transparency: bool) -> Texel
where
    F: Fn(usize) -> Texel,
{
    let mut plain = [0.0f32; 4];
    let mut weighted = [0.0f32; 3];
    let mut alpha_weight = 0.0f32;

    for &(i, w) in taps {
        let t = sample(i);
        for c in 0..4 {
            plain[c] += t[c] * w;
        }
        if alpha_transparency {
            let aw = w * t[3];
            for c in 0..3 {
                weighted[c] += t[c] * aw;
            }
            alpha_weight += aw;
        }
    }

    if alpha_transparency && alpha_weight.abs() > f32::EPSILON {
        [
            weighted[0] / alpha_weight,
            weighted[1] / alpha_weight,
            weighted[2] / alpha_weight,
            plain[3],
        ]
    } else {
        plain
    }
}

/// Resample one 2D slice (horizontal pass, then vertical)
fn resize_slice(
    texels: &[Texel],
    (width, height): (u32, u32),
    (new_width, new_height): (u32, u32),
    filter: Filter,
    wrap: WrapMode,
    alpha_transparency: bool,
) -> Vec<Texel> {
    let (w, nw, nh) = (width as usize, new_width as usize, new_height as usize);

    let horizontal = if width == new_width {
        texels.to_vec()
    } else {
        let kernel = build_kernel(width, new_width, filter, wrap);
        let mut out = Vec::with_capacity(nw * height as usize);
        for y in 0..height as usize {
            let row = &texels[y * w..(y + 1) * w];
            for taps in &kernel {
                out.push(convolve(taps, |i| row[i], alpha_transparency));
            }
        }
        out
    };

    if height == new_height {
        return horizontal;
    }

    let kernel = build_kernel(height, new_height, filter, wrap);
    let mut out = vec![[0.0f32; 4]; nw * nh];
    for (y, taps) in kernel.iter().enumerate() {
        for x in 0..nw {
            out[y * nw + x] = convolve(taps, |i| horizontal[i * nw + x], alpha_transparency);
        }
    }
    out
}

/// Resample a stack of equally sized slices along depth
fn resize_depth(
    slices: Vec<Vec<Texel>>,
    new_depth: u32,
    filter: Filter,
    wrap: WrapMode,
    alpha_transparency: bool,
) -> Vec<Vec<Texel>> {
    let depth = slices.len() as u32;
    if depth == new_depth {
        return slices;
    }
    let len = slices.first().map(Vec::len).unwrap_or(0);
    build_kernel(depth, new_depth, filter, wrap)
        .iter()
        .map(|taps| {
            (0..len)
                .map(|p| convolve(taps, |z| slices[z][p], alpha_transparency))
                .collect()
        })
        .collect()
}

fn resample_level(
    level: &[Image],
    (width, height, depth): (u32, u32, u32),
    filter: Filter,
    wrap: WrapMode,
    alpha_transparency: bool,
) -> Vec<Image> {
    let slices: Vec<Vec<Texel>> = level
        .iter()
        .map(|image| {
            resize_slice(
                &image.texels(),
                (image.width, image.height),
                (width, height),
                filter,
                wrap,
                alpha_transparency,
            )
        })
        .collect();

    resize_depth(slices, depth, filter, wrap, alpha_transparency)
        .iter()
        .map(|texels| Image::from_texels(width, height, texels))
        .collect()
}

impl Texture {
    /// Resize the base level of every face to `width`×`height`
    ///
    /// Depth passes through unchanged. The result has a single mip level.
    pub fn resize(
        &self,
        width: u32,
        height: u32,
        filter: Filter,
        wrap: WrapMode,
        alpha_transparency: bool,
    ) -> Result<Texture> {
        self.require_float("resize")?;
        if width == 0 || height == 0 {
            return Err(TextureError::InvalidArgument(format!(
                "cannot resize to {width}x{height}"
            )));
        }
        debug!(
            "Resizing {}x{} -> {}x{} ({:?}, {:?})",
            self.width(),
            self.height(),
            width,
            height,
            filter,
            wrap
        );

        let levels = (0..self.faces())
            .map(|face| {
                vec![resample_level(
                    self.level(face, 0),
                    (width, height, self.depth()),
                    filter,
                    wrap,
                    alpha_transparency,
                )]
            })
            .collect();

        Texture::from_levels(
            self.kind(),
            PixelFormat::Rgba32Float,
            (width, height, self.depth()),
            levels,
        )
    }

    /// Rebuild the full mip chain from the base level, each level filtered
    /// from the one above it
    pub fn generate_mipmaps(
        &self,
        filter: Filter,
        wrap: WrapMode,
        alpha_transparency: bool,
    ) -> Result<Texture> {
        self.require_float("mipmap generation")?;
        let count = full_mip_count(self.width(), self.height(), self.depth());
        debug!(
            "Generating {} mip levels for {}x{}x{}",
            count,
            self.width(),
            self.height(),
            self.depth()
        );

        let mut levels = Vec::with_capacity(self.faces() as usize);
        for face in 0..self.faces() {
            let mut chain = vec![self.level(face, 0).to_vec()];
            for mip in 1..count {
                let dims = (
                    mip_extent(self.width(), mip),
                    mip_extent(self.height(), mip),
                    if self.is_volume() {
                        mip_extent(self.depth(), mip)
                    } else {
                        1
                    },
                );
                let next = resample_level(&chain[mip as usize - 1], dims, filter, wrap, alpha_transparency);
                chain.push(next);
            }
            levels.push(chain);
        }

        Texture::from_levels(
            self.kind(),
            PixelFormat::Rgba32Float,
            (self.width(), self.height(), self.depth()),
            levels,
        )
    }
}
