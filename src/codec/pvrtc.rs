//! PVRTC1 4 bits-per-pixel encoder
//!
//! Each 4×4 block stores two endpoint colors and a 2-bit modulation value
//! per texel. Blocks are laid out in twiddled (Morton) order, and images
//! smaller than 8×8 are padded up to 8×8.
//!
//! Endpoints come from the per-block color bounding box; modulation picks
//! the nearest of the four standard weights along the A→B axis.

use super::pad_rgba;
use crate::error::{Result, TextureError};
use crate::math::is_power_of_two;

/// Modulation weights for the four 2-bit codes (standard mode)
const WEIGHTS: [f32; 4] = [0.0, 3.0 / 8.0, 5.0 / 8.0, 1.0];

/// Morton index of block (x, y) in a `blocks_x`×`blocks_y` grid
fn twiddle(x: u32, y: u32, blocks_x: u32, blocks_y: u32) -> usize {
    let min = blocks_x.min(blocks_y);
    let mut index = 0usize;
    let mut shift = 0u32;
    let mut bit = 1u32;
    while bit < min {
        if y & bit != 0 {
            index |= 1 << shift;
        }
        if x & bit != 0 {
            index |= 1 << (shift + 1);
        }
        shift += 2;
        bit <<= 1;
    }
    let interleaved = shift / 2;
    let rest = if blocks_x > blocks_y {
        x >> interleaved
    } else {
        y >> interleaved
    };
    index | ((rest as usize) << shift)
}

fn pack_color_a(c: [u8; 4], opaque: bool) -> u32 {
    let [r, g, b, a] = c.map(u32::from);
    if opaque {
        0x8000 | ((r >> 3) << 10) | ((g >> 3) << 5) | ((b >> 4) << 1)
    } else {
        ((a >> 5) << 12) | ((r >> 4) << 8) | ((g >> 4) << 4) | ((b >> 5) << 1)
    }
}

fn pack_color_b(c: [u8; 4], opaque: bool) -> u32 {
    let [r, g, b, a] = c.map(u32::from);
    if opaque {
        0x8000 | ((r >> 3) << 10) | ((g >> 3) << 5) | (b >> 3)
    } else {
        ((a >> 5) << 12) | ((r >> 4) << 8) | ((g >> 4) << 4) | (b >> 4)
    }
}

fn encode_block(texels: &[[u8; 4]; 16]) -> u64 {
    let mut lo = [u8::MAX; 4];
    let mut hi = [0u8; 4];
    for t in texels {
        for c in 0..4 {
            lo[c] = lo[c].min(t[c]);
            hi[c] = hi[c].max(t[c]);
        }
    }
    let opaque = lo[3] == u8::MAX;

    let axis: [f32; 4] = std::array::from_fn(|c| hi[c] as f32 - lo[c] as f32);
    let axis_len2: f32 = axis.iter().map(|v| v * v).sum();

    let mut modulation = 0u32;
    for (i, t) in texels.iter().enumerate() {
        let code = if axis_len2 == 0.0 {
            0
        } else {
            let proj: f32 = (0..4).map(|c| (t[c] as f32 - lo[c] as f32) * axis[c]).sum();
            let w = (proj / axis_len2).clamp(0.0, 1.0);
            WEIGHTS
                .iter()
                .enumerate()
                .min_by(|a, b| (a.1 - w).abs().total_cmp(&(b.1 - w).abs()))
                .map(|(code, _)| code as u32)
                .unwrap_or(0)
        };
        modulation |= code << (i * 2);
    }

    let color = pack_color_a(lo, opaque) | (pack_color_b(hi, opaque) << 16);
    (modulation as u64) | ((color as u64) << 32)
}

/// Compress RGBA8 pixels to PVRTC 4bpp; dimensions must be powers of two
pub fn encode(width: u32, height: u32, rgba: &[u8]) -> Result<Vec<u8>> {
    if !is_power_of_two(width) || !is_power_of_two(height) {
        return Err(TextureError::Encode(format!(
            "PVRTC needs power-of-two dimensions, got {width}x{height}"
        )));
    }

    let padded_width = width.max(8);
    let padded_height = height.max(8);
    let padded = pad_rgba(rgba, (width, height), (padded_width, padded_height));
    let blocks_x = padded_width / 4;
    let blocks_y = padded_height / 4;
    let row = padded_width as usize * 4;

    let mut out = vec![0u8; (blocks_x * blocks_y * 8) as usize];
    for by in 0..blocks_y {
        for bx in 0..blocks_x {
            let mut texels = [[0u8; 4]; 16];
            for (i, t) in texels.iter_mut().enumerate() {
                let x = bx as usize * 4 + i % 4;
                let y = by as usize * 4 + i / 4;
                let offset = y * row + x * 4;
                t.copy_from_slice(&padded[offset..offset + 4]);
            }
            let word = encode_block(&texels);
            let at = twiddle(bx, by, blocks_x, blocks_y) * 8;
            out[at..at + 8].copy_from_slice(&word.to_le_bytes());
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::PixelFormat;

    #[test]
    fn test_twiddle_square() {
        assert_eq!(twiddle(0, 0, 4, 4), 0);
        assert_eq!(twiddle(0, 1, 4, 4), 1);
        assert_eq!(twiddle(1, 0, 4, 4), 2);
        assert_eq!(twiddle(1, 1, 4, 4), 3);
        assert_eq!(twiddle(2, 0, 4, 4), 8);
        assert_eq!(twiddle(3, 3, 4, 4), 15);
    }

    #[test]
    fn test_twiddle_rectangular_is_a_permutation() {
        let mut seen = vec![false; 8];
        for y in 0..2 {
            for x in 0..4 {
                let i = twiddle(x, y, 4, 2);
                assert!(!seen[i]);
                seen[i] = true;
            }
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_solid_block_is_opaque_with_zero_modulation() {
        let word = encode_block(&[[255, 0, 0, 255]; 16]);
        assert_eq!(word as u32, 0);
        let color = (word >> 32) as u32;
        // Both opaque flags set, mode bit clear
        assert_eq!(color & 0x8000, 0x8000);
        assert_eq!(color & 0x8000_0000, 0x8000_0000);
        assert_eq!(color & 1, 0);
    }

    #[test]
    fn test_translucent_block_clears_opaque_flags() {
        let mut texels = [[255, 255, 255, 255]; 16];
        texels[0] = [0, 0, 0, 0];
        let color = (encode_block(&texels) >> 32) as u32;
        assert_eq!(color & 0x8000, 0);
        assert_eq!(color & 0x8000_0000, 0);
        // Texel 0 sits on endpoint A, the rest on endpoint B
        let modulation = encode_block(&texels) as u32;
        assert_eq!(modulation & 0b11, 0);
        assert_eq!((modulation >> 2) & 0b11, 3);
    }

    #[test]
    fn test_encode_size_and_padding() {
        let data = encode(16, 16, &vec![128u8; 16 * 16 * 4]).unwrap();
        assert_eq!(data.len(), PixelFormat::Pvrtc4.image_size(16, 16));

        let small = encode(2, 2, &vec![128u8; 16]).unwrap();
        assert_eq!(small.len(), 32);
    }

    #[test]
    fn test_encode_rejects_non_power_of_two() {
        assert!(matches!(
            encode(12, 16, &vec![0u8; 12 * 16 * 4]),
            Err(TextureError::Encode(_))
        ));
    }
}
