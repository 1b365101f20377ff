//! BC1 1-bit alpha
//!
//! The block encoder only writes opaque four-colour blocks. Blocks that
//! hold transparent texels are rewritten into three-colour mode
//! (`color0 <= color1`), where index 3 decodes to transparent black.

/// Texels below this alpha become transparent
const ALPHA_CUTOFF: u8 = 128;

/// Expand a 5:6:5 colour to 8 bits per channel
fn expand565(c: u16) -> [i32; 3] {
    let r = ((c >> 11) & 0x1f) as i32;
    let g = ((c >> 5) & 0x3f) as i32;
    let b = (c & 0x1f) as i32;
    [(r << 3) | (r >> 2), (g << 2) | (g >> 4), (b << 3) | (b >> 2)]
}

fn distance(a: [i32; 3], b: [i32; 3]) -> i32 {
    (0..3).map(|c| (a[c] - b[c]).pow(2)).sum()
}

/// Rewrite one block so texels below the cutoff use the transparent index
fn punch_block(block: &mut [u8], texels: &[Option<[u8; 4]>; 16]) {
    let c0 = u16::from_le_bytes([block[0], block[1]]);
    let c1 = u16::from_le_bytes([block[2], block[3]]);
    let (lo, hi) = (c0.min(c1), c0.max(c1));

    let (p0, p1) = (expand565(lo), expand565(hi));
    let palette = [p0, p1, [0, 1, 2].map(|c| (p0[c] + p1[c]) / 2)];

    let mut indices = 0u32;
    for (i, texel) in texels.iter().enumerate() {
        let index = match texel {
            Some(px) if px[3] >= ALPHA_CUTOFF => {
                let rgb = [px[0] as i32, px[1] as i32, px[2] as i32];
                (0..3u32)
                    .min_by_key(|&k| distance(palette[k as usize], rgb))
                    .unwrap_or(0)
            }
            Some(_) => 3,
            // Outside the image
            None => 0,
        };
        indices |= index << (i * 2);
    }

    block[0..2].copy_from_slice(&lo.to_le_bytes());
    block[2..4].copy_from_slice(&hi.to_le_bytes());
    block[4..8].copy_from_slice(&indices.to_le_bytes());
}

/// Give transparent texels of `rgba` the BC1 transparent index in `blocks`
pub fn punch_through(width: u32, height: u32, rgba: &[u8], blocks: &mut [u8]) {
    let (w, h) = (width as usize, height as usize);
    let blocks_wide = w.div_ceil(4);

    for (n, block) in blocks.chunks_exact_mut(8).enumerate() {
        let (bx, by) = ((n % blocks_wide) * 4, (n / blocks_wide) * 4);
        let mut texels = [None; 16];
        for (i, texel) in texels.iter_mut().enumerate() {
            let (x, y) = (bx + i % 4, by + i / 4);
            if x < w && y < h {
                let at = (y * w + x) * 4;
                *texel = Some([rgba[at], rgba[at + 1], rgba[at + 2], rgba[at + 3]]);
            }
        }

        if texels.iter().flatten().any(|px| px[3] < ALPHA_CUTOFF) {
            punch_block(block, &texels);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand565_extremes() {
        assert_eq!(expand565(0xffff), [255, 255, 255]);
        assert_eq!(expand565(0xf800), [255, 0, 0]);
        assert_eq!(expand565(0), [0, 0, 0]);
    }

    #[test]
    fn test_opaque_blocks_are_untouched() {
        let rgba = vec![255u8; 4 * 4 * 4];
        let mut blocks = [0x00, 0xf8, 0x1f, 0x00, 0xaa, 0x55, 0xaa, 0x55];
        let before = blocks;
        punch_through(4, 4, &rgba, &mut blocks);
        assert_eq!(blocks, before);
    }

    #[test]
    fn test_transparent_texels_get_index_three() {
        // Left column transparent, the rest opaque red
        let rgba: Vec<u8> = (0..16)
            .flat_map(|i| if i % 4 == 0 { [0, 0, 0, 0] } else { [255, 0, 0, 255] })
            .collect();
        // Four-colour block: red (0xf800) > black (0x0000)
        let mut blocks = [0x00, 0xf8, 0x00, 0x00, 0, 0, 0, 0];
        punch_through(4, 4, &rgba, &mut blocks);

        let c0 = u16::from_le_bytes([blocks[0], blocks[1]]);
        let c1 = u16::from_le_bytes([blocks[2], blocks[3]]);
        assert!(c0 <= c1);

        let indices = u32::from_le_bytes([blocks[4], blocks[5], blocks[6], blocks[7]]);
        for i in 0..16 {
            let index = (indices >> (i * 2)) & 3;
            if i % 4 == 0 {
                assert_eq!(index, 3);
            } else {
                // Red is now the second endpoint
                assert_eq!(index, 1);
            }
        }
    }
}
