//! Early-out decision
//!
//! Before any work, a run checks whether the source is already in the
//! requested shape. The condition is evaluated literally: a source with an
//! existing mip chain counts as "mipmaps done" even if a later step would
//! have resized it.

use crate::math::is_power_of_two;
use crate::options::{Options, TargetFormat};
use crate::texture::{PixelFormat, Texture};

/// No optional step is requested, or every requested one is already satisfied
fn nothing_to_do(source: &Texture, options: &Options) -> bool {
    let (w, h) = (source.width(), source.height());

    let mipmaps_satisfied =
        !options.generate_mipmaps || (w == 1 && h == 1) || source.mip_levels() > 1;
    let power_of_two_satisfied =
        !options.resize_to_power_of_two || (is_power_of_two(w) && is_power_of_two(h));

    !options.color_key_enabled
        && mipmaps_satisfied
        && !options.premultiply_alpha
        && power_of_two_satisfied
        && !options.scale_alpha_to_coverage
}

/// Whether the source can be returned verbatim
pub fn early_out(source: &Texture, options: &Options) -> bool {
    if !nothing_to_do(source, options) {
        return false;
    }

    match options.format {
        TargetFormat::Unchanged => true,
        TargetFormat::Color => source.format() == PixelFormat::Rgba8Unorm,
        TargetFormat::Dxt => source.format().is_bc(),
        TargetFormat::Normal | TargetFormat::NormalInvertY => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::{Image, TextureKind};

    fn quiet() -> Options {
        Options {
            generate_mipmaps: false,
            premultiply_alpha: false,
            ..Options::default()
        }
    }

    fn rgba8(w: u32, h: u32) -> Texture {
        Texture::from_rgba8(w, h, vec![255; (w * h * 4) as usize]).unwrap()
    }

    #[test]
    fn test_unchanged_with_nothing_requested() {
        assert!(early_out(&rgba8(5, 3), &quiet()));
    }

    #[test]
    fn test_default_options_never_early_out() {
        // premultiply defaults to on
        assert!(!early_out(&rgba8(4, 4), &Options::default()));
    }

    #[test]
    fn test_each_flag_blocks_early_out() {
        let tex = rgba8(5, 5);
        let blockers = [
            Options { color_key_enabled: true, ..quiet() },
            Options { generate_mipmaps: true, ..quiet() },
            Options { premultiply_alpha: true, ..quiet() },
            Options { resize_to_power_of_two: true, ..quiet() },
            Options { scale_alpha_to_coverage: true, ..quiet() },
        ];
        for options in blockers {
            assert!(!early_out(&tex, &options), "{options:?}");
        }
    }

    #[test]
    fn test_satisfied_flags_still_early_out() {
        let mips = Options { generate_mipmaps: true, ..quiet() };
        assert!(early_out(&rgba8(1, 1), &mips));

        let pow2 = Options { resize_to_power_of_two: true, ..quiet() };
        assert!(early_out(&rgba8(8, 4), &pow2));
    }

    #[test]
    fn test_color_and_dxt_targets_check_source_format() {
        let color = Options { format: TargetFormat::Color, ..quiet() };
        assert!(early_out(&rgba8(4, 4), &color));

        let bgra = rgba8(4, 4).convert(PixelFormat::Bgra8Unorm).unwrap();
        assert!(!early_out(&bgra, &color));

        let dxt = Options { format: TargetFormat::Dxt, ..quiet() };
        assert!(!early_out(&rgba8(4, 4), &dxt));
        let bc1 = rgba8(4, 4).convert(PixelFormat::Bc1).unwrap();
        assert!(early_out(&bc1, &dxt));
    }

    #[test]
    fn test_normal_targets_never_early_out() {
        let normal = Options { format: TargetFormat::Normal, ..quiet() };
        assert!(!early_out(&rgba8(4, 4), &normal));
    }

    #[test]
    fn test_existing_mips_early_out_without_alignment() {
        // 6×6 BC1 with two mips: mipmaps count as done, so the run returns
        // early even though a full run would align it to 8×8.
        let images = vec![Image::new(6, 6, vec![0; 32]), Image::new(3, 3, vec![0; 8])];
        let tex =
            Texture::new(TextureKind::Texture2D, PixelFormat::Bc1, 6, 6, 1, 2, images).unwrap();
        let options = Options {
            format: TargetFormat::Dxt,
            generate_mipmaps: true,
            ..quiet()
        };
        assert!(early_out(&tex, &options));
    }
}
