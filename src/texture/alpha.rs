//! Alpha classification and alpha-to-coverage scaling

use super::{Image, PixelFormat, Texel, Texture};
use crate::error::{Result, TextureError};
use crate::math::Tolerance;
use tracing::debug;

/// Derived alpha characteristics of a texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AlphaInfo {
    /// Some texel is not fully opaque
    pub has_alpha: bool,
    /// Some texel has alpha strictly between 0 and 1
    pub has_fractional_alpha: bool,
}

impl AlphaInfo {
    fn observe(&mut self, opaque: bool, fractional: bool) {
        self.has_alpha |= !opaque;
        self.has_fractional_alpha |= fractional;
    }
}

/// Upper bound of the alpha scale search
const MAX_ALPHA_SCALE: f32 = 4.0;
/// Bisection steps when matching coverage
const COVERAGE_ITERATIONS: usize = 10;

/// Fraction of texels whose scaled alpha passes `alpha > reference`
pub fn alpha_coverage(texels: &[Texel], reference: f32, scale: f32) -> f32 {
    if texels.is_empty() {
        return 0.0;
    }
    let passing = texels
        .iter()
        .filter(|t| (t[3] * scale).clamp(0.0, 1.0) > reference)
        .count();
    passing as f32 / texels.len() as f32
}

/// Bisect for the alpha scale whose coverage best matches `target`
fn find_alpha_scale(texels: &[Texel], reference: f32, target: f32) -> f32 {
    let mut min_scale = 0.0f32;
    let mut max_scale = MAX_ALPHA_SCALE;
    let mut scale = 1.0f32;
    let mut best_scale = 1.0f32;
    let mut best_error = f32::MAX;

    for _ in 0..COVERAGE_ITERATIONS {
        let coverage = alpha_coverage(texels, reference, scale);
        let error = (coverage - target).abs();
        if error < best_error {
            best_error = error;
            best_scale = scale;
        }

        if coverage < target {
            min_scale = scale;
        } else if coverage > target {
            max_scale = scale;
        } else {
            break;
        }
        scale = (min_scale + max_scale) * 0.5;
    }

    best_scale
}

impl Texture {
    /// Classify alpha across every image
    ///
    /// Works on RGBA8, BGRA8 and RGBA32F data; any other format fails with
    /// `UnsupportedFormat` so the caller can promote and retry.
    pub fn classify_alpha(&self, tolerance: Tolerance) -> Result<AlphaInfo> {
        let mut info = AlphaInfo::default();

        match self.format() {
            PixelFormat::Rgba8Unorm | PixelFormat::Bgra8Unorm => {
                for image in self.images() {
                    for px in image.data.chunks_exact(4) {
                        let a = px[3];
                        info.observe(a == u8::MAX, a != 0 && a != u8::MAX);
                    }
                }
            }
            PixelFormat::Rgba32Float => {
                for image in self.images() {
                    for [_, _, _, a] in image.texels() {
                        let opaque = a >= 1.0 || tolerance.equal(a, 1.0);
                        let transparent = a <= 0.0 || tolerance.is_zero(a);
                        info.observe(opaque, !opaque && !transparent);
                    }
                }
            }
            other => {
                return Err(TextureError::UnsupportedFormat(format!(
                    "alpha classification cannot read {other}"
                )));
            }
        }

        Ok(info)
    }

    /// Rescale the alpha of every non-base mip so that the fraction of
    /// texels passing `alpha > reference_alpha` matches the base level.
    ///
    /// When `alpha_premultiplied` is set, color channels follow the alpha
    /// scale so they stay premultiplied.
    pub fn scale_alpha_to_coverage(
        &self,
        reference_alpha: f32,
        alpha_premultiplied: bool,
    ) -> Result<Texture> {
        self.require_float("coverage scaling")?;

        let mut levels = Vec::with_capacity(self.faces() as usize);
        for face in 0..self.faces() {
            let base: Vec<Texel> = self
                .level(face, 0)
                .iter()
                .flat_map(|image| image.texels())
                .collect();
            let target = alpha_coverage(&base, reference_alpha, 1.0);

            let mut mips = Vec::with_capacity(self.mip_levels() as usize);
            mips.push(self.level(face, 0).to_vec());

            for mip in 1..self.mip_levels() {
                let slices = self.level(face, mip);
                let all: Vec<Texel> = slices.iter().flat_map(|image| image.texels()).collect();
                let scale = find_alpha_scale(&all, reference_alpha, target);
                debug!(face, mip, scale, target, "Scaling alpha to coverage");

                let scaled = slices
                    .iter()
                    .map(|image| scale_image_alpha(image, scale, alpha_premultiplied))
                    .collect();
                mips.push(scaled);
            }
            levels.push(mips);
        }

        Texture::from_levels(
            self.kind(),
            PixelFormat::Rgba32Float,
            (self.width(), self.height(), self.depth()),
            levels,
        )
    }
}

fn scale_image_alpha(image: &Image, scale: f32, alpha_premultiplied: bool) -> Image {
    let texels: Vec<Texel> = image
        .texels()
        .into_iter()
        .map(|[r, g, b, a]| {
            let scaled = (a * scale).clamp(0.0, 1.0);
            if alpha_premultiplied && a > 0.0 {
                let k = scaled / a;
                [r * k, g * k, b * k, scaled]
            } else {
                [r, g, b, scaled]
            }
        })
        .collect();
    Image::from_texels(image.width, image.height, &texels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::TextureKind;

    fn rgba8_with_alpha(alphas: &[u8]) -> Texture {
        let data = alphas.iter().flat_map(|&a| [10, 20, 30, a]).collect();
        Texture::from_rgba8(alphas.len() as u32, 1, data).unwrap()
    }

    #[test]
    fn test_opaque_texture_has_no_alpha() {
        let info = rgba8_with_alpha(&[255; 16])
            .classify_alpha(Tolerance::default())
            .unwrap();
        assert_eq!(info, AlphaInfo::default());
    }

    #[test]
    fn test_single_mid_alpha_texel_is_fractional() {
        let mut alphas = [255u8; 16];
        alphas[7] = 128;
        let info = rgba8_with_alpha(&alphas)
            .classify_alpha(Tolerance::default())
            .unwrap();
        assert!(info.has_alpha);
        assert!(info.has_fractional_alpha);
    }

    #[test]
    fn test_binary_alpha_is_not_fractional() {
        let info = rgba8_with_alpha(&[0, 255, 0, 255])
            .classify_alpha(Tolerance::default())
            .unwrap();
        assert!(info.has_alpha);
        assert!(!info.has_fractional_alpha);
    }

    #[test]
    fn test_float_classification_uses_tolerance() {
        let tex = Texture::from_texels(
            3,
            1,
            &[[0.0, 0.0, 0.0, 1.0 - 1e-7], [0.0; 4], [0.0, 0.0, 0.0, 1.0]],
        )
        .unwrap();
        let info = tex.classify_alpha(Tolerance::default()).unwrap();
        assert!(info.has_alpha);
        assert!(!info.has_fractional_alpha);
    }

    #[test]
    fn test_classification_rejects_block_formats() {
        let tex = Texture::new(
            TextureKind::Texture2D,
            PixelFormat::Bc1,
            4,
            4,
            1,
            1,
            vec![Image::new(4, 4, vec![0; 8])],
        )
        .unwrap();
        assert!(matches!(
            tex.classify_alpha(Tolerance::default()),
            Err(TextureError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_alpha_coverage() {
        let texels = [[0.0, 0.0, 0.0, 0.95], [0.0, 0.0, 0.0, 0.5]];
        assert_eq!(alpha_coverage(&texels, 0.9, 1.0), 0.5);
        assert_eq!(alpha_coverage(&texels, 0.9, 2.0), 1.0);
        assert_eq!(alpha_coverage(&[], 0.9, 1.0), 0.0);
    }

    #[test]
    fn test_scale_alpha_to_coverage_restores_base_coverage() {
        // Base: half the texels pass 0.5. Mip 1 lost all coverage when filtered.
        let base: Vec<Texel> = (0..16)
            .map(|i| [1.0, 1.0, 1.0, if i % 2 == 0 { 1.0 } else { 0.0 }])
            .collect();
        let mip1 = vec![
            [1.0, 1.0, 1.0, 0.4],
            [1.0, 1.0, 1.0, 0.4],
            [1.0, 1.0, 1.0, 0.3],
            [1.0, 1.0, 1.0, 0.3],
        ];
        let mip2 = vec![[1.0, 1.0, 1.0, 0.35]];
        let tex = Texture::new(
            TextureKind::Texture2D,
            PixelFormat::Rgba32Float,
            4,
            4,
            1,
            3,
            vec![
                Image::from_texels(4, 4, &base),
                Image::from_texels(2, 2, &mip1),
                Image::from_texels(1, 1, &mip2),
            ],
        )
        .unwrap();
        assert_eq!(alpha_coverage(&mip1, 0.5, 1.0), 0.0);

        let scaled = tex.scale_alpha_to_coverage(0.5, false).unwrap();
        assert_eq!(scaled.image(0, 0, 0).unwrap().texels(), base);

        let level1 = scaled.image(0, 1, 0).unwrap().texels();
        assert_eq!(alpha_coverage(&level1, 0.5, 1.0), 0.5);
        // Color is left alone when alpha is straight
        assert!(level1.iter().all(|t| t[0] == 1.0));
        assert_eq!(scaled.mip_levels(), 3);
    }

    #[test]
    fn test_scale_alpha_premultiplied_scales_color() {
        let image = Image::from_texels(1, 1, &[[0.2, 0.2, 0.2, 0.2]]);
        let scaled = scale_image_alpha(&image, 2.0, true).texels()[0];
        assert!((scaled[3] - 0.4).abs() < 1e-6);
        assert!((scaled[0] - 0.4).abs() < 1e-6);
    }
}
