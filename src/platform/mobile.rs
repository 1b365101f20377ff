//! Mobile deployment profiles

use tracing::warn;

use super::{CompressionSelector, FormatDecision, Platform};
use crate::error::{Result, TextureError};
use crate::math::is_power_of_two;
use crate::options::TargetFormat;
use crate::texture::{AlphaInfo, PixelFormat, Texture};

/// Smallest edge PVRTC hardware accepts
const PVRTC_MIN_SIZE: u32 = 8;

/// PVRTC needs power-of-two, square textures of at least 8×8
fn check_pvrtc(texture: &Texture) -> Result<()> {
    let (w, h) = (texture.width(), texture.height());
    let reason = if !is_power_of_two(w) || !is_power_of_two(h) {
        Some(format!("{w}x{h} is not a power of two"))
    } else if w != h {
        Some(format!("{w}x{h} is not square"))
    } else if w < PVRTC_MIN_SIZE {
        Some(format!("{w}x{h} is smaller than {PVRTC_MIN_SIZE}x{PVRTC_MIN_SIZE}"))
    } else {
        None
    };

    match reason {
        Some(reason) => Err(TextureError::PlatformConstraintViolation {
            platform: Platform::Ios,
            reason,
        }),
        None => Ok(()),
    }
}

/// PowerVR policy: PVRTC 4bpp, RGBA8 when the texture breaks PVRTC's constraints
#[derive(Debug, Clone, Copy, Default)]
pub struct PvrtcSelector;

impl CompressionSelector for PvrtcSelector {
    fn platform(&self) -> Platform {
        Platform::Ios
    }

    fn select_format(
        &self,
        target: TargetFormat,
        _alpha: AlphaInfo,
        texture: &Texture,
    ) -> FormatDecision {
        match target {
            TargetFormat::Unchanged => FormatDecision::exact(texture.format()),
            TargetFormat::Color => FormatDecision::exact(PixelFormat::Rgba8Unorm),
            _ if texture.is_volume() => FormatDecision::downgrade(
                PixelFormat::Rgba8Unorm,
                "volume textures are not block-compressed",
            ),
            _ => match check_pvrtc(texture) {
                Ok(()) => FormatDecision::exact(PixelFormat::Pvrtc4),
                Err(e) => {
                    warn!("{}, falling back to {}", e, PixelFormat::Rgba8Unorm);
                    FormatDecision::downgrade(PixelFormat::Rgba8Unorm, e.to_string())
                }
            },
        }
    }
}

/// ETC1 policy: ETC1 when opaque, packed 4444 when alpha must survive
#[derive(Debug, Clone, Copy, Default)]
pub struct Etc1Selector;

impl CompressionSelector for Etc1Selector {
    fn platform(&self) -> Platform {
        Platform::Android
    }

    fn select_format(
        &self,
        target: TargetFormat,
        alpha: AlphaInfo,
        texture: &Texture,
    ) -> FormatDecision {
        match target {
            TargetFormat::Unchanged => FormatDecision::exact(texture.format()),
            TargetFormat::Color => FormatDecision::exact(PixelFormat::Rgba8Unorm),
            _ if texture.is_volume() => FormatDecision::downgrade(
                PixelFormat::Rgba8Unorm,
                "volume textures are not block-compressed",
            ),
            _ if alpha.has_alpha => FormatDecision::downgrade(
                PixelFormat::Bgra4Unorm,
                "ETC1 has no alpha channel",
            ),
            _ => FormatDecision::exact(PixelFormat::Etc1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(w: u32, h: u32) -> Texture {
        Texture::from_texels(w, h, &vec![[1.0; 4]; (w * h) as usize]).unwrap()
    }

    #[test]
    fn test_pvrtc_accepted_for_square_power_of_two() {
        let decision =
            PvrtcSelector.select_format(TargetFormat::Dxt, AlphaInfo::default(), &flat(16, 16));
        assert_eq!(decision, FormatDecision::exact(PixelFormat::Pvrtc4));
    }

    #[test]
    fn test_pvrtc_constraints() {
        assert!(check_pvrtc(&flat(8, 8)).is_ok());
        for (w, h) in [(12, 12), (16, 8), (4, 4)] {
            assert!(matches!(
                check_pvrtc(&flat(w, h)),
                Err(TextureError::PlatformConstraintViolation {
                    platform: Platform::Ios,
                    ..
                })
            ));
        }
    }

    #[test]
    fn test_pvrtc_downgrades_non_square() {
        let decision =
            PvrtcSelector.select_format(TargetFormat::Normal, AlphaInfo::default(), &flat(16, 8));
        assert_eq!(decision.format, PixelFormat::Rgba8Unorm);
        assert!(decision.downgraded.unwrap().contains("not square"));
    }

    #[test]
    fn test_etc1_depends_on_alpha() {
        let tex = flat(8, 8);
        let opaque = Etc1Selector.select_format(TargetFormat::Dxt, AlphaInfo::default(), &tex);
        assert_eq!(opaque.format, PixelFormat::Etc1);

        let alpha = AlphaInfo {
            has_alpha: true,
            has_fractional_alpha: false,
        };
        let translucent = Etc1Selector.select_format(TargetFormat::Dxt, alpha, &tex);
        assert_eq!(translucent.format, PixelFormat::Bgra4Unorm);
    }

    #[test]
    fn test_mobile_color_stays_rgba8() {
        let tex = flat(5, 3);
        for selector in [&PvrtcSelector as &dyn CompressionSelector, &Etc1Selector] {
            let decision = selector.select_format(TargetFormat::Color, AlphaInfo::default(), &tex);
            assert_eq!(decision, FormatDecision::exact(PixelFormat::Rgba8Unorm));
        }
    }
}
