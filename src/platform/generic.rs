use super::{CompressionSelector, FormatDecision, Platform};
use crate::options::TargetFormat;
use crate::texture::{AlphaInfo, PixelFormat, Texture};

/// Desktop policy: BC1/BC3 for block targets, RGBA8 otherwise
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericSelector;

impl CompressionSelector for GenericSelector {
    fn platform(&self) -> Platform {
        Platform::Desktop
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
            TargetFormat::Dxt if texture.is_volume() => FormatDecision::downgrade(
                PixelFormat::Rgba8Unorm,
                "volume textures are not block-compressed",
            ),
            TargetFormat::Dxt if alpha.has_fractional_alpha => {
                FormatDecision::exact(PixelFormat::Bc3)
            }
            TargetFormat::Dxt => FormatDecision::exact(PixelFormat::Bc1),
            TargetFormat::Normal | TargetFormat::NormalInvertY => {
                FormatDecision::exact(PixelFormat::Bc3)
            }
        }
    }
}
