//! Pipeline options
//!
//! An `Options` value is built once (from the CLI or by a library caller),
//! validated, and then only read by the pipeline.

use crate::error::{Result, TextureError};

/// Requested output representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum TargetFormat {
    /// Keep the source pixel format
    #[default]
    Unchanged,
    /// 8-bit per channel RGBA
    Color,
    /// Block-compressed DXT/BC
    Dxt,
    /// Tangent-space normal map
    Normal,
    /// Normal map with the green (Y) channel flipped
    NormalInvertY,
}

impl TargetFormat {
    pub fn is_normal_map(self) -> bool {
        matches!(self, TargetFormat::Normal | TargetFormat::NormalInvertY)
    }

    /// Targets that end up in 4×4 block formats and need aligned dimensions
    pub fn is_block_compressed(self) -> bool {
        matches!(
            self,
            TargetFormat::Dxt | TargetFormat::Normal | TargetFormat::NormalInvertY
        )
    }

    /// Get format name for logging
    pub fn name(&self) -> &'static str {
        match self {
            TargetFormat::Unchanged => "unchanged",
            TargetFormat::Color => "color",
            TargetFormat::Dxt => "dxt",
            TargetFormat::Normal => "normal",
            TargetFormat::NormalInvertY => "normal-invert-y",
        }
    }
}

/// Default color key (magenta)
pub const DEFAULT_COLOR_KEY: [u8; 3] = [255, 0, 255];

/// Per-run pipeline configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    pub format: TargetFormat,
    pub input_gamma: f32,
    pub output_gamma: f32,
    pub generate_mipmaps: bool,
    pub premultiply_alpha: bool,
    pub resize_to_power_of_two: bool,
    pub scale_alpha_to_coverage: bool,
    /// Alpha-test threshold used for coverage scaling, in `[0, 1]`
    pub reference_alpha: f32,
    pub color_key_enabled: bool,
    /// RGB color replaced with transparent black when color keying is enabled
    pub color_key: [u8; 3],
}

impl Default for Options {
    fn default() -> Self {
        Self {
            format: TargetFormat::Unchanged,
            input_gamma: 2.2,
            output_gamma: 2.2,
            generate_mipmaps: true,
            premultiply_alpha: true,
            resize_to_power_of_two: false,
            scale_alpha_to_coverage: false,
            reference_alpha: 0.9,
            color_key_enabled: false,
            color_key: DEFAULT_COLOR_KEY,
        }
    }
}

impl Options {
    /// Check gamma and reference-alpha invariants
    pub fn validate(&self) -> Result<()> {
        for (name, gamma) in [
            ("input gamma", self.input_gamma),
            ("output gamma", self.output_gamma),
        ] {
            // NaN fails this comparison too
            if !(gamma > 0.0 && gamma.is_finite()) {
                return Err(TextureError::InvalidArgument(format!(
                    "{name} must be positive, got {gamma}"
                )));
            }
        }

        if !(0.0..=1.0).contains(&self.reference_alpha) {
            return Err(TextureError::InvalidArgument(format!(
                "reference alpha must lie in [0, 1], got {}",
                self.reference_alpha
            )));
        }

        Ok(())
    }
}

/// Parse a color key given as `RRGGBB` hex (an optional leading `#` is accepted).
pub fn parse_color_key(s: &str) -> Result<[u8; 3]> {
    let hex = s.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(TextureError::InvalidArgument(format!(
            "color key must be RRGGBB hex, got '{s}'"
        )));
    }

    let mut rgb = [0u8; 3];
    for (i, channel) in rgb.iter_mut().enumerate() {
        *channel = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).map_err(|_| {
            TextureError::InvalidArgument(format!("color key must be RRGGBB hex, got '{s}'"))
        })?;
    }
    Ok(rgb)
}
