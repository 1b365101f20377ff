//! Deployment platforms and their compressed-format policies
//!
//! The final pixel format of a run is chosen by a [`CompressionSelector`].
//! There is one implementation per deployment profile, picked at
//! configuration time with [`selector_for`].

mod generic;
mod mobile;

pub use generic::GenericSelector;
pub use mobile::{Etc1Selector, PvrtcSelector};

use std::fmt;

use crate::options::TargetFormat;
use crate::texture::{AlphaInfo, PixelFormat, Texture};

/// Deployment target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Platform {
    /// Desktop GPUs (BC formats, DDS output)
    #[default]
    Desktop,
    /// PowerVR devices (PVRTC, KTX output)
    Ios,
    /// ETC1 devices (KTX output)
    Android,
}

impl Platform {
    pub fn name(&self) -> &'static str {
        match self {
            Platform::Desktop => "desktop",
            Platform::Ios => "ios",
            Platform::Android => "android",
        }
    }

    /// File extension of the container this platform ships
    pub fn extension(&self) -> &'static str {
        match self {
            Platform::Desktop => "dds",
            Platform::Ios | Platform::Android => "ktx",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The selected output format, plus the reason when a policy had to fall back
#[derive(Debug, Clone, PartialEq)]
pub struct FormatDecision {
    pub format: PixelFormat,
    pub downgraded: Option<String>,
}

impl FormatDecision {
    pub fn exact(format: PixelFormat) -> Self {
        Self {
            format,
            downgraded: None,
        }
    }

    pub fn downgrade(format: PixelFormat, reason: impl Into<String>) -> Self {
        Self {
            format,
            downgraded: Some(reason.into()),
        }
    }
}

/// Picks the final pixel format for a processed texture
pub trait CompressionSelector: Send + Sync {
    fn platform(&self) -> Platform;

    /// Choose the output format for `target`.
    ///
    /// `texture` is the working texture right before the final conversion.
    /// [`TargetFormat::Unchanged`] keeps the texture's current format; the
    /// pipeline resolves that case itself against the source format.
    fn select_format(
        &self,
        target: TargetFormat,
        alpha: AlphaInfo,
        texture: &Texture,
    ) -> FormatDecision;
}

/// Selector implementing `platform`'s policy
pub fn selector_for(platform: Platform) -> Box<dyn CompressionSelector> {
    match platform {
        Platform::Desktop => Box::new(GenericSelector),
        Platform::Ios => Box::new(PvrtcSelector),
        Platform::Android => Box::new(Etc1Selector),
    }
}
