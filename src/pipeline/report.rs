//! What a pipeline run did

use crate::platform::FormatDecision;
use crate::texture::{AlphaInfo, PixelFormat};

/// One executed transform, in execution order
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    ColorKey,
    /// Gamma forced to 1.0 and premultiplication disabled
    NormalOverride,
    /// `promoted` is set when classification needed a float retry
    ClassifyAlpha { promoted: bool },
    Promote,
    Linearize { gamma: f32 },
    ExpandNormals,
    ResizePowerOfTwo { width: u32, height: u32 },
    ResizeMultipleOfFour { width: u32, height: u32 },
    GenerateMipmaps { levels: u32 },
    ScaleAlphaToCoverage { reference_alpha: f32 },
    ToGamma { gamma: f32 },
    PremultiplyAlpha,
    PackNormals { invert_y: bool },
    Convert { format: PixelFormat },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessReport {
    /// The source was returned verbatim without entering the main pipeline
    pub early_out: bool,
    pub steps: Vec<Step>,
    /// Alpha classification, when one was computed
    pub alpha: Option<AlphaInfo>,
    /// Final format choice; `None` on early-out
    pub decision: Option<FormatDecision>,
}

impl ProcessReport {
    pub fn early_out() -> Self {
        Self {
            early_out: true,
            ..Self::default()
        }
    }

    pub fn ran(&self, matches: impl Fn(&Step) -> bool) -> bool {
        self.steps.iter().any(matches)
    }
}
