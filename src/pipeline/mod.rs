//! Texture processing pipeline
//!
//! A run takes a decoded source texture and an [`Options`] value and
//! produces the output texture in one forward pass:
//!
//! 1. color keying (RGBA8)
//! 2. normal-map override of gamma and premultiplication
//! 3. alpha classification, promoting to float if the source can't be read
//! 4. promotion to RGBA32F
//! 5. linearize, or unpack normals to `[-1, 1]`
//! 6. alpha-aware filtering decision
//! 7. power-of-two resize (Kaiser, clamp)
//! 8. multiple-of-four resize for block targets (Kaiser, clamp)
//! 9. mip chain generation (box, repeat)
//! 10. color: coverage scaling, back to gamma, premultiply
//! 11. normals: renormalize and repack
//! 12. final conversion chosen by the platform's [`CompressionSelector`]
//!
//! Runs share no state, so independent textures can be processed on
//! separate threads with separate (or shared) `Pipeline` values.

mod plan;
mod report;

pub use plan::early_out;
pub use report::{ProcessReport, Step};

use tracing::{debug, info};

use crate::error::{Result, TextureError};
use crate::math::{is_power_of_two, round_to_multiple_of_four, round_up_to_power_of_two, Tolerance};
use crate::options::{Options, TargetFormat};
use crate::platform::{selector_for, CompressionSelector, FormatDecision, Platform};
use crate::texture::{AlphaInfo, Filter, PixelFormat, Texture, WrapMode};

/// Output of a pipeline run
#[derive(Debug, Clone)]
pub struct ProcessedTexture {
    pub texture: Texture,
    pub report: ProcessReport,
}

pub struct Pipeline {
    tolerance: Tolerance,
    selector: Box<dyn CompressionSelector>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(Platform::Desktop)
    }
}

impl Pipeline {
    pub fn new(platform: Platform) -> Self {
        Self::with_selector(selector_for(platform))
    }

    pub fn with_selector(selector: Box<dyn CompressionSelector>) -> Self {
        Self {
            tolerance: Tolerance::default(),
            selector,
        }
    }

    /// Use `tolerance` for alpha classification and normal renormalization
    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn platform(&self) -> Platform {
        self.selector.platform()
    }

    /// Process `source` according to `options`
    ///
    /// `asset` identifies the texture in errors and logs. Invalid options
    /// fail with `InvalidArgument` and an unclassifiable source format with
    /// `UnsupportedFormat`; any failure after that is `ProcessingFailed`.
    pub fn process(
        &self,
        asset: &str,
        source: &Texture,
        options: &Options,
    ) -> Result<ProcessedTexture> {
        options.validate()?;
        if !source.format().is_classified() {
            return Err(TextureError::UnsupportedFormat(format!(
                "cannot classify the pixel format of '{asset}'"
            )));
        }

        if early_out(source, options) {
            info!(
                "{}: already {} with nothing to do, passing through",
                asset,
                source.format()
            );
            return Ok(ProcessedTexture {
                texture: source.clone(),
                report: ProcessReport::early_out(),
            });
        }

        let run = Run {
            tolerance: self.tolerance,
            selector: self.selector.as_ref(),
            options,
            report: ProcessReport::default(),
        };
        run.execute(source)
            .map_err(|e| TextureError::processing_failed(asset, e))
            .inspect(|processed| {
                if let Some(decision) = &processed.report.decision {
                    info!(
                        "{}: {}x{} {} with {} mips{}",
                        asset,
                        processed.texture.width(),
                        processed.texture.height(),
                        decision.format,
                        processed.texture.mip_levels(),
                        decision
                            .downgraded
                            .as_deref()
                            .map(|r| format!(" (downgraded: {r})"))
                            .unwrap_or_default()
                    );
                }
            })
    }
}

/// State of one main-pipeline run
struct Run<'a> {
    tolerance: Tolerance,
    selector: &'a dyn CompressionSelector,
    options: &'a Options,
    report: ProcessReport,
}

impl Run<'_> {
    fn record(&mut self, step: Step) {
        debug!("Step: {:?}", step);
        self.report.steps.push(step);
    }

    fn classify_alpha(&mut self, working: Texture) -> Result<(Texture, AlphaInfo)> {
        match working.classify_alpha(self.tolerance) {
            Ok(alpha) => {
                self.record(Step::ClassifyAlpha { promoted: false });
                Ok((working, alpha))
            }
            Err(TextureError::UnsupportedFormat(reason)) => {
                debug!("Promoting for alpha classification: {}", reason);
                let promoted = working.convert(PixelFormat::Rgba32Float)?;
                let alpha = promoted.classify_alpha(self.tolerance)?;
                self.record(Step::ClassifyAlpha { promoted: true });
                Ok((promoted, alpha))
            }
            Err(e) => Err(e),
        }
    }

    fn execute(mut self, source: &Texture) -> Result<ProcessedTexture> {
        let options = self.options;
        let target = options.format;
        let normal_map = target.is_normal_map();
        let original_format = source.format();
        let mut working = source.clone();

        // 1
        if options.color_key_enabled {
            working = working
                .convert(PixelFormat::Rgba8Unorm)?
                .apply_color_key(options.color_key)?;
            self.record(Step::ColorKey);
        }

        // 2
        let (mut input_gamma, mut output_gamma) = (options.input_gamma, options.output_gamma);
        let mut premultiply = options.premultiply_alpha;
        if normal_map {
            input_gamma = 1.0;
            output_gamma = 1.0;
            premultiply = false;
            self.record(Step::NormalOverride);
        }

        // 3
        let wants_alpha = options.generate_mipmaps
            || options.resize_to_power_of_two
            || premultiply
            || target == TargetFormat::Dxt;
        let mut alpha = AlphaInfo::default();
        if !normal_map && wants_alpha {
            let (classified, info) = self.classify_alpha(working)?;
            working = classified;
            alpha = info;
            self.report.alpha = Some(info);
        }

        // 4
        working = working.convert(PixelFormat::Rgba32Float)?;
        self.record(Step::Promote);

        // 5
        if normal_map {
            working = working.expand_normals()?;
            self.record(Step::ExpandNormals);
        } else {
            working = working.to_linear(input_gamma)?;
            self.record(Step::Linearize { gamma: input_gamma });
        }

        // 6
        let alpha_transparency = alpha.has_alpha && premultiply;

        // 7
        let (w, h) = (working.width(), working.height());
        if options.resize_to_power_of_two && !(is_power_of_two(w) && is_power_of_two(h)) {
            let (width, height) = (round_up_to_power_of_two(w), round_up_to_power_of_two(h));
            working = working.resize(
                width,
                height,
                Filter::KAISER,
                WrapMode::Clamp,
                alpha_transparency,
            )?;
            self.record(Step::ResizePowerOfTwo { width, height });
        }

        // 8
        let (w, h) = (working.width(), working.height());
        if target.is_block_compressed() && (w % 4 != 0 || h % 4 != 0) {
            let (width, height) = (round_to_multiple_of_four(w), round_to_multiple_of_four(h));
            working = working.resize(
                width,
                height,
                Filter::KAISER,
                WrapMode::Clamp,
                alpha_transparency,
            )?;
            self.record(Step::ResizeMultipleOfFour { width, height });
        }

        // 9
        if options.generate_mipmaps && working.mip_levels() == 1 {
            working = working.generate_mipmaps(Filter::Box, WrapMode::Repeat, alpha_transparency)?;
            self.record(Step::GenerateMipmaps {
                levels: working.mip_levels(),
            });
        }

        if normal_map {
            // 11
            let invert_y = target == TargetFormat::NormalInvertY;
            working = working.pack_normals(invert_y, self.tolerance)?;
            self.record(Step::PackNormals { invert_y });
        } else {
            // 10
            if options.scale_alpha_to_coverage {
                working = working.scale_alpha_to_coverage(options.reference_alpha, false)?;
                self.record(Step::ScaleAlphaToCoverage {
                    reference_alpha: options.reference_alpha,
                });
            }
            working = working.to_gamma(output_gamma)?;
            self.record(Step::ToGamma { gamma: output_gamma });
            if alpha.has_alpha && premultiply {
                working = working.premultiply_alpha()?;
                self.record(Step::PremultiplyAlpha);
            }
        }

        // 12
        let decision = match target {
            TargetFormat::Unchanged => FormatDecision::exact(original_format),
            _ => self.selector.select_format(target, alpha, &working),
        };
        working = working.convert(decision.format)?;
        self.record(Step::Convert {
            format: decision.format,
        });
        self.report.decision = Some(decision);

        Ok(ProcessedTexture {
            texture: working,
            report: self.report,
        })
    }
}
