//! File-level conversion: read the container, run the pipeline, write the output

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Context, Result};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::config::ConvertConfig;
use crate::container::{read_texture, write_texture};
use crate::pipeline::{Pipeline, ProcessReport};
use crate::texture::PixelFormat;

/// Result of converting one file
#[derive(Debug, Clone)]
pub struct ConvertOutcome {
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    pub mip_levels: u32,
    pub format: PixelFormat,
    pub report: ProcessReport,
}

/// Convert one texture file as described by `config`
///
/// Nothing is written unless the whole pipeline succeeds.
pub fn convert_file(config: &ConvertConfig) -> Result<ConvertOutcome> {
    config.validate().context("Invalid conversion config")?;

    let asset = config.input.display().to_string();
    let output = config.output_path();
    debug!("Converting {} -> {} ({})", asset, output.display(), config.platform);

    let source = read_texture(&config.input)
        .with_context(|| format!("Failed to read texture {}", asset))?;

    let processed = Pipeline::new(config.platform)
        .process(&asset, &source, &config.options)
        .with_context(|| format!("Failed to convert {}", asset))?;

    write_texture(&output, &processed.texture)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    let texture = processed.texture;
    Ok(ConvertOutcome {
        output,
        width: texture.width(),
        height: texture.height(),
        mip_levels: texture.mip_levels(),
        format: texture.format(),
        report: processed.report,
    })
}

/// Convert many textures in parallel, one independent pipeline per job
///
/// Results come back in job order, keyed by input path.
pub fn convert_batch(jobs: Vec<ConvertConfig>) -> Vec<(PathBuf, Result<ConvertOutcome>)> {
    let total = jobs.len();
    let completed = AtomicUsize::new(0);
    info!("Converting {} textures", total);

    let results: Vec<_> = jobs
        .into_par_iter()
        .map(|job| {
            let result = convert_file(&job);
            if let Err(e) = &result {
                warn!("{}: {:#}", job.input.display(), e);
            }
            let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
            debug!("[{}/{}] {}", done, total, job.input.display());
            (job.input, result)
        })
        .collect();

    let failed = results.iter().filter(|(_, r)| r.is_err()).count();
    info!("Converted {} textures ({} failed)", total - failed, failed);
    results
}
