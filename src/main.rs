//! texpipe - converts DDS/TGA source textures into GPU-ready assets

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use texpipe::{
    convert_batch, convert_file, options::parse_color_key, ConvertConfig, ConvertOutcome,
    Options, Platform, TargetFormat,
};

#[derive(Parser)]
#[command(name = "texpipe")]
#[command(version)]
#[command(about = "Convert DDS/TGA textures into GPU-ready texture assets")]
#[command(arg_required_else_help = true)]
struct Cli {
    /// Source textures (.dds or .tga)
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output file (single input only; defaults to the input with the platform's extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Target format
    #[arg(short, long, value_enum, default_value_t = TargetFormat::Unchanged)]
    format: TargetFormat,

    /// Deployment platform
    #[arg(short, long, value_enum, env = "TEXPIPE_PLATFORM", default_value_t = Platform::Desktop)]
    platform: Platform,

    /// Do not generate mipmaps
    #[arg(long)]
    no_mipmaps: bool,

    /// Gamma of the source samples
    #[arg(long, default_value_t = 2.2)]
    input_gamma: f32,

    /// Gamma of the output samples
    #[arg(long, default_value_t = 2.2)]
    output_gamma: f32,

    /// Do not premultiply color by alpha
    #[arg(long)]
    no_premultiply_alpha: bool,

    /// Resize to the next power of two in each dimension
    #[arg(long)]
    resize_to_power_of_two: bool,

    /// Rescale mip alpha to keep the base level's alpha-test coverage
    #[arg(long)]
    scale_alpha_to_coverage: bool,

    /// Alpha-test threshold used for coverage scaling
    #[arg(long, default_value_t = 0.9)]
    reference_alpha: f32,

    /// Make texels of this color (RRGGBB, default FF00FF) fully transparent
    #[arg(long, value_name = "RRGGBB", num_args = 0..=1, default_missing_value = "FF00FF", value_parser = parse_color_key)]
    color_key: Option<[u8; 3]>,

    /// Enable verbose logging (use RUST_LOG=debug for more detail)
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn options(&self) -> Options {
        let defaults = Options::default();
        Options {
            format: self.format,
            input_gamma: self.input_gamma,
            output_gamma: self.output_gamma,
            generate_mipmaps: !self.no_mipmaps,
            premultiply_alpha: !self.no_premultiply_alpha,
            resize_to_power_of_two: self.resize_to_power_of_two,
            scale_alpha_to_coverage: self.scale_alpha_to_coverage,
            reference_alpha: self.reference_alpha,
            color_key_enabled: self.color_key.is_some(),
            color_key: self.color_key.unwrap_or(defaults.color_key),
        }
    }
}

fn print_outcome(outcome: &ConvertOutcome) {
    println!(
        "{} ({}x{}, {} mips, {})",
        outcome.output.display(),
        outcome.width,
        outcome.height,
        outcome.mip_levels,
        outcome.format
    );
    if let Some(reason) = outcome
        .report
        .decision
        .as_ref()
        .and_then(|d| d.downgraded.as_ref())
    {
        println!("  note: {}", reason);
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Warnings (platform downgrades) always show; -v or RUST_LOG for more
    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive("texpipe=debug".parse()?)
    } else if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new("texpipe=warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if cli.output.is_some() && cli.inputs.len() > 1 {
        bail!("--output can only be used with a single input");
    }

    let options = cli.options();
    let configs: Vec<ConvertConfig> = cli
        .inputs
        .iter()
        .map(|input| ConvertConfig {
            input: input.clone(),
            output: cli.output.clone(),
            platform: cli.platform,
            options: options.clone(),
        })
        .collect();

    if let [config] = configs.as_slice() {
        let outcome = convert_file(config)?;
        print_outcome(&outcome);
        return Ok(());
    }

    let results = convert_batch(configs);
    let mut failed = 0;
    for (input, result) in &results {
        match result {
            Ok(outcome) => print_outcome(outcome),
            Err(e) => {
                failed += 1;
                eprintln!("{}: {:#}", input.display(), e);
            }
        }
    }
    if failed > 0 {
        bail!("{} of {} textures failed", failed, results.len());
    }
    Ok(())
}
