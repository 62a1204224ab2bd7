//! spritecut command line.
//!
//! ```text
//! spritecut sprite.jpg                      # writes sprite.png next to it
//! spritecut sprite.jpg -o out/sprite.png
//! spritecut frames/ -o cut/ --bg-color black --threshold 230
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use spritecut::{BackgroundColor, Params, process_directory, process_file};

#[derive(Parser, Debug)]
#[command(name = "spritecut")]
#[command(about = "Remove white or black backgrounds from sprite images")]
#[command(version)]
struct Args {
    /// Input image file or directory of images
    input: PathBuf,

    /// Output file (single image) or directory (batch)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// TOML preset with default parameters; flags override it
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Background color to remove: white or black
    #[arg(long, value_name = "COLOR")]
    bg_color: Option<BackgroundColor>,

    /// Luminance threshold (0-255), inverted for black backgrounds
    #[arg(long, visible_alias = "threshold", allow_negative_numbers = true)]
    white_threshold: Option<i32>,

    /// Erosion kernel size (odd)
    #[arg(long)]
    erode_kernel_size: Option<usize>,

    /// Dilation kernel size (odd)
    #[arg(long)]
    dilate_kernel_size: Option<usize>,

    /// Number of erosion passes
    #[arg(long)]
    erode_iterations: Option<u32>,

    /// Number of dilation passes
    #[arg(long)]
    dilate_iterations: Option<u32>,

    /// Noise blur kernel size (odd, 0 or 1 disables)
    #[arg(long)]
    blur_size: Option<usize>,

    /// Temporary padding in pixels
    #[arg(long)]
    border_size: Option<usize>,

    /// Log every pipeline stage
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    /// Preset (or defaults) with every explicitly passed flag applied on top.
    fn params(&self) -> Result<Params> {
        let mut params = match &self.config {
            Some(path) => Params::from_toml_file(path)
                .with_context(|| format!("loading preset {}", path.display()))?,
            None => Params::default(),
        };

        if let Some(bg) = self.bg_color {
            params.background = bg;
        }
        if let Some(v) = self.white_threshold {
            params.threshold = v;
        }
        if let Some(v) = self.erode_kernel_size {
            params.erode_kernel_size = v;
        }
        if let Some(v) = self.dilate_kernel_size {
            params.dilate_kernel_size = v;
        }
        if let Some(v) = self.erode_iterations {
            params.erode_iterations = v;
        }
        if let Some(v) = self.dilate_iterations {
            params.dilate_iterations = v;
        }
        if let Some(v) = self.blur_size {
            params.blur_size = v;
        }
        if let Some(v) = self.border_size {
            params.border_size = v;
        }

        params.validate().context("invalid parameters")?;
        Ok(params)
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "spritecut=debug" } else { "spritecut=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn run_file(input: &Path, output: Option<PathBuf>, params: &Params) -> Result<ExitCode> {
    let output = output.unwrap_or_else(|| input.with_extension("png"));
    process_file(input, &output, params)
        .with_context(|| format!("processing {}", input.display()))?;

    info!("saved {}", output.display());
    Ok(ExitCode::SUCCESS)
}

fn run_directory(input: &Path, output: Option<PathBuf>, params: &Params) -> Result<ExitCode> {
    let output = output.unwrap_or_else(|| input.to_path_buf());
    let report = process_directory(input, &output, params)
        .with_context(|| format!("processing directory {}", input.display()))?;

    for (path, err) in &report.failed {
        error!("{}: {}", path.display(), err);
    }
    info!(
        "{} of {} image(s) processed into {}",
        report.succeeded.len(),
        report.total(),
        output.display()
    );

    Ok(if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    init_logging(args.verbose);

    let params = args.params()?;
    let input = args.input.clone();

    if input.is_dir() {
        run_directory(&input, args.output, &params)
    } else if input.exists() {
        run_file(&input, args.output, &params)
    } else {
        bail!("input {} does not exist", input.display())
    }
}
