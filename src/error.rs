//! Error types for the background removal pipeline.
//!
//! Errors are grouped by who is at fault:
//! - [`ConfigError`]: a parameter is invalid, nothing was processed
//! - [`InputError`]: one image cannot be read or has an unusable layout
//! - [`InvariantError`]: the algorithm broke its own contract (a bug)
//!
//! [`RemovalError`] is what a single pipeline invocation returns.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

// ============================================================================
// ConfigError
// ============================================================================

/// Invalid parameter values. Raised before any pixel is touched.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("threshold must be within 0..=255, got {0}")]
    ThresholdOutOfRange(i32),

    #[error("{name} must be a positive odd integer, got {value}")]
    KernelSize { name: &'static str, value: usize },

    #[error("{name} must be at least 1, got {value}")]
    Iterations { name: &'static str, value: u32 },

    #[error("blur size must be 0, 1 or a positive odd integer, got {0}")]
    BlurSize(usize),

    #[error("{name} must be a non-negative integer, got {value}")]
    FieldOutOfRange { name: &'static str, value: i64 },

    #[error("unknown background color `{0}` (expected `white` or `black`)")]
    UnknownBackground(String),

    #[error("cannot read config file `{}`", .0.display())]
    Read(PathBuf, #[source] io::Error),

    #[error("config file parsing error")]
    Parse(#[from] toml::de::Error),
}

// ============================================================================
// InputError
// ============================================================================

/// Problems with a single input image.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("`{}` does not exist", .0.display())]
    Missing(PathBuf),

    #[error("`{}` is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("cannot decode `{}`", .0.display())]
    Decode(PathBuf, #[source] image::ImageError),

    #[error("expected a 3-channel RGB buffer, got {0} channels")]
    Channels(usize),

    #[error("image has no pixels ({width}x{height})")]
    Empty { width: usize, height: usize },

    #[error("decoded buffer does not match its dimensions")]
    Layout(#[source] ndarray::ShapeError),

    #[error(
        "`{}` would overwrite `{}`, already written from `{}`",
        .input.display(),
        .output.display(),
        .first.display()
    )]
    OutputCollision {
        input: PathBuf,
        first: PathBuf,
        output: PathBuf,
    },
}

// ============================================================================
// InvariantError
// ============================================================================

/// Internal contract violations. These indicate a bug, never bad input.
#[derive(Debug, Error)]
pub enum InvariantError {
    #[error("cannot remove a {border}px border from a {width}x{height} buffer")]
    CropTooLarge {
        border: usize,
        width: usize,
        height: usize,
    },

    #[error(
        "cropped mask is {actual_width}x{actual_height} but the input is \
         {expected_width}x{expected_height}"
    )]
    CropMismatch {
        expected_width: usize,
        expected_height: usize,
        actual_width: usize,
        actual_height: usize,
    },

    #[error("connected-component labelling produced an empty label map")]
    EmptyLabelMap,

    #[error("RGBA result of shape {0:?} cannot be encoded")]
    OutputLayout(Vec<usize>),
}

// ============================================================================
// RemovalError
// ============================================================================

/// Failure of one background-removal invocation.
#[derive(Debug, Error)]
pub enum RemovalError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Input(#[from] InputError),

    #[error("internal invariant violated: {0}")]
    Invariant(#[from] InvariantError),

    #[error("cannot write `{}`", .0.display())]
    Write(PathBuf, #[source] image::ImageError),

    #[error("IO error at `{}`", .0.display())]
    Io(PathBuf, #[source] io::Error),
}

impl RemovalError {
    /// True when the failure points at an algorithmic bug rather than bad input.
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Invariant(_))
    }
}
