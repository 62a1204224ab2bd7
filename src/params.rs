//! Pipeline parameters.
//!
//! A [`Params`] value is built once (defaults, TOML preset, command line),
//! validated with [`Params::validate`] and then passed by reference through
//! every stage. Nothing mutates it mid-pipeline.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::ConfigError;

// ============================================================================
// BackgroundColor
// ============================================================================

/// The uniform backdrop to remove.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundColor {
    #[default]
    White,
    Black,
}

impl BackgroundColor {
    /// Solid fill used for the safety border.
    pub fn fill(self) -> [u8; 3] {
        match self {
            Self::White => [255, 255, 255],
            Self::Black => [0, 0, 0],
        }
    }

    /// True when an 8-bit level counts as "background-ish" for threshold `t`.
    ///
    /// White: `level >= t`. Black: `level <= 255 - t`.
    #[inline]
    pub fn accepts_level(self, level: u8, threshold: u8) -> bool {
        match self {
            Self::White => level >= threshold,
            Self::Black => level <= 255 - threshold,
        }
    }
}

impl FromStr for BackgroundColor {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "white" => Ok(Self::White),
            "black" => Ok(Self::Black),
            _ => Err(ConfigError::UnknownBackground(s.to_string())),
        }
    }
}

impl fmt::Display for BackgroundColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::White => "white",
            Self::Black => "black",
        })
    }
}

// ============================================================================
// Kernel
// ============================================================================

/// Square structuring element applied `iterations` times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Kernel {
    /// Side length in pixels (odd).
    pub size: usize,
    pub iterations: u32,
}

impl Kernel {
    pub fn new(size: usize, iterations: u32) -> Self {
        Self { size, iterations }
    }

    /// Half-width of the square, i.e. how far one pass reaches.
    #[inline]
    pub fn radius(&self) -> usize {
        self.size / 2
    }
}

// ============================================================================
// Params
// ============================================================================

/// Full parameter set for one invocation.
///
/// Defaults match the command line defaults. Plausible thresholds are
/// roughly 220-245; lower values remove more aggressively.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Params {
    #[serde(rename = "bg_color")]
    pub background: BackgroundColor,
    /// Luminance threshold. Inverted automatically for black backgrounds.
    #[serde(alias = "white_threshold")]
    pub threshold: i32,
    pub erode_kernel_size: usize,
    pub erode_iterations: u32,
    pub dilate_kernel_size: usize,
    pub dilate_iterations: u32,
    /// Noise blur kernel size, 0 or 1 disables the blur.
    pub blur_size: usize,
    /// Safety padding in pixels, 0 disables padding.
    pub border_size: usize,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            background: BackgroundColor::White,
            threshold: 235,
            erode_kernel_size: 3,
            erode_iterations: 1,
            dilate_kernel_size: 5,
            dilate_iterations: 1,
            blur_size: 3,
            border_size: 30,
        }
    }
}

impl Params {
    /// Load a TOML preset. Missing keys keep their defaults.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let text =
            fs::read_to_string(path).map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Reject anything the pipeline cannot run with. Values are never clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0..=255).contains(&self.threshold) {
            return Err(ConfigError::ThresholdOutOfRange(self.threshold));
        }
        check_kernel("erode kernel size", self.erode_kernel_size)?;
        check_kernel("dilate kernel size", self.dilate_kernel_size)?;
        check_iterations("erode iterations", self.erode_iterations)?;
        check_iterations("dilate iterations", self.dilate_iterations)?;
        if self.blur_size > 1 && self.blur_size % 2 == 0 {
            return Err(ConfigError::BlurSize(self.blur_size));
        }
        Ok(())
    }

    /// Threshold as an 8-bit level. Only meaningful after [`Params::validate`].
    pub fn threshold_level(&self) -> u8 {
        self.threshold.clamp(0, 255) as u8
    }

    pub fn erosion(&self) -> Kernel {
        Kernel::new(self.erode_kernel_size, self.erode_iterations)
    }

    pub fn dilation(&self) -> Kernel {
        Kernel::new(self.dilate_kernel_size, self.dilate_iterations)
    }
}

fn check_kernel(name: &'static str, value: usize) -> Result<(), ConfigError> {
    if value == 0 || value % 2 == 0 {
        return Err(ConfigError::KernelSize { name, value });
    }
    Ok(())
}

/// Narrow a signed value from a loosely typed caller (Python, scripts) into
/// an unsigned parameter field.
pub fn unsigned_field<T: TryFrom<i64>>(name: &'static str, value: i64) -> Result<T, ConfigError> {
    T::try_from(value).map_err(|_| ConfigError::FieldOutOfRange { name, value })
}

fn check_iterations(name: &'static str, value: u32) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::Iterations { name, value });
    }
    Ok(())
}
