//! Decoding and encoding glue around the pipeline.
//!
//! The pipeline itself only sees ndarray buffers. This module converts
//! files to RGB arrays with the `image` crate and writes RGBA results as PNG.

use std::fs;
use std::path::Path;

use image::{ImageFormat, RgbaImage};
use ndarray::Array3;
use tracing::debug;

use crate::error::{InputError, InvariantError, RemovalError};
use crate::params::Params;
use crate::pipeline::remove_background;

/// Decode any supported image file into an RGB array (height, width, 3).
pub fn load_rgb(path: &Path) -> Result<Array3<u8>, InputError> {
    if !path.exists() {
        return Err(InputError::Missing(path.to_path_buf()));
    }

    let img = image::open(path)
        .map_err(|e| InputError::Decode(path.to_path_buf(), e))?
        .to_rgb8();
    let (width, height) = img.dimensions();

    Array3::from_shape_vec((height as usize, width as usize, 3), img.into_raw())
        .map_err(InputError::Layout)
}

/// Encode an RGBA array (height, width, 4) as PNG, creating parent directories.
pub fn save_rgba(path: &Path, rgba: Array3<u8>) -> Result<(), RemovalError> {
    let (height, width, channels) = rgba.dim();
    let shape = vec![height, width, channels];
    if channels != 4 {
        return Err(InvariantError::OutputLayout(shape).into());
    }

    let (raw, _) = rgba.as_standard_layout().into_owned().into_raw_vec_and_offset();
    let img = RgbaImage::from_raw(width as u32, height as u32, raw)
        .ok_or(InvariantError::OutputLayout(shape))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| RemovalError::Io(parent.to_path_buf(), e))?;
    }

    img.save_with_format(path, ImageFormat::Png)
        .map_err(|e| RemovalError::Write(path.to_path_buf(), e))
}

/// Read `input`, remove its background and write the PNG result to `output`.
///
/// Nothing is written unless the whole pipeline succeeds.
pub fn process_file(input: &Path, output: &Path, params: &Params) -> Result<(), RemovalError> {
    params.validate()?;

    let rgb = load_rgb(input)?;
    let rgba = remove_background(rgb.view(), params)?;
    save_rgba(output, rgba)?;

    debug!(input = %input.display(), output = %output.display(), "saved transparent PNG");
    Ok(())
}
