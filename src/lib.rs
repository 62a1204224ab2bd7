//! spritecut
//!
//! Removes a uniform white or black backdrop from sprite images, producing
//! RGBA output with an anti-aliased alpha edge. Background-colored details
//! inside the sprite (eye highlights, glow cores) stay opaque because only
//! the backdrop region connected to the image border is made transparent.
//!
//! ## Image Format
//! - **Input**: RGB, (height, width, 3), `u8`
//! - **Output**: RGBA, (height, width, 4), `u8`
//!
//! Color channels of the output are the input's values; only alpha is computed.
//!
//! ## Entry Points
//! - [`remove_background`]: in-memory, one image
//! - [`process_file`]: decode, process and write one PNG
//! - [`process_directory`]: every image of a directory, in parallel
//!
//! Python bindings are available with the `python` feature.

pub mod batch;
pub mod error;
pub mod filters;
pub mod io;
pub mod params;
pub mod pipeline;
pub mod selection;

pub use batch::{BatchReport, process_directory};
pub use error::{ConfigError, InputError, InvariantError, RemovalError};
pub use io::process_file;
pub use params::{BackgroundColor, Kernel, Params};
pub use pipeline::remove_background;

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray3, PyReadonlyArray3};
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;

    use crate::error::ConfigError;
    use crate::params::{BackgroundColor, Params, unsigned_field};

    /// Remove the uniform background from an RGB u8 image.
    ///
    /// # Arguments
    /// * `image` - RGB image (height, width, 3)
    /// * `bg_color` - "white" or "black"
    /// * `white_threshold` - Luminance threshold, 0-255
    ///
    /// Returns an RGBA u8 image of the same size. Invalid parameters
    /// (including negative sizes) or buffers raise `ValueError`.
    #[pyfunction]
    #[pyo3(signature = (
        image,
        bg_color="white",
        white_threshold=235,
        erode_kernel_size=3,
        dilate_kernel_size=5,
        erode_iterations=1,
        dilate_iterations=1,
        blur_size=3,
        border_size=30
    ))]
    #[allow(clippy::too_many_arguments)]
    pub fn remove_background<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        bg_color: &str,
        white_threshold: i64,
        erode_kernel_size: i64,
        dilate_kernel_size: i64,
        erode_iterations: i64,
        dilate_iterations: i64,
        blur_size: i64,
        border_size: i64,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let params = (|| -> Result<Params, ConfigError> {
            Ok(Params {
                background: bg_color.parse::<BackgroundColor>()?,
                threshold: white_threshold.clamp(i32::MIN.into(), i32::MAX.into()) as i32,
                erode_kernel_size: unsigned_field("erode kernel size", erode_kernel_size)?,
                erode_iterations: unsigned_field("erode iterations", erode_iterations)?,
                dilate_kernel_size: unsigned_field("dilate kernel size", dilate_kernel_size)?,
                dilate_iterations: unsigned_field("dilate iterations", dilate_iterations)?,
                blur_size: unsigned_field("blur size", blur_size)?,
                border_size: unsigned_field("border size", border_size)?,
            })
        })()
        .and_then(|params| params.validate().map(|()| params))
        .map_err(|e| PyValueError::new_err(e.to_string()))?;

        let input = image.as_array();
        let result = crate::pipeline::remove_background(input, &params)
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok(result.into_pyarray(py))
    }

    /// spritecut Python extension module
    #[pymodule]
    pub fn spritecut(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(remove_background, m)?)?;
        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::spritecut;
