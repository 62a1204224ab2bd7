//! Core utilities shared by the pipeline stages.
//!
//! This module provides:
//! - Gaussian kernel generation
//! - Border padding and the exact inverse crop
//! - Mask conversions between u8 (0-255) and f32 (0.0-1.0)
//! - Alpha channel merging

use ndarray::{Array, Array2, Array3, ArrayView, ArrayView2, ArrayView3, Dimension, Slice, s};

use crate::error::InvariantError;

/// Generate a normalized 1D Gaussian kernel of `size` taps.
///
/// When `sigma <= 0` it is derived from the size the way common image
/// libraries do it: `0.3 * ((size - 1) * 0.5 - 1) + 0.8`.
///
/// # Arguments
/// * `size` - Number of taps (odd). 0 or 1 yields the identity kernel.
/// * `sigma` - Standard deviation, or `<= 0` to derive it
///
/// # Returns
/// Normalized 1D kernel as Vec<f32>
pub fn gaussian_kernel_1d(size: usize, sigma: f32) -> Vec<f32> {
    if size <= 1 {
        return vec![1.0];
    }

    let sigma = if sigma > 0.0 {
        sigma
    } else {
        0.3 * ((size as f32 - 1.0) * 0.5 - 1.0) + 0.8
    };
    let half = size / 2;

    let mut kernel: Vec<f32> = (0..size)
        .map(|i| {
            let x = i as f32 - half as f32;
            (-x * x / (2.0 * sigma * sigma)).exp()
        })
        .collect();

    // Normalize
    let sum: f32 = kernel.iter().sum();
    for v in kernel.iter_mut() {
        *v /= sum;
    }

    kernel
}

/// Surround an RGB image with a solid border.
///
/// # Arguments
/// * `image` - RGB image (height, width, 3)
/// * `border` - Pixels to add on each side
/// * `fill` - Border color
///
/// # Returns
/// Image of shape (height + 2*border, width + 2*border, 3) with the
/// original centered
pub fn pad_border(image: ArrayView3<u8>, border: usize, fill: [u8; 3]) -> Array3<u8> {
    let (height, width, channels) = image.dim();
    let new_h = height + border * 2;
    let new_w = width + border * 2;

    let mut result = Array3::<u8>::from_shape_fn((new_h, new_w, channels), |(_, _, c)| {
        fill.get(c).copied().unwrap_or(0)
    });
    result
        .slice_mut(s![border..border + height, border..border + width, ..])
        .assign(&image);

    result
}

/// Remove exactly `border` pixels from each side of the two spatial axes.
///
/// Works for masks (height, width) and images (height, width, channels).
/// Exact inverse of [`pad_border`]: `crop_border(pad_border(img, p), p) == img`.
pub fn crop_border<A, D>(input: ArrayView<A, D>, border: usize) -> Result<Array<A, D>, InvariantError>
where
    A: Clone,
    D: Dimension,
{
    let shape = input.shape();
    let (height, width) = (shape[0], shape[1]);
    if border * 2 > height || border * 2 > width {
        return Err(InvariantError::CropTooLarge {
            border,
            width,
            height,
        });
    }

    let cropped = input.slice_each_axis(|axis| {
        if axis.axis.index() < 2 {
            Slice::from(border..axis.len - border)
        } else {
            Slice::from(..)
        }
    });
    Ok(cropped.to_owned())
}

/// Convert a u8 mask (0-255) to f32 (0.0-1.0).
pub fn mask_to_unit(mask: ArrayView2<u8>) -> Array2<f32> {
    mask.mapv(|v| v as f32 / 255.0)
}

/// Convert an f32 mask (0.0-1.0) back to u8, rounding to the nearest level.
pub fn unit_to_mask(mask: ArrayView2<f32>) -> Array2<u8> {
    mask.mapv(|v| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
}

/// Merge RGB color channels with an alpha plane into an RGBA image.
///
/// # Arguments
/// * `rgb` - Color image (height, width, 3)
/// * `alpha` - Alpha plane (height, width)
///
/// # Returns
/// RGBA image (height, width, 4). Fails if the spatial shapes differ.
pub fn merge_alpha(rgb: ArrayView3<u8>, alpha: ArrayView2<u8>) -> Result<Array3<u8>, InvariantError> {
    let (height, width, _) = rgb.dim();
    let (alpha_h, alpha_w) = alpha.dim();
    if (alpha_h, alpha_w) != (height, width) {
        return Err(InvariantError::CropMismatch {
            expected_width: width,
            expected_height: height,
            actual_width: alpha_w,
            actual_height: alpha_h,
        });
    }

    let mut rgba = Array3::<u8>::zeros((height, width, 4));
    rgba.slice_mut(s![.., .., ..3]).assign(&rgb.slice(s![.., .., ..3]));
    rgba.slice_mut(s![.., .., 3]).assign(&alpha);

    Ok(rgba)
}
