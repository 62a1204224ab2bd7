//! Gaussian blur filters.
//!
//! Separable 2-pass convolution (horizontal then vertical) with replicated
//! edges. Intermediate sums stay in f32 between the passes.
//!
//! - [`gaussian_blur_u8`]: noise suppression on the color buffer used for
//!   mask detection
//! - [`gaussian_blur_f32`]: feathering of the final alpha mask

use ndarray::{Array2, Array3, ArrayView2, ArrayView3, Zip};

use super::core::gaussian_kernel_1d;

/// Apply Gaussian blur to an image - u8 version.
///
/// Every channel is blurred independently. Parallelized with Rayon.
///
/// # Arguments
/// * `input` - Image (height, width, channels)
/// * `size` - Kernel size (odd). 0 or 1 returns a copy.
///
/// # Returns
/// Blurred image with same shape, rounded to the nearest level
pub fn gaussian_blur_u8(input: ArrayView3<u8>, size: usize) -> Array3<u8> {
    if size <= 1 {
        return input.to_owned();
    }

    let (height, width, channels) = input.dim();
    let kernel = gaussian_kernel_1d(size, 0.0);
    let half = kernel.len() / 2;

    // Horizontal pass
    let mut temp = Array3::<f32>::zeros((height, width, channels));
    Zip::indexed(&mut temp).par_for_each(|(y, x, c), out| {
        let mut sum = 0.0f32;
        for (ki, &kv) in kernel.iter().enumerate() {
            let sx = clamp_index(x, ki, half, width);
            sum += input[[y, sx, c]] as f32 * kv;
        }
        *out = sum;
    });

    // Vertical pass
    let mut output = Array3::<u8>::zeros((height, width, channels));
    Zip::indexed(&mut output).par_for_each(|(y, x, c), out| {
        let mut sum = 0.0f32;
        for (ki, &kv) in kernel.iter().enumerate() {
            let sy = clamp_index(y, ki, half, height);
            sum += temp[[sy, x, c]] * kv;
        }
        *out = sum.round().clamp(0.0, 255.0) as u8;
    });

    output
}

/// Apply Gaussian blur to a single f32 plane (values 0.0-1.0).
///
/// # Arguments
/// * `input` - 2D plane (height, width)
/// * `size` - Kernel size (odd). 0 or 1 returns a copy.
/// * `sigma` - Standard deviation, `<= 0` derives it from `size`
pub fn gaussian_blur_f32(input: ArrayView2<f32>, size: usize, sigma: f32) -> Array2<f32> {
    if size <= 1 {
        return input.to_owned();
    }

    let (height, width) = input.dim();
    let kernel = gaussian_kernel_1d(size, sigma);
    let half = kernel.len() / 2;

    let mut temp = Array2::<f32>::zeros((height, width));
    Zip::indexed(&mut temp).par_for_each(|(y, x), out| {
        let mut sum = 0.0f32;
        for (ki, &kv) in kernel.iter().enumerate() {
            sum += input[[y, clamp_index(x, ki, half, width)]] * kv;
        }
        *out = sum;
    });

    let mut output = Array2::<f32>::zeros((height, width));
    Zip::indexed(&mut output).par_for_each(|(y, x), out| {
        let mut sum = 0.0f32;
        for (ki, &kv) in kernel.iter().enumerate() {
            sum += temp[[clamp_index(y, ki, half, height), x]] * kv;
        }
        *out = sum.clamp(0.0, 1.0);
    });

    output
}

/// Source index for kernel tap `ki`, replicating the nearest edge.
#[inline]
fn clamp_index(pos: usize, ki: usize, half: usize, len: usize) -> usize {
    (pos as isize + ki as isize - half as isize).clamp(0, len as isize - 1) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blur_disabled_returns_copy() {
        let img = Array3::<u8>::from_shape_fn((4, 4, 3), |(y, x, c)| (y * 40 + x * 10 + c) as u8);
        assert_eq!(gaussian_blur_u8(img.view(), 0), img);
        assert_eq!(gaussian_blur_u8(img.view(), 1), img);
    }

    #[test]
    fn test_blur_keeps_solid_color() {
        let img = Array3::<u8>::from_elem((6, 6, 3), 200);
        let result = gaussian_blur_u8(img.view(), 5);
        assert!(result.iter().all(|&v| v == 200));
    }

    #[test]
    fn test_blur_softens_edge() {
        let mut img = Array3::<u8>::from_elem((5, 5, 3), 255);
        for y in 0..5 {
            for c in 0..3 {
                img[[y, 2, c]] = 0;
            }
        }

        let result = gaussian_blur_u8(img.view(), 3);

        // Dark column spreads into its neighbors, far pixels unaffected
        assert!(result[[2, 2, 0]] > 0);
        assert!(result[[2, 1, 0]] < 255);
        assert!(result[[2, 3, 1]] < 255);
        assert_eq!(result[[2, 0, 2]], 255);
    }

    #[test]
    fn test_blur_f32_partial_values_at_step() {
        let mut plane = Array2::<f32>::zeros((5, 6));
        for y in 0..5 {
            for x in 3..6 {
                plane[[y, x]] = 1.0;
            }
        }

        let result = gaussian_blur_f32(plane.view(), 3, 0.5);

        assert_eq!(result[[2, 0]], 0.0);
        assert!(result[[2, 2]] > 0.0 && result[[2, 2]] < 0.5);
        assert!(result[[2, 3]] > 0.5 && result[[2, 3]] < 1.0);
        assert!((result[[2, 5]] - 1.0).abs() < 1e-5);
    }
}
