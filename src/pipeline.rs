//! Single-image background removal.
//!
//! Stages, strictly in order:
//! 1. Pad with a border of the background color
//! 2. Light Gaussian blur (detection only, never reaches the output colors)
//! 3. Background candidate mask (luminance OR low-saturation test)
//! 4. Erode → dilate → close to cut interior pockets off the backdrop
//! 5. Keep only the component touching the padded corner as background
//! 6. Crop the border, feather the foreground mask, merge it as alpha
//!    with the original colors

use ndarray::{Array2, Array3, ArrayView2, ArrayView3};
use tracing::debug;

use crate::error::{InputError, InvariantError, RemovalError};
use crate::filters::blur::{gaussian_blur_f32, gaussian_blur_u8};
use crate::filters::core::{crop_border, mask_to_unit, merge_alpha, pad_border, unit_to_mask};
use crate::filters::morphology::{close, dilate, erode};
use crate::params::{Kernel, Params};
use crate::selection::{candidate_mask, isolate_foreground};

/// Kernel size of the final anti-aliasing pass.
pub const FEATHER_SIZE: usize = 3;
/// Gaussian sigma of the final anti-aliasing pass.
pub const FEATHER_SIGMA: f32 = 0.5;

/// Remove the uniform background from an RGB image.
///
/// # Arguments
/// * `image` - RGB image (height, width, 3)
/// * `params` - Validated parameter set
///
/// # Returns
/// RGBA image of the same width and height. Color channels are the input's
/// untouched values; alpha is 0 on the backdrop, 255 on the sprite and
/// partial along the feathered edge.
pub fn remove_background(image: ArrayView3<u8>, params: &Params) -> Result<Array3<u8>, RemovalError> {
    params.validate()?;

    let (height, width, channels) = image.dim();
    if channels != 3 {
        return Err(InputError::Channels(channels).into());
    }
    if height == 0 || width == 0 {
        return Err(InputError::Empty { width, height }.into());
    }

    debug!(width, height, background = %params.background, "removing background");

    let padded = pad_border(image, params.border_size, params.background.fill());
    let smoothed = gaussian_blur_u8(padded.view(), params.blur_size);
    let candidates = candidate_mask(
        smoothed.view(),
        params.background,
        params.threshold_level(),
    );
    debug!(
        candidates = candidates.iter().filter(|&&v| v != 0).count(),
        "background candidates"
    );

    let resolved = resolve_regions(candidates.view(), params.erosion(), params.dilation());
    let foreground = isolate_foreground(resolved.view())?;

    let cropped = crop_border(foreground.view(), params.border_size)?;
    if cropped.dim() != (height, width) {
        let (actual_height, actual_width) = cropped.dim();
        return Err(InvariantError::CropMismatch {
            expected_width: width,
            expected_height: height,
            actual_width,
            actual_height,
        }
        .into());
    }

    let alpha = feather(cropped.view());
    Ok(merge_alpha(image, alpha.view())?)
}

/// Shrink a candidate mask to the true exterior background.
///
/// Erosion severs thin links between interior pockets and the backdrop,
/// dilation restores the backdrop's boundary, closing fills pinholes.
pub fn resolve_regions(candidates: ArrayView2<u8>, erosion: Kernel, dilation: Kernel) -> Array2<u8> {
    let eroded = erode(candidates, erosion);
    let dilated = dilate(eroded.view(), dilation);
    close(dilated.view(), Kernel::new(dilation.size, 1))
}

/// Soften a binary foreground mask into anti-aliased alpha.
fn feather(mask: ArrayView2<u8>) -> Array2<u8> {
    let unit = mask_to_unit(mask);
    let soft = gaussian_blur_f32(unit.view(), FEATHER_SIZE, FEATHER_SIGMA);
    unit_to_mask(soft.view())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use crate::params::BackgroundColor;

    fn solid(height: usize, width: usize, level: u8) -> Array3<u8> {
        Array3::from_elem((height, width, 3), level)
    }

    fn fill_rect(img: &mut Array3<u8>, y0: usize, y1: usize, x0: usize, x1: usize, level: u8) {
        for y in y0..y1 {
            for x in x0..x1 {
                for c in 0..3 {
                    img[[y, x, c]] = level;
                }
            }
        }
    }

    fn alpha(rgba: &Array3<u8>, y: usize, x: usize) -> u8 {
        rgba[[y, x, 3]]
    }

    /// White canvas, black square at (40,40)-(60,60).
    fn black_square_on_white() -> Array3<u8> {
        let mut img = solid(100, 100, 255);
        fill_rect(&mut img, 40, 60, 40, 60, 0);
        img
    }

    #[test]
    fn test_solid_white_is_fully_transparent() {
        let img = solid(100, 100, 255);
        let result = remove_background(img.view(), &Params::default()).unwrap();

        assert_eq!(result.dim(), (100, 100, 4));
        for y in 0..100 {
            for x in 0..100 {
                assert_eq!(alpha(&result, y, x), 0);
                for c in 0..3 {
                    assert_eq!(result[[y, x, c]], 255);
                }
            }
        }
    }

    #[test]
    fn test_black_square_on_white() {
        let img = black_square_on_white();
        let result = remove_background(img.view(), &Params::default()).unwrap();

        // Opaque inside, away from the feathered edge and rounded corners
        for y in 42..58 {
            for x in 42..58 {
                assert_eq!(alpha(&result, y, x), 255, "inside at ({y}, {x})");
            }
        }

        // Transparent outside, away from the feathered edge
        for y in 0..100 {
            for x in 0..100 {
                let near_square = (38..62).contains(&y) && (38..62).contains(&x);
                if !near_square {
                    assert_eq!(alpha(&result, y, x), 0, "outside at ({y}, {x})");
                }
            }
        }

        // Edge pixels carry partial alpha
        let inner_edge = alpha(&result, 50, 40);
        let outer_edge = alpha(&result, 50, 39);
        assert!(inner_edge > 0 && inner_edge < 255);
        assert!(outer_edge > 0 && outer_edge < 255);
        assert!(inner_edge > outer_edge);

        // Colors come from the original, unblurred input
        assert_eq!(result[[50, 39, 0]], 255);
        assert_eq!(result[[50, 40, 0]], 0);
    }

    #[test]
    fn test_enclosed_island_survives() {
        // White canvas, black ring (10px thick) around a white 40x40 island
        let mut img = solid(100, 100, 255);
        fill_rect(&mut img, 20, 80, 20, 80, 0);
        fill_rect(&mut img, 30, 70, 30, 70, 255);

        let result = remove_background(img.view(), &Params::default()).unwrap();

        assert_eq!(alpha(&result, 5, 5), 0);
        assert_eq!(alpha(&result, 95, 50), 0);
        assert_eq!(alpha(&result, 25, 50), 255);
        assert_eq!(alpha(&result, 50, 50), 255);
        assert_eq!(alpha(&result, 35, 35), 255);
    }

    #[test]
    fn test_corners_are_transparent() {
        let mut img = solid(40, 60, 255);
        fill_rect(&mut img, 5, 35, 5, 55, 30);

        for border_size in [5, 30] {
            let params = Params {
                border_size,
                ..Params::default()
            };
            let result = remove_background(img.view(), &params).unwrap();
            for (y, x) in [(0, 0), (0, 59), (39, 0), (39, 59)] {
                assert_eq!(alpha(&result, y, x), 0, "corner ({y}, {x})");
            }
        }
    }

    #[test]
    fn test_dimensions_preserved_for_any_configuration() {
        let img = black_square_on_white();
        let configs = [
            Params::default(),
            Params {
                border_size: 0,
                blur_size: 0,
                ..Params::default()
            },
            Params {
                border_size: 7,
                blur_size: 5,
                erode_kernel_size: 5,
                erode_iterations: 2,
                dilate_kernel_size: 9,
                dilate_iterations: 3,
                ..Params::default()
            },
        ];

        for params in configs {
            let result = remove_background(img.view(), &params).unwrap();
            assert_eq!(result.dim(), (100, 100, 4));
        }
    }

    #[test]
    fn test_black_mode_mirrors_white_mode() {
        let white_img = black_square_on_white();
        let black_img = white_img.mapv(|v| 255 - v);

        let white = remove_background(white_img.view(), &Params::default()).unwrap();
        let black = remove_background(
            black_img.view(),
            &Params {
                background: BackgroundColor::Black,
                ..Params::default()
            },
        )
        .unwrap();

        for y in 0..100 {
            for x in 0..100 {
                assert_eq!(alpha(&white, y, x), alpha(&black, y, x), "at ({y}, {x})");
            }
        }
    }

    #[test]
    fn test_invalid_params_fail_before_processing() {
        let img = solid(10, 10, 255);
        let params = Params {
            erode_kernel_size: 2,
            ..Params::default()
        };

        assert!(matches!(
            remove_background(img.view(), &params),
            Err(RemovalError::Config(ConfigError::KernelSize { value: 2, .. }))
        ));
    }

    #[test]
    fn test_rejects_non_rgb_and_empty_buffers() {
        let rgba = Array3::<u8>::zeros((4, 4, 4));
        assert!(matches!(
            remove_background(rgba.view(), &Params::default()),
            Err(RemovalError::Input(InputError::Channels(4)))
        ));

        let empty = Array3::<u8>::zeros((0, 4, 3));
        assert!(matches!(
            remove_background(empty.view(), &Params::default()),
            Err(RemovalError::Input(InputError::Empty { .. }))
        ));
    }

    #[test]
    fn test_resolve_regions_severs_thin_link() {
        // Backdrop plus a pocket joined to it by a 1px channel
        let mut mask = Array2::<u8>::from_elem((30, 30), 255);
        for y in 8..22 {
            for x in 8..22 {
                mask[[y, x]] = 0;
            }
        }
        for y in 11..19 {
            for x in 11..19 {
                mask[[y, x]] = 255;
            }
        }
        for x in 8..11 {
            mask[[15, x]] = 255;
        }

        let resolved = resolve_regions(mask.view(), Kernel::new(3, 1), Kernel::new(3, 1));
        let fg = isolate_foreground(resolved.view()).unwrap();

        assert_eq!(fg[[0, 0]], 0);
        assert_eq!(fg[[15, 15]], 255);
        assert_eq!(fg[[15, 9]], 255);
    }
}
