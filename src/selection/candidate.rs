//! Background candidate mask.
//!
//! Marks every pixel that *could* belong to the backdrop (255) before any
//! topological reasoning. A pixel is a candidate if either:
//! - its luminance passes the threshold for the selected background, or
//! - it is nearly neutral (low HSV saturation) and its HSV value passes
//!   the same threshold.
//!
//! The second test catches slightly tinted off-white/off-black pixels that
//! compression leaves around a sprite and that the luminance test misses.

use ndarray::{Array2, ArrayView3, Zip};

use crate::filters::color_science::saturation_value_u8;
use crate::filters::grayscale::{GrayscaleWeights, luma_milli};
use crate::params::BackgroundColor;

/// Saturation at or below which a pixel counts as neutral (8-bit scale).
pub const LOW_SATURATION_CUTOFF: u8 = 30;

/// Mask value for background candidates.
pub const CANDIDATE: u8 = 255;

/// Classify a single RGB pixel.
#[inline]
pub fn is_candidate(rgb: [u8; 3], background: BackgroundColor, threshold: u8) -> bool {
    let [r, g, b] = rgb;
    let luma = luma_milli(r, g, b, GrayscaleWeights::BT601);
    let t = threshold as u32 * 1000;
    let luma_match = match background {
        BackgroundColor::White => luma >= t,
        BackgroundColor::Black => luma <= 255_000 - t,
    };
    if luma_match {
        return true;
    }

    let (saturation, value) = saturation_value_u8(r, g, b);
    saturation <= LOW_SATURATION_CUTOFF && background.accepts_level(value, threshold)
}

/// Build the binary candidate mask (255 = candidate, 0 = not).
///
/// # Arguments
/// * `input` - RGB image (height, width, 3), usually padded and blurred
/// * `background` - Backdrop color to detect
/// * `threshold` - Luminance threshold, inverted for black backgrounds
pub fn candidate_mask(
    input: ArrayView3<u8>,
    background: BackgroundColor,
    threshold: u8,
) -> Array2<u8> {
    let (height, width, _) = input.dim();
    let mut mask = Array2::<u8>::zeros((height, width));

    Zip::indexed(&mut mask).par_for_each(|(y, x), out| {
        let rgb = [input[[y, x, 0]], input[[y, x, 1]], input[[y, x, 2]]];
        if is_candidate(rgb, background, threshold) {
            *out = CANDIDATE;
        }
    });

    mask
}
