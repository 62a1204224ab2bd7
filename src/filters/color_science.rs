//! HSV color space helpers.
//!
//! Only saturation and value are needed for background detection. They are
//! computed on the 8-bit scale used by image codecs:
//! - V = max(r, g, b)
//! - S = 255 * (max - min) / max, rounded (0 when max is 0)

/// Convert an RGB pixel to 8-bit (saturation, value).
#[inline]
pub fn saturation_value_u8(r: u8, g: u8, b: u8) -> (u8, u8) {
    let max = r.max(g).max(b) as u32;
    let min = r.min(g).min(b) as u32;

    if max == 0 {
        return (0, 0);
    }

    let s = ((max - min) * 255 + max / 2) / max;
    (s as u8, max as u8)
}
