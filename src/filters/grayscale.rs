//! Grayscale (luminance) conversion.
//!
//! Weights are stored in per-mille so luminance can be evaluated with
//! integer arithmetic. Comparing `luma_milli` against `1000 * threshold`
//! is exact, which keeps white- and black-background thresholds true
//! complements of each other.

/// RGB channel weights in per-mille (they sum to 1000).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrayscaleWeights {
    pub r: u32,
    pub g: u32,
    pub b: u32,
}

impl GrayscaleWeights {
    /// ITU-R BT.601, the usual RGB-to-gray transform of image codecs.
    pub const BT601: Self = Self {
        r: 299,
        g: 587,
        b: 114,
    };
}

impl Default for GrayscaleWeights {
    fn default() -> Self {
        Self::BT601
    }
}

/// Luminance scaled by 1000, range 0..=255000.
#[inline]
pub fn luma_milli(r: u8, g: u8, b: u8, weights: GrayscaleWeights) -> u32 {
    weights.r * r as u32 + weights.g * g as u32 + weights.b * b as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_sum_to_one() {
        let w = GrayscaleWeights::BT601;
        assert_eq!(w.r + w.g + w.b, 1000);
    }

    #[test]
    fn test_luma_extremes() {
        let w = GrayscaleWeights::default();
        assert_eq!(luma_milli(0, 0, 0, w), 0);
        assert_eq!(luma_milli(255, 255, 255, w), 255_000);
    }

    #[test]
    fn test_luma_complement_is_exact() {
        let w = GrayscaleWeights::BT601;
        for (r, g, b) in [(10u8, 200u8, 33u8), (255, 0, 128), (240, 240, 240)] {
            assert_eq!(
                luma_milli(r, g, b, w) + luma_milli(255 - r, 255 - g, 255 - b, w),
                255_000
            );
        }
    }

    #[test]
    fn test_luma_red() {
        // 0.299 * 255 = 76.245
        assert_eq!(luma_milli(255, 0, 0, GrayscaleWeights::BT601), 76_245);
    }
}
