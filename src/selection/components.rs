//! Connected-component labelling and background disambiguation.
//!
//! A resolved background mask may still contain several disconnected
//! regions: the real backdrop surrounding the sprite, plus same-colored
//! pockets inside it (eye highlights, glow cores). Only the region that
//! contains the padded corner pixel is the backdrop; everything else is
//! handed back to the foreground.

use std::collections::VecDeque;

use ndarray::{Array2, ArrayView2};
use tracing::{debug, warn};

use crate::error::InvariantError;

/// 8-connected neighborhood offsets (dy, dx).
const NEIGHBORS_8: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Foreground value of the mask returned by [`isolate_foreground`].
pub const FOREGROUND: u8 = 255;

/// Per-pixel component ids for a binary mask.
///
/// Label 0 marks pixels outside the mask; components are numbered 1..=count
/// in raster order of their first pixel.
#[derive(Debug, Clone)]
pub struct LabelMap {
    labels: Array2<u32>,
    count: u32,
}

impl LabelMap {
    /// Number of connected components (label 0 not included).
    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn label_at(&self, y: usize, x: usize) -> u32 {
        self.labels[[y, x]]
    }

    pub fn dim(&self) -> (usize, usize) {
        self.labels.dim()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Pixel count of every component, indexed by label (index 0 unused).
    pub fn sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0usize; self.count as usize + 1];
        for &label in self.labels.iter() {
            sizes[label as usize] += 1;
        }
        sizes[0] = 0;
        sizes
    }

    pub fn labels(&self) -> ArrayView2<'_, u32> {
        self.labels.view()
    }
}

/// Label the 8-connected components of all nonzero mask pixels.
///
/// Breadth-first flood fill from every unlabelled set pixel.
pub fn label_components(mask: ArrayView2<u8>) -> LabelMap {
    let (height, width) = mask.dim();
    let mut labels = Array2::<u32>::zeros((height, width));
    let mut count = 0u32;
    let mut queue = VecDeque::new();

    for y in 0..height {
        for x in 0..width {
            if mask[[y, x]] == 0 || labels[[y, x]] != 0 {
                continue;
            }

            count += 1;
            labels[[y, x]] = count;
            queue.push_back((y, x));

            while let Some((cy, cx)) = queue.pop_front() {
                for &(dy, dx) in &NEIGHBORS_8 {
                    let ny = cy as isize + dy;
                    let nx = cx as isize + dx;
                    if ny < 0 || ny >= height as isize || nx < 0 || nx >= width as isize {
                        continue;
                    }

                    let (ny, nx) = (ny as usize, nx as usize);
                    if mask[[ny, nx]] != 0 && labels[[ny, nx]] == 0 {
                        labels[[ny, nx]] = count;
                        queue.push_back((ny, nx));
                    }
                }
            }
        }
    }

    LabelMap { labels, count }
}

/// Turn a resolved background mask into a foreground mask.
///
/// The component containing pixel (0,0) is the true background (0 in the
/// result). Every other pixel, including disconnected background-colored
/// pockets, becomes foreground (255).
///
/// When (0,0) is not part of the mask there is no border-connected
/// background and the whole buffer is foreground.
pub fn isolate_foreground(background: ArrayView2<u8>) -> Result<Array2<u8>, InvariantError> {
    let map = label_components(background);
    if map.is_empty() {
        return Err(InvariantError::EmptyLabelMap);
    }

    let background_label = map.label_at(0, 0);
    if background_label == 0 {
        warn!("corner pixel is not background; keeping the whole image opaque");
        return Ok(Array2::from_elem(map.dim(), FOREGROUND));
    }

    debug!(
        components = map.count(),
        background_pixels = map.sizes()[background_label as usize],
        "reclassifying {} interior pocket(s) as foreground",
        map.count() - 1
    );

    Ok(map
        .labels()
        .mapv(|label| if label == background_label { 0 } else { FOREGROUND }))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 7x7 background with a 5x5 foreground ring enclosing a 3x3 pocket.
    fn ring_with_pocket() -> Array2<u8> {
        let mut mask = Array2::<u8>::from_elem((7, 7), 255);
        for i in 1..=5 {
            mask[[1, i]] = 0;
            mask[[5, i]] = 0;
            mask[[i, 1]] = 0;
            mask[[i, 5]] = 0;
        }
        mask
    }

    #[test]
    fn test_single_component() {
        let mask = Array2::<u8>::from_elem((4, 4), 255);
        let map = label_components(mask.view());

        assert_eq!(map.count(), 1);
        assert!(map.labels().iter().all(|&l| l == 1));
    }

    #[test]
    fn test_two_regions() {
        // Left half set, right half clear
        let mask = Array2::from_shape_fn((4, 4), |(_, x)| if x < 2 { 255 } else { 0 });
        let map = label_components(mask.view());

        assert_eq!(map.count(), 1);
        assert_eq!(map.label_at(3, 1), 1);
        assert_eq!(map.label_at(0, 2), 0);
        assert_eq!(map.sizes(), vec![0, 8]);
    }

    #[test]
    fn test_diagonal_pixels_connect() {
        let mut mask = Array2::<u8>::zeros((3, 3));
        mask[[0, 0]] = 255;
        mask[[1, 1]] = 255;
        mask[[2, 2]] = 255;

        let map = label_components(mask.view());

        assert_eq!(map.count(), 1);
    }

    #[test]
    fn test_enclosed_pocket_is_separate_component() {
        let mask = ring_with_pocket();
        let map = label_components(mask.view());

        assert_eq!(map.count(), 2);
        assert_eq!(map.label_at(0, 0), 1);
        assert_eq!(map.label_at(3, 3), 2);
        assert_eq!(map.sizes()[2], 9);
    }

    #[test]
    fn test_isolate_foreground_keeps_pocket() {
        let mask = ring_with_pocket();
        let fg = isolate_foreground(mask.view()).unwrap();

        assert_eq!(fg[[0, 0]], 0);
        assert_eq!(fg[[6, 6]], 0);
        assert_eq!(fg[[1, 1]], FOREGROUND);
        assert_eq!(fg[[3, 3]], FOREGROUND);
    }

    #[test]
    fn test_corner_outside_mask_keeps_everything() {
        let mut mask = Array2::<u8>::from_elem((3, 3), 255);
        mask[[0, 0]] = 0;

        let fg = isolate_foreground(mask.view()).unwrap();

        assert!(fg.iter().all(|&v| v == FOREGROUND));
    }

    #[test]
    fn test_empty_mask_is_invariant_violation() {
        let mask = Array2::<u8>::zeros((0, 5));
        assert!(matches!(
            isolate_foreground(mask.view()),
            Err(InvariantError::EmptyLabelMap)
        ));
    }
}
