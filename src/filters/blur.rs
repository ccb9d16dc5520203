//! Box blur for RGB images.
//!
//! Each output pixel is the truncated integer mean of the `(2k + 1)²`
//! neighborhood around it, where the neighborhood is clipped at the image
//! border (pixels outside the image are not counted, not replicated).
//!
//! Because a column's result depends on up to `k` columns on either side,
//! the blur is the pipeline's neighbor-aware filter: each fragment is
//! blurred inside a window widened by `k` columns and then cropped.

use ndarray::{Array2, Array3, ArrayView3};

use super::NeighborAwareFilter;
use crate::error::FilterError;

/// Apply box blur to an RGB image.
///
/// Keeps a running vertical sum per column for the current output row and
/// takes horizontal window sums from its prefix sums, so the cost does not
/// grow with `reach`. Sums are exact `u64`, so the result is identical to
/// averaging the full 2D neighborhood.
///
/// # Arguments
/// * `input` - Image (height, width, channels) as u8
/// * `reach` - Neighborhood half-size `k`; 0 returns a copy
///
/// # Returns
/// Blurred image with same dimensions
pub fn box_blur_u8(input: ArrayView3<u8>, reach: usize) -> Array3<u8> {
    let (height, width, channels) = input.dim();

    if reach == 0 || height == 0 || width == 0 {
        return input.to_owned();
    }

    // Clipped [x - k, x + k] extent of every column's window
    let spans: Vec<(usize, usize)> = (0..width)
        .map(|x| (x.saturating_sub(reach), (x + reach + 1).min(width)))
        .collect();

    let mut result = Array3::<u8>::zeros((height, width, channels));
    // Sum of rows [y_min, y_max) per (x, c)
    let mut column_sums = Array2::<u64>::zeros((width, channels));
    // prefix[x] = sum of column_sums over columns [0, x)
    let mut prefix = Array2::<u64>::zeros((width + 1, channels));
    let (mut y_min, mut y_max) = (0, 0);

    for y in 0..height {
        let want_max = (y + reach + 1).min(height);
        while y_max < want_max {
            for x in 0..width {
                for c in 0..channels {
                    column_sums[[x, c]] += input[[y_max, x, c]] as u64;
                }
            }
            y_max += 1;
        }

        let want_min = y.saturating_sub(reach);
        while y_min < want_min {
            for x in 0..width {
                for c in 0..channels {
                    column_sums[[x, c]] -= input[[y_min, x, c]] as u64;
                }
            }
            y_min += 1;
        }

        for x in 0..width {
            for c in 0..channels {
                prefix[[x + 1, c]] = prefix[[x, c]] + column_sums[[x, c]];
            }
        }

        let rows = (y_max - y_min) as u64;
        for (x, &(x_min, x_end)) in spans.iter().enumerate() {
            let area = rows * (x_end - x_min) as u64;
            for c in 0..channels {
                let sum = prefix[[x_end, c]] - prefix[[x_min, c]];
                result[[y, x, c]] = (sum / area) as u8;
            }
        }
    }

    result
}

/// Box blur as a neighbor-aware pipeline filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxBlur {
    strength: usize,
}

impl BoxBlur {
    /// Blur with window size `strength`; reads `strength / 2` columns of context.
    pub fn new(strength: usize) -> Self {
        Self { strength }
    }

}

impl NeighborAwareFilter for BoxBlur {
    fn reach(&self) -> usize {
        self.strength / 2
    }

    fn apply_window(&self, window: ArrayView3<u8>) -> Result<Array3<u8>, FilterError> {
        Ok(box_blur_u8(window, self.reach()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_blur_zero_reach_is_copy() {
        let img = Array3::from_shape_fn((2, 3, 3), |(y, x, c)| (y * 50 + x * 10 + c) as u8);
        assert_eq!(box_blur_u8(img.view(), 0), img);
    }

    #[test]
    fn test_box_blur_uniform_image_unchanged() {
        let img = Array3::from_elem((5, 7, 3), 77u8);
        assert_eq!(box_blur_u8(img.view(), 2), img);
    }

    #[test]
    fn test_box_blur_center_mean() {
        // 3x3 image, only the center is bright
        let mut img = Array3::<u8>::zeros((3, 3, 3));
        img[[1, 1, 0]] = 90;

        let result = box_blur_u8(img.view(), 1);

        // Center sees all 9 pixels
        assert_eq!(result[[1, 1, 0]], 10);
        // Corner sees a clipped 2x2 neighborhood: 90 / 4 truncates to 22
        assert_eq!(result[[0, 0, 0]], 22);
        // Edge sees a clipped 2x3 neighborhood: 90 / 6
        assert_eq!(result[[0, 1, 0]], 15);
        assert_eq!(result[[1, 1, 1]], 0);
    }

    #[test]
    fn test_box_blur_truncates() {
        let mut img = Array3::<u8>::zeros((1, 3, 1));
        img[[0, 0, 0]] = 1;
        img[[0, 1, 0]] = 1;
        img[[0, 2, 0]] = 0;

        let result = box_blur_u8(img.view(), 1);

        // (1 + 1 + 0) / 3 = 0.66 -> 0
        assert_eq!(result[[0, 1, 0]], 0);
        // (1 + 1) / 2 = 1
        assert_eq!(result[[0, 0, 0]], 1);
    }

    #[test]
    fn test_box_blur_matches_naive_mean() {
        let img = Array3::from_shape_fn((7, 9, 3), |(y, x, c)| ((y * 37 + x * 91 + c * 13) % 256) as u8);
        let k = 2;

        let result = box_blur_u8(img.view(), k);

        for y in 0..7usize {
            for x in 0..9usize {
                for c in 0..3 {
                    let (mut sum, mut n) = (0u32, 0u32);
                    for sy in y.saturating_sub(k)..(y + k + 1).min(7) {
                        for sx in x.saturating_sub(k)..(x + k + 1).min(9) {
                            sum += img[[sy, sx, c]] as u32;
                            n += 1;
                        }
                    }
                    assert_eq!(result[[y, x, c]], (sum / n) as u8, "pixel ({y}, {x}, {c})");
                }
            }
        }
    }

    #[test]
    fn test_box_blur_window_sum_beyond_u32() {
        // 4200 x 4200 pixels at 255 sum to ~4.5e9, past u32::MAX
        let img = Array3::from_elem((4200, 4200, 1), 255u8);

        let result = box_blur_u8(img.view(), 5000);

        assert!(result.iter().all(|&v| v == 255));
    }

    #[test]
    fn test_box_blur_reach_from_strength() {
        assert_eq!(BoxBlur::new(5).reach(), 2);
        assert_eq!(BoxBlur::new(4).reach(), 2);
        assert_eq!(BoxBlur::new(1).reach(), 0);
    }
}
