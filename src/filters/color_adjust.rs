//! Color adjustment filters: Invert, Contrast.
//!
//! Pixel-wise operations that don't require spatial context, so they run
//! on each fragment independently.
//!
//! ## Supported Formats
//!
//! RGB u8 images of shape (height, width, 3). Every channel is processed.

use ndarray::{Array3, ArrayView3};

// ============================================================================
// Invert
// ============================================================================

/// Invert image colors.
///
/// # Arguments
/// * `input` - RGB image (height, width, 3)
///
/// # Returns
/// Image with every channel value `v` replaced by `255 - v`
pub fn invert_u8(input: ArrayView3<u8>) -> Array3<u8> {
    input.mapv(|v| 255 - v)
}

// ============================================================================
// Contrast
// ============================================================================

/// Fold channel values around mid-gray.
///
/// Each value becomes its distance from 128, so both very dark and very
/// bright regions end up bright and mid-tones go dark.
///
/// # Arguments
/// * `input` - RGB image (height, width, 3)
///
/// # Returns
/// Image with every channel value `v` replaced by `|128 - v|`
pub fn contrast_u8(input: ArrayView3<u8>) -> Array3<u8> {
    let (height, width, channels) = input.dim();
    let mut output = Array3::<u8>::zeros((height, width, channels));

    for y in 0..height {
        for x in 0..width {
            for c in 0..channels {
                let v = input[[y, x, c]] as i16;
                output[[y, x, c]] = (128 - v).unsigned_abs() as u8;
            }
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invert_u8() {
        let mut img = Array3::<u8>::zeros((1, 2, 3));
        img[[0, 0, 0]] = 0;
        img[[0, 0, 1]] = 100;
        img[[0, 0, 2]] = 255;
        img[[0, 1, 0]] = 1;

        let result = invert_u8(img.view());

        assert_eq!(result[[0, 0, 0]], 255);
        assert_eq!(result[[0, 0, 1]], 155);
        assert_eq!(result[[0, 0, 2]], 0);
        assert_eq!(result[[0, 1, 0]], 254);
        assert_eq!(result.dim(), (1, 2, 3));
    }

    #[test]
    fn test_invert_twice_is_identity() {
        let img = Array3::from_shape_fn((3, 4, 3), |(y, x, c)| (y * 40 + x * 7 + c) as u8);
        assert_eq!(invert_u8(invert_u8(img.view()).view()), img);
    }

    #[test]
    fn test_contrast_u8() {
        let mut img = Array3::<u8>::zeros((1, 1, 3));
        img[[0, 0, 0]] = 0;
        img[[0, 0, 1]] = 128;
        img[[0, 0, 2]] = 255;

        let result = contrast_u8(img.view());

        assert_eq!(result[[0, 0, 0]], 128);
        assert_eq!(result[[0, 0, 1]], 0);
        assert_eq!(result[[0, 0, 2]], 127);
    }
}
