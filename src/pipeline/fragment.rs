//! Column fragments of an image.

use ndarray::{Array3, ArrayView3};

/// An owned vertical strip of an image plus its horizontal offset.
///
/// Fragments are moved, never shared: the slicer hands each one to the
/// task queue, a worker takes it out, and the processed replacement is
/// moved into the result set.
#[derive(Debug, PartialEq, Eq)]
pub struct Fragment {
    pixels: Array3<u8>,
    left: usize,
}

impl Fragment {
    /// Wrap `pixels` (height, width, channels) starting at column `left`.
    pub fn new(pixels: Array3<u8>, left: usize) -> Self {
        Self { pixels, left }
    }

    /// First column covered, in source image coordinates.
    pub fn left(&self) -> usize {
        self.left
    }

    /// One past the last column covered.
    pub fn right(&self) -> usize {
        self.left + self.width()
    }

    pub fn width(&self) -> usize {
        self.pixels.dim().1
    }

    pub fn height(&self) -> usize {
        self.pixels.dim().0
    }

    pub fn channels(&self) -> usize {
        self.pixels.dim().2
    }

    pub fn view(&self) -> ArrayView3<'_, u8> {
        self.pixels.view()
    }

    pub fn into_pixels(self) -> Array3<u8> {
        self.pixels
    }
}
