//! Partitioning of an image into column fragments.

use ndarray::{s, ArrayView3};
use tracing::debug;

use super::fragment::Fragment;
use super::queue::TaskQueue;
use crate::error::ConfigError;

/// Column interval `[left, left + width)` of one fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub left: usize,
    pub width: usize,
}

/// Partition `[0, image_width)` into spans of `slice_width` columns.
///
/// Produces `ceil(image_width / slice_width)` spans at offsets `0, S, 2S, …`;
/// only the last can be narrower than `slice_width`.
///
/// # Errors
/// [`ConfigError::SliceWidth`] if `slice_width` is zero.
pub fn slice_bounds(image_width: usize, slice_width: usize) -> Result<Vec<Span>, ConfigError> {
    if slice_width == 0 {
        return Err(ConfigError::SliceWidth);
    }
    Ok(spans(image_width, slice_width).collect())
}

fn spans(image_width: usize, slice_width: usize) -> impl Iterator<Item = Span> {
    (0..image_width).step_by(slice_width).map(move |left| Span {
        left,
        width: slice_width.min(image_width - left),
    })
}

/// Copy each span of `image` into its own fragment and enqueue it.
///
/// Never closes the queue; the coordinator does that after joining the
/// slicer thread. Returns the number of fragments produced.
pub(crate) fn slice_into(image: ArrayView3<u8>, slice_width: usize, queue: &TaskQueue) -> usize {
    let image_width = image.dim().1;
    let mut produced = 0;

    for span in spans(image_width, slice_width) {
        let pixels = image
            .slice(s![.., span.left..span.left + span.width, ..])
            .to_owned();
        queue.push(Fragment::new(pixels, span.left));
        produced += 1;
    }

    debug!(fragments = produced, image_width, slice_width, "Slicer finished");
    produced
}
