//! Reassembly of processed fragments into one image.

use ndarray::{s, Array3};

use super::fragment::Fragment;
use crate::error::CollectError;

/// Stitch fragments back together by horizontal offset.
///
/// Fragments may arrive in any order. After sorting by offset, each one
/// must start exactly where the previous one ended (starting at column 0)
/// and all must share height and channel count. A single fragment is
/// returned as-is without copying.
///
/// # Errors
/// Any gap, overlap or dimension mismatch; the image must not be written.
pub fn collect(mut fragments: Vec<Fragment>) -> Result<Array3<u8>, CollectError> {
    fragments.sort_unstable_by_key(Fragment::left);

    let (height, channels) = match fragments.first() {
        Some(first) => (first.height(), first.channels()),
        None => return Err(CollectError::Empty),
    };

    let mut width = 0;
    for fragment in &fragments {
        if fragment.left() != width {
            return Err(CollectError::Discontinuity {
                expected: width,
                found: fragment.left(),
            });
        }
        if fragment.height() != height {
            return Err(CollectError::HeightMismatch {
                left: fragment.left(),
                expected: height,
                got: fragment.height(),
            });
        }
        if fragment.channels() != channels {
            return Err(CollectError::ChannelMismatch {
                left: fragment.left(),
                expected: channels,
                got: fragment.channels(),
            });
        }
        width = fragment.right();
    }

    if fragments.len() == 1 {
        if let Some(only) = fragments.pop() {
            return Ok(only.into_pixels());
        }
    }

    let mut canvas = Array3::<u8>::zeros((height, width, channels));
    for fragment in &fragments {
        canvas
            .slice_mut(s![.., fragment.left()..fragment.right(), ..])
            .assign(&fragment.view());
    }

    Ok(canvas)
}

/// Like [`collect`], additionally requiring the result to be
/// `expected_width` columns wide.
pub fn collect_exact(
    fragments: Vec<Fragment>,
    expected_width: usize,
) -> Result<Array3<u8>, CollectError> {
    let image = collect(fragments)?;
    let got = image.dim().1;
    if got != expected_width {
        return Err(CollectError::WidthMismatch {
            expected: expected_width,
            got,
        });
    }
    Ok(image)
}
