//! Single-channel saturation filters (all red, all green, all blue).

use ndarray::{Array3, ArrayView3, Axis};

/// RGB channel index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Red = 0,
    Green = 1,
    Blue = 2,
}

/// Force one channel to full intensity, leaving the others untouched.
///
/// # Arguments
/// * `input` - RGB image (height, width, 3)
/// * `channel` - Channel to saturate
pub fn saturate_channel_u8(input: ArrayView3<u8>, channel: Channel) -> Array3<u8> {
    let mut output = input.to_owned();
    output
        .index_axis_mut(Axis(2), channel as usize)
        .fill(255);
    output
}
