//! Filter modules for the strip pipeline.
//!
//! ## Supported Formats
//!
//! | Format | Shape | Type | Description |
//! |--------|-------|------|-------------|
//! | RGB8 | (H, W, 3) | u8 | Red, green, blue, 0-255 |
//!
//! ## Filter Capabilities
//!
//! The pipeline distinguishes two kinds of filter:
//! - **Stateless** ([`StatelessFilter`]) - output column depends only on the
//!   same input column, so each fragment is filtered on its own
//! - **Neighbor-aware** ([`NeighborAwareFilter`]) - output column depends on
//!   up to `reach()` columns on either side, so the worker filters a widened
//!   window read from the shared source image and crops it back
//!
//! ## Filter Catalogue
//!
//! - **blur**: box blur (neighbor-aware)
//! - **invert**, **contrast**: pixel-wise color adjustments
//! - **red**, **green**, **blue**: saturate one channel

pub mod blur;
pub mod channel;
pub mod color_adjust;

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use ndarray::{s, Array3, ArrayView3};

use crate::config::PipelineConfig;
use crate::error::{FilterError, UnknownFilter};

use self::blur::BoxBlur;
use self::channel::{saturate_channel_u8, Channel};
use self::color_adjust::{contrast_u8, invert_u8};

/// A filter that maps a fragment to a fragment of equal dimensions using
/// only the fragment's own pixels.
///
/// Implemented for any `Fn(ArrayView3<u8>) -> Result<Array3<u8>, FilterError>`.
pub trait StatelessFilter: Send + Sync {
    fn apply(&self, fragment: ArrayView3<u8>) -> Result<Array3<u8>, FilterError>;
}

impl<F> StatelessFilter for F
where
    F: Fn(ArrayView3<u8>) -> Result<Array3<u8>, FilterError> + Send + Sync,
{
    fn apply(&self, fragment: ArrayView3<u8>) -> Result<Array3<u8>, FilterError> {
        self(fragment)
    }
}

/// A filter whose output for a column depends on neighboring columns.
pub trait NeighborAwareFilter: Send + Sync {
    /// Columns of context needed on each side of a fragment.
    fn reach(&self) -> usize;

    /// Filter a whole window. The window's own borders are treated as
    /// image borders.
    fn apply_window(&self, window: ArrayView3<u8>) -> Result<Array3<u8>, FilterError>;

    /// Filter columns `[left, left + width)` of `source`, reading up to
    /// `reach()` columns beyond them from `source`.
    fn apply_in_context(
        &self,
        source: ArrayView3<u8>,
        left: usize,
        width: usize,
    ) -> Result<Array3<u8>, FilterError> {
        let window = context_window(left, width, self.reach(), source.dim().1);
        let extended = source.slice(s![.., window.clone(), ..]);
        let filtered = self.apply_window(extended)?;

        let expected = extended.dim();
        if filtered.dim() != expected {
            return Err(FilterError::ShapeMismatch {
                expected,
                got: filtered.dim(),
            });
        }

        let crop_left = left - window.start;
        Ok(filtered
            .slice(s![.., crop_left..crop_left + width, ..])
            .to_owned())
    }
}

/// Column range a neighbor-aware filter reads for the fragment
/// `[left, left + width)`: widened by `reach` on both sides and clamped to
/// `[0, image_width)`.
pub fn context_window(left: usize, width: usize, reach: usize, image_width: usize) -> Range<usize> {
    let start = left.saturating_sub(reach);
    let end = (left + width + reach).min(image_width);
    start..end
}

/// A filter in one of its two capability variants.
pub enum Filter {
    Stateless(Box<dyn StatelessFilter>),
    NeighborAware(Box<dyn NeighborAwareFilter>),
}

impl Filter {
    pub fn stateless(filter: impl StatelessFilter + 'static) -> Self {
        Filter::Stateless(Box::new(filter))
    }

    /// Stateless filter from a closure.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(ArrayView3<u8>) -> Result<Array3<u8>, FilterError> + Send + Sync + 'static,
    {
        Filter::Stateless(Box::new(f))
    }

    pub fn neighbor_aware(filter: impl NeighborAwareFilter + 'static) -> Self {
        Filter::NeighborAware(Box::new(filter))
    }

    /// Apply the filter to a whole image without slicing.
    ///
    /// Reference path for comparing against the pipeline.
    pub fn apply_direct(&self, image: ArrayView3<u8>) -> Result<Array3<u8>, FilterError> {
        match self {
            Filter::Stateless(f) => f.apply(image),
            Filter::NeighborAware(f) => f.apply_window(image),
        }
    }
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Stateless(_) => f.write_str("Filter::Stateless"),
            Filter::NeighborAware(n) => write!(f, "Filter::NeighborAware(reach={})", n.reach()),
        }
    }
}

/// The named filters available to the batch runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKind {
    Blur,
    Invert,
    Contrast,
    Red,
    Green,
    Blue,
}

impl FilterKind {
    pub const ALL: [FilterKind; 6] = [
        FilterKind::Blur,
        FilterKind::Invert,
        FilterKind::Contrast,
        FilterKind::Red,
        FilterKind::Green,
        FilterKind::Blue,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FilterKind::Blur => "blur",
            FilterKind::Invert => "invert",
            FilterKind::Contrast => "contrast",
            FilterKind::Red => "red",
            FilterKind::Green => "green",
            FilterKind::Blue => "blue",
        }
    }

    /// Build the filter, taking the blur strength from `config`.
    pub fn build(&self, config: &PipelineConfig) -> Filter {
        match self {
            FilterKind::Blur => Filter::neighbor_aware(BoxBlur::new(config.blur_strength())),
            FilterKind::Invert => Filter::stateless(invert),
            FilterKind::Contrast => Filter::stateless(contrast),
            FilterKind::Red => Filter::stateless(all_red),
            FilterKind::Green => Filter::stateless(all_green),
            FilterKind::Blue => Filter::stateless(all_blue),
        }
    }
}

fn invert(fragment: ArrayView3<u8>) -> Result<Array3<u8>, FilterError> {
    Ok(invert_u8(fragment))
}

fn contrast(fragment: ArrayView3<u8>) -> Result<Array3<u8>, FilterError> {
    Ok(contrast_u8(fragment))
}

fn all_red(fragment: ArrayView3<u8>) -> Result<Array3<u8>, FilterError> {
    Ok(saturate_channel_u8(fragment, Channel::Red))
}

fn all_green(fragment: ArrayView3<u8>) -> Result<Array3<u8>, FilterError> {
    Ok(saturate_channel_u8(fragment, Channel::Green))
}

fn all_blue(fragment: ArrayView3<u8>) -> Result<Array3<u8>, FilterError> {
    Ok(saturate_channel_u8(fragment, Channel::Blue))
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FilterKind {
    type Err = UnknownFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FilterKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownFilter(s.to_string()))
    }
}
