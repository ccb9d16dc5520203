//! Error types for the strip pipeline and the batch runner.

use std::path::PathBuf;

use thiserror::Error;

/// Rejected pipeline configuration values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Worker count outside `1..=max`
    #[error("Worker count must be between 1 and {max}, got {got}")]
    WorkerCount { got: usize, max: usize },

    /// Slice width of zero
    #[error("Slice width must be a positive number of pixels")]
    SliceWidth,

    /// Blur strength of zero
    #[error("Blur strength must be positive")]
    BlurStrength,
}

/// Failure while filtering a single fragment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// Filter changed the fragment's dimensions
    #[error("Shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        expected: (usize, usize, usize),
        got: (usize, usize, usize),
    },

    /// Filter panicked while processing
    #[error("Filter panicked: {0}")]
    Panicked(String),

    /// Filter-specific failure
    #[error("Filter failed: {0}")]
    Failed(String),
}

/// Image decode/encode failures.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Decoding the file failed
    #[error("Failed to decode '{path}': {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Encoding or writing the file failed
    #[error("Failed to encode '{path}': {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Pixel buffer could not be reshaped
    #[error("Invalid pixel buffer: {0}")]
    Buffer(String),
}

/// Reassembly failures. Fatal for the image being collected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectError {
    /// No fragments to collect
    #[error("No fragments to collect")]
    Empty,

    /// Fragment does not start where the previous one ended
    #[error("Fragment at offset {found} does not continue from column {expected}")]
    Discontinuity { expected: usize, found: usize },

    /// Fragment heights disagree
    #[error("Fragment at offset {left} has height {got}, expected {expected}")]
    HeightMismatch {
        left: usize,
        expected: usize,
        got: usize,
    },

    /// Fragment channel counts disagree
    #[error("Fragment at offset {left} has {got} channels, expected {expected}")]
    ChannelMismatch {
        left: usize,
        expected: usize,
        got: usize,
    },

    /// Stitched width differs from the source width
    #[error("Reassembled width {got} does not match source width {expected}")]
    WidthMismatch { expected: usize, got: usize },
}

/// Failures of one pipeline pass over a single image.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// One or more fragments failed to filter; the image is not written
    #[error("Fragment at offset {left} failed: {source}")]
    Fragment {
        left: usize,
        #[source]
        source: FilterError,
    },

    /// Reassembly failed
    #[error("Reassembly failed: {0}")]
    Collect(#[from] CollectError),

    /// A pipeline thread terminated abnormally
    #[error("{0} thread panicked")]
    ThreadPanicked(&'static str),

    /// Source image is not an (H, W, 3) buffer
    #[error("Expected 3 channels, got {0}")]
    Channels(usize),
}

/// Batch-level failures that stop the whole run.
#[derive(Debug, Error)]
pub enum BatchError {
    /// Source path is missing or not a directory
    #[error("Source '{0}' does not exist or is not a directory")]
    SourceNotDirectory(PathBuf),

    /// IO error while listing the source directory
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for a pipeline pass
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Unrecognised filter name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown filter '{0}', expected one of: blur, invert, contrast, red, green, blue")]
pub struct UnknownFilter(pub String);
