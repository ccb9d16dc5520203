//! Pipeline configuration.
//!
//! A [`PipelineConfig`] is validated once and then shared read-only by the
//! coordinator, the slicer and every worker for the whole batch.

use crate::error::ConfigError;

/// Upper bound on the worker pool size.
pub const MAX_WORKERS: usize = 15;

/// Default worker pool size.
pub const DEFAULT_WORKERS: usize = 2;

/// Default fragment width in pixels.
pub const DEFAULT_SLICE_WIDTH: usize = 128;

/// Default blur window size.
pub const DEFAULT_BLUR_STRENGTH: usize = 5;

/// Immutable tunables for one batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    workers: usize,
    slice_width: usize,
    blur_strength: usize,
}

impl PipelineConfig {
    /// Validate and build a configuration.
    ///
    /// # Arguments
    /// * `workers` - Worker thread count, `1..=MAX_WORKERS`
    /// * `slice_width` - Fragment width in pixels, must be positive
    /// * `blur_strength` - Blur window size, must be positive
    pub fn new(
        workers: usize,
        slice_width: usize,
        blur_strength: usize,
    ) -> Result<Self, ConfigError> {
        if workers == 0 || workers > MAX_WORKERS {
            return Err(ConfigError::WorkerCount {
                got: workers,
                max: MAX_WORKERS,
            });
        }
        if slice_width == 0 {
            return Err(ConfigError::SliceWidth);
        }
        if blur_strength == 0 {
            return Err(ConfigError::BlurStrength);
        }
        Ok(Self {
            workers,
            slice_width,
            blur_strength,
        })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn slice_width(&self) -> usize {
        self.slice_width
    }

    pub fn blur_strength(&self) -> usize {
        self.blur_strength
    }

    /// Columns a blur reads past each side of a fragment.
    pub fn blur_reach(&self) -> usize {
        self.blur_strength / 2
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            slice_width: DEFAULT_SLICE_WIDTH,
            blur_strength: DEFAULT_BLUR_STRENGTH,
        }
    }
}
