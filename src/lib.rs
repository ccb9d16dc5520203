//! stripfilter
//!
//! Batch image filtering with a column-strip worker pool, with optional
//! Python bindings via PyO3.
//!
//! ## Image Format
//! All pipeline stages work on RGB images held as `ndarray` arrays of shape
//! `(height, width, 3)` with `u8` channels (0-255).
//!
//! ## Architecture
//! - [`pipeline`] - slicer, task queue, worker pool, result set, collector
//! - [`filters`] - stateless and neighbor-aware filters
//! - [`batch`] - per-directory coordinator (decode, run, write)
//! - [`codec`] - decode/encode boundary
//! - [`config`] - validated, immutable tunables

pub mod batch;
pub mod codec;
pub mod config;
pub mod error;
pub mod filters;
pub mod logging;
pub mod pipeline;

pub use batch::{BatchReport, BatchRunner, ImageOutcome};
pub use config::PipelineConfig;
pub use error::{BatchError, CollectError, ConfigError, FilterError, PipelineError};
pub use filters::{Filter, FilterKind, NeighborAwareFilter, StatelessFilter};
pub use pipeline::{run_pipeline, slice_bounds, Fragment};

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use std::path::PathBuf;

    use numpy::{IntoPyArray, PyArray3, PyReadonlyArray3};
    use pyo3::exceptions::{PyRuntimeError, PyValueError};
    use pyo3::prelude::*;

    use crate::batch::BatchRunner;
    use crate::config::PipelineConfig;
    use crate::filters::FilterKind;
    use crate::pipeline;

    fn build(
        filter: &str,
        workers: usize,
        slice_width: usize,
        blur_strength: usize,
    ) -> PyResult<(FilterKind, PipelineConfig)> {
        let kind: FilterKind = filter
            .parse()
            .map_err(|e: crate::error::UnknownFilter| PyValueError::new_err(e.to_string()))?;
        let config = PipelineConfig::new(workers, slice_width, blur_strength)
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok((kind, config))
    }

    /// Filter one RGB u8 image (height, width, 3) through the strip pipeline.
    ///
    /// The GIL is released while the worker pool runs.
    #[pyfunction]
    #[pyo3(signature = (image, filter, workers=2, slice_width=128, blur_strength=5))]
    pub fn filter_image<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        filter: &str,
        workers: usize,
        slice_width: usize,
        blur_strength: usize,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let (kind, config) = build(filter, workers, slice_width, blur_strength)?;
        let input = image.as_array();
        let filter = kind.build(&config);

        let result = py.allow_threads(|| pipeline::run_pipeline(input, &filter, &config));

        match result {
            Ok(Some(output)) => Ok(output.into_pyarray(py)),
            // Zero-width input: nothing to filter
            Ok(None) => Ok(input.to_owned().into_pyarray(py)),
            Err(e) => Err(PyRuntimeError::new_err(e.to_string())),
        }
    }

    /// Fragment (offset, width) pairs for an image of the given width.
    #[pyfunction]
    pub fn slice_bounds(width: usize, slice_width: usize) -> PyResult<Vec<(usize, usize)>> {
        let spans = pipeline::slice_bounds(width, slice_width)
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok(spans.into_iter().map(|s| (s.left, s.width)).collect())
    }

    /// Filter every image in `source` into `dest`.
    ///
    /// Returns (written, skipped, failed) counts.
    #[pyfunction]
    #[pyo3(signature = (source, dest, filter, workers=2, slice_width=128, blur_strength=5))]
    pub fn process_directory(
        py: Python<'_>,
        source: PathBuf,
        dest: PathBuf,
        filter: &str,
        workers: usize,
        slice_width: usize,
        blur_strength: usize,
    ) -> PyResult<(usize, usize, usize)> {
        let (kind, config) = build(filter, workers, slice_width, blur_strength)?;
        let runner = BatchRunner::new(config, kind.build(&config));

        let report = py
            .allow_threads(|| runner.run(&source, &dest))
            .map_err(|e| PyRuntimeError::new_err(e.to_string()))?;

        Ok((report.written(), report.skipped(), report.failed()))
    }

    /// stripfilter extension module
    #[pymodule]
    pub fn stripfilter(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(filter_image, m)?)?;
        m.add_function(wrap_pyfunction!(slice_bounds, m)?)?;
        m.add_function(wrap_pyfunction!(process_directory, m)?)?;
        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::stripfilter;
