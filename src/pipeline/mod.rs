//! Column-strip parallel filtering of a single image.
//!
//! ## Flow
//!
//! ```text
//! slicer ──push──▶ TaskQueue ──pop──▶ worker × N ──push──▶ ResultSet
//!                                                              │
//!                           coordinator joins, then collect ◀──┘
//! ```
//!
//! One slicer thread and `workers` worker threads run concurrently inside a
//! [`std::thread::scope`], so the source image is borrowed for the pass and
//! never mutated. The queue is closed only after the slicer has joined,
//! which means no fragment can be enqueued after a worker decides to stop.

pub mod collector;
pub mod fragment;
pub mod queue;
pub mod results;
pub mod slicer;
pub mod worker;

use std::thread;
use std::time::Instant;

use ndarray::{Array3, ArrayView3};
use tracing::debug;

use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::filters::Filter;

use self::queue::TaskQueue;
use self::results::ResultSet;

pub use self::collector::{collect, collect_exact};
pub use self::fragment::Fragment;
pub use self::slicer::{slice_bounds, Span};

/// Run one pass of the pipeline over `image`.
///
/// # Arguments
/// * `image` - Source image (height, width, 3), read-only for the pass
/// * `filter` - Filter applied to every fragment
/// * `config` - Worker count and slice width
///
/// # Returns
/// The reassembled image, or `None` if no fragments were produced
/// (zero-width image).
///
/// # Errors
/// A failed fragment aborts the whole image, as does a reassembly error
/// or an abnormal thread exit.
pub fn run_pipeline(
    image: ArrayView3<u8>,
    filter: &Filter,
    config: &PipelineConfig,
) -> Result<Option<Array3<u8>>> {
    let (height, width, channels) = image.dim();
    if channels != 3 {
        return Err(PipelineError::Channels(channels));
    }

    let started = Instant::now();
    let queue = TaskQueue::new();
    let results = ResultSet::new();

    let (slicer_ok, workers_ok) = thread::scope(|scope| {
        let queue = &queue;
        let results = &results;

        let slicer = scope.spawn(move || slicer::slice_into(image, config.slice_width(), queue));

        let workers: Vec<_> = (0..config.workers())
            .map(|id| {
                scope.spawn(move || worker::run_worker(id, queue, results, filter, image))
            })
            .collect();

        let slicer_ok = slicer.join().is_ok();
        // Close even if the slicer died, otherwise idle workers never wake.
        queue.close();

        // Join every handle: an unjoined panicked thread makes the scope panic.
        let workers_ok = workers
            .into_iter()
            .map(|handle| handle.join().is_ok())
            .fold(true, |all, ok| all && ok);

        (slicer_ok, workers_ok)
    });

    if !slicer_ok {
        return Err(PipelineError::ThreadPanicked("slicer"));
    }
    if !workers_ok {
        return Err(PipelineError::ThreadPanicked("worker"));
    }

    let (fragments, mut failures) = results.into_parts();
    if !failures.is_empty() {
        failures.sort_unstable_by_key(|f| f.left);
        let first = failures.swap_remove(0);
        return Err(PipelineError::Fragment {
            left: first.left,
            source: first.error,
        });
    }
    if fragments.is_empty() {
        return Ok(None);
    }

    let fragment_count = fragments.len();
    let output = collect_exact(fragments, width)?;

    debug!(
        width,
        height,
        fragments = fragment_count,
        workers = config.workers(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Pipeline pass complete"
    );

    Ok(Some(output))
}
