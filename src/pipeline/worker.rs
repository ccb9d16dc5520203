//! Worker loop and the two fragment processing policies.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use ndarray::ArrayView3;
use tracing::{debug, warn};

use super::fragment::Fragment;
use super::queue::TaskQueue;
use super::results::ResultSet;
use crate::error::FilterError;
use crate::filters::Filter;

/// Drain `queue` until it is empty and closed.
///
/// Each fragment is filtered outside any lock and its result appended to
/// `results`. Failures are recorded there too, so nothing crosses the
/// thread boundary by unwinding. Returns the number of fragments handled.
pub(crate) fn run_worker(
    id: usize,
    queue: &TaskQueue,
    results: &ResultSet,
    filter: &Filter,
    source: ArrayView3<u8>,
) -> usize {
    let mut handled = 0;

    while let Some(fragment) = queue.pop() {
        let left = fragment.left();
        match process_fragment(fragment, filter, source) {
            Ok(processed) => results.push(processed),
            Err(error) => {
                warn!(worker = id, left, %error, "Fragment failed");
                results.record_failure(left, error);
            }
        }
        handled += 1;
    }

    debug!(worker = id, fragments = handled, "Worker stopped");
    handled
}

/// Filter one raw fragment into its processed replacement.
///
/// Stateless filters see only the fragment. Neighbor-aware filters read a
/// widened window from `source`, which is only ever borrowed immutably.
pub fn process_fragment(
    fragment: Fragment,
    filter: &Filter,
    source: ArrayView3<u8>,
) -> Result<Fragment, FilterError> {
    let left = fragment.left();
    let expected = fragment.view().dim();

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| match filter {
        Filter::Stateless(f) => f.apply(fragment.view()),
        Filter::NeighborAware(f) => f.apply_in_context(source, left, fragment.width()),
    }));

    let pixels = match outcome {
        Ok(result) => result?,
        Err(payload) => return Err(FilterError::Panicked(panic_message(payload.as_ref()))),
    };

    if pixels.dim() != expected {
        return Err(FilterError::ShapeMismatch {
            expected,
            got: pixels.dim(),
        });
    }

    Ok(Fragment::new(pixels, left))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
