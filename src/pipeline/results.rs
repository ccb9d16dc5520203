//! Result set filled by the worker pool.
//!
//! Locked independently of the task queue; no thread ever holds both.

use parking_lot::Mutex;

use super::fragment::Fragment;
use crate::error::FilterError;

/// A fragment that could not be filtered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentFailure {
    pub left: usize,
    pub error: FilterError,
}

#[derive(Debug, Default)]
struct Collected {
    fragments: Vec<Fragment>,
    failures: Vec<FragmentFailure>,
}

/// Unordered collection of processed fragments and per-fragment failures.
#[derive(Debug, Default)]
pub struct ResultSet {
    inner: Mutex<Collected>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, fragment: Fragment) {
        self.inner.lock().fragments.push(fragment);
    }

    pub fn record_failure(&self, left: usize, error: FilterError) {
        self.inner
            .lock()
            .failures
            .push(FragmentFailure { left, error });
    }

    /// Consume the set once every worker has joined.
    pub fn into_parts(self) -> (Vec<Fragment>, Vec<FragmentFailure>) {
        let collected = self.inner.into_inner();
        (collected.fragments, collected.failures)
    }
}
