//! Task queue shared by the slicer and the worker pool.
//!
//! Pending fragments and the stop signal live in one [`QueueState`] under
//! one mutex, paired with one condition variable. A worker therefore
//! re-checks "item available" and "closed" atomically on every wake, so a
//! spurious wakeup can neither end a worker early nor lose a fragment.

use std::collections::VecDeque;

use parking_lot::{Condvar, Mutex};

use super::fragment::Fragment;

#[derive(Debug, Default)]
struct QueueState {
    items: VecDeque<Fragment>,
    closed: bool,
}

/// FIFO of raw fragments with a close signal.
#[derive(Debug, Default)]
pub struct TaskQueue {
    state: Mutex<QueueState>,
    available: Condvar,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a fragment and wake one waiting worker.
    pub fn push(&self, fragment: Fragment) {
        {
            let mut state = self.state.lock();
            debug_assert!(!state.closed, "push after close");
            state.items.push_back(fragment);
        }
        self.available.notify_one();
    }

    /// Mark the queue closed and wake every waiting worker.
    ///
    /// Only call once the producer has finished; workers drain what is
    /// left and then stop.
    pub fn close(&self) {
        let mut state = self.state.lock();
        state.closed = true;
        self.available.notify_all();
    }

    /// Take the next fragment, blocking while the queue is empty and open.
    ///
    /// Returns `None` once the queue is both empty and closed.
    pub fn pop(&self) -> Option<Fragment> {
        let mut state = self.state.lock();
        loop {
            if let Some(fragment) = state.items.pop_front() {
                return Some(fragment);
            }
            if state.closed {
                return None;
            }
            self.available.wait(&mut state);
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.state.lock().items.len()
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[cfg(test)]
    fn is_closed(&self) -> bool {
        self.state.lock().closed
    }
}
