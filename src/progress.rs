//! Progress reporting and cooperative cancellation.
//!
//! The engine never blocks or spawns threads; it polls an observer the
//! caller supplies once per reporting interval. Cancellation is therefore
//! cooperative: the flag is checked between merges, never mid-merge.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Observer polled by the engine while it runs.
///
/// `cancellation_requested` is read once per reporting interval; returning
/// `true` makes the engine stop promptly with [`Error::Cancelled`]
/// (partial results are discarded by the caller).
///
/// [`Error::Cancelled`]: crate::Error::Cancelled
pub trait ProgressObserver {
    /// Whether the caller has asked the computation to stop.
    fn cancellation_requested(&self) -> bool;

    /// Called with (merges done, total vertices) once per reporting interval.
    fn report_progress(&mut self, done: usize, total: usize);
}

/// Observer that never cancels and discards progress reports.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn cancellation_requested(&self) -> bool {
        false
    }

    fn report_progress(&mut self, _done: usize, _total: usize) {}
}

/// Observer backed by a shared atomic flag.
///
/// Clone a [`handle`](CancelFlag::handle) before starting the computation
/// and set it from anywhere to request cancellation.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag {
    flag: Arc<AtomicBool>,
}

impl CancelFlag {
    /// Create a new, unset flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle to the underlying flag.
    pub fn handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }
}

impl ProgressObserver for CancelFlag {
    fn cancellation_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    fn report_progress(&mut self, _done: usize, _total: usize) {}
}
