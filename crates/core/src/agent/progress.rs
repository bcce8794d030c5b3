use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug)]
struct ProgressInner {
    total: usize,
    remaining: AtomicUsize,
    finished: AtomicBool,
}

/// Vendor release counters, shared read-only with the customer.
///
/// Only the owning [`Vendor`](super::Vendor) writes; every clone handed out
/// can only read.
#[derive(Debug, Clone)]
pub struct ReleaseProgress {
    inner: Arc<ProgressInner>,
}

impl ReleaseProgress {
    pub(crate) fn new(total: usize) -> Self {
        Self {
            inner: Arc::new(ProgressInner {
                total,
                remaining: AtomicUsize::new(total),
                finished: AtomicBool::new(false),
            }),
        }
    }

    pub fn total(&self) -> usize {
        self.inner.total
    }

    /// Tickets the vendor has yet to release.
    pub fn tickets_remaining(&self) -> usize {
        self.inner.remaining.load(Ordering::Acquire)
    }

    pub fn released(&self) -> usize {
        self.inner.total - self.tickets_remaining()
    }

    /// Whether the vendor loop has ended, for any reason.
    pub fn is_finished(&self) -> bool {
        self.inner.finished.load(Ordering::Acquire)
    }

    /// No further ticket will ever enter the pool.
    pub fn is_exhausted(&self) -> bool {
        self.tickets_remaining() == 0 || self.is_finished()
    }

    /// Count one released ticket. Call only after the pool accepted it.
    pub(crate) fn record_release(&self) -> usize {
        let previous = self
            .inner
            .remaining
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                Some(n.saturating_sub(1))
            })
            .unwrap_or_default();
        previous.saturating_sub(1)
    }

    pub(crate) fn mark_finished(&self) {
        self.inner.finished.store(true, Ordering::Release);
    }
}
