//! Pool wrapper that samples the size after every operation.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::pool::{PoolError, TicketPool};

/// Delegates to an inner pool and tracks what it observed.
///
/// # Example
///
/// ```rust,ignore
/// use ticketing_core::testing::MonitoredPool;
///
/// let pool = Arc::new(MonitoredPool::new(BoundedTicketPool::new(3)));
/// // ... run a sale with `pool` ...
/// assert!(pool.max_observed_size() <= 3);
/// ```
#[derive(Debug)]
pub struct MonitoredPool<P> {
    inner: P,
    max_observed: AtomicUsize,
    adds: AtomicUsize,
    removes: AtomicUsize,
}

impl<P: TicketPool> MonitoredPool<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            max_observed: AtomicUsize::new(0),
            adds: AtomicUsize::new(0),
            removes: AtomicUsize::new(0),
        }
    }

    /// Largest size seen after any operation or size query.
    pub fn max_observed_size(&self) -> usize {
        self.max_observed.load(Ordering::SeqCst)
    }

    pub fn successful_adds(&self) -> usize {
        self.adds.load(Ordering::SeqCst)
    }

    pub fn successful_removes(&self) -> usize {
        self.removes.load(Ordering::SeqCst)
    }

    fn observe(&self, size: usize) -> usize {
        self.max_observed.fetch_max(size, Ordering::SeqCst);
        size
    }
}

#[async_trait]
impl<P: TicketPool> TicketPool for MonitoredPool<P> {
    fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    fn size(&self) -> usize {
        self.observe(self.inner.size())
    }

    fn add(&self) -> Result<usize, PoolError> {
        let size = self.inner.add()?;
        self.adds.fetch_add(1, Ordering::SeqCst);
        Ok(self.observe(size))
    }

    async fn remove_blocking(&self, cancel: &CancellationToken) -> Result<usize, PoolError> {
        let size = self.inner.remove_blocking(cancel).await?;
        self.removes.fetch_add(1, Ordering::SeqCst);
        Ok(self.observe(size))
    }

    fn remove_if_available(&self) -> Option<usize> {
        let size = self.inner.remove_if_available()?;
        self.removes.fetch_add(1, Ordering::SeqCst);
        Some(self.observe(size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::BoundedTicketPool;

    #[test]
    fn test_tracks_high_water_mark_and_counts() {
        let pool = MonitoredPool::new(BoundedTicketPool::new(3));
        pool.add().unwrap();
        pool.add().unwrap();
        assert_eq!(pool.remove_if_available(), Some(1));
        pool.add().unwrap();
        assert!(pool.add().is_ok());
        assert!(pool.add().is_err());

        assert_eq!(pool.max_observed_size(), 3);
        assert_eq!(pool.successful_adds(), 4);
        assert_eq!(pool.successful_removes(), 1);
        assert_eq!(pool.size(), 3);
    }
}
