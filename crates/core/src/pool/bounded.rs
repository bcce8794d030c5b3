//! Mutex-guarded implementation of [`TicketPool`].

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

use super::error::PoolError;
use super::traits::TicketPool;
use crate::config::EmptyRemovePolicy;
use crate::metrics;

/// State guarded by the pool's critical section.
#[derive(Debug, Default)]
struct PoolState {
    tickets: usize,
}

/// Fixed-capacity ticket pool.
///
/// `add`, `remove_blocking` and `remove_if_available` all mutate under one
/// mutex. Removers waiting for a ticket park on a [`Notify`] that every
/// successful `add` wakes.
#[derive(Debug)]
pub struct BoundedTicketPool {
    capacity: usize,
    empty_remove: EmptyRemovePolicy,
    state: Mutex<PoolState>,
    /// Copy of `state.tickets` for lock-free reads; only written under the lock.
    size: AtomicUsize,
    available: Notify,
}

impl BoundedTicketPool {
    /// Create an empty pool with the default fail-fast remove policy.
    pub fn new(capacity: usize) -> Self {
        Self::with_policy(capacity, EmptyRemovePolicy::default())
    }

    /// Create an empty pool with an explicit empty-remove policy.
    pub fn with_policy(capacity: usize, empty_remove: EmptyRemovePolicy) -> Self {
        Self {
            capacity,
            empty_remove,
            state: Mutex::new(PoolState::default()),
            size: AtomicUsize::new(0),
            available: Notify::new(),
        }
    }

    pub fn empty_remove_policy(&self) -> EmptyRemovePolicy {
        self.empty_remove
    }

    // The guarded state is a plain counter, so a poisoned lock is still consistent.
    fn lock(&self) -> MutexGuard<'_, PoolState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, state: &PoolState) {
        self.size.store(state.tickets, Ordering::Release);
        metrics::POOL_SIZE.set(state.tickets as i64);
    }

    fn take_one(&self, state: &mut PoolState) -> Option<usize> {
        if state.tickets == 0 {
            return None;
        }
        state.tickets -= 1;
        self.publish(state);
        Some(state.tickets)
    }

    fn reject(&self, err: PoolError) -> PoolError {
        metrics::POOL_REJECTIONS
            .with_label_values(&[err.reason()])
            .inc();
        err
    }
}

#[async_trait]
impl TicketPool for BoundedTicketPool {
    fn capacity(&self) -> usize {
        self.capacity
    }

    fn size(&self) -> usize {
        self.size.load(Ordering::Acquire)
    }

    fn add(&self) -> Result<usize, PoolError> {
        let mut state = self.lock();
        if state.tickets >= self.capacity {
            return Err(self.reject(PoolError::Full {
                capacity: self.capacity,
            }));
        }
        state.tickets += 1;
        self.publish(&state);
        let size = state.tickets;
        drop(state);

        self.available.notify_waiters();
        Ok(size)
    }

    async fn remove_blocking(&self, cancel: &CancellationToken) -> Result<usize, PoolError> {
        let mut at_entry = true;
        loop {
            // Register interest before checking so an add between the check
            // and the await still wakes us.
            let notified = self.available.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            {
                let mut state = self.lock();
                if let Some(size) = self.take_one(&mut state) {
                    return Ok(size);
                }
                if at_entry && self.empty_remove == EmptyRemovePolicy::FailFast {
                    return Err(self.reject(PoolError::Empty));
                }
            }
            at_entry = false;

            tokio::select! {
                _ = cancel.cancelled() => return Err(PoolError::Cancelled),
                _ = &mut notified => {}
            }
        }
    }

    fn remove_if_available(&self) -> Option<usize> {
        let mut state = self.lock();
        self.take_one(&mut state)
    }
}
