//! Trait definitions for the pool module.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::error::PoolError;

/// A capacity-limited store of fungible tickets.
///
/// Agents only see the pool through this trait. A multi-vendor or
/// multi-customer variant would be another implementation.
#[async_trait]
pub trait TicketPool: Send + Sync {
    /// Maximum number of tickets the pool can hold.
    fn capacity(&self) -> usize;

    /// Current number of tickets. Never blocks.
    fn size(&self) -> usize;

    /// Add one ticket and wake all waiting removers.
    ///
    /// Fails fast with [`PoolError::Full`] when the pool is at capacity.
    /// Returns the size after the add.
    fn add(&self) -> Result<usize, PoolError>;

    /// Remove one ticket, waiting for one to arrive if needed.
    ///
    /// Returns the size after the removal. Fails with [`PoolError::Cancelled`]
    /// if `cancel` fires while waiting.
    async fn remove_blocking(&self, cancel: &CancellationToken) -> Result<usize, PoolError>;

    /// Remove one ticket if any is available. Never blocks and never fails.
    ///
    /// Returns the size after the removal, or `None` if the pool was empty.
    fn remove_if_available(&self) -> Option<usize>;
}
