use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for a ticket sale run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TicketingConfig {
    /// Number of tickets the vendor releases in total.
    pub total_tickets: usize,
    /// Delay between two released tickets (milliseconds).
    pub release_rate_ms: u64,
    /// Interval between two customer purchase attempts (milliseconds).
    pub retrieval_rate_ms: u64,
    /// Maximum number of tickets held by the pool at any time.
    pub max_capacity: usize,
    #[serde(default)]
    pub pool: PoolConfig,
    #[serde(default)]
    pub customer: CustomerConfig,
}

impl TicketingConfig {
    /// Create a config with the four core values and default tuning.
    pub fn new(
        total_tickets: usize,
        release_rate_ms: u64,
        retrieval_rate_ms: u64,
        max_capacity: usize,
    ) -> Self {
        Self {
            total_tickets,
            release_rate_ms,
            retrieval_rate_ms,
            max_capacity,
            pool: PoolConfig::default(),
            customer: CustomerConfig::default(),
        }
    }

    pub fn release_interval(&self) -> Duration {
        Duration::from_millis(self.release_rate_ms)
    }

    pub fn retrieval_interval(&self) -> Duration {
        Duration::from_millis(self.retrieval_rate_ms)
    }
}

/// Pool tuning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct PoolConfig {
    /// What a blocking remove does when the pool is empty at entry.
    #[serde(default)]
    pub empty_remove: EmptyRemovePolicy,
}

/// Behavior of [`crate::TicketPool::remove_blocking`] on an empty pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyRemovePolicy {
    /// Reject immediately with `PoolError::Empty`; only wait once past the check.
    #[default]
    FailFast,
    /// Skip the entry check and wait until a ticket is added.
    Wait,
}

/// Customer tuning.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CustomerConfig {
    /// How a purchase takes a ticket from the pool.
    #[serde(default)]
    pub purchase_mode: PurchaseMode,
    /// Step of the short sleeps taken while waiting for the next deadline (milliseconds).
    #[serde(default = "default_poll_granularity")]
    pub poll_granularity_ms: u64,
}

impl Default for CustomerConfig {
    fn default() -> Self {
        Self {
            purchase_mode: PurchaseMode::default(),
            poll_granularity_ms: default_poll_granularity(),
        }
    }
}

impl CustomerConfig {
    pub fn poll_granularity(&self) -> Duration {
        Duration::from_millis(self.poll_granularity_ms)
    }
}

fn default_poll_granularity() -> u64 {
    50
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseMode {
    /// Non-blocking `remove_if_available`.
    #[default]
    TryPurchase,
    /// `remove_blocking`; any pool error ends the customer loop.
    Blocking,
}
