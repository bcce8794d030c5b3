//! Testing utilities for the ticket sale.
//!
//! This module provides an event recorder and an instrumented pool, so that
//! agent behavior can be asserted without a tracing subscriber.
//!
//! # Example
//!
//! ```rust,ignore
//! use ticketing_core::testing::{fixtures, RecordingSink};
//!
//! let sink = Arc::new(RecordingSink::new());
//! let report = SaleOrchestrator::new(fixtures::fast_config(5, 5), sink.clone())?
//!     .run()
//!     .await?;
//!
//! assert_eq!(sink.count("ticket_purchased"), report.customer.purchased);
//! ```

mod monitored_pool;
mod recording_sink;

pub use monitored_pool::MonitoredPool;
pub use recording_sink::RecordingSink;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::config::TicketingConfig;

    /// Valid config with the given rates and a fine customer poll step.
    pub fn config(
        total_tickets: usize,
        max_capacity: usize,
        release_rate_ms: u64,
        retrieval_rate_ms: u64,
    ) -> TicketingConfig {
        let mut config =
            TicketingConfig::new(total_tickets, release_rate_ms, retrieval_rate_ms, max_capacity);
        config.customer.poll_granularity_ms = 5;
        config
    }

    /// Valid config with 10ms release and retrieval rates.
    pub fn fast_config(total_tickets: usize, max_capacity: usize) -> TicketingConfig {
        config(total_tickets, max_capacity, 10, 10)
    }
}
