//! Prometheus metrics for the ticket sale.
//!
//! This module provides metrics for:
//! - Pool (size, rejected operations)
//! - Vendor (tickets released)
//! - Customer (tickets purchased, empty polls)
//! - Agent runs by outcome

use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

// =============================================================================
// Pool Metrics
// =============================================================================

/// Tickets currently held by the pool.
pub static POOL_SIZE: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new("ticketing_pool_size", "Tickets currently in the pool").unwrap()
});

/// Pool operations rejected by reason.
pub static POOL_REJECTIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "ticketing_pool_rejections_total",
            "Pool operations rejected by the capacity contract",
        ),
        &["reason"], // "full", "empty"
    )
    .unwrap()
});

// =============================================================================
// Agent Metrics
// =============================================================================

/// Tickets released into the pool by the vendor.
pub static TICKETS_RELEASED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "ticketing_tickets_released_total",
        "Total tickets released by the vendor",
    )
    .unwrap()
});

/// Tickets purchased from the pool by the customer.
pub static TICKETS_PURCHASED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "ticketing_tickets_purchased_total",
        "Total tickets purchased by the customer",
    )
    .unwrap()
});

/// Customer ticks that found the pool empty.
pub static CUSTOMER_WAITS: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "ticketing_customer_waits_total",
        "Customer ticks that found no ticket in the pool",
    )
    .unwrap()
});

/// Finished agent runs by agent and outcome.
pub static AGENT_RUNS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("ticketing_agent_runs_total", "Finished agent runs"),
        &["agent", "outcome"], // "vendor"/"customer", "completed"/"cancelled"/"aborted"
    )
    .unwrap()
});

/// Register all metrics with the given registry.
pub fn register_metrics(registry: &Registry) -> prometheus::Result<()> {
    registry.register(Box::new(POOL_SIZE.clone()))?;
    registry.register(Box::new(POOL_REJECTIONS.clone()))?;
    registry.register(Box::new(TICKETS_RELEASED.clone()))?;
    registry.register(Box::new(TICKETS_PURCHASED.clone()))?;
    registry.register(Box::new(CUSTOMER_WAITS.clone()))?;
    registry.register(Box::new(AGENT_RUNS.clone()))?;
    Ok(())
}

/// Encode the metrics of `registry` in the Prometheus text format.
pub fn encode_metrics(registry: &Registry) -> String {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&registry.gather(), &mut buffer) {
        tracing::warn!("Failed to encode metrics: {}", e);
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
