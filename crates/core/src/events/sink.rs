use tracing::{info, warn};

use super::SaleEvent;
use crate::agent::AgentOutcome;

/// Destination for agent status events.
///
/// Agents never log directly; they hand every status line to the sink they
/// were built with.
pub trait EventSink: Send + Sync {
    fn record(&self, event: SaleEvent);
}

/// Sink that writes each event as a `tracing` line.
///
/// Installs nothing itself; output depends on the subscriber set up by the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn record(&self, event: SaleEvent) {
        match event {
            SaleEvent::VendorStarted { total_tickets } => {
                info!("Vendor: Starting to release {} tickets", total_tickets);
            }
            SaleEvent::TicketReleased {
                tickets_in_pool,
                tickets_remaining,
            } => {
                info!(
                    "Vendor: Added a ticket. Tickets in pool: {}. Remaining tickets: {}",
                    tickets_in_pool, tickets_remaining
                );
            }
            SaleEvent::StartGateOpened => {
                info!("Vendor: First ticket released, customers may start");
            }
            SaleEvent::VendorFinished {
                released,
                tickets_remaining,
                outcome,
            } => match outcome {
                AgentOutcome::Completed => {
                    info!("Vendor has stopped releasing tickets. Released: {}", released);
                }
                AgentOutcome::Cancelled => {
                    info!(
                        "Vendor interrupted after releasing {} tickets ({} not released)",
                        released, tickets_remaining
                    );
                }
                AgentOutcome::Aborted { reason } => {
                    warn!(
                        "Vendor stopped after releasing {} tickets: {}",
                        released, reason
                    );
                }
            },
            SaleEvent::CustomerStarted => {
                info!("Customer: Starting to purchase tickets");
            }
            SaleEvent::TicketPurchased {
                tickets_in_pool,
                total_purchased,
            } => {
                info!(
                    "Customer: Purchased a ticket. Tickets in pool: {}. Total purchased: {}",
                    tickets_in_pool, total_purchased
                );
            }
            SaleEvent::WaitingForTickets { vendor_remaining } => {
                info!(
                    "Customer: Waiting for tickets. Vendor still has {} tickets to release",
                    vendor_remaining
                );
            }
            SaleEvent::CustomerFinished { purchased, outcome } => match outcome {
                AgentOutcome::Completed => {
                    info!(
                        "Customer: All tickets have been processed. Total tickets purchased: {}",
                        purchased
                    );
                }
                AgentOutcome::Cancelled => {
                    info!(
                        "Customer interrupted. Total tickets purchased: {}",
                        purchased
                    );
                }
                AgentOutcome::Aborted { reason } => {
                    warn!(
                        "Customer stopped: {}. Total tickets purchased: {}",
                        reason, purchased
                    );
                }
            },
            SaleEvent::PoolRejected { agent, reason } => {
                warn!("Pool rejected {} operation: {}", agent.as_str(), reason);
            }
        }
    }
}
