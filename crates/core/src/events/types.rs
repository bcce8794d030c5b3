use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::agent::{AgentKind, AgentOutcome};

/// Status events emitted by the agents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SaleEvent {
    // Vendor
    VendorStarted {
        total_tickets: usize,
    },
    TicketReleased {
        tickets_in_pool: usize,
        tickets_remaining: usize,
    },
    StartGateOpened,
    VendorFinished {
        released: usize,
        tickets_remaining: usize,
        outcome: AgentOutcome,
    },

    // Customer
    CustomerStarted,
    TicketPurchased {
        tickets_in_pool: usize,
        total_purchased: usize,
    },
    WaitingForTickets {
        vendor_remaining: usize,
    },
    CustomerFinished {
        purchased: usize,
        outcome: AgentOutcome,
    },

    // Pool
    PoolRejected {
        agent: AgentKind,
        reason: String,
    },
}

impl SaleEvent {
    /// Get the event type as a string
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::VendorStarted { .. } => "vendor_started",
            Self::TicketReleased { .. } => "ticket_released",
            Self::StartGateOpened => "start_gate_opened",
            Self::VendorFinished { .. } => "vendor_finished",
            Self::CustomerStarted => "customer_started",
            Self::TicketPurchased { .. } => "ticket_purchased",
            Self::WaitingForTickets { .. } => "waiting_for_tickets",
            Self::CustomerFinished { .. } => "customer_finished",
            Self::PoolRejected { .. } => "pool_rejected",
        }
    }

    /// The agent that emitted this event
    pub fn agent(&self) -> AgentKind {
        match self {
            Self::VendorStarted { .. }
            | Self::TicketReleased { .. }
            | Self::StartGateOpened
            | Self::VendorFinished { .. } => AgentKind::Vendor,
            Self::CustomerStarted
            | Self::TicketPurchased { .. }
            | Self::WaitingForTickets { .. }
            | Self::CustomerFinished { .. } => AgentKind::Customer,
            Self::PoolRejected { agent, .. } => *agent,
        }
    }
}

/// Envelope wrapping a sale event with metadata
#[derive(Debug, Clone, Serialize)]
pub struct SaleEventEnvelope {
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub event: SaleEvent,
}

impl SaleEventEnvelope {
    pub fn new(event: SaleEvent) -> Self {
        Self {
            timestamp: Utc::now(),
            event,
        }
    }
}
