//! Vendor and customer agents.
//!
//! Each agent runs as one task and drives the shared pool:
//! - **Vendor**: `Idle -> Emitting -> Finished`, releases tickets at a fixed rate
//! - **Customer**: `WaitingForGate -> Polling -> Finished`, purchases on a drift-free schedule

mod customer;
mod progress;
mod schedule;
mod vendor;

pub use customer::{Customer, CustomerState, CustomerSummary};
pub use progress::ReleaseProgress;
pub use schedule::TickSchedule;
pub use vendor::{Vendor, VendorState, VendorSummary};

use serde::{Deserialize, Serialize};

/// Which agent an event or summary refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    Vendor,
    Customer,
}

impl AgentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vendor => "vendor",
            Self::Customer => "customer",
        }
    }
}

/// How an agent reached its `Finished` state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AgentOutcome {
    /// The loop ran to its natural end.
    Completed,
    /// A cancellation signal stopped the loop.
    Cancelled,
    /// A pool contract violation stopped the loop.
    Aborted { reason: String },
}

impl AgentOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Aborted { .. } => "aborted",
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}
