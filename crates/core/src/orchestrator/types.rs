//! Types for the sale orchestrator.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::agent::{CustomerSummary, VendorSummary};
use crate::config::ConfigError;

/// Errors that can occur during orchestration.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Configuration rejected before any agent started.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Pool capacity differs from the configured one.
    #[error("pool capacity mismatch: expected {expected}, got {actual}")]
    CapacityMismatch { expected: usize, actual: usize },

    /// An agent task panicked or was aborted.
    #[error("{agent} task failed: {reason}")]
    AgentPanicked { agent: String, reason: String },
}

/// Combined result of a sale run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleReport {
    pub vendor: VendorSummary,
    pub customer: CustomerSummary,
}

impl SaleReport {
    /// Every released ticket was purchased and both agents completed.
    pub fn is_sold_out(&self) -> bool {
        self.vendor.outcome.is_completed()
            && self.customer.outcome.is_completed()
            && self.customer.purchased == self.vendor.released
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentOutcome;

    fn report(released: usize, purchased: usize, customer: AgentOutcome) -> SaleReport {
        SaleReport {
            vendor: VendorSummary {
                released,
                tickets_remaining: 0,
                outcome: AgentOutcome::Completed,
            },
            customer: CustomerSummary {
                purchased,
                outcome: customer,
            },
        }
    }

    #[test]
    fn test_sold_out() {
        assert!(report(5, 5, AgentOutcome::Completed).is_sold_out());
        assert!(!report(5, 4, AgentOutcome::Completed).is_sold_out());
        assert!(!report(5, 5, AgentOutcome::Cancelled).is_sold_out());
    }

    #[test]
    fn test_report_serialization() {
        let json = serde_json::to_value(report(2, 2, AgentOutcome::Completed)).unwrap();
        assert_eq!(json["vendor"]["released"], 2);
        assert_eq!(json["customer"]["outcome"]["status"], "completed");
    }

    #[test]
    fn test_error_display() {
        let err = OrchestratorError::from(ConfigError::ValidationError(
            "max capacity must be >= total tickets (2 < 5)".to_string(),
        ));
        assert_eq!(
            err.to_string(),
            "invalid configuration: Configuration validation failed: max capacity must be >= total tickets (2 < 5)"
        );

        let err = OrchestratorError::AgentPanicked {
            agent: "vendor".to_string(),
            reason: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "vendor task failed: boom");
    }
}
