//! Customer agent: purchases tickets from the pool on a fixed schedule.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::{AgentKind, AgentOutcome, ReleaseProgress, TickSchedule};
use crate::config::{CustomerConfig, PurchaseMode};
use crate::events::{EventSink, SaleEvent};
use crate::gate::{GateSignal, StartGate};
use crate::metrics;
use crate::pool::{PoolError, TicketPool};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerState {
    WaitingForGate,
    Polling,
    Finished,
}

/// Final report of a customer run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerSummary {
    pub purchased: usize,
    pub outcome: AgentOutcome,
}

/// Waits for the start gate, then tries one purchase per tick until the
/// vendor is exhausted and the pool is empty.
pub struct Customer {
    pool: Arc<dyn TicketPool>,
    gate: StartGate,
    vendor: ReleaseProgress,
    retrieval_interval: Duration,
    settings: CustomerConfig,
    sink: Arc<dyn EventSink>,
    purchased: usize,
    state: CustomerState,
    outcome: Option<AgentOutcome>,
}

impl Customer {
    pub fn new(
        pool: Arc<dyn TicketPool>,
        gate: StartGate,
        vendor: ReleaseProgress,
        retrieval_interval: Duration,
        settings: CustomerConfig,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            pool,
            gate,
            vendor,
            retrieval_interval,
            settings,
            sink,
            purchased: 0,
            state: CustomerState::WaitingForGate,
            outcome: None,
        }
    }

    pub fn purchased(&self) -> usize {
        self.purchased
    }

    pub fn state(&self) -> CustomerState {
        self.state
    }

    pub async fn run(&mut self, cancel: CancellationToken) -> CustomerSummary {
        if let Some(outcome) = self.outcome.clone() {
            debug!("Customer already ran, returning its summary");
            return self.summary(outcome);
        }

        let outcome = match self.gate.wait(&cancel).await {
            GateSignal::Opened => self.poll(&cancel).await,
            GateSignal::Cancelled => AgentOutcome::Cancelled,
            GateSignal::Abandoned => {
                debug!("Start gate abandoned, vendor released nothing");
                AgentOutcome::Completed
            }
        };
        self.finish(outcome)
    }

    async fn poll(&mut self, cancel: &CancellationToken) -> AgentOutcome {
        self.transition(CustomerState::Polling);
        self.sink.record(SaleEvent::CustomerStarted);

        let mut schedule =
            TickSchedule::new(self.retrieval_interval, self.settings.poll_granularity());

        loop {
            if !schedule.tick(cancel).await {
                return AgentOutcome::Cancelled;
            }

            // Exhaustion is read before size: the vendor adds a ticket before
            // counting it, so a zero count implies its last add is visible.
            if self.vendor.is_exhausted() && self.pool.size() == 0 {
                return AgentOutcome::Completed;
            }

            if self.pool.size() == 0 {
                self.report_waiting();
                continue;
            }

            match self.purchase(cancel).await {
                Ok(Some(tickets_in_pool)) => {
                    self.purchased += 1;
                    metrics::TICKETS_PURCHASED.inc();
                    self.sink.record(SaleEvent::TicketPurchased {
                        tickets_in_pool,
                        total_purchased: self.purchased,
                    });
                }
                // Seen non-empty, but the ticket was gone by the time we took it.
                Ok(None) => self.report_waiting(),
                Err(PoolError::Cancelled) => return AgentOutcome::Cancelled,
                Err(err) => {
                    self.sink.record(SaleEvent::PoolRejected {
                        agent: AgentKind::Customer,
                        reason: err.reason().to_string(),
                    });
                    return AgentOutcome::Aborted {
                        reason: err.to_string(),
                    };
                }
            }
        }
    }

    /// Take one ticket. `Ok(None)` means nothing was available.
    async fn purchase(&self, cancel: &CancellationToken) -> Result<Option<usize>, PoolError> {
        match self.settings.purchase_mode {
            PurchaseMode::TryPurchase => Ok(self.pool.remove_if_available()),
            PurchaseMode::Blocking => self.pool.remove_blocking(cancel).await.map(Some),
        }
    }

    fn report_waiting(&self) {
        metrics::CUSTOMER_WAITS.inc();
        self.sink.record(SaleEvent::WaitingForTickets {
            vendor_remaining: self.vendor.tickets_remaining(),
        });
    }

    fn finish(&mut self, outcome: AgentOutcome) -> CustomerSummary {
        self.transition(CustomerState::Finished);
        self.outcome = Some(outcome.clone());
        metrics::AGENT_RUNS
            .with_label_values(&[AgentKind::Customer.as_str(), outcome.label()])
            .inc();

        let summary = self.summary(outcome);
        self.sink.record(SaleEvent::CustomerFinished {
            purchased: summary.purchased,
            outcome: summary.outcome.clone(),
        });
        summary
    }

    fn summary(&self, outcome: AgentOutcome) -> CustomerSummary {
        CustomerSummary {
            purchased: self.purchased,
            outcome,
        }
    }

    fn transition(&mut self, to: CustomerState) {
        debug!("Customer state: {:?} -> {:?}", self.state, to);
        self.state = to;
    }
}
