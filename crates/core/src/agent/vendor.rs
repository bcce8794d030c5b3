//! Vendor agent: releases tickets into the pool at a fixed rate.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::{AgentKind, AgentOutcome, ReleaseProgress};
use crate::events::{EventSink, SaleEvent};
use crate::gate::StartGate;
use crate::metrics;
use crate::pool::TicketPool;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VendorState {
    Idle,
    Emitting,
    Finished,
}

/// Final report of a vendor run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorSummary {
    pub released: usize,
    pub tickets_remaining: usize,
    pub outcome: AgentOutcome,
}

/// Releases `total_tickets` tickets, one every `release_interval`.
///
/// Opens the start gate right after the first accepted ticket. Any pool
/// error ends the run; it is never retried.
pub struct Vendor {
    pool: Arc<dyn TicketPool>,
    gate: StartGate,
    progress: ReleaseProgress,
    release_interval: Duration,
    sink: Arc<dyn EventSink>,
    state: VendorState,
    outcome: Option<AgentOutcome>,
}

/// Ends the release on drop: marks progress finished and abandons an
/// unopened gate.
///
/// Held across the release loop so a panicking pool or an aborted task
/// still releases the customer.
struct ReleaseGuard {
    progress: ReleaseProgress,
    gate: StartGate,
}

impl Drop for ReleaseGuard {
    fn drop(&mut self) {
        self.progress.mark_finished();
        if self.gate.abandon() {
            debug!("Vendor stopped before releasing a ticket, start gate abandoned");
        }
    }
}

impl Vendor {
    pub fn new(
        pool: Arc<dyn TicketPool>,
        gate: StartGate,
        total_tickets: usize,
        release_interval: Duration,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            pool,
            gate,
            progress: ReleaseProgress::new(total_tickets),
            release_interval,
            sink,
            state: VendorState::Idle,
            outcome: None,
        }
    }

    /// Read-only view of the release counters for other agents.
    pub fn progress(&self) -> ReleaseProgress {
        self.progress.clone()
    }

    pub fn tickets_remaining(&self) -> usize {
        self.progress.tickets_remaining()
    }

    pub fn state(&self) -> VendorState {
        self.state
    }

    /// Run the release loop until every ticket is out, the pool rejects one,
    /// or `cancel` fires.
    pub async fn run(&mut self, cancel: CancellationToken) -> VendorSummary {
        if let Some(outcome) = self.outcome.clone() {
            debug!("Vendor already ran, returning its summary");
            return self.summary(outcome);
        }

        self.transition(VendorState::Emitting);
        self.sink.record(SaleEvent::VendorStarted {
            total_tickets: self.progress.total(),
        });

        let guard = ReleaseGuard {
            progress: self.progress.clone(),
            gate: self.gate.clone(),
        };
        let outcome = self.emit_all(&cancel).await;
        drop(guard);

        self.finish(outcome)
    }

    async fn emit_all(&mut self, cancel: &CancellationToken) -> AgentOutcome {
        while self.progress.tickets_remaining() > 0 {
            if cancel.is_cancelled() {
                return AgentOutcome::Cancelled;
            }

            let tickets_in_pool = match self.pool.add() {
                Ok(size) => size,
                Err(err) => {
                    self.sink.record(SaleEvent::PoolRejected {
                        agent: AgentKind::Vendor,
                        reason: err.reason().to_string(),
                    });
                    return AgentOutcome::Aborted {
                        reason: err.to_string(),
                    };
                }
            };

            // Counted only after the pool holds the ticket, so the customer
            // never sees zero remaining with the last ticket still in flight.
            let tickets_remaining = self.progress.record_release();
            metrics::TICKETS_RELEASED.inc();
            self.sink.record(SaleEvent::TicketReleased {
                tickets_in_pool,
                tickets_remaining,
            });

            if self.gate.open() {
                self.sink.record(SaleEvent::StartGateOpened);
            }

            if tickets_remaining == 0 {
                break;
            }

            tokio::select! {
                _ = cancel.cancelled() => return AgentOutcome::Cancelled,
                _ = tokio::time::sleep(self.release_interval) => {}
            }
        }

        AgentOutcome::Completed
    }

    fn finish(&mut self, outcome: AgentOutcome) -> VendorSummary {
        self.transition(VendorState::Finished);
        self.outcome = Some(outcome.clone());

        metrics::AGENT_RUNS
            .with_label_values(&[AgentKind::Vendor.as_str(), outcome.label()])
            .inc();

        let summary = self.summary(outcome);
        self.sink.record(SaleEvent::VendorFinished {
            released: summary.released,
            tickets_remaining: summary.tickets_remaining,
            outcome: summary.outcome.clone(),
        });
        summary
    }

    fn summary(&self, outcome: AgentOutcome) -> VendorSummary {
        VendorSummary {
            released: self.progress.released(),
            tickets_remaining: self.progress.tickets_remaining(),
            outcome,
        }
    }

    fn transition(&mut self, to: VendorState) {
        debug!("Vendor state: {:?} -> {:?}", self.state, to);
        self.state = to;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::GateSignal;
    use crate::pool::BoundedTicketPool;
    use crate::testing::RecordingSink;

    fn vendor(
        pool: Arc<dyn TicketPool>,
        gate: &StartGate,
        total: usize,
        sink: &Arc<RecordingSink>,
    ) -> Vendor {
        Vendor::new(
            pool,
            gate.clone(),
            total,
            Duration::from_millis(5),
            Arc::clone(sink) as Arc<dyn EventSink>,
        )
    }

    #[tokio::test]
    async fn test_releases_all_tickets() {
        let pool = Arc::new(BoundedTicketPool::new(4));
        let gate = StartGate::new();
        let sink = Arc::new(RecordingSink::new());
        let mut vendor = vendor(pool.clone(), &gate, 4, &sink);
        assert_eq!(vendor.state(), VendorState::Idle);

        let summary = vendor.run(CancellationToken::new()).await;

        assert_eq!(summary.released, 4);
        assert_eq!(summary.tickets_remaining, 0);
        assert_eq!(summary.outcome, AgentOutcome::Completed);
        assert_eq!(vendor.state(), VendorState::Finished);
        assert_eq!(vendor.tickets_remaining(), 0);
        assert!(vendor.progress().is_exhausted());
        assert_eq!(pool.size(), 4);
        assert!(gate.is_open());
    }

    #[tokio::test]
    async fn test_gate_opens_once_right_after_first_release() {
        let pool = Arc::new(BoundedTicketPool::new(3));
        let gate = StartGate::new();
        let sink = Arc::new(RecordingSink::new());
        let mut vendor = vendor(pool, &gate, 3, &sink);

        vendor.run(CancellationToken::new()).await;

        let types = sink.event_types();
        assert_eq!(types.iter().filter(|t| **t == "start_gate_opened").count(), 1);
        assert_eq!(
            &types[..3],
            &["vendor_started", "ticket_released", "start_gate_opened"]
        );
        assert_eq!(types.last(), Some(&"vendor_finished"));
    }

    #[tokio::test]
    async fn test_full_pool_aborts_without_retry() {
        // Smaller than the ticket total, bypassing config validation.
        let pool = Arc::new(BoundedTicketPool::new(2));
        let gate = StartGate::new();
        let sink = Arc::new(RecordingSink::new());
        let mut vendor = vendor(pool.clone(), &gate, 5, &sink);

        let summary = vendor.run(CancellationToken::new()).await;

        assert_eq!(summary.released, 2);
        assert_eq!(summary.tickets_remaining, 3);
        assert!(matches!(summary.outcome, AgentOutcome::Aborted { .. }));
        assert_eq!(pool.size(), 2);
        assert!(vendor.progress().is_exhausted());
        assert_eq!(sink.count("pool_rejected"), 1);
    }

    #[tokio::test]
    async fn test_cancellation_during_sleep_stops_release() {
        let pool = Arc::new(BoundedTicketPool::new(10));
        let gate = StartGate::new();
        let sink = Arc::new(RecordingSink::new());
        let mut vendor = Vendor::new(
            pool.clone(),
            gate.clone(),
            10,
            Duration::from_secs(60),
            Arc::clone(&sink) as Arc<dyn EventSink>,
        );

        let cancel = CancellationToken::new();
        let canceller = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(30)).await;
            canceller.cancel();
        });

        let summary = tokio::time::timeout(Duration::from_secs(5), vendor.run(cancel))
            .await
            .expect("cancelled vendor should stop promptly");

        assert_eq!(summary.outcome, AgentOutcome::Cancelled);
        assert_eq!(summary.released, 1);
        assert_eq!(summary.tickets_remaining, 9);
        assert_eq!(pool.size(), 1);
        assert!(vendor.progress().is_finished());
    }

    #[tokio::test]
    async fn test_cancelled_before_first_release_abandons_gate() {
        let pool = Arc::new(BoundedTicketPool::new(3));
        let gate = StartGate::new();
        let sink = Arc::new(RecordingSink::new());
        let mut vendor = vendor(pool.clone(), &gate, 3, &sink);

        let cancel = CancellationToken::new();
        cancel.cancel();
        let summary = vendor.run(cancel).await;

        assert_eq!(summary.outcome, AgentOutcome::Cancelled);
        assert_eq!(summary.released, 0);
        assert_eq!(pool.size(), 0);
        assert!(!gate.is_open());
        assert_eq!(
            gate.wait(&CancellationToken::new()).await,
            GateSignal::Abandoned
        );
    }

    #[tokio::test]
    async fn test_second_run_does_not_release_again() {
        let pool = Arc::new(BoundedTicketPool::new(2));
        let gate = StartGate::new();
        let sink = Arc::new(RecordingSink::new());
        let mut vendor = vendor(pool.clone(), &gate, 2, &sink);

        vendor.run(CancellationToken::new()).await;
        let summary = vendor.run(CancellationToken::new()).await;

        assert_eq!(summary.released, 2);
        assert_eq!(pool.size(), 2);
        assert_eq!(sink.count("vendor_started"), 1);
    }

    #[tokio::test]
    async fn test_second_run_keeps_cancelled_outcome() {
        let pool = Arc::new(BoundedTicketPool::new(3));
        let gate = StartGate::new();
        let sink = Arc::new(RecordingSink::new());
        let mut vendor = vendor(pool.clone(), &gate, 3, &sink);

        let cancel = CancellationToken::new();
        cancel.cancel();
        assert_eq!(vendor.run(cancel).await.outcome, AgentOutcome::Cancelled);

        let summary = vendor.run(CancellationToken::new()).await;
        assert_eq!(summary.outcome, AgentOutcome::Cancelled);
        assert_eq!(summary.released, 0);
        assert_eq!(pool.size(), 0);
        assert_eq!(sink.count("vendor_finished"), 1);
    }

    #[tokio::test]
    async fn test_panicking_pool_still_releases_customer() {
        /// Pool whose every add panics.
        struct PanickingPool;

        #[async_trait::async_trait]
        impl TicketPool for PanickingPool {
            fn capacity(&self) -> usize {
                3
            }
            fn size(&self) -> usize {
                0
            }
            fn add(&self) -> Result<usize, crate::pool::PoolError> {
                panic!("pool storage failed");
            }
            async fn remove_blocking(
                &self,
                _cancel: &CancellationToken,
            ) -> Result<usize, crate::pool::PoolError> {
                Err(crate::pool::PoolError::Empty)
            }
            fn remove_if_available(&self) -> Option<usize> {
                None
            }
        }

        let gate = StartGate::new();
        let sink = Arc::new(RecordingSink::new());
        let mut vendor = vendor(Arc::new(PanickingPool), &gate, 3, &sink);
        let progress = vendor.progress();

        let result = tokio::spawn(async move { vendor.run(CancellationToken::new()).await }).await;

        assert!(result.unwrap_err().is_panic());
        assert!(progress.is_finished());
        assert!(progress.is_exhausted());
        assert_eq!(
            gate.wait(&CancellationToken::new()).await,
            GateSignal::Abandoned
        );
    }
}
