//! Sale orchestrator implementation.
//!
//! Runs the vendor and the customer as two tasks sharing one pool and one
//! start gate, then joins both in either order.

use std::sync::Arc;

use tokio::task::JoinError;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::agent::{Customer, Vendor};
use crate::config::{validate_config, TicketingConfig};
use crate::events::{EventSink, TracingSink};
use crate::gate::StartGate;
use crate::pool::{BoundedTicketPool, TicketPool};

use super::types::{OrchestratorError, SaleReport};

/// Cancellation handles for a sale.
///
/// The vendor and customer tokens are children of the shutdown token:
/// cancelling the sale stops both agents, cancelling one agent leaves the
/// other running.
#[derive(Debug, Clone)]
pub struct SaleControls {
    shutdown: CancellationToken,
    vendor: CancellationToken,
    customer: CancellationToken,
}

impl SaleControls {
    fn new(shutdown: CancellationToken) -> Self {
        Self {
            vendor: shutdown.child_token(),
            customer: shutdown.child_token(),
            shutdown,
        }
    }

    /// Stop both agents.
    pub fn cancel_all(&self) {
        self.shutdown.cancel();
    }

    /// Stop the vendor only; the customer drains what is left in the pool.
    pub fn cancel_vendor(&self) {
        self.vendor.cancel();
    }

    pub fn cancel_customer(&self) {
        self.customer.cancel();
    }

    pub fn is_shutdown(&self) -> bool {
        self.shutdown.is_cancelled()
    }
}

/// Runs one ticket sale.
pub struct SaleOrchestrator {
    config: TicketingConfig,
    pool: Arc<dyn TicketPool>,
    sink: Arc<dyn EventSink>,
    controls: SaleControls,
}

impl SaleOrchestrator {
    /// Validate `config` and build a bounded pool for it.
    ///
    /// Nothing is created when validation fails.
    pub fn new(
        config: TicketingConfig,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self, OrchestratorError> {
        validate_config(&config)?;
        let pool = Arc::new(BoundedTicketPool::with_policy(
            config.max_capacity,
            config.pool.empty_remove,
        ));
        Ok(Self::assemble(config, pool, sink))
    }

    /// Validate `config` and run the sale against a caller-provided pool.
    pub fn with_pool(
        config: TicketingConfig,
        pool: Arc<dyn TicketPool>,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self, OrchestratorError> {
        validate_config(&config)?;
        if pool.capacity() != config.max_capacity {
            return Err(OrchestratorError::CapacityMismatch {
                expected: config.max_capacity,
                actual: pool.capacity(),
            });
        }
        Ok(Self::assemble(config, pool, sink))
    }

    fn assemble(
        config: TicketingConfig,
        pool: Arc<dyn TicketPool>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            config,
            pool,
            sink,
            controls: SaleControls::new(CancellationToken::new()),
        }
    }

    /// Tie the sale to an outer shutdown token, e.g. one cancelled on Ctrl-C.
    pub fn with_shutdown(mut self, shutdown: CancellationToken) -> Self {
        self.controls = SaleControls::new(shutdown);
        self
    }

    pub fn controls(&self) -> SaleControls {
        self.controls.clone()
    }

    pub fn pool(&self) -> Arc<dyn TicketPool> {
        Arc::clone(&self.pool)
    }

    pub fn config(&self) -> &TicketingConfig {
        &self.config
    }

    /// Start both agents and wait until both have finished.
    pub async fn run(self) -> Result<SaleReport, OrchestratorError> {
        info!(
            "Starting ticket sale: {} tickets, capacity {}, release every {}ms, purchase every {}ms",
            self.config.total_tickets,
            self.config.max_capacity,
            self.config.release_rate_ms,
            self.config.retrieval_rate_ms
        );

        let gate = StartGate::new();
        let mut vendor = Vendor::new(
            Arc::clone(&self.pool),
            gate.clone(),
            self.config.total_tickets,
            self.config.release_interval(),
            Arc::clone(&self.sink),
        );
        let mut customer = Customer::new(
            Arc::clone(&self.pool),
            gate,
            vendor.progress(),
            self.config.retrieval_interval(),
            self.config.customer.clone(),
            Arc::clone(&self.sink),
        );

        let vendor_token = self.controls.vendor.clone();
        let customer_token = self.controls.customer.clone();

        info!("Starting vendor task");
        let vendor_task = tokio::spawn(async move { vendor.run(vendor_token).await });
        info!("Starting customer task");
        let customer_task = tokio::spawn(async move { customer.run(customer_token).await });

        let (vendor_result, customer_result) = tokio::join!(vendor_task, customer_task);
        let vendor = vendor_result.map_err(|e| agent_failed("vendor", e))?;
        let customer = customer_result.map_err(|e| agent_failed("customer", e))?;

        info!(
            "Ticket sale completed: {} released, {} purchased",
            vendor.released, customer.purchased
        );
        Ok(SaleReport { vendor, customer })
    }
}

fn agent_failed(agent: &str, err: JoinError) -> OrchestratorError {
    error!("{} task failed: {}", agent, err);
    OrchestratorError::AgentPanicked {
        agent: agent.to_string(),
        reason: err.to_string(),
    }
}

/// Run a sale with default wiring: bounded pool, tracing output, no outside cancellation.
pub async fn run_sale(config: &TicketingConfig) -> Result<SaleReport, OrchestratorError> {
    SaleOrchestrator::new(config.clone(), Arc::new(TracingSink))?
        .run()
        .await
}
