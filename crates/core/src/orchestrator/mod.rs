//! Sale orchestrator.
//!
//! Validates the configuration, builds the shared pool and start gate, then
//! runs both agents concurrently and waits for both to finish:
//! - **Vendor**: releases tickets into the pool
//! - **Customer**: purchases them until the vendor is exhausted and the pool is empty

mod runner;
mod types;

pub use runner::{run_sale, SaleControls, SaleOrchestrator};
pub use types::{OrchestratorError, SaleReport};
