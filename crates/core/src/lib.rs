pub mod agent;
pub mod config;
pub mod events;
pub mod gate;
pub mod metrics;
pub mod orchestrator;
pub mod pool;
pub mod testing;

pub use agent::{
    AgentKind, AgentOutcome, Customer, CustomerState, CustomerSummary, ReleaseProgress,
    TickSchedule, Vendor, VendorState, VendorSummary,
};
pub use config::{
    load_config, load_config_from_str, save_config, validate_config, ConfigError,
    CustomerConfig, EmptyRemovePolicy, PoolConfig, PurchaseMode, TicketingConfig,
};
pub use events::{EventSink, SaleEvent, SaleEventEnvelope, TracingSink};
pub use gate::{GateSignal, StartGate};
pub use orchestrator::{run_sale, OrchestratorError, SaleControls, SaleOrchestrator, SaleReport};
pub use pool::{BoundedTicketPool, PoolError, TicketPool};
