mod prompt;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use prometheus::Registry;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ticketing_core::metrics::{encode_metrics, register_metrics};
use ticketing_core::{
    load_config, validate_config, SaleOrchestrator, SaleReport, TicketingConfig, TracingSink,
};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable naming a config file; skips the interactive prompts.
const CONFIG_ENV: &str = "TICKETING_CONFIG";

/// Where the interactive flow loads and saves its configuration.
const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ticketing v{}", VERSION);

    let config = match std::env::var(CONFIG_ENV) {
        Ok(path) => {
            let config_path = PathBuf::from(path);
            info!("Loading configuration from {:?}", config_path);
            load_config(&config_path)
                .with_context(|| format!("Failed to load config from {:?}", config_path))?
        }
        Err(_) => configure_interactively().await?,
    };

    validate_config(&config).context("Configuration validation failed")?;
    info!("Configuration loaded successfully");
    debug!("Pool policy: {:?}", config.pool.empty_remove);
    debug!("Purchase mode: {:?}", config.customer.purchase_mode);

    let registry = Registry::new();
    register_metrics(&registry).context("Failed to register metrics")?;

    let shutdown = CancellationToken::new();
    let orchestrator = SaleOrchestrator::new(config, Arc::new(TracingSink))
        .context("Failed to create sale orchestrator")?
        .with_shutdown(shutdown.clone());

    // Stop both agents on Ctrl-C
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl-C, stopping the sale");
            shutdown.cancel();
        }
    });

    let report = orchestrator.run().await.context("Ticket sale failed")?;
    print_report(&report);

    debug!("Sale report: {}", serde_json::to_string(&report)?);
    debug!("Final metrics:\n{}", encode_metrics(&registry));

    info!("Ticket booking process completed.");
    Ok(())
}

/// Run the terminal prompts on a blocking thread.
async fn configure_interactively() -> Result<TicketingConfig> {
    tokio::task::spawn_blocking(|| {
        let stdin = std::io::stdin();
        let mut input = stdin.lock();
        let mut output = std::io::stdout();
        prompt::configure(&mut input, &mut output, &PathBuf::from(DEFAULT_CONFIG_PATH))
    })
    .await
    .context("Configuration prompt task failed")?
}

fn print_report(report: &SaleReport) {
    info!(
        "Vendor: {} released, {} remaining ({})",
        report.vendor.released,
        report.vendor.tickets_remaining,
        report.vendor.outcome.label()
    );
    info!(
        "Customer: {} purchased ({})",
        report.customer.purchased,
        report.customer.outcome.label()
    );
    if report.is_sold_out() {
        info!("All tickets sold.");
    }
}
