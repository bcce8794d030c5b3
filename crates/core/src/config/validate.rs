use super::{types::TicketingConfig, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Ticket counts, rates and capacity are positive
/// - Max capacity can hold every ticket at once
/// - Customer poll granularity is not 0
pub fn validate_config(config: &TicketingConfig) -> Result<(), ConfigError> {
    ensure_positive(config.total_tickets as u64, "total tickets")?;
    ensure_positive(config.release_rate_ms, "ticket release rate")?;
    ensure_positive(config.retrieval_rate_ms, "customer retrieval rate")?;
    ensure_positive(config.max_capacity as u64, "max capacity")?;

    if config.max_capacity < config.total_tickets {
        return Err(ConfigError::ValidationError(format!(
            "max capacity must be >= total tickets ({} < {})",
            config.max_capacity, config.total_tickets
        )));
    }

    if config.customer.poll_granularity_ms == 0 {
        return Err(ConfigError::ValidationError(
            "customer.poll_granularity_ms cannot be 0".to_string(),
        ));
    }

    Ok(())
}

fn ensure_positive(value: u64, name: &str) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::ValidationError(format!(
            "{name} must be a positive integer"
        )));
    }
    Ok(())
}
