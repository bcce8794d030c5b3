use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::TicketingConfig, ConfigError};

/// Prefix of environment variables that override file values.
///
/// Nested keys use a double underscore, e.g. `TICKETING_CUSTOMER__PURCHASE_MODE`.
pub const ENV_PREFIX: &str = "TICKETING_";

/// Load configuration from file with environment variable overrides
pub fn load_config(path: &Path) -> Result<TicketingConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let config: TicketingConfig = Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).ignore(&["config"]).split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<TicketingConfig, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Write configuration to a TOML file, replacing any previous content.
pub fn save_config(config: &TicketingConfig, path: &Path) -> Result<(), ConfigError> {
    let write_error = |reason: String| ConfigError::WriteError {
        path: path.display().to_string(),
        reason,
    };

    let content = toml::to_string_pretty(config).map_err(|e| write_error(e.to_string()))?;
    std::fs::write(path, content).map_err(|e| write_error(e.to_string()))?;

    tracing::debug!("Saved configuration to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EmptyRemovePolicy, PurchaseMode};
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_load_config_from_str_valid() {
        let toml = r#"
total_tickets = 10
release_rate_ms = 5
retrieval_rate_ms = 50
max_capacity = 10
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.total_tickets, 10);
        assert_eq!(config.retrieval_rate_ms, 50);
    }

    #[test]
    fn test_load_config_from_str_missing_field() {
        let toml = r#"
total_tickets = 10
"#;
        let result = load_config_from_str(toml);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/ticketing.toml"));
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
total_tickets = 7
release_rate_ms = 100
retrieval_rate_ms = 200
max_capacity = 9

[customer]
purchase_mode = "blocking"
"#
        )
        .unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.total_tickets, 7);
        assert_eq!(config.max_capacity, 9);
        assert_eq!(config.customer.purchase_mode, PurchaseMode::Blocking);
    }

    #[test]
    fn test_save_then_load_keeps_tuning() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = TicketingConfig::new(3, 20, 30, 4);
        config.pool.empty_remove = EmptyRemovePolicy::Wait;
        save_config(&config, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("total_tickets = 3"));
        assert!(content.contains("empty_remove = \"wait\""));

        let loaded = load_config_from_str(&content).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_save_config_to_missing_directory_fails() {
        let config = TicketingConfig::new(3, 20, 30, 4);
        let result = save_config(&config, Path::new("/nonexistent/dir/config.toml"));
        assert!(matches!(result, Err(ConfigError::WriteError { .. })));
    }
}
