//! Configuration management for `MessMate`.
//!
//! Settings come from an optional `messmate.toml` file with environment
//! variables layered on top (`DATABASE_URL`, `BIND_ADDRESS`, `FEE_DIVISOR`).
//! The billing section is deliberately explicit configuration rather than a
//! magic literal, so alternate cycle lengths can be exercised in tests.

/// Database connection and table creation
pub mod database;

use crate::core::fees::BillingConfig;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Top-level application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Address the HTTP server binds to
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// Database connection URL
    #[serde(default = "database::get_database_url")]
    pub database_url: String,
    /// Fee accrual settings
    #[serde(default)]
    pub billing: BillingConfig,
}

fn default_bind_address() -> String {
    "0.0.0.0:3000".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            database_url: database::get_database_url(),
            billing: BillingConfig::default(),
        }
    }
}

/// Loads configuration from a TOML file.
///
/// # Errors
/// Returns an error if the file cannot be read or the TOML is invalid.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config file: {e}"),
    })
}

/// Loads the application configuration.
///
/// Reads `messmate.toml` if present (falling back to defaults otherwise), then
/// applies environment overrides. A missing file is not an error; a malformed
/// one is.
pub fn load_app_configuration() -> Result<AppConfig> {
    let mut config = if Path::new("messmate.toml").exists() {
        load_config("messmate.toml")?
    } else {
        AppConfig::default()
    };

    if let Ok(addr) = std::env::var("BIND_ADDRESS") {
        config.bind_address = addr;
    }
    if let Ok(url) = std::env::var("DATABASE_URL") {
        config.database_url = url;
    }
    if let Ok(divisor) = std::env::var("FEE_DIVISOR") {
        config.billing.fee_divisor = divisor.parse().map_err(|e| Error::Config {
            message: format!("FEE_DIVISOR must be a number: {e}"),
        })?;
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
            bind_address = "127.0.0.1:8080"
            database_url = "sqlite::memory:"

            [billing]
            fee_divisor = 56.0
        "#;

        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.bind_address, "127.0.0.1:8080");
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.billing.fee_divisor, 56.0);
    }

    #[test]
    fn test_defaults_fill_missing_sections() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.bind_address, "0.0.0.0:3000");
        assert_eq!(config.billing.fee_divisor, 60.0);
    }
}
