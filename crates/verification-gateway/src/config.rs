//! Configuration management for the verification gateway.
//!
//! Loads configuration from environment variables with sensible defaults.

use anyhow::{Context, Result};
use std::env;

use crate::store::DEFAULT_TTL_MINUTES;
use crate::sweeper::DEFAULT_SWEEP_INTERVAL_SECS;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// API server host
    pub api_host: String,

    /// API server port
    pub api_port: u16,

    /// Base URL of the proof-verification hub
    pub verifier_url: String,

    /// Verification scope passed to the hub
    pub verifier_scope: String,

    /// How long saved options stay retrievable, in minutes
    pub options_ttl_minutes: i64,

    /// Period of the background sweep, in seconds
    pub sweep_interval_secs: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists (for local development)
        dotenvy::dotenv().ok();

        let config = Config {
            api_host: env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),

            api_port: env::var("API_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("Invalid API_PORT")?,

            verifier_url: env::var("VERIFIER_HUB_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:8090".to_string()),

            verifier_scope: env::var("VERIFIER_SCOPE")
                .unwrap_or_else(|_| "identity-playground".to_string()),

            options_ttl_minutes: env::var("OPTIONS_TTL_MINUTES")
                .unwrap_or_else(|_| DEFAULT_TTL_MINUTES.to_string())
                .parse()
                .context("Invalid OPTIONS_TTL_MINUTES")?,

            sweep_interval_secs: env::var("SWEEP_INTERVAL_SECS")
                .unwrap_or_else(|_| DEFAULT_SWEEP_INTERVAL_SECS.to_string())
                .parse()
                .context("Invalid SWEEP_INTERVAL_SECS")?,
        };

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    fn validate(&self) -> Result<()> {
        if self.api_port == 0 {
            anyhow::bail!("API_PORT must be greater than 0");
        }

        if self.verifier_url.is_empty() {
            anyhow::bail!("VERIFIER_HUB_URL must not be empty");
        }

        if self.options_ttl_minutes <= 0 {
            anyhow::bail!("OPTIONS_TTL_MINUTES must be greater than 0");
        }

        if self.sweep_interval_secs == 0 {
            anyhow::bail!("SWEEP_INTERVAL_SECS must be greater than 0");
        }

        Ok(())
    }

    /// Get the API server address
    pub fn api_address(&self) -> String {
        format!("{}:{}", self.api_host, self.api_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            api_host: "127.0.0.1".to_string(),
            api_port: 9000,
            verifier_url: "http://127.0.0.1:8090".to_string(),
            verifier_scope: "identity-playground".to_string(),
            options_ttl_minutes: 30,
            sweep_interval_secs: 300,
        }
    }

    #[test]
    fn test_api_address() {
        let config = base_config();
        assert_eq!(config.api_address(), "127.0.0.1:9000");
    }

    #[test]
    fn test_validate_invalid_port() {
        let config = Config {
            api_port: 0,
            ..base_config()
        };

        let result = config.validate();
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("API_PORT must be greater than 0"));
    }

    #[test]
    fn test_validate_invalid_ttl() {
        let config = Config {
            options_ttl_minutes: 0,
            ..base_config()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_invalid_sweep_interval() {
        let config = Config {
            sweep_interval_secs: 0,
            ..base_config()
        };

        assert!(config.validate().is_err());
    }
}
