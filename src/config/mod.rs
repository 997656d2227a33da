//! Configuration management
//!
//! Loads from YAML files + environment variables via .env

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub challenge: ChallengeConfig,
    pub persistence: PersistenceConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChallengeConfig {
    /// Starting capital for a fresh challenge
    pub initial_capital: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PersistenceConfig {
    /// Write CSV trade logs and JSON state snapshots
    pub enabled: bool,
    /// Base directory for trade CSVs and the state snapshot
    pub data_dir: String,
    /// Restore a saved challenge state at startup if one exists
    pub restore_on_start: bool,
}

impl AppConfig {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self> {
        // Load .env file first
        dotenvy::dotenv().ok();

        let config = Config::builder()
            // Challenge defaults
            .set_default("challenge.initial_capital", 10_000.0)?
            // Persistence defaults
            .set_default("persistence.enabled", true)?
            .set_default("persistence.data_dir", "./data")?
            .set_default("persistence.restore_on_start", true)?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // Override with environment variables (PIPS_*)
            .add_source(Environment::with_prefix("PIPS").separator("__"))
            .build()
            .context("Failed to build configuration")?;

        let app_config: AppConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        app_config.validate()?;
        Ok(app_config)
    }

    /// Caller-side validation: the engine itself accepts any capital, so the
    /// positive-and-finite rule is enforced here before it is ever used.
    pub fn validate(&self) -> Result<()> {
        let capital = self.challenge.initial_capital;
        if !capital.is_finite() || capital <= 0.0 {
            bail!(
                "challenge.initial_capital must be a finite positive number, got {}",
                capital
            );
        }
        if self.persistence.enabled && self.persistence.data_dir.trim().is_empty() {
            bail!("persistence.data_dir cannot be empty when persistence is enabled");
        }
        Ok(())
    }

    /// Generate a digest of the config for logging
    pub fn digest(&self) -> String {
        format!(
            "initial_capital={:.2} persistence={} data_dir={}",
            self.challenge.initial_capital, self.persistence.enabled, self.persistence.data_dir
        )
    }
}

impl std::fmt::Display for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.digest())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> AppConfig {
        AppConfig {
            challenge: ChallengeConfig {
                initial_capital: 10_000.0,
            },
            persistence: PersistenceConfig {
                enabled: true,
                data_dir: "./data".to_string(),
                restore_on_start: true,
            },
        }
    }

    #[test]
    fn test_validate_accepts_defaults() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_capital() {
        let mut cfg = base_config();
        cfg.challenge.initial_capital = 0.0;
        assert!(cfg.validate().is_err());

        cfg.challenge.initial_capital = -5.0;
        assert!(cfg.validate().is_err());

        cfg.challenge.initial_capital = f64::INFINITY;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_blank_data_dir() {
        let mut cfg = base_config();
        cfg.persistence.data_dir = "  ".to_string();
        assert!(cfg.validate().is_err());
    }
}
