//! Configuration loading with hierarchical merging.

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::Config;

/// Configuration validation errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Application id cannot be empty")]
    EmptyApplicationId,

    #[error("Invalid allocate_interval_secs: {0}. Must be at least 1")]
    InvalidAllocateInterval(u64),

    #[error("Invalid release_queue_capacity: {0}. Must be at least 1")]
    InvalidReleaseQueueCapacity(usize),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),
}

/// Configuration loader with hierarchical merging.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging.
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. drover.yaml (primary config, shipped with the application)
    /// 3. drover-local.yaml (local overrides, optional)
    /// 4. Environment variables (DROVER_* prefix, highest priority)
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file("drover.yaml"))
            .merge(Yaml::file("drover-local.yaml"))
            .merge(Env::prefixed("DROVER_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading.
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.master.application_id.is_empty() {
            return Err(ConfigError::EmptyApplicationId);
        }

        if config.container_manager.allocate_interval_secs == 0 {
            return Err(ConfigError::InvalidAllocateInterval(
                config.container_manager.allocate_interval_secs,
            ));
        }

        if config.container_manager.release_queue_capacity == 0 {
            return Err(ConfigError::InvalidReleaseQueueCapacity(
                config.container_manager.release_queue_capacity,
            ));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        Ok(())
    }
}
