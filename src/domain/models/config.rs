//! Application-master configuration model.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration for the application master.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Identity and addressing of this application master.
    #[serde(default)]
    pub master: MasterConfig,

    /// Container-manager control loop tuning.
    #[serde(default)]
    pub container_manager: ContainerManagerConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LogConfig,
}

/// Identity and addressing of the application master.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MasterConfig {
    /// Application id as assigned by the cluster, used to tag metrics.
    #[serde(default = "default_application_id")]
    pub application_id: String,

    /// Hostname the master registers with the resource manager.
    #[serde(default = "default_host")]
    pub host: String,

    /// RPC port the master registers with the resource manager.
    #[serde(default)]
    pub port: u16,

    /// Tracking URL advertised to the resource manager.
    #[serde(default)]
    pub tracking_url: String,
}

impl Default for MasterConfig {
    fn default() -> Self {
        Self {
            application_id: default_application_id(),
            host: default_host(),
            port: 0,
            tracking_url: String::new(),
        }
    }
}

/// Control-loop tuning for the container manager.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerManagerConfig {
    /// Seconds between allocate heartbeats to the resource manager.
    #[serde(default = "default_allocate_interval_secs")]
    pub allocate_interval_secs: u64,

    /// Whether the loop classifies and requests container resource updates.
    #[serde(default)]
    pub enable_update_resource: bool,

    /// Maximum number of containers queued for release between heartbeats.
    #[serde(default = "default_release_queue_capacity")]
    pub release_queue_capacity: usize,
}

impl Default for ContainerManagerConfig {
    fn default() -> Self {
        Self {
            allocate_interval_secs: default_allocate_interval_secs(),
            enable_update_resource: false,
            release_queue_capacity: default_release_queue_capacity(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format (json, pretty).
    #[serde(default = "default_log_format")]
    pub format: LogFormat,

    /// Directory for log files (optional, if None logs only to stdout).
    pub log_dir: Option<PathBuf>,

    /// Enable stdout logging.
    #[serde(default = "default_true")]
    pub enable_stdout: bool,

    /// Log rotation policy for file output.
    #[serde(default)]
    pub rotation: RotationPolicy,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            enable_stdout: true,
            rotation: RotationPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RotationPolicy {
    #[default]
    Daily,
    Hourly,
    Never,
}

fn default_application_id() -> String {
    "application_unset".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_allocate_interval_secs() -> u64 {
    10
}

fn default_release_queue_capacity() -> usize {
    1024
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> LogFormat {
    LogFormat::Json
}

fn default_true() -> bool {
    true
}
