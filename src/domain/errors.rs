//! Domain errors for the application master.

use thiserror::Error;

/// Errors surfaced by the container manager and the ports it consumes.
#[derive(Debug, Error)]
pub enum AmError {
    #[error("resource manager request failed: {0}")]
    ResourceManager(String),

    #[error("allocation policy failed: {0}")]
    Policy(String),

    #[error("scheduling chain failed: {0}")]
    Schedule(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("application master aborted: {0}")]
    Aborted(String),
}

pub type AmResult<T> = Result<T, AmError>;
