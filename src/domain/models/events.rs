//! Event taxonomy of the container manager.
//!
//! Three directions of traffic: `ContainerManagerEvent` flows in from the
//! role catalog and executor tracking, `ExecutorEvent` flows out to the
//! executor manager, and `MasterEvent` flows out to the application master's
//! event channel (final status, container updates).

use serde::{Deserialize, Serialize};

use super::resources::{Container, ExecutorId};

/// Events posted to the container manager by external collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ContainerManagerEvent {
    /// A role request was created; priority bands may need to be provisioned.
    RequestCreated,
    /// A role request changed; same provisioning path as creation.
    RequestUpdated,
    /// An executor stopped heartbeating; its container must be released.
    ExecutorExpired { container: Container },
    /// Ask all executors to wind down cleanly.
    GracefulShutdown,
    /// Ask all executors to stop immediately.
    ForciblyShutdown,
}

/// Signals the container manager sends to the executor manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutorEvent {
    /// A container left the registry; carries the final diagnostic after the
    /// scheduling chain had a chance to revise it.
    ContainerReleased {
        container: Container,
        exit_code: i32,
        diagnostic: String,
    },
    /// Clean-stop request for one executor.
    Kill { executor_id: ExecutorId },
    /// Immediate-stop request for one executor.
    KillForcibly { executor_id: ExecutorId },
}

/// Final-status code the application master reports upward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationExitCode {
    /// The attempt aborted; the diagnostic carries the cause.
    Abort,
    /// All containers completed successfully.
    ContainerComplete,
}

impl ApplicationExitCode {
    pub fn as_i32(self) -> i32 {
        match self {
            Self::Abort => -6000,
            Self::ContainerComplete => 0,
        }
    }
}

/// Events the container manager publishes on the application master channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MasterEvent {
    /// The attempt failed; the master should tear down and report failure.
    FailAttempt {
        exit_code: ApplicationExitCode,
        diagnostic: String,
    },
    /// Every executor finished successfully; the master should exit cleanly.
    ApplicationSuccess {
        exit_code: ApplicationExitCode,
        diagnostic: String,
    },
    /// The resource manager confirmed a container resize.
    ContainerUpdated { container: Container },
}
