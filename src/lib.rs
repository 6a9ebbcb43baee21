//! Drover - Application Container Manager
//!
//! The container-management core of a distributed-training application
//! master running against a YARN-like cluster resource manager:
//! - Periodic allocate heartbeat with strict in-tick step ordering
//! - Container lifecycle bookkeeping indexed by id and priority band
//! - Node-blacklist reconciliation
//! - Container resource-update classification and dispatch
//! - Graceful and forcible shutdown fan-out
//!
//! The embedding application master supplies the resource-manager client,
//! executor manager, scheduling chain, role catalog, and allocation policy
//! through the ports in [`domain::ports`].

pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export key types for convenience
pub use domain::errors::{AmError, AmResult};
pub use domain::models::{
    ApplicationExitCode, Config, Container, ContainerId, ContainerManagerEvent, ContainerStatus,
    ExecutorEvent, MasterEvent, Priority, Resource, ResourceUpdateKind,
};
pub use services::{ContainerManager, ContainerRegistry, TickFlow};
