//! Resource-manager client port.
//!
//! The wire protocol, serialization, and per-RPC retry/timeout policy all
//! belong to the implementor; the container manager drives this contract
//! from a single task so the heartbeat stays strictly ordered.

use async_trait::async_trait;

use crate::domain::errors::AmResult;
use crate::domain::models::{
    Container, ContainerId, ContainerStatus, ExecutionKind, Resource, ResourceUpdateKind,
};

/// Response to the one-shot application-master registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterResponse {
    /// Largest single-container resource the cluster will grant.
    pub maximum_capability: Resource,
    /// Scheduler queue the application was admitted to.
    pub queue: String,
}

/// A container whose resources the resource manager confirmed changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatedContainer {
    pub container: Container,
    pub update_kind: ResourceUpdateKind,
}

/// One round of the allocate heartbeat.
#[derive(Debug, Clone, Default)]
pub struct AllocateResponse {
    /// Containers newly granted to this application.
    pub allocated: Vec<Container>,
    /// Containers that reached a terminal state since the last heartbeat.
    pub completed: Vec<ContainerStatus>,
    /// Containers whose resource updates were accepted.
    pub updated: Vec<UpdatedContainer>,
}

/// Client for the cluster resource manager.
#[async_trait]
pub trait RmClient: Send + Sync {
    /// Register this application master. Called exactly once, before the
    /// control loop starts.
    async fn register(&self, host: &str, port: u16, tracking_url: &str)
        -> AmResult<RegisterResponse>;

    /// Heartbeat: report progress, collect allocations, completions, and
    /// accepted updates.
    async fn allocate(&self, progress: f32) -> AmResult<AllocateResponse>;

    /// Ask the resource manager to reclaim a granted container.
    /// Fire-and-forget; completion arrives through a later heartbeat.
    async fn release_assigned(&self, id: ContainerId) -> AmResult<()>;

    /// Report a node blacklist delta.
    async fn update_blacklist(&self, additions: &[String], removals: &[String]) -> AmResult<()>;

    /// Ask for a container resize. `version` must match the container's
    /// current resource-manager version or the request is rejected.
    async fn request_container_update(
        &self,
        container: &Container,
        version: u64,
        update_kind: ResourceUpdateKind,
        target: Resource,
        execution: ExecutionKind,
    ) -> AmResult<()>;
}
