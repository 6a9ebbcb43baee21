//! Executor-manager port.

use async_trait::async_trait;

use crate::domain::models::{Container, ContainerId, ExecutorEvent, ExecutorId};

/// Snapshot of an executor bound to a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutorHandle {
    pub executor_id: ExecutorId,
    pub exit_code: i32,
    pub exit_message: String,
    pub container: Container,
}

/// State manager for the executors running inside granted containers.
#[async_trait]
pub trait ExecutorManager: Send + Sync {
    /// Look up the executor bound to a container, if one was ever assigned.
    fn executor(&self, id: &ContainerId) -> Option<ExecutorHandle>;

    /// Deliver a container-manager signal (release notification or kill).
    async fn handle(&self, event: ExecutorEvent);

    /// True once every executor completed successfully.
    fn all_success(&self) -> bool;

    /// True once every executor completed, successfully or not.
    fn all_completed(&self) -> bool;
}
