//! Synchronous event sink of the container manager.
//!
//! External collaborators (role catalog, executor tracking, the master's
//! shutdown path) post events here. Handling only mutates local bookkeeping;
//! the resource manager is never called from this path, so heartbeat
//! ordering stays owned by the control loop. A handler failure is converted
//! into a fatal abort instead of unwinding into the event source.

use std::sync::atomic::Ordering;
use tracing::{debug, warn};

use crate::domain::errors::AmResult;
use crate::domain::models::{Container, ContainerManagerEvent, ExecutorEvent};

use super::{ContainerManager, EXECUTOR_EXPIRED_COUNTER};

impl ContainerManager {
    /// Handle one external event. Never returns an error to the caller;
    /// unexpected failures abort the application attempt.
    pub async fn handle_event(&self, event: ContainerManagerEvent) {
        if let Err(e) = self.dispatch_event(event).await {
            self.abort(e.to_string()).await;
        }
    }

    async fn dispatch_event(&self, event: ContainerManagerEvent) -> AmResult<()> {
        match event {
            // No resource-manager call here; the next heartbeat picks the
            // new bands up.
            ContainerManagerEvent::RequestCreated | ContainerManagerEvent::RequestUpdated => {
                for priority in self.roles.priorities() {
                    self.registry.ensure_priority(priority).await;
                }
            }
            ContainerManagerEvent::ExecutorExpired { container } => {
                self.on_executor_expired(container).await?;
            }
            ContainerManagerEvent::GracefulShutdown => {
                self.kill_all_executors(false).await;
            }
            ContainerManagerEvent::ForciblyShutdown => {
                self.kill_all_executors(true).await;
            }
        }
        Ok(())
    }

    async fn on_executor_expired(&self, container: Container) -> AmResult<()> {
        debug!(container = %container.id, "executor expired, scheduling release");
        if !self.release_queue.offer(container.clone()).await {
            warn!(container = %container.id, "release queue full, dropping release request");
        }

        // The container leaves the registry now; the resource manager's own
        // completion report for it later is warn-and-ignored.
        let snapshot = self
            .registry
            .remove_by_id(&container.id)
            .await
            .unwrap_or_else(|| container.clone());

        if let Some(handle) = self.executors.executor(&container.id) {
            self.on_container_released(snapshot, handle.exit_code, handle.exit_message)
                .await?;
        }
        self.bump_counter(EXECUTOR_EXPIRED_COUNTER);
        Ok(())
    }

    /// Fan a kill signal out to every live container with a known executor.
    /// The registry is not drained here; completions flow back through the
    /// heartbeat.
    async fn kill_all_executors(&self, forcibly: bool) {
        self.shutting_down.store(true, Ordering::Release);
        for container in self.registry.snapshot_all().await {
            let Some(handle) = self.executors.executor(&container.id) else {
                continue;
            };
            let signal = if forcibly {
                ExecutorEvent::KillForcibly { executor_id: handle.executor_id }
            } else {
                ExecutorEvent::Kill { executor_id: handle.executor_id }
            };
            self.executors.handle(signal).await;
        }
    }
}
