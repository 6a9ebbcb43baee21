//! The periodic control loop driving the resource manager.
//!
//! Each tick runs a fixed, externally observable sequence: progress probe,
//! blacklist reconcile, allocate heartbeat, release dispatch, allocation
//! hand-off, completion fan-out, resource-update pass, demand solicitation,
//! terminal checks. Any error aborts the attempt with the error text as the
//! diagnostic; the resource-manager client owns whatever short-retry policy
//! exists below this layer.

use std::collections::BTreeSet;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::domain::errors::AmResult;
use crate::domain::models::{
    ApplicationExitCode, Container, ExecutionKind, ExecutorEvent, MasterEvent, ResourceUpdateKind,
};
use crate::domain::ports::{AllocateResponse, ReleasedContainerContext};
use crate::services::blacklist_reconciler::reconcile;
use crate::services::resource_update::{classify, rounded};

use super::{ContainerManager, RELEASE_CONTAINER_COUNTER};

/// Whether the loop should keep ticking after this iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickFlow {
    Continue,
    Stop,
}

impl ContainerManager {
    pub(super) async fn run_loop(self: Arc<Self>) {
        let interval = Duration::from_secs(self.config.allocate_interval_secs);
        while !self.stopped.load(Ordering::Acquire) {
            match self.tick().await {
                Ok(TickFlow::Continue) => {}
                Ok(TickFlow::Stop) => break,
                Err(e) => {
                    self.abort(e.to_string()).await;
                    break;
                }
            }
            if self.stopped.load(Ordering::Acquire) {
                break;
            }
            // A stop request during the sleep is absorbed here; the loop
            // header re-checks the flag.
            tokio::select! {
                () = tokio::time::sleep(interval) => {}
                () = self.shutdown.notified() => {}
            }
        }
    }

    /// One iteration of the control loop. Public so embedders and tests can
    /// drive the manager without the timer.
    pub async fn tick(&self) -> AmResult<TickFlow> {
        // 1. Progress probe.
        let progress = self.progress.progress();

        // 2. Blacklist reconcile.
        self.reconcile_blacklist().await?;

        // 3. Allocate heartbeat.
        let response = self.rm.allocate(progress).await?;

        // 4. Dispatch queued releases.
        for container in self.release_queue.drain().await {
            debug!(container = %container.id, "releasing container");
            self.rm.release_assigned(container.id).await?;
        }

        // 5. Hand freshly allocated containers to the policy for admission.
        self.policy.handle_allocation(&response).await?;

        // 6. Fan out completions.
        for status in &response.completed {
            match self.registry.remove_by_id(&status.id).await {
                Some(container) => {
                    self.on_container_released(container, status.exit_status, status.diagnostics.clone())
                        .await?;
                }
                None => {
                    // Normal when an executor-expired release raced ahead of
                    // the resource manager's completion report.
                    warn!(container = %status.id, "completion for container not in registry, ignoring");
                }
            }
        }

        // 7. Resource-update pass.
        if self.config.enable_update_resource {
            self.handle_resource_updates(&response).await?;
        }

        // 8. Solicit more containers unless winding down.
        if !self.shutting_down.load(Ordering::Acquire) {
            self.policy.ask_for_containers().await?;
        }

        // 9. Terminal checks.
        if self.executors.all_success() {
            self.finish().await;
            return Ok(TickFlow::Stop);
        }
        if self.executors.all_completed() {
            self.abort("All executors completed but not success".to_string()).await;
            return Ok(TickFlow::Stop);
        }

        Ok(TickFlow::Continue)
    }

    async fn reconcile_blacklist(&self) -> AmResult<()> {
        let current: BTreeSet<String> = self
            .blacklist
            .as_ref()
            .map(|tracker| tracker.node_blacklist())
            .unwrap_or_default();

        let mut reported = self.reported_blacklist.lock().await;
        let delta = reconcile(&current, &reported);
        if !delta.is_empty() {
            info!(
                additions = ?delta.additions,
                removals = ?delta.removals,
                "updating node blacklist"
            );
            self.rm.update_blacklist(&delta.additions, &delta.removals).await?;
        }
        *reported = current;
        Ok(())
    }

    async fn handle_resource_updates(&self, response: &AllocateResponse) -> AmResult<()> {
        // Confirmed updates: refresh the snapshot and tell the master.
        for updated in &response.updated {
            if self.registry.contains(&updated.container.id).await {
                debug!(
                    container = %updated.container.id,
                    kind = %updated.update_kind,
                    resource = %updated.container.resource,
                    "container resource update confirmed"
                );
                self.registry.insert(updated.container.clone()).await;
                let _ = self
                    .event_tx
                    .send(MasterEvent::ContainerUpdated { container: updated.container.clone() })
                    .await;
            }
        }

        // Drift detection: ask for an update wherever a running container no
        // longer matches its role's spec.
        for container in self.registry.snapshot_all().await {
            let Some(role) = self.roles.role_by_priority(container.priority) else {
                continue;
            };
            let verdict = classify(container.resource, role.resource);
            if verdict == ResourceUpdateKind::None {
                continue;
            }
            let target = rounded(role.resource);
            info!(
                container = %container.id,
                verdict = %verdict,
                current = %container.resource,
                target = %target,
                "requesting container resource update"
            );
            self.rm
                .request_container_update(
                    &container,
                    container.version,
                    verdict,
                    target,
                    ExecutionKind::Guaranteed,
                )
                .await?;
        }
        Ok(())
    }

    /// Shared release path for heartbeat completions and executor expiry.
    pub(super) async fn on_container_released(
        &self,
        container: Container,
        exit_code: i32,
        diagnostic: String,
    ) -> AmResult<()> {
        // Final band sweep; tolerates the registry having evicted it already.
        self.registry.remove_from_band(container.priority, &container.id).await;

        let mut ctx = ReleasedContainerContext {
            container: container.clone(),
            exit_code,
            err_msg: diagnostic,
            blacklist: self.blacklist.clone(),
        };
        self.schedule_chain.process_released_container(&mut ctx).await?;

        self.executors
            .handle(ExecutorEvent::ContainerReleased {
                container,
                exit_code,
                diagnostic: ctx.err_msg,
            })
            .await;
        self.bump_counter(RELEASE_CONTAINER_COUNTER);
        Ok(())
    }

    pub(super) async fn abort(&self, diagnostic: String) {
        error!(app_id = %self.master.application_id, diagnostic = %diagnostic, "aborting application attempt");
        let _ = self
            .event_tx
            .send(MasterEvent::FailAttempt {
                exit_code: ApplicationExitCode::Abort,
                diagnostic,
            })
            .await;
        self.stopped.store(true, Ordering::Release);
    }

    async fn finish(&self) {
        info!(app_id = %self.master.application_id, "all executors succeeded, finishing application");
        let _ = self
            .event_tx
            .send(MasterEvent::ApplicationSuccess {
                exit_code: ApplicationExitCode::ContainerComplete,
                diagnostic: "all containers completed".to_string(),
            })
            .await;
        self.stopped.store(true, Ordering::Release);
    }
}
