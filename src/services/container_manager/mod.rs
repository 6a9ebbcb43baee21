//! Application container manager.
//!
//! Translates role-level demand for compute containers into a steady-state
//! conversation with the cluster resource manager:
//!
//! - **control_loop**: the periodic heartbeat driver (allocate, release,
//!   update, completion fan-out, terminal-state detection)
//! - **event_handling**: the synchronous sink for external events
//!   (request changes, executor expiry, shutdown)
//!
//! All resource-manager traffic happens on the single loop task; event
//! producers only mutate local bookkeeping (registry, release queue, flags).

mod control_loop;
mod event_handling;

pub use control_loop::TickFlow;

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex, Notify};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::domain::errors::AmResult;
use crate::domain::models::{ContainerManagerConfig, MasterConfig, MasterEvent};
use crate::domain::ports::{
    AllocationPolicy, BlacklistTracker, ExecutorManager, ProgressSource, RmClient, RoleCatalog,
    ScheduleChain,
};
use crate::services::container_registry::ContainerRegistry;
use crate::services::release_queue::ReleaseQueue;

pub(crate) const EXECUTOR_EXPIRED_COUNTER: &str = "am.container_manager.executor_expired";
pub(crate) const RELEASE_CONTAINER_COUNTER: &str = "am.container_manager.release_container";

/// The application container manager.
pub struct ContainerManager {
    pub(super) master: MasterConfig,
    pub(super) config: ContainerManagerConfig,

    // Consumed ports
    pub(super) rm: Arc<dyn RmClient>,
    pub(super) executors: Arc<dyn ExecutorManager>,
    pub(super) schedule_chain: Arc<dyn ScheduleChain>,
    pub(super) policy: Arc<dyn AllocationPolicy>,
    pub(super) roles: Arc<dyn RoleCatalog>,
    pub(super) progress: Arc<dyn ProgressSource>,
    pub(super) blacklist: Option<Arc<dyn BlacklistTracker>>,

    // Shared bookkeeping
    pub(super) registry: Arc<ContainerRegistry>,
    pub(super) release_queue: Arc<ReleaseQueue>,

    // Application-master event channel
    pub(super) event_tx: mpsc::Sender<MasterEvent>,

    // Lifecycle flags; release/acquire so flag writes publish to the loop task
    pub(super) stopped: AtomicBool,
    pub(super) shutting_down: AtomicBool,
    pub(super) shutdown: Notify,
    loop_handle: Mutex<Option<JoinHandle<()>>>,

    /// Last blacklist view reported to the resource manager. Loop-only.
    pub(super) reported_blacklist: Mutex<BTreeSet<String>>,
}

impl ContainerManager {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        master: MasterConfig,
        config: ContainerManagerConfig,
        registry: Arc<ContainerRegistry>,
        rm: Arc<dyn RmClient>,
        executors: Arc<dyn ExecutorManager>,
        schedule_chain: Arc<dyn ScheduleChain>,
        policy: Arc<dyn AllocationPolicy>,
        roles: Arc<dyn RoleCatalog>,
        progress: Arc<dyn ProgressSource>,
        event_tx: mpsc::Sender<MasterEvent>,
    ) -> Self {
        let release_queue = Arc::new(ReleaseQueue::new(config.release_queue_capacity));
        Self {
            master,
            config,
            rm,
            executors,
            schedule_chain,
            policy,
            roles,
            progress,
            blacklist: None,
            registry,
            release_queue,
            event_tx,
            stopped: AtomicBool::new(false),
            shutting_down: AtomicBool::new(false),
            shutdown: Notify::new(),
            loop_handle: Mutex::new(None),
            reported_blacklist: Mutex::new(BTreeSet::new()),
        }
    }

    /// Attach an optional node-blacklist source.
    pub fn with_blacklist_tracker(mut self, tracker: Arc<dyn BlacklistTracker>) -> Self {
        self.blacklist = Some(tracker);
        self
    }

    /// Registry of running containers, shared with the allocation policy.
    pub fn registry(&self) -> &Arc<ContainerRegistry> {
        &self.registry
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutting_down.load(Ordering::Acquire)
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    /// Register with the resource manager and launch the control loop as a
    /// background task. The task never blocks process termination; `stop`
    /// joins it explicitly.
    pub async fn start(self: Arc<Self>) -> AmResult<()> {
        let response = self
            .rm
            .register(&self.master.host, self.master.port, &self.master.tracking_url)
            .await?;
        info!(
            app_id = %self.master.application_id,
            tracking_url = %self.master.tracking_url,
            queue = %response.queue,
            maximum_capability = %response.maximum_capability,
            "registered application master"
        );

        let manager = Arc::clone(&self);
        let handle = tokio::spawn(async move { manager.run_loop().await });
        *self.loop_handle.lock().await = Some(handle);
        Ok(())
    }

    /// Stop the control loop and join it. Idempotent; join errors are
    /// swallowed and logged.
    pub async fn stop(&self) {
        if self.stopped.swap(true, Ordering::AcqRel) {
            return;
        }
        self.shutdown.notify_one();
        let handle = self.loop_handle.lock().await.take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                warn!(error = %e, "container manager loop did not join cleanly");
            }
        }
        info!(app_id = %self.master.application_id, "container manager stopped");
    }

    pub(super) fn bump_counter(&self, name: &'static str) {
        metrics::counter!(name, "app_id" => self.master.application_id.clone()).increment(1);
    }
}
