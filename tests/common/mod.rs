//! Common test utilities for integration tests.
//!
//! Recording mock implementations of every port the container manager
//! consumes, plus a harness that wires them together.

#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{mpsc, Mutex};

use drover::domain::errors::{AmError, AmResult};
use drover::domain::models::{
    Container, ContainerId, ContainerManagerConfig, ExecutionKind, ExecutorEvent, ExecutorId,
    MasterConfig, MasterEvent, Priority, Resource, ResourceUpdateKind,
};
use drover::domain::ports::{
    AllocateResponse, AllocationPolicy, BlacklistTracker, ExecutorHandle, ExecutorManager,
    ProgressSource, RegisterResponse, RmClient, RoleCatalog, RoleInfo, ScheduleChain,
    ReleasedContainerContext,
};
use drover::services::{ContainerManager, ContainerRegistry};

/// Build a container snapshot for tests.
pub fn container(id: u64, priority: u32, memory_mib: u64, vcores: u32) -> Container {
    Container {
        id: ContainerId(id),
        priority: Priority(priority),
        resource: Resource::new(memory_mib, vcores),
        node_http_address: format!("node{id}:8042"),
        version: 0,
    }
}

/// Every call the mock resource-manager client observed, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum RmCall {
    Register {
        host: String,
        port: u16,
        tracking_url: String,
    },
    Allocate {
        progress: f32,
    },
    ReleaseAssigned(ContainerId),
    UpdateBlacklist {
        additions: Vec<String>,
        removals: Vec<String>,
    },
    RequestContainerUpdate {
        id: ContainerId,
        version: u64,
        update_kind: ResourceUpdateKind,
        target: Resource,
        execution: ExecutionKind,
    },
}

/// Mock resource-manager client with scripted heartbeat responses.
#[derive(Default)]
pub struct MockRmClient {
    responses: Mutex<VecDeque<AllocateResponse>>,
    calls: Mutex<Vec<RmCall>>,
    fail_allocate: AtomicBool,
}

impl MockRmClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the response for the next unscripted heartbeat; heartbeats
    /// beyond the script get an empty response.
    pub async fn push_response(&self, response: AllocateResponse) {
        self.responses.lock().await.push_back(response);
    }

    pub fn fail_next_allocate(&self) {
        self.fail_allocate.store(true, Ordering::SeqCst);
    }

    pub async fn calls(&self) -> Vec<RmCall> {
        self.calls.lock().await.clone()
    }

    pub async fn blacklist_calls(&self) -> Vec<(Vec<String>, Vec<String>)> {
        self.calls()
            .await
            .into_iter()
            .filter_map(|call| match call {
                RmCall::UpdateBlacklist { additions, removals } => Some((additions, removals)),
                _ => None,
            })
            .collect()
    }

    pub async fn released_ids(&self) -> Vec<ContainerId> {
        self.calls()
            .await
            .into_iter()
            .filter_map(|call| match call {
                RmCall::ReleaseAssigned(id) => Some(id),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl RmClient for MockRmClient {
    async fn register(
        &self,
        host: &str,
        port: u16,
        tracking_url: &str,
    ) -> AmResult<RegisterResponse> {
        self.calls.lock().await.push(RmCall::Register {
            host: host.to_string(),
            port,
            tracking_url: tracking_url.to_string(),
        });
        Ok(RegisterResponse {
            maximum_capability: Resource::new(65536, 32),
            queue: "default".to_string(),
        })
    }

    async fn allocate(&self, progress: f32) -> AmResult<AllocateResponse> {
        self.calls.lock().await.push(RmCall::Allocate { progress });
        if self.fail_allocate.swap(false, Ordering::SeqCst) {
            return Err(AmError::ResourceManager("injected allocate failure".to_string()));
        }
        Ok(self.responses.lock().await.pop_front().unwrap_or_default())
    }

    async fn release_assigned(&self, id: ContainerId) -> AmResult<()> {
        self.calls.lock().await.push(RmCall::ReleaseAssigned(id));
        Ok(())
    }

    async fn update_blacklist(&self, additions: &[String], removals: &[String]) -> AmResult<()> {
        self.calls.lock().await.push(RmCall::UpdateBlacklist {
            additions: additions.to_vec(),
            removals: removals.to_vec(),
        });
        Ok(())
    }

    async fn request_container_update(
        &self,
        container: &Container,
        version: u64,
        update_kind: ResourceUpdateKind,
        target: Resource,
        execution: ExecutionKind,
    ) -> AmResult<()> {
        self.calls.lock().await.push(RmCall::RequestContainerUpdate {
            id: container.id,
            version,
            update_kind,
            target,
            execution,
        });
        Ok(())
    }
}

/// Mock executor manager with bindable handles and recorded signals.
#[derive(Default)]
pub struct MockExecutorManager {
    handles: std::sync::RwLock<BTreeMap<ContainerId, ExecutorHandle>>,
    events: Mutex<Vec<ExecutorEvent>>,
    all_success: AtomicBool,
    all_completed: AtomicBool,
}

impl MockExecutorManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind an executor handle to a container.
    pub fn bind(&self, container: &Container, executor_id: &str, exit_code: i32, exit_message: &str) {
        let handle = ExecutorHandle {
            executor_id: ExecutorId(executor_id.to_string()),
            exit_code,
            exit_message: exit_message.to_string(),
            container: container.clone(),
        };
        self.handles
            .write()
            .expect("handles lock")
            .insert(container.id, handle);
    }

    pub fn set_all_success(&self, value: bool) {
        self.all_success.store(value, Ordering::SeqCst);
    }

    pub fn set_all_completed(&self, value: bool) {
        self.all_completed.store(value, Ordering::SeqCst);
    }

    pub async fn events(&self) -> Vec<ExecutorEvent> {
        self.events.lock().await.clone()
    }

    pub async fn released(&self) -> Vec<(ContainerId, i32, String)> {
        self.events()
            .await
            .into_iter()
            .filter_map(|event| match event {
                ExecutorEvent::ContainerReleased { container, exit_code, diagnostic } => {
                    Some((container.id, exit_code, diagnostic))
                }
                _ => None,
            })
            .collect()
    }

    pub async fn kills(&self) -> (Vec<ExecutorId>, Vec<ExecutorId>) {
        let mut graceful = Vec::new();
        let mut forcible = Vec::new();
        for event in self.events().await {
            match event {
                ExecutorEvent::Kill { executor_id } => graceful.push(executor_id),
                ExecutorEvent::KillForcibly { executor_id } => forcible.push(executor_id),
                ExecutorEvent::ContainerReleased { .. } => {}
            }
        }
        (graceful, forcible)
    }
}

#[async_trait]
impl ExecutorManager for MockExecutorManager {
    fn executor(&self, id: &ContainerId) -> Option<ExecutorHandle> {
        self.handles.read().expect("handles lock").get(id).cloned()
    }

    async fn handle(&self, event: ExecutorEvent) {
        self.events.lock().await.push(event);
    }

    fn all_success(&self) -> bool {
        self.all_success.load(Ordering::SeqCst)
    }

    fn all_completed(&self) -> bool {
        self.all_completed.load(Ordering::SeqCst)
    }
}

/// Scheduling chain that records what it saw and optionally rewrites the
/// diagnostic, the way failure-accounting links do.
#[derive(Default)]
pub struct RecordingScheduleChain {
    processed: Mutex<Vec<(ContainerId, i32, String)>>,
    rewrite: Option<String>,
}

impl RecordingScheduleChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rewriting(diagnostic: &str) -> Self {
        Self {
            processed: Mutex::new(Vec::new()),
            rewrite: Some(diagnostic.to_string()),
        }
    }

    pub async fn processed(&self) -> Vec<(ContainerId, i32, String)> {
        self.processed.lock().await.clone()
    }
}

#[async_trait]
impl ScheduleChain for RecordingScheduleChain {
    async fn process_released_container(
        &self,
        ctx: &mut ReleasedContainerContext,
    ) -> AmResult<()> {
        self.processed
            .lock()
            .await
            .push((ctx.container.id, ctx.exit_code, ctx.err_msg.clone()));
        if let Some(ref rewrite) = self.rewrite {
            ctx.err_msg = rewrite.clone();
        }
        Ok(())
    }
}

/// Role catalog backed by a fixed table.
#[derive(Default)]
pub struct StaticRoleCatalog {
    roles: BTreeMap<Priority, RoleInfo>,
}

impl StaticRoleCatalog {
    pub fn new(entries: &[(u32, Resource)]) -> Self {
        Self {
            roles: entries
                .iter()
                .map(|(priority, resource)| (Priority(*priority), RoleInfo { resource: *resource }))
                .collect(),
        }
    }
}

impl RoleCatalog for StaticRoleCatalog {
    fn priorities(&self) -> Vec<Priority> {
        self.roles.keys().copied().collect()
    }

    fn role_by_priority(&self, priority: Priority) -> Option<RoleInfo> {
        self.roles.get(&priority).cloned()
    }
}

/// Blacklist tracker that replays a scripted sequence of views, then keeps
/// returning the last one.
#[derive(Default)]
pub struct ScriptedBlacklistTracker {
    script: std::sync::Mutex<VecDeque<BTreeSet<String>>>,
    current: std::sync::Mutex<BTreeSet<String>>,
}

impl ScriptedBlacklistTracker {
    pub fn new(views: &[&[&str]]) -> Self {
        let script = views
            .iter()
            .map(|view| view.iter().map(|node| (*node).to_string()).collect())
            .collect();
        Self {
            script: std::sync::Mutex::new(script),
            current: std::sync::Mutex::new(BTreeSet::new()),
        }
    }
}

impl BlacklistTracker for ScriptedBlacklistTracker {
    fn node_blacklist(&self) -> BTreeSet<String> {
        let mut script = self.script.lock().expect("script lock");
        let mut current = self.current.lock().expect("current lock");
        if let Some(next) = script.pop_front() {
            *current = next;
        }
        current.clone()
    }
}

/// Fixed progress fraction.
pub struct FixedProgress(pub f32);

impl ProgressSource for FixedProgress {
    fn progress(&self) -> f32 {
        self.0
    }
}

/// Allocation policy that admits every grant into the registry and counts
/// demand solicitations.
pub struct AdmitAllPolicy {
    registry: Arc<ContainerRegistry>,
    asks: AtomicUsize,
}

impl AdmitAllPolicy {
    pub fn new(registry: Arc<ContainerRegistry>) -> Self {
        Self {
            registry,
            asks: AtomicUsize::new(0),
        }
    }

    pub fn asks(&self) -> usize {
        self.asks.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AllocationPolicy for AdmitAllPolicy {
    async fn handle_allocation(&self, response: &AllocateResponse) -> AmResult<()> {
        for granted in &response.allocated {
            self.registry.insert(granted.clone()).await;
        }
        Ok(())
    }

    async fn ask_for_containers(&self) -> AmResult<()> {
        self.asks.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Everything a scenario test needs, wired together.
pub struct Harness {
    pub manager: Arc<ContainerManager>,
    pub registry: Arc<ContainerRegistry>,
    pub rm: Arc<MockRmClient>,
    pub executors: Arc<MockExecutorManager>,
    pub chain: Arc<RecordingScheduleChain>,
    pub policy: Arc<AdmitAllPolicy>,
    pub events: mpsc::Receiver<MasterEvent>,
}

pub struct HarnessBuilder {
    config: ContainerManagerConfig,
    roles: Vec<(u32, Resource)>,
    tracker: Option<Arc<ScriptedBlacklistTracker>>,
    chain: Option<RecordingScheduleChain>,
}

impl Default for HarnessBuilder {
    fn default() -> Self {
        Self {
            config: ContainerManagerConfig::default(),
            roles: vec![(10, Resource::new(2048, 2))],
            tracker: None,
            chain: None,
        }
    }
}

impl HarnessBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate_interval_secs(mut self, secs: u64) -> Self {
        self.config.allocate_interval_secs = secs;
        self
    }

    pub fn enable_update_resource(mut self) -> Self {
        self.config.enable_update_resource = true;
        self
    }

    pub fn roles(mut self, roles: &[(u32, Resource)]) -> Self {
        self.roles = roles.to_vec();
        self
    }

    pub fn blacklist_tracker(mut self, tracker: Arc<ScriptedBlacklistTracker>) -> Self {
        self.tracker = Some(tracker);
        self
    }

    pub fn schedule_chain(mut self, chain: RecordingScheduleChain) -> Self {
        self.chain = Some(chain);
        self
    }

    pub fn build(self) -> Harness {
        let registry = Arc::new(ContainerRegistry::new());
        let rm = Arc::new(MockRmClient::new());
        let executors = Arc::new(MockExecutorManager::new());
        let chain = Arc::new(self.chain.unwrap_or_default());
        let policy = Arc::new(AdmitAllPolicy::new(registry.clone()));
        let roles = Arc::new(StaticRoleCatalog::new(&self.roles));
        let (event_tx, events) = mpsc::channel(64);

        let master = MasterConfig {
            application_id: "application_1700000000000_0001".to_string(),
            host: "am-host".to_string(),
            port: 8030,
            tracking_url: "http://am-host:8088/proxy".to_string(),
        };

        let mut manager = ContainerManager::new(
            master,
            self.config,
            registry.clone(),
            rm.clone(),
            executors.clone(),
            chain.clone(),
            policy.clone(),
            roles,
            Arc::new(FixedProgress(0.5)),
            event_tx,
        );
        if let Some(tracker) = self.tracker {
            manager = manager.with_blacklist_tracker(tracker);
        }

        Harness {
            manager: Arc::new(manager),
            registry,
            rm,
            executors,
            chain,
            policy,
            events,
        }
    }
}
