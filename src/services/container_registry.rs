//! Thread-safe bookkeeping of running containers.
//!
//! Two indexes live under one lock: a snapshot map keyed by container id and
//! the per-priority bands. Holding a single write lock across every mutation
//! is what keeps the cross-index invariant (a container is in `by_id` iff it
//! is in exactly the band matching its priority) observable at all times.
//! Ordered maps give deterministic iteration for logs and tests.

use std::collections::{BTreeMap, BTreeSet};
use tokio::sync::RwLock;

use crate::domain::models::{Container, ContainerId, Priority};

#[derive(Debug, Default)]
struct Indexes {
    by_id: BTreeMap<ContainerId, Container>,
    by_priority: BTreeMap<Priority, BTreeSet<ContainerId>>,
}

/// Registry of containers currently granted to this application.
///
/// Written from two contexts only (the event handler and the control loop);
/// readers get copy-on-read snapshots that cannot tear.
#[derive(Debug, Default)]
pub struct ContainerRegistry {
    inner: RwLock<Indexes>,
}

impl ContainerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a container snapshot.
    ///
    /// A second insert with the same id overwrites the snapshot (the path
    /// updated-resource reports take). If the priority changed between
    /// snapshots the container moves bands in the same critical section.
    pub async fn insert(&self, container: Container) {
        let mut inner = self.inner.write().await;
        let old_priority = inner.by_id.get(&container.id).map(|previous| previous.priority);
        if let Some(old_priority) = old_priority {
            if old_priority != container.priority {
                if let Some(band) = inner.by_priority.get_mut(&old_priority) {
                    band.remove(&container.id);
                }
            }
        }
        inner
            .by_priority
            .entry(container.priority)
            .or_default()
            .insert(container.id);
        inner.by_id.insert(container.id, container);
    }

    /// Remove a container from both indexes atomically.
    pub async fn remove_by_id(&self, id: &ContainerId) -> Option<Container> {
        let mut inner = self.inner.write().await;
        let container = inner.by_id.remove(id)?;
        if let Some(band) = inner.by_priority.get_mut(&container.priority) {
            band.remove(id);
        }
        Some(container)
    }

    /// Final sweep of the release path: drop the id from its priority band,
    /// tolerating absence (the registry may already have evicted it). Also
    /// clears a stale snapshot if one is somehow still indexed.
    pub async fn remove_from_band(&self, priority: Priority, id: &ContainerId) -> bool {
        let mut inner = self.inner.write().await;
        inner.by_id.remove(id);
        match inner.by_priority.get_mut(&priority) {
            Some(band) => band.remove(id),
            None => false,
        }
    }

    /// Consistent copy of every running container, ordered by id.
    pub async fn snapshot_all(&self) -> Vec<Container> {
        let inner = self.inner.read().await;
        inner.by_id.values().cloned().collect()
    }

    /// Create an empty band for a newly published priority. Bands are never
    /// removed; priorities are monotonic over an application's lifetime.
    pub async fn ensure_priority(&self, priority: Priority) {
        let mut inner = self.inner.write().await;
        inner.by_priority.entry(priority).or_default();
    }

    pub async fn contains(&self, id: &ContainerId) -> bool {
        self.inner.read().await.by_id.contains_key(id)
    }

    pub async fn get(&self, id: &ContainerId) -> Option<Container> {
        self.inner.read().await.by_id.get(id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.by_id.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.by_id.is_empty()
    }

    /// Every band currently provisioned, in priority order.
    pub async fn priorities(&self) -> Vec<Priority> {
        self.inner.read().await.by_priority.keys().copied().collect()
    }

    /// Ids in one priority band, in id order. Empty for unknown priorities.
    pub async fn band(&self, priority: Priority) -> Vec<ContainerId> {
        let inner = self.inner.read().await;
        inner
            .by_priority
            .get(&priority)
            .map(|band| band.iter().copied().collect())
            .unwrap_or_default()
    }
}
