//! Bounded FIFO of containers pending release to the resource manager.
//!
//! Many producers (the event handler, called from external tasks), one
//! consumer (the control loop, which drains the queue wholesale once per
//! heartbeat so released containers are never double-counted).

use std::collections::VecDeque;
use tokio::sync::Mutex;

use crate::domain::models::Container;

#[derive(Debug)]
pub struct ReleaseQueue {
    items: Mutex<VecDeque<Container>>,
    capacity: usize,
}

impl ReleaseQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Mutex::new(VecDeque::with_capacity(capacity.min(64))),
            capacity,
        }
    }

    /// Append a container for release. Returns `false` when the queue is at
    /// capacity; callers log and drop rather than block the event path.
    pub async fn offer(&self, container: Container) -> bool {
        let mut items = self.items.lock().await;
        if items.len() >= self.capacity {
            return false;
        }
        items.push_back(container);
        true
    }

    /// Take everything currently queued, in arrival order.
    pub async fn drain(&self) -> Vec<Container> {
        let mut items = self.items.lock().await;
        items.drain(..).collect()
    }

    pub async fn len(&self) -> usize {
        self.items.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.lock().await.is_empty()
    }
}
