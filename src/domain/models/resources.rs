//! Value types for containers and the resources they occupy.
//!
//! These are immutable snapshots of what the resource manager reports;
//! updates produce new values rather than mutating in place.

use serde::{Deserialize, Serialize};

/// Opaque, totally ordered identifier for a granted container.
///
/// The resource manager mints these; the application master only compares
/// them and uses them as map keys. Ordering is stable across the application
/// lifetime, which keeps registry iteration (and therefore logs and tests)
/// deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ContainerId(pub u64);

impl std::fmt::Display for ContainerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "container_{}", self.0)
    }
}

/// Scheduling band a container belongs to.
///
/// Small non-negative integer assigned per role; priorities are monotonic
/// over an application's lifetime (bands are created, never retired).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Priority(pub u32);

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of an executor bound to a container.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ExecutorId(pub String);

impl std::fmt::Display for ExecutorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A compute resource ask or grant: memory plus virtual cores.
///
/// Equality is component-wise. The all-zero value means unknown/unset and is
/// never compared for update purposes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resource {
    /// Memory in MiB.
    pub memory_mib: u64,
    /// Virtual cores.
    pub vcores: u32,
}

impl Resource {
    pub const fn new(memory_mib: u64, vcores: u32) -> Self {
        Self { memory_mib, vcores }
    }

    /// Partial order: `self` fits in `other` iff every component is `<=`.
    pub fn fits_in(&self, other: &Resource) -> bool {
        self.memory_mib <= other.memory_mib && self.vcores <= other.vcores
    }

    /// True for the all-zero (unknown/unset) resource.
    pub fn is_unset(&self) -> bool {
        self.memory_mib == 0 && self.vcores == 0
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<memory:{} MiB, vcores:{}>", self.memory_mib, self.vcores)
    }
}

/// Immutable snapshot of a granted container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Container {
    pub id: ContainerId,
    pub priority: Priority,
    pub resource: Resource,
    /// HTTP address of the node manager hosting the container.
    pub node_http_address: String,
    /// Resource-manager version of this container, bumped on every accepted
    /// resource update. Update requests must quote the current version.
    pub version: u64,
}

/// Terminal status the resource manager reports for a completed container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerStatus {
    pub id: ContainerId,
    pub exit_status: i32,
    pub diagnostics: String,
}

/// Direction of a container resource change.
///
/// `None` covers equal resources, unset resources, and mixed-dimension
/// changes the resource manager cannot express in a single request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceUpdateKind {
    None,
    Increase,
    Decrease,
}

impl std::fmt::Display for ResourceUpdateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Increase => write!(f, "increase"),
            Self::Decrease => write!(f, "decrease"),
        }
    }
}

/// Execution guarantee requested alongside a container update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionKind {
    Guaranteed,
    Opportunistic,
}
