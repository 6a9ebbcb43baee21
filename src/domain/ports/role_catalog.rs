//! Role catalog port.

use crate::domain::models::{Priority, Resource};

/// Resource spec of one worker role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleInfo {
    pub resource: Resource,
}

/// Catalog of the application's worker roles, keyed by scheduling priority.
pub trait RoleCatalog: Send + Sync {
    /// Every priority currently published. Priorities only ever grow over an
    /// application's lifetime.
    fn priorities(&self) -> Vec<Priority>;

    /// Role bound to a priority, if the priority is published.
    fn role_by_priority(&self, priority: Priority) -> Option<RoleInfo>;
}
