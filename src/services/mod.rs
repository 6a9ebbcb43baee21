//! Services of the application master's container-management core.

pub mod blacklist_reconciler;
pub mod container_manager;
pub mod container_registry;
pub mod release_queue;
pub mod resource_update;

pub use blacklist_reconciler::{reconcile, BlacklistDelta};
pub use container_manager::{ContainerManager, TickFlow};
pub use container_registry::ContainerRegistry;
pub use release_queue::ReleaseQueue;
pub use resource_update::{classify, round_up_memory, rounded, MEMORY_GRANULARITY_MIB};
