//! Ports (interfaces) the container manager consumes.

pub mod allocation_policy;
pub mod blacklist;
pub mod executor_manager;
pub mod progress;
pub mod rm_client;
pub mod role_catalog;
pub mod schedule_chain;

pub use allocation_policy::AllocationPolicy;
pub use blacklist::BlacklistTracker;
pub use executor_manager::{ExecutorHandle, ExecutorManager};
pub use progress::ProgressSource;
pub use rm_client::{AllocateResponse, RegisterResponse, RmClient, UpdatedContainer};
pub use role_catalog::{RoleCatalog, RoleInfo};
pub use schedule_chain::{ReleasedContainerContext, ScheduleChain};
