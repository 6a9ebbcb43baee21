//! Domain models for the application master.

pub mod config;
pub mod events;
pub mod resources;

pub use config::{Config, ContainerManagerConfig, LogConfig, LogFormat, MasterConfig, RotationPolicy};
pub use events::{ApplicationExitCode, ContainerManagerEvent, ExecutorEvent, MasterEvent};
pub use resources::{
    Container, ContainerId, ContainerStatus, ExecutionKind, ExecutorId, Priority, Resource,
    ResourceUpdateKind,
};
