//! Role-aware allocation policy port.
//!
//! The two extension points of the control loop. Implementations translate
//! role demand into resource-manager asks and admit granted containers into
//! the registry (binding them to executors as they go). Neither call may
//! block the loop for more than roughly one heartbeat period.

use async_trait::async_trait;

use crate::domain::errors::AmResult;
use crate::domain::ports::rm_client::AllocateResponse;

#[async_trait]
pub trait AllocationPolicy: Send + Sync {
    /// Admit freshly allocated containers: decide which grants to keep,
    /// insert them into the registry, and assign them to executors.
    async fn handle_allocation(&self, response: &AllocateResponse) -> AmResult<()>;

    /// Translate current role demand into outstanding container requests.
    /// Not called while the application is shutting down.
    async fn ask_for_containers(&self) -> AmResult<()>;
}
