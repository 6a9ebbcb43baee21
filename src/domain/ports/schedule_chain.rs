//! Scheduling-decision chain port.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::errors::AmResult;
use crate::domain::models::Container;
use crate::domain::ports::BlacklistTracker;

/// Context handed down the scheduling chain when a container is released.
///
/// Links in the chain may rewrite `err_msg`; the revised text is what the
/// executor manager ultimately sees.
pub struct ReleasedContainerContext {
    pub container: Container,
    pub exit_code: i32,
    pub err_msg: String,
    pub blacklist: Option<Arc<dyn BlacklistTracker>>,
}

/// Pluggable chain of scheduling decisions reacting to released containers
/// (failure accounting, node blacklisting, diagnostic enrichment).
#[async_trait]
pub trait ScheduleChain: Send + Sync {
    async fn process_released_container(
        &self,
        ctx: &mut ReleasedContainerContext,
    ) -> AmResult<()>;
}
