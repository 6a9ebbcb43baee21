//! Classification of container resource changes.
//!
//! The resource manager allocates memory in 1 GiB granularity; comparing at
//! finer resolution produces spurious update requests it will reject, so
//! both sides are rounded up to the nearest GiB before comparison.

use crate::domain::models::{Resource, ResourceUpdateKind};

/// Memory allocation granularity of the resource manager, in MiB.
pub const MEMORY_GRANULARITY_MIB: u64 = 1024;

/// Round a memory amount up to the nearest allocation granule.
pub fn round_up_memory(memory_mib: u64) -> u64 {
    memory_mib.div_ceil(MEMORY_GRANULARITY_MIB) * MEMORY_GRANULARITY_MIB
}

/// A resource with its memory rounded up to the allocation granularity.
/// This is the form update requests are issued in.
pub fn rounded(resource: Resource) -> Resource {
    Resource::new(round_up_memory(resource.memory_mib), resource.vcores)
}

/// Decide whether moving a container from `current` to `target` is an
/// increase, a decrease, or nothing to do.
///
/// Unset resources classify as `None` (nothing is known to compare). A
/// mixed-dimension change, one component up and another down, also yields
/// `None`: the resource manager cannot express it in a single request, and
/// classification re-runs next cycle once the role catalog converges.
pub fn classify(current: Resource, target: Resource) -> ResourceUpdateKind {
    if current.is_unset() || target.is_unset() {
        return ResourceUpdateKind::None;
    }

    let current = rounded(current);
    let target = rounded(target);

    let grows = current.fits_in(&target);
    let shrinks = target.fits_in(&current);
    match (grows, shrinks) {
        (true, true) => ResourceUpdateKind::None,
        (false, true) => ResourceUpdateKind::Decrease,
        (true, false) => ResourceUpdateKind::Increase,
        (false, false) => ResourceUpdateKind::None,
    }
}
