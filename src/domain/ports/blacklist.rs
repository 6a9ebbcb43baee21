//! Node-blacklist source port.

use std::collections::BTreeSet;

/// Source of the node addresses this application refuses to schedule on.
/// The dependency is optional; an absent tracker reads as an empty set.
pub trait BlacklistTracker: Send + Sync {
    fn node_blacklist(&self) -> BTreeSet<String>;
}
