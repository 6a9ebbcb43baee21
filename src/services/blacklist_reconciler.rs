//! Node-blacklist delta computation.
//!
//! Stateless except for the remembered view `P`, which the control loop
//! owns: given the tracker's current set `L`, the delta to report is
//! `additions = L \ P` and `removals = P \ L`. Once the resource manager
//! accepts the delta the loop replaces `P` with `L`.

use std::collections::BTreeSet;

/// Additions and removals to report to the resource manager, each in
/// lexicographic node-address order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlacklistDelta {
    pub additions: Vec<String>,
    pub removals: Vec<String>,
}

impl BlacklistDelta {
    pub fn is_empty(&self) -> bool {
        self.additions.is_empty() && self.removals.is_empty()
    }
}

/// Compute the delta between the tracker's current view and the last view
/// the resource manager was told about.
pub fn reconcile(current: &BTreeSet<String>, previous: &BTreeSet<String>) -> BlacklistDelta {
    BlacklistDelta {
        additions: current.difference(previous).cloned().collect(),
        removals: previous.difference(current).cloned().collect(),
    }
}
