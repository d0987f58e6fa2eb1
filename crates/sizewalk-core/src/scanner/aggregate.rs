/// Upward size aggregation.
///
/// Each walk unit sums the bytes of the files it lists directly and pushes
/// that total into its own node and every ancestor with one lock-free
/// `fetch_add` per hop. Any number of units may target the same ancestor at
/// once; the atomic add serialises them without a per-node lock, so no
/// update is lost and every ancestor holds a live lower bound.
use crate::model::Node;
use std::sync::Arc;

/// Add `bytes` to `node` and to every ancestor up to the root.
///
/// Stops early if an ancestor has already been dropped (the caller released
/// the tree while the walk was still running).
pub(crate) fn propagate(node: &Arc<Node>, bytes: u64) {
    if bytes == 0 {
        return;
    }
    node.add_size(bytes);
    let mut current = node.parent();
    while let Some(ancestor) = current {
        ancestor.add_size(bytes);
        current = ancestor.parent();
    }
}
