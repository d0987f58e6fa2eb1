/// Per-directory walk unit.
///
/// Every directory gets exactly one unit, spawned onto the walk's rayon
/// pool as soon as its parent lists it. A unit only ever appends to the
/// `children` of its own node, so the per-node lock is never contended by
/// other writers; sizes go through the lock-free aggregator.
use super::aggregate;
use super::join::{CompletionJoin, UnitGuard};
use super::notify::Notifier;
use crate::error::NodeError;
use crate::model::Node;
use rayon::ThreadPool;
use std::fs;
use std::io;
use std::sync::Arc;
use tracing::debug;

/// State shared by all units of one walk.
pub(crate) struct WalkShared {
    pub(crate) pool: ThreadPool,
    pub(crate) join: Arc<CompletionJoin>,
    pub(crate) notifier: Notifier,
}

/// Launch the unit for `dir`. `guard` must already be registered with the
/// walk's join; it is released once the unit has finished.
pub(crate) fn spawn_unit(shared: &Arc<WalkShared>, dir: Arc<Node>, guard: UnitGuard) {
    let unit_shared = Arc::clone(shared);
    shared.pool.spawn(move || {
        process_dir(&unit_shared, &dir);
        drop(guard);
    });
}

/// List `dir`, attach its children, fan out into subdirectories and push
/// the bytes of its direct files up the tree.
fn process_dir(shared: &Arc<WalkShared>, dir: &Arc<Node>) {
    let entries = match fs::read_dir(dir.path()) {
        Ok(entries) => entries,
        Err(source) => {
            debug!("Cannot list {}: {}", dir.path().display(), source);
            dir.set_error(NodeError::Listing { source });
            return;
        }
    };

    let mut direct_bytes: u64 = 0;

    for entry_result in entries {
        let entry = match entry_result {
            Ok(entry) => entry,
            Err(source) => {
                // The stream broke mid-way: keep what was enumerated so far.
                debug!("Listing of {} interrupted: {}", dir.path().display(), source);
                dir.set_error(NodeError::Listing { source });
                break;
            }
        };

        // `file_type` does not follow symlinks, so a link to a directory is
        // measured as a link and never descended into.
        let file_type = entry.file_type();
        let is_dir = file_type.as_ref().is_ok_and(|t| t.is_dir());
        let child = Node::new_child(dir, &entry.file_name(), is_dir);
        dir.push_child(Arc::clone(&child));

        if is_dir {
            let guard = shared.join.register();
            spawn_unit(shared, child, guard);
            continue;
        }

        direct_bytes += record_file_size(&child, file_type.and_then(|_| entry.metadata()));
    }

    aggregate::propagate(dir, direct_bytes);
    shared.notifier.ping();
}

/// Store the outcome of stat-ing a non-directory entry on its node and return
/// the bytes it contributes to its parent. A failed stat contributes nothing.
fn record_file_size(child: &Node, stat: io::Result<fs::Metadata>) -> u64 {
    match stat {
        Ok(meta) => {
            let len = meta.len();
            child.add_size(len);
            len
        }
        Err(source) => {
            debug!("Cannot stat {}: {}", child.path().display(), source);
            child.set_error(NodeError::Metadata { source });
            0
        }
    }
}
