/// Scanner module: builds the live disk usage tree.
///
/// [`build_tree`] validates the root synchronously, hands the root node back
/// straight away and keeps filling the tree in the background:
///
/// - **Walk units** (`walk`): one rayon task per directory, unbounded fan-out.
/// - **Aggregator** ([`aggregate`]): direct file bytes are pushed up the
///   parent chain with atomic adds, so every ancestor holds a live total.
/// - **Completion join** ([`join`]): counts outstanding units; a supervisor
///   thread waits for zero.
/// - **Notifier** (`notify`): coalescing, non-blocking "re-read" ticks on a
///   single-slot channel the walk creates itself, closed exactly once when
///   the join drains.
///
/// There is no cancellation: once started, a walk runs to completion.
pub mod aggregate;
pub mod join;
mod notify;
mod walk;

use crate::error::RootError;
use crate::model::Node;
use compact_str::CompactString;
use crossbeam_channel::Receiver;
use join::CompletionJoin;
use notify::Notifier;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use tracing::info;
use walk::WalkShared;

pub use notify::NOTIFY_CHANNEL_CAPACITY;

/// Tunables for a walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Worker threads in the walk's rayon pool. This sizes the scheduler,
    /// not the number of directory units, which is unbounded.
    pub threads: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            threads: num_cpus::get(),
        }
    }
}

/// A running (or finished) walk.
#[derive(Debug)]
pub struct WalkHandle {
    /// Root of the live tree. Its `children` and `size` (and those of every
    /// descendant) keep changing until `updates` disconnects.
    pub root: Arc<Node>,
    /// Progress ticks, at most [`NOTIFY_CHANNEL_CAPACITY`] pending. Each tick
    /// means "re-read the tree", never "this particular thing happened".
    /// The walk holds the only sender, so disconnection is the one signal
    /// that every size is final.
    pub updates: Receiver<()>,
}

/// Start walking `root` with default options.
///
/// Returns as soon as the root is validated; the tree fills in behind the
/// returned handle.
///
/// Fails synchronously, with nothing started, if `root` does not exist, is
/// not a directory or cannot be made absolute.
pub fn build_tree(root: impl AsRef<Path>) -> Result<WalkHandle, RootError> {
    build_tree_with(root, &ScanOptions::default())
}

/// [`build_tree`] with explicit options.
pub fn build_tree_with(
    root: impl AsRef<Path>,
    options: &ScanOptions,
) -> Result<WalkHandle, RootError> {
    let (name, path) = resolve_root(root.as_ref())?;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.threads.max(1))
        .thread_name(|i| format!("sizewalk-walk-{i}"))
        .build()?;

    info!("Starting walk of {}", path.display());
    let started = Instant::now();

    let root_node = Node::new_root(name, path);
    let (notifier, updates) = Notifier::channel();
    let shared = Arc::new(WalkShared {
        pool,
        join: CompletionJoin::new(),
        notifier,
    });

    // Register the root unit before the supervisor can observe the count.
    let root_unit = shared.join.register();

    let supervisor = Arc::clone(&shared);
    let root_path = root_node.path().to_path_buf();
    thread::Builder::new()
        .name("sizewalk-join".into())
        .spawn(move || {
            supervisor.join.wait();
            supervisor.notifier.close();
            info!(
                "Walk of {} complete in {:?}",
                root_path.display(),
                started.elapsed()
            );
        })
        .map_err(RootError::Supervisor)?;

    walk::spawn_unit(&shared, Arc::clone(&root_node), root_unit);

    Ok(WalkHandle {
        root: root_node,
        updates,
    })
}

/// Validate the requested root and resolve its absolute path and display name.
fn resolve_root(requested: &Path) -> Result<(CompactString, PathBuf), RootError> {
    let meta = fs::metadata(requested).map_err(|source| RootError::NotFound {
        path: requested.to_path_buf(),
        source,
    })?;
    if !meta.is_dir() {
        return Err(RootError::NotADirectory {
            path: requested.to_path_buf(),
        });
    }

    let absolute = std::path::absolute(requested).map_err(|source| RootError::Resolve {
        path: requested.to_path_buf(),
        source,
    })?;
    let path = normalize_lexically(&absolute);
    let name = root_display_name(&path);
    Ok((name, path))
}

/// Drop `.` components and fold `..` into the preceding component.
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Derive a display name for the walk root: its last component, or the
/// whole path for filesystem roots such as `/`.
fn root_display_name(path: &Path) -> CompactString {
    match path.file_name() {
        Some(name) => CompactString::new(name.to_string_lossy()),
        None => CompactString::new(path.to_string_lossy()),
    }
}
