/// A single file or directory in the live tree.
///
/// Ownership runs strictly downwards: each node owns its children through
/// the `Arc`s held in its `children` vector and the caller owns the root.
/// The `parent` link is a `Weak`, so it is only good for as long as the
/// caller keeps the root alive and never extends an ancestor's lifetime.
///
/// Field access rules while a walk is running:
///
/// | field      | writers                              | readers see                    |
/// |------------|--------------------------------------|--------------------------------|
/// | `children` | the one unit that owns this node     | a growing, append-only prefix  |
/// | `size`     | every unit below this node (atomic)  | a lower bound until completion |
/// | `error`    | the one unit that owns this node     | unset, then set once           |
use crate::error::NodeError;
use compact_str::CompactString;
use parking_lot::RwLock;
use std::cmp::Reverse;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock, Weak};

#[derive(Debug)]
pub struct Node {
    /// File or directory name only. Lossy for non-UTF-8 names; `path` keeps
    /// the exact bytes.
    name: CompactString,

    /// Absolute path.
    path: PathBuf,

    is_dir: bool,

    /// Cumulative byte count of every file discovered so far under this node
    /// (or the file's own length for files).
    size: AtomicU64,

    /// Children in discovery order.
    children: RwLock<Vec<Arc<Node>>>,

    /// Back-reference used for upward aggregation and caller navigation.
    /// Empty for the root.
    parent: Weak<Node>,

    error: OnceLock<NodeError>,
}

impl Node {
    /// Create the root directory node of a walk.
    pub(crate) fn new_root(name: CompactString, path: PathBuf) -> Arc<Self> {
        Arc::new(Self {
            name,
            path,
            is_dir: true,
            size: AtomicU64::new(0),
            children: RwLock::new(Vec::new()),
            parent: Weak::new(),
            error: OnceLock::new(),
        })
    }

    /// Create a child of `parent`. The child is not attached yet; the owning
    /// unit does that with [`Node::push_child`].
    pub(crate) fn new_child(parent: &Arc<Node>, file_name: &OsStr, is_dir: bool) -> Arc<Self> {
        Arc::new(Self {
            name: CompactString::new(file_name.to_string_lossy()),
            path: parent.path.join(file_name),
            is_dir,
            size: AtomicU64::new(0),
            children: RwLock::new(Vec::new()),
            parent: Arc::downgrade(parent),
            error: OnceLock::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_dir(&self) -> bool {
        self.is_dir
    }

    /// Bytes discovered so far. Exact once the walk's notification channel
    /// has been closed.
    #[inline]
    pub fn size(&self) -> u64 {
        self.size.load(Ordering::Relaxed)
    }

    /// Snapshot of the children discovered so far, in discovery order.
    pub fn children(&self) -> Vec<Arc<Node>> {
        self.children.read().clone()
    }

    pub fn child_count(&self) -> usize {
        self.children.read().len()
    }

    /// The parent node, or `None` for the root (or if the tree was dropped).
    pub fn parent(&self) -> Option<Arc<Node>> {
        self.parent.upgrade()
    }

    pub fn is_root(&self) -> bool {
        self.parent.ptr_eq(&Weak::new())
    }

    pub fn error(&self) -> Option<&NodeError> {
        self.error.get()
    }

    pub fn has_error(&self) -> bool {
        self.error.get().is_some()
    }

    /// Children in display order: largest first; on equal size error-free
    /// nodes before failed ones; then by name.
    ///
    /// Sizes are sampled once per child before sorting, so a walk running
    /// concurrently cannot make the comparison inconsistent.
    pub fn children_sorted_by_size(&self) -> Vec<Arc<Node>> {
        let mut children = self.children();
        children.sort_by_cached_key(|child| {
            (Reverse(child.size()), child.has_error(), child.name.clone())
        });
        children
    }

    /// Append a child. Only the unit that owns this node may call this.
    pub(crate) fn push_child(&self, child: Arc<Node>) {
        self.children.write().push(child);
    }

    /// Record the node's failure. The first error wins.
    pub(crate) fn set_error(&self, error: NodeError) {
        if let Err(error) = self.error.set(error) {
            debug_assert!(
                false,
                "error recorded twice on {}: {error}",
                self.path.display()
            );
        }
    }

    /// One atomic add on this node only. Ancestors are handled by
    /// [`crate::scanner::aggregate::propagate`].
    #[inline]
    pub(crate) fn add_size(&self, bytes: u64) {
        self.size.fetch_add(bytes, Ordering::Relaxed);
    }
}
