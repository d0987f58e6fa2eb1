/// Analysis modules: summaries computed over a snapshot of the tree.
///
/// Safe to call while a walk is still running; results then describe
/// whatever has been discovered so far.
pub mod summary;
pub mod top_files;

pub use summary::{summarize, TreeSummary};
pub use top_files::{top_files, LargestFile};
