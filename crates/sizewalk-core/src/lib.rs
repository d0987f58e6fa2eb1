/// SizeWalk Core: concurrent disk usage tree engine.
///
/// This crate contains all business logic with zero UI dependencies.
/// Any frontend (GUI, CLI, TUI) can drive it: call [`scanner::build_tree`],
/// keep the returned [`WalkHandle`]'s root, and re-read it whenever its
/// `updates` channel wakes you up.
///
/// # Modules
///
/// - [`model`]: The shared `Node` tree and byte-size formatting.
/// - [`scanner`]: Background fan-out walk, aggregation, completion join and notifier.
/// - [`analysis`]: Point-in-time summaries over a (possibly still growing) tree.
/// - [`error`]: Root and per-node error types.
pub mod analysis;
pub mod error;
pub mod model;
pub mod scanner;

pub use error::{NodeError, NodeErrorKind, RootError};
pub use model::Node;
pub use scanner::{build_tree, build_tree_with, ScanOptions, WalkHandle};
