/// Data model for the SizeWalk tree.
///
/// Re-exports the shared node type and byte-size formatting helpers.
pub mod node;
pub mod size;

pub use node::Node;
pub use size::{format_count, format_size, ByteFormat};
