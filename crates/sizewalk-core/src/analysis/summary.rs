/// Whole-tree counters for status displays.
use crate::model::Node;
use std::sync::Arc;

/// Counts over every node below a starting node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeSummary {
    /// Non-directory nodes.
    pub files: u64,
    /// Directory nodes, not counting the starting node itself.
    pub dirs: u64,
    /// Nodes carrying a listing or metadata error, the start node included.
    pub errors: u64,
    /// The starting node's cumulative size.
    pub bytes: u64,
}

/// Count files, directories and failed nodes under `node`.
///
/// Iterative, so very deep trees cannot overflow the stack.
pub fn summarize(node: &Arc<Node>) -> TreeSummary {
    let mut summary = TreeSummary {
        bytes: node.size(),
        ..TreeSummary::default()
    };

    let mut stack = vec![Arc::clone(node)];
    while let Some(current) = stack.pop() {
        if current.has_error() {
            summary.errors += 1;
        }
        for child in current.children() {
            if child.is_dir() {
                summary.dirs += 1;
                stack.push(child);
            } else {
                summary.files += 1;
                if child.has_error() {
                    summary.errors += 1;
                }
            }
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NodeError;
    use crate::scanner::aggregate::propagate;
    use compact_str::CompactString;
    use std::ffi::OsStr;
    use std::io;
    use std::path::PathBuf;

    #[test]
    fn test_summarize_counts_nodes() {
        let root = Node::new_root(CompactString::new("r"), PathBuf::from("/r"));
        let sub = Node::new_child(&root, OsStr::new("sub"), true);
        root.push_child(sub.clone());
        let locked = Node::new_child(&root, OsStr::new("locked"), true);
        locked.set_error(NodeError::Listing {
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        });
        root.push_child(locked);

        for (parent, name, len) in [(&root, "a", 10), (&sub, "b", 5), (&sub, "c", 1)] {
            let f = Node::new_child(parent, OsStr::new(name), false);
            f.add_size(len);
            parent.push_child(f);
        }
        propagate(&root, 10);
        propagate(&sub, 6);

        let summary = summarize(&root);
        assert_eq!(
            summary,
            TreeSummary {
                files: 3,
                dirs: 2,
                errors: 1,
                bytes: 16,
            }
        );
    }
}
