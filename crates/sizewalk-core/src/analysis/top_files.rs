/// Top-N largest files analysis.
///
/// Collects individual files (not directories) from a tree snapshot for a
/// "biggest offenders" listing.
use crate::model::Node;
use std::cmp::Reverse;
use std::path::PathBuf;
use std::sync::Arc;

/// A single entry in the "largest files" results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LargestFile {
    pub path: PathBuf,
    pub size: u64,
}

/// Get the `n` largest files under `node`, largest first. Ties are broken by
/// path so the result is stable.
pub fn top_files(node: &Arc<Node>, n: usize) -> Vec<LargestFile> {
    if n == 0 {
        return Vec::new();
    }

    let mut files = Vec::new();
    let mut stack = vec![Arc::clone(node)];
    while let Some(current) = stack.pop() {
        for child in current.children() {
            if child.is_dir() {
                stack.push(child);
            } else if !child.has_error() {
                files.push(LargestFile {
                    path: child.path().to_path_buf(),
                    size: child.size(),
                });
            }
        }
    }

    if files.len() > n {
        // Partial selection: bring the top n to the front, then sort only those.
        files.select_nth_unstable_by_key(n - 1, |f| (Reverse(f.size), f.path.clone()));
        files.truncate(n);
    }
    files.sort_unstable_by(|a, b| b.size.cmp(&a.size).then_with(|| a.path.cmp(&b.path)));
    files
}
