/// Error types for the walk.
///
/// Two very different failure classes exist:
/// - [`RootError`] is fatal and synchronous. It is returned from
///   [`build_tree`](crate::scanner::build_tree) before any background work starts.
/// - [`NodeError`] is node-local. It is recorded on the node that failed and
///   never travels up the tree or stops the walk.
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure to start a walk.
#[derive(Error, Debug)]
pub enum RootError {
    /// The root path could not be stat-ed (missing, permission, broken link).
    #[error("cannot access '{}': {source}", .path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The root exists but is not a directory.
    #[error("'{}' is not a directory", .path.display())]
    NotADirectory { path: PathBuf },

    /// The root could not be turned into an absolute path.
    #[error("cannot resolve '{}' to an absolute path: {source}", .path.display())]
    Resolve {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The walk thread pool could not be created.
    #[error("failed to start walk thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// The completion supervisor thread could not be spawned.
    #[error("failed to spawn completion supervisor: {0}")]
    Supervisor(#[source] io::Error),
}

/// Which filesystem operation failed for a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeErrorKind {
    /// The directory's entries could not be enumerated.
    Listing,
    /// The file's metadata (size) could not be read.
    Metadata,
}

/// A failure recorded on a single node.
#[derive(Error, Debug)]
pub enum NodeError {
    #[error("cannot list directory: {source}")]
    Listing {
        #[source]
        source: io::Error,
    },

    #[error("cannot read file size: {source}")]
    Metadata {
        #[source]
        source: io::Error,
    },
}

impl NodeError {
    pub fn kind(&self) -> NodeErrorKind {
        match self {
            Self::Listing { .. } => NodeErrorKind::Listing,
            Self::Metadata { .. } => NodeErrorKind::Metadata,
        }
    }

    /// The underlying I/O error.
    pub fn io_error(&self) -> &io::Error {
        match self {
            Self::Listing { source } | Self::Metadata { source } => source,
        }
    }
}
