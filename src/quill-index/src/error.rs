//! Error types for indexing operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for indexing operations.
pub type Result<T> = std::result::Result<T, IndexError>;

/// Errors that can occur while building or loading a codebase index.
#[derive(Debug, Error)]
pub enum IndexError {
    /// The root to index does not exist.
    #[error("root directory does not exist: {0}")]
    RootNotFound(PathBuf),

    /// The root to index is not a directory.
    #[error("path is not a directory: {0}")]
    NotADirectory(PathBuf),

    /// No index has been built yet.
    #[error("no codebase index found; run 'quill index build' first")]
    IndexNotBuilt,

    /// The walk failed partway through.
    #[error("failed to walk codebase: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
