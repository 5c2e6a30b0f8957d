//! Error types for tag lookup and tree construction.

use thiserror::Error;

/// Failure to resolve a tag name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TagError {
    /// The name was empty or only whitespace.
    #[error("tag name must not be empty")]
    EmptyName,
}

/// Failure to build a tree from a node description.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The JSON could not be read as a node description.
    #[error("invalid tree description: {0}")]
    Json(#[from] serde_json::Error),

    /// An element description carried a blank tag name.
    #[error(transparent)]
    Tag(#[from] TagError),
}
