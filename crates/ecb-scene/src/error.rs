//! Error types for the scene model

/// Scene graph errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SceneError {
    /// No live node at the given id or path
    #[error("object not found: {0}")]
    NodeNotFound(String),

    /// Path could not be parsed
    #[error("invalid node path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    /// Reparenting would make a node its own ancestor
    #[error("cannot move '{node}' under '{parent}': target is inside its own subtree")]
    CycleRejected { node: String, parent: String },

    /// Component slot index out of range
    #[error("component index {index} out of range on '{node}'")]
    ComponentIndex { node: String, index: usize },

    /// Traversal went deeper than allowed
    #[error("traversal exceeded maximum depth of {max_depth}")]
    DepthLimitExceeded { max_depth: usize },

    /// Scene document could not be read or written
    #[error("scene document error: {0}")]
    Document(String),
}

impl SceneError {
    /// Create not-found error for a path or id description
    #[inline]
    pub fn not_found(what: impl std::fmt::Display) -> Self {
        Self::NodeNotFound(what.to_string())
    }
}

impl From<serde_json::Error> for SceneError {
    fn from(value: serde_json::Error) -> Self {
        Self::Document(value.to_string())
    }
}

impl From<std::io::Error> for SceneError {
    fn from(value: std::io::Error) -> Self {
        Self::Document(value.to_string())
    }
}
