use serde::{Deserialize, Serialize};
use std::fmt;

/// Generational handle to a node in a [`crate::SceneGraph`]
///
/// A handle stays unique after its node is removed: the slot's generation
/// is bumped, so stale handles never alias a newer node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    #[inline]
    pub(crate) fn from_parts(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Arena slot index
    #[inline]
    #[must_use]
    pub fn index(self) -> u32 {
        self.index
    }

    /// Slot generation at creation time
    #[inline]
    #[must_use]
    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}
