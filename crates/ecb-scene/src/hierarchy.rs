use crate::error::SceneError;
use crate::graph::SceneGraph;
use crate::id::NodeId;
use serde::Serialize;

/// Nested name/child-count view of a subtree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HierarchyEntry {
    pub name: String,
    pub child_count: usize,
    pub children: Vec<HierarchyEntry>,
}

/// Snapshot the hierarchy below `start`, or below every root when `None`
///
/// Bounded by `max_depth` like [`crate::Traversal`].
pub fn snapshot(graph: &SceneGraph, start: Option<NodeId>, max_depth: usize) -> Result<Vec<HierarchyEntry>, SceneError> {
    match start {
        Some(id) => Ok(vec![entry(graph, id, 0, max_depth)?]),
        None => graph
            .roots()
            .iter()
            .map(|&root| entry(graph, root, 0, max_depth))
            .collect(),
    }
}

fn entry(graph: &SceneGraph, id: NodeId, depth: usize, max_depth: usize) -> Result<HierarchyEntry, SceneError> {
    if depth >= max_depth {
        return Err(SceneError::DepthLimitExceeded { max_depth });
    }
    let node = graph.node(id)?;
    let children = node
        .children()
        .iter()
        .map(|&child| entry(graph, child, depth + 1, max_depth))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(HierarchyEntry {
        name: node.name().to_string(),
        child_count: node.child_count(),
        children,
    })
}
