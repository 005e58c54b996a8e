//! Depth-first traversal
//!
//! Pre-order, children in order, every reachable node exactly once. The
//! recursion is bounded by an explicit maximum depth so a pathological graph
//! fails with [`SceneError::DepthLimitExceeded`] instead of exhausting the stack.

use crate::error::SceneError;
use crate::graph::SceneGraph;
use crate::id::NodeId;
use crate::node::SceneNode;
use crate::path::NodePath;

/// One visited node
#[derive(Debug, Clone, Copy)]
pub struct Visit<'a> {
    pub graph: &'a SceneGraph,
    pub id: NodeId,
    pub node: &'a SceneNode,
    pub path: &'a NodePath,
    /// Roots are at depth 0
    pub depth: usize,
}

/// Callback invoked once per visited node
pub trait Visitor {
    fn visit(&mut self, visit: Visit<'_>);
}

impl<F> Visitor for F
where
    F: FnMut(Visit<'_>),
{
    fn visit(&mut self, visit: Visit<'_>) {
        self(visit)
    }
}

/// Aggregate counters of a walk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraversalStats {
    pub visited: usize,
    pub max_depth: usize,
}

/// Bounded depth-first walker
#[derive(Debug, Clone, Copy)]
pub struct Traversal {
    max_depth: usize,
}

impl Default for Traversal {
    fn default() -> Self {
        Self::new(crate::DEFAULT_MAX_DEPTH)
    }
}

impl Traversal {
    /// `max_depth` is the number of levels allowed below and including the roots
    #[inline]
    #[must_use]
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    #[inline]
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Walk every registered root in order
    pub fn walk<V: Visitor + ?Sized>(&self, graph: &SceneGraph, visitor: &mut V) -> Result<TraversalStats, SceneError> {
        let mut stats = TraversalStats::default();
        let mut path = NodePath::root();
        for &root in graph.roots() {
            self.visit_node(graph, root, 0, &mut path, visitor, &mut stats)?;
        }
        Ok(stats)
    }

    /// Walk the subtree rooted at `start`; depth is counted from `start`
    pub fn walk_from<V: Visitor + ?Sized>(
        &self,
        graph: &SceneGraph,
        start: NodeId,
        visitor: &mut V,
    ) -> Result<TraversalStats, SceneError> {
        let mut path = graph
            .path_of(start)
            .and_then(|p| p.parent())
            .ok_or_else(|| SceneError::not_found(start))?;
        let mut stats = TraversalStats::default();
        self.visit_node(graph, start, 0, &mut path, visitor, &mut stats)?;
        Ok(stats)
    }

    fn visit_node<V: Visitor + ?Sized>(
        &self,
        graph: &SceneGraph,
        id: NodeId,
        depth: usize,
        path: &mut NodePath,
        visitor: &mut V,
        stats: &mut TraversalStats,
    ) -> Result<(), SceneError> {
        if depth >= self.max_depth {
            return Err(SceneError::DepthLimitExceeded {
                max_depth: self.max_depth,
            });
        }
        let node = graph.node(id)?;

        path.push(node.name());
        stats.visited += 1;
        stats.max_depth = stats.max_depth.max(depth);
        visitor.visit(Visit {
            graph,
            id,
            node,
            path,
            depth,
        });

        for &child in node.children() {
            self.visit_node(graph, child, depth + 1, path, visitor, stats)?;
        }
        path.pop();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn uniform(depth: u32, branching: usize) -> SceneGraph {
        let mut g = SceneGraph::new();
        if depth == 0 {
            return g;
        }
        let root = g.add_root("n");
        let mut frontier = vec![root];
        for _ in 1..depth {
            let mut next = Vec::new();
            for parent in frontier {
                for i in 0..branching {
                    next.push(g.add_child(parent, format!("n{i}")).unwrap());
                }
            }
            frontier = next;
        }
        g
    }

    #[test]
    fn preorder_with_paths() {
        let mut g = SceneGraph::new();
        let root = g.add_root("root");
        let a = g.add_child(root, "a").unwrap();
        g.add_child(a, "a1").unwrap();
        g.add_child(root, "b").unwrap();

        let mut seen = Vec::new();
        let stats = Traversal::default()
            .walk(&g, &mut |v: Visit<'_>| seen.push((v.path.to_string(), v.depth)))
            .unwrap();

        assert_eq!(stats.visited, 4);
        assert_eq!(stats.max_depth, 2);
        assert_eq!(
            seen,
            vec![
                ("root".to_string(), 0),
                ("root/a".to_string(), 1),
                ("root/a/a1".to_string(), 2),
                ("root/b".to_string(), 1),
            ]
        );
    }

    #[test]
    fn depth_guard_trips() {
        let g = uniform(5, 1);
        assert!(Traversal::new(5).walk(&g, &mut |_: Visit<'_>| {}).is_ok());
        assert_eq!(
            Traversal::new(4).walk(&g, &mut |_: Visit<'_>| {}),
            Err(SceneError::DepthLimitExceeded { max_depth: 4 })
        );
    }

    #[test]
    fn walk_from_subtree_keeps_full_paths() {
        let mut g = SceneGraph::new();
        let root = g.add_root("root");
        let a = g.add_child(root, "a").unwrap();
        g.add_child(a, "a1").unwrap();

        let mut paths = Vec::new();
        let stats = Traversal::default()
            .walk_from(&g, a, &mut |v: Visit<'_>| paths.push(v.path.to_string()))
            .unwrap();
        assert_eq!(stats.visited, 2);
        assert_eq!(paths, vec!["root/a", "root/a/a1"]);
    }

    proptest! {
        #[test]
        fn prop_visits_geometric_sum(depth in 0u32..5, branching in 1usize..5) {
            let g = uniform(depth, branching);
            let mut ids = Vec::new();
            let stats = Traversal::default()
                .walk(&g, &mut |v: Visit<'_>| ids.push(v.id))
                .unwrap();

            let expected: usize = (0..depth).map(|i| branching.pow(i)).sum();
            prop_assert_eq!(stats.visited, expected);

            let unique: std::collections::HashSet<_> = ids.iter().collect();
            prop_assert_eq!(unique.len(), ids.len());
        }
    }
}
