//! Generational arena holding the live scene

use crate::component::ComponentInstance;
use crate::error::SceneError;
use crate::id::NodeId;
use crate::node::SceneNode;
use crate::path::NodePath;

/// The live scene graph
///
/// Nodes live in a generational arena. Each non-root node has exactly one
/// parent and appears exactly once in that parent's child list; removing a
/// node removes its whole subtree. Roots are kept in registration order.
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    nodes: Vec<Option<SceneNode>>,
    generations: Vec<u32>,
    free_indices: Vec<usize>,
    roots: Vec<NodeId>,
}

impl SceneGraph {
    /// Create an empty graph
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live nodes (roots, descendants and detached nodes)
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registered roots in order
    #[inline]
    #[must_use]
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    fn insert(&mut self, node: SceneNode) -> NodeId {
        if let Some(index) = self.free_indices.pop() {
            self.nodes[index] = Some(node);
            return NodeId::from_parts(index as u32, self.generations[index]);
        }
        let index = self.nodes.len();
        self.nodes.push(Some(node));
        self.generations.push(0);
        NodeId::from_parts(index as u32, 0)
    }

    /// Create a node and register it as a root
    pub fn add_root(&mut self, name: impl Into<String>) -> NodeId {
        let id = self.insert(SceneNode::new(name));
        self.roots.push(id);
        id
    }

    /// Create a node as the last child of `parent`
    pub fn add_child(&mut self, parent: NodeId, name: impl Into<String>) -> Result<NodeId, SceneError> {
        if !self.contains(parent) {
            return Err(SceneError::not_found(parent));
        }
        let mut node = SceneNode::new(name);
        node.parent = Some(parent);
        let id = self.insert(node);
        if let Some(p) = self.get_mut(parent) {
            p.children.push(id);
        }
        Ok(id)
    }

    /// Create a parentless node that is not part of the root set
    ///
    /// Hosts use this for objects that exist outside the loaded scene.
    pub fn add_detached(&mut self, name: impl Into<String>) -> NodeId {
        self.insert(SceneNode::new(name))
    }

    /// Add a parentless node to the root set
    pub fn register_root(&mut self, id: NodeId) -> Result<(), SceneError> {
        let node = self.node(id)?;
        if node.parent.is_some() || self.roots.contains(&id) {
            return Ok(());
        }
        self.roots.push(id);
        Ok(())
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Get a node, `None` if the handle is stale
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        let index = id.index() as usize;
        if self.generations.get(index) != Some(&id.generation()) {
            return None;
        }
        self.nodes[index].as_ref()
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        let index = id.index() as usize;
        if self.generations.get(index) != Some(&id.generation()) {
            return None;
        }
        self.nodes[index].as_mut()
    }

    /// Get a node or a not-found error
    pub fn node(&self, id: NodeId) -> Result<&SceneNode, SceneError> {
        self.get(id).ok_or_else(|| SceneError::not_found(id))
    }

    pub fn node_mut(&mut self, id: NodeId) -> Result<&mut SceneNode, SceneError> {
        self.get_mut(id).ok_or_else(|| SceneError::not_found(id))
    }

    /// Iterate all live nodes in arena order
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SceneNode)> {
        self.nodes.iter().enumerate().filter_map(|(index, node)| {
            node.as_ref()
                .map(|n| (NodeId::from_parts(index as u32, self.generations[index]), n))
        })
    }

    /// Parentless nodes outside the root set
    #[must_use]
    pub fn detached(&self) -> Vec<NodeId> {
        self.iter()
            .filter(|(id, n)| n.parent.is_none() && !self.roots.contains(id))
            .map(|(id, _)| id)
            .collect()
    }

    /// Path of a live node
    #[must_use]
    pub fn path_of(&self, id: NodeId) -> Option<NodePath> {
        let mut segments = Vec::new();
        let mut current = Some(id);
        while let Some(cur) = current {
            let node = self.get(cur)?;
            segments.push(node.name().to_string());
            current = node.parent;
        }
        segments.reverse();
        Some(NodePath::new(segments))
    }

    /// Depth of a node, roots are at depth 0
    #[must_use]
    pub fn depth_of(&self, id: NodeId) -> Option<usize> {
        self.path_of(id).map(|p| p.len().saturating_sub(1))
    }

    /// Find a node by path; with duplicate sibling names the first match wins
    #[must_use]
    pub fn find(&self, path: &NodePath) -> Option<NodeId> {
        let (first, rest) = path.segments().split_first()?;
        let mut current = *self
            .roots
            .iter()
            .find(|id| self.get(**id).is_some_and(|n| n.name() == first))?;
        for segment in rest {
            let node = self.get(current)?;
            current = *node
                .children
                .iter()
                .find(|id| self.get(**id).is_some_and(|n| n.name() == segment))?;
        }
        Some(current)
    }

    /// Parse and resolve a path string
    pub fn resolve(&self, path: &str) -> Result<NodeId, SceneError> {
        let parsed: NodePath = path.parse()?;
        if parsed.is_empty() {
            return Err(SceneError::InvalidPath {
                path: path.to_string(),
                reason: "path is empty".to_string(),
            });
        }
        self.find(&parsed).ok_or_else(|| SceneError::not_found(path))
    }

    /// Whether `ancestor` is `id` or above it
    #[must_use]
    pub fn is_ancestor_or_self(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(cur) = current {
            if cur == ancestor {
                return true;
            }
            current = self.get(cur).and_then(|n| n.parent);
        }
        false
    }

    fn detach(&mut self, id: NodeId) {
        let parent = self.get(id).and_then(|n| n.parent);
        match parent {
            Some(p) => {
                if let Some(parent) = self.get_mut(p) {
                    parent.children.retain(|c| *c != id);
                }
            }
            None => self.roots.retain(|r| *r != id),
        }
        if let Some(node) = self.get_mut(id) {
            node.parent = None;
        }
    }

    /// Remove a node and its whole subtree, returning the number removed
    pub fn remove(&mut self, id: NodeId) -> Result<usize, SceneError> {
        if !self.contains(id) {
            return Err(SceneError::not_found(id));
        }
        self.detach(id);

        let mut removed = 0;
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            let index = cur.index() as usize;
            if let Some(node) = self.nodes[index].take() {
                stack.extend(node.children);
                self.generations[index] = self.generations[index].wrapping_add(1);
                self.free_indices.push(index);
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Move a node under `new_parent`, or into the root set when `None`
    pub fn reparent(&mut self, id: NodeId, new_parent: Option<NodeId>) -> Result<(), SceneError> {
        if !self.contains(id) {
            return Err(SceneError::not_found(id));
        }
        if let Some(parent) = new_parent {
            if !self.contains(parent) {
                return Err(SceneError::not_found(parent));
            }
            if self.is_ancestor_or_self(id, parent) {
                return Err(SceneError::CycleRejected {
                    node: self.describe(id),
                    parent: self.describe(parent),
                });
            }
        }

        self.detach(id);
        match new_parent {
            Some(parent) => {
                if let Some(p) = self.get_mut(parent) {
                    p.children.push(id);
                }
                if let Some(node) = self.get_mut(id) {
                    node.parent = Some(parent);
                }
            }
            None => self.roots.push(id),
        }
        Ok(())
    }

    /// Rename a node
    pub fn rename(&mut self, id: NodeId, name: impl Into<String>) -> Result<(), SceneError> {
        self.node_mut(id)?.set_name(name);
        Ok(())
    }

    /// Attach a component, returning its slot index
    pub fn attach(&mut self, id: NodeId, component: ComponentInstance) -> Result<usize, SceneError> {
        Ok(self.node_mut(id)?.push_component(component))
    }

    /// Path string for messages, falling back to the handle
    #[must_use]
    pub fn describe(&self, id: NodeId) -> String {
        self.path_of(id)
            .map(|p| p.to_string())
            .unwrap_or_else(|| id.to_string())
    }
}
