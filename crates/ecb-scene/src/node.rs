use crate::component::{ComponentInstance, ComponentSlot};
use crate::id::NodeId;

/// Default tag for new nodes
pub(crate) const UNTAGGED: &str = "Untagged";

/// A node of the live scene graph
///
/// Structure (`parent`, `children`) is only changed through
/// [`crate::SceneGraph`]; the parent link is a non-owning id.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    name: String,
    active: bool,
    tag: String,
    layer: i64,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    components: Vec<ComponentSlot>,
}

impl SceneNode {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            active: true,
            tag: UNTAGGED.to_string(),
            layer: 0,
            parent: None,
            children: Vec::new(),
            components: Vec::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename in place; prefer [`crate::SceneGraph::rename`]
    #[inline]
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    #[inline]
    #[must_use]
    pub fn active(&self) -> bool {
        self.active
    }

    #[inline]
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    #[inline]
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    #[inline]
    pub fn set_tag(&mut self, tag: impl Into<String>) {
        self.tag = tag.into();
    }

    #[inline]
    #[must_use]
    pub fn layer(&self) -> i64 {
        self.layer
    }

    #[inline]
    pub fn set_layer(&mut self, layer: i64) {
        self.layer = layer;
    }

    /// Parent handle, `None` for parentless nodes
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in order
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    #[inline]
    #[must_use]
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Component slots in attachment order
    #[inline]
    #[must_use]
    pub fn components(&self) -> &[ComponentSlot] {
        &self.components
    }

    #[inline]
    pub fn components_mut(&mut self) -> &mut [ComponentSlot] {
        &mut self.components
    }

    /// First attached component with this bare type name, in any namespace
    #[must_use]
    pub fn component(&self, type_name: &str) -> Option<(usize, &ComponentInstance)> {
        self.find_component(|c| c.type_name() == type_name)
    }

    /// First attached component accepted by `predicate`
    pub fn find_component<P>(&self, mut predicate: P) -> Option<(usize, &ComponentInstance)>
    where
        P: FnMut(&ComponentInstance) -> bool,
    {
        self.components
            .iter()
            .enumerate()
            .find_map(|(i, slot)| slot.instance().filter(|c| predicate(c)).map(|c| (i, c)))
    }

    /// First attached component of a type, mutably
    pub fn component_mut(&mut self, type_name: &str) -> Option<(usize, &mut ComponentInstance)> {
        self.components
            .iter_mut()
            .enumerate()
            .find_map(|(i, slot)| {
                slot.instance_mut()
                    .filter(|c| c.type_name() == type_name)
                    .map(|c| (i, c))
            })
    }

    /// Append a slot, returning its index
    pub fn push_component(&mut self, slot: impl Into<ComponentSlot>) -> usize {
        self.components.push(slot.into());
        self.components.len() - 1
    }

    /// Remove the slot at `index`
    pub fn remove_component(&mut self, index: usize) -> Option<ComponentSlot> {
        (index < self.components.len()).then(|| self.components.remove(index))
    }

    /// Replace the slot at `index` with a missing slot, keeping its qualified type name
    pub fn lose_component(&mut self, index: usize) -> bool {
        match self.components.get_mut(index) {
            Some(slot) => {
                let last_type = match slot {
                    ComponentSlot::Attached(c) => Some(c.qualified_name()),
                    ComponentSlot::Missing { last_type } => last_type.clone(),
                };
                *slot = ComponentSlot::Missing { last_type };
                true
            }
            None => false,
        }
    }
}
