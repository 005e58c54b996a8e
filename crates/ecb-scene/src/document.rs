//! JSON scene documents
//!
//! A serializable stand-in for a host's live scene. Object references are
//! stored as node paths and re-resolved on load; a path that no longer
//! resolves loads as an unset reference. Detached nodes are not saved.

use crate::component::{ComponentInstance, ComponentSlot};
use crate::error::SceneError;
use crate::graph::SceneGraph;
use crate::id::NodeId;
use crate::node::UNTAGGED;
use crate::path::NodePath;
use crate::value::{Color, PropertyValue, Vec3};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Whole-scene document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDocument {
    #[serde(default)]
    pub roots: Vec<NodeDocument>,
}

/// One node and its subtree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDocument {
    pub name: String,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default = "default_tag")]
    pub tag: String,
    #[serde(default)]
    pub layer: i64,
    /// `null` entries are slots that lost a component of unknown type
    #[serde(default)]
    pub components: Vec<Option<ComponentDocument>>,
    #[serde(default)]
    pub children: Vec<NodeDocument>,
}

impl NodeDocument {
    /// Bare node with defaults
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            active: true,
            tag: default_tag(),
            layer: 0,
            components: Vec::new(),
            children: Vec::new(),
        }
    }
}

/// One component slot; `missing` keeps the type a lost component had
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentDocument {
    /// Namespace-qualified unless the type was stored bare
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub missing: bool,
    #[serde(default)]
    pub properties: IndexMap<String, DocValue>,
}

/// Serialized property value; references are paths
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum DocValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Vector3(Vec3),
    Color(Color),
    Enum(String),
    ObjectRef(Option<String>),
    AssetRef(Option<String>),
}

fn default_true() -> bool {
    true
}

fn default_tag() -> String {
    UNTAGGED.to_string()
}

struct PendingRef {
    node: NodeId,
    slot: usize,
    member: String,
    path: String,
}

impl SceneDocument {
    /// Parse a document from JSON text
    pub fn from_json(text: &str) -> Result<Self, SceneError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Pretty JSON text
    pub fn to_json(&self) -> Result<String, SceneError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read a document file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Write a document file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SceneError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Capture the registered roots of a live graph
    #[must_use]
    pub fn from_graph(graph: &SceneGraph) -> Self {
        Self {
            roots: graph
                .roots()
                .iter()
                .filter_map(|&root| capture(graph, root))
                .collect(),
        }
    }

    /// Build a live graph from this document
    pub fn into_graph(self) -> Result<SceneGraph, SceneError> {
        self.into_graph_with_depth(crate::DEFAULT_MAX_DEPTH)
    }

    /// Build a live graph, refusing documents nested `max_depth` levels or deeper
    pub fn into_graph_with_depth(self, max_depth: usize) -> Result<SceneGraph, SceneError> {
        let mut graph = SceneGraph::new();
        let mut pending = Vec::new();

        for root in self.roots {
            let id = graph.add_root(root.name.clone());
            let mut load = Load {
                graph: &mut graph,
                pending: &mut pending,
                max_depth,
            };
            load.populate(id, root, 0)?;
        }

        for link in pending {
            let target = link
                .path
                .parse::<NodePath>()
                .ok()
                .and_then(|p| graph.find(&p));
            if target.is_none() {
                tracing::debug!(path = %link.path, member = %link.member, "reference did not resolve on load");
            }
            let component = graph
                .get_mut(link.node)
                .and_then(|n| n.components_mut().get_mut(link.slot))
                .and_then(ComponentSlot::instance_mut);
            if let Some(component) = component {
                component.insert_value(link.member, PropertyValue::ObjectRef(target));
            }
        }

        Ok(graph)
    }
}

fn capture(graph: &SceneGraph, id: NodeId) -> Option<NodeDocument> {
    let node = graph.get(id)?;
    let components = node
        .components()
        .iter()
        .map(|slot| match slot {
            ComponentSlot::Attached(c) => Some(ComponentDocument {
                type_name: c.qualified_name(),
                enabled: c.enabled(),
                missing: false,
                properties: c
                    .values()
                    .map(|(name, value)| (name.to_string(), to_doc(graph, value)))
                    .collect(),
            }),
            ComponentSlot::Missing { last_type } => last_type.as_ref().map(|last| ComponentDocument {
                type_name: last.clone(),
                enabled: true,
                missing: true,
                properties: IndexMap::new(),
            }),
        })
        .collect();

    Some(NodeDocument {
        name: node.name().to_string(),
        active: node.active(),
        tag: node.tag().to_string(),
        layer: node.layer(),
        components,
        children: node
            .children()
            .iter()
            .filter_map(|&child| capture(graph, child))
            .collect(),
    })
}

fn to_doc(graph: &SceneGraph, value: &PropertyValue) -> DocValue {
    match value {
        PropertyValue::Bool(v) => DocValue::Bool(*v),
        PropertyValue::Int(v) => DocValue::Int(*v),
        PropertyValue::Float(v) => DocValue::Float(*v),
        PropertyValue::String(v) => DocValue::String(v.clone()),
        PropertyValue::Vector3(v) => DocValue::Vector3(*v),
        PropertyValue::Color(v) => DocValue::Color(*v),
        PropertyValue::Enum(v) => DocValue::Enum(v.clone()),
        PropertyValue::ObjectRef(target) => {
            DocValue::ObjectRef(target.and_then(|id| graph.path_of(id)).map(|p| p.to_string()))
        }
        PropertyValue::AssetRef(v) => DocValue::AssetRef(v.clone()),
    }
}

struct Load<'a> {
    graph: &'a mut SceneGraph,
    pending: &'a mut Vec<PendingRef>,
    max_depth: usize,
}

impl Load<'_> {
    fn populate(&mut self, id: NodeId, doc: NodeDocument, depth: usize) -> Result<(), SceneError> {
        if depth >= self.max_depth {
            return Err(SceneError::DepthLimitExceeded {
                max_depth: self.max_depth,
            });
        }

        let node = self.graph.node_mut(id)?;
        node.set_active(doc.active);
        node.set_tag(doc.tag);
        node.set_layer(doc.layer);

        for (slot, component) in doc.components.into_iter().enumerate() {
            let component = match component {
                None => {
                    node.push_component(ComponentSlot::Missing { last_type: None });
                    continue;
                }
                Some(component) if component.missing => {
                    node.push_component(ComponentSlot::Missing {
                        last_type: Some(component.type_name),
                    });
                    continue;
                }
                Some(component) => component,
            };
            let mut instance = ComponentInstance::from_qualified(&component.type_name);
            instance.set_enabled(component.enabled);
            for (member, value) in component.properties {
                let value = match value {
                    DocValue::Bool(v) => PropertyValue::Bool(v),
                    DocValue::Int(v) => PropertyValue::Int(v),
                    DocValue::Float(v) => PropertyValue::Float(v),
                    DocValue::String(v) => PropertyValue::String(v),
                    DocValue::Vector3(v) => PropertyValue::Vector3(v),
                    DocValue::Color(v) => PropertyValue::Color(v),
                    DocValue::Enum(v) => PropertyValue::Enum(v),
                    DocValue::AssetRef(v) => PropertyValue::AssetRef(v),
                    DocValue::ObjectRef(None) => PropertyValue::ObjectRef(None),
                    DocValue::ObjectRef(Some(path)) => {
                        self.pending.push(PendingRef {
                            node: id,
                            slot,
                            member: member.clone(),
                            path,
                        });
                        PropertyValue::ObjectRef(None)
                    }
                };
                instance.insert_value(member, value);
            }
            node.push_component(instance);
        }

        for child in doc.children {
            let child_id = self.graph.add_child(id, child.name.clone())?;
            self.populate(child_id, child, depth + 1)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const DOC: &str = r#"{
        "roots": [{
            "name": "root",
            "components": [
                { "type": "Camera", "properties": {
                    "fieldOfView": { "type": "float", "value": 60.0 },
                    "target": { "type": "objectRef", "value": "root/player" }
                }},
                null
            ],
            "children": [{ "name": "player", "active": false }]
        }]
    }"#;

    #[test]
    fn load_resolves_references_by_path() {
        let graph = SceneDocument::from_json(DOC).unwrap().into_graph().unwrap();
        let root = graph.resolve("root").unwrap();
        let player = graph.resolve("root/player").unwrap();

        let node = graph.get(root).unwrap();
        assert_eq!(node.components().len(), 2);
        assert!(node.components()[1].is_missing());

        let (_, camera) = node.component("Camera").unwrap();
        assert_eq!(camera.value("target"), Some(&PropertyValue::ObjectRef(Some(player))));
        assert!(!graph.get(player).unwrap().active());
    }

    #[test]
    fn save_then_load_preserves_document() {
        let doc = SceneDocument::from_json(DOC).unwrap();
        let graph = doc.clone().into_graph().unwrap();
        assert_eq!(SceneDocument::from_graph(&graph), doc);
    }

    #[test]
    fn unresolved_reference_loads_unset() {
        let text = r#"{ "roots": [{ "name": "root", "components": [
            { "type": "Camera", "properties": { "target": { "type": "objectRef", "value": "ghost" } } }
        ]}]}"#;
        let graph = SceneDocument::from_json(text).unwrap().into_graph().unwrap();
        let root = graph.resolve("root").unwrap();
        let (_, camera) = graph.get(root).unwrap().component("Camera").unwrap();
        assert_eq!(camera.value("target"), Some(&PropertyValue::ObjectRef(None)));
    }

    #[test]
    fn file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.json");
        let doc = SceneDocument::from_json(DOC).unwrap();
        doc.save(&path).unwrap();
        assert_eq!(SceneDocument::load(&path).unwrap(), doc);
    }

    #[test]
    fn nesting_past_the_depth_limit_is_refused() {
        let mut leaf = NodeDocument::named("c");
        leaf.children.push(NodeDocument::named("d"));
        let mut middle = NodeDocument::named("b");
        middle.children.push(leaf);
        let mut root = NodeDocument::named("a");
        root.children.push(middle);
        let doc = SceneDocument { roots: vec![root] };

        assert_eq!(
            doc.clone().into_graph_with_depth(3).unwrap_err(),
            SceneError::DepthLimitExceeded { max_depth: 3 }
        );
        assert_eq!(doc.into_graph_with_depth(4).unwrap().len(), 4);
    }

    #[test]
    fn lost_component_type_and_namespace_survive_a_save() {
        let mut graph = SceneGraph::new();
        let root = graph.add_root("root");
        let node = graph.node_mut(root).unwrap();
        node.push_component(ComponentInstance::new("Camera").with_namespace("user"));
        node.push_component(ComponentInstance::new("Light").with_namespace("engine"));
        node.push_component(ComponentSlot::Missing { last_type: None });
        assert!(node.lose_component(1));

        let text = SceneDocument::from_graph(&graph).to_json().unwrap();
        assert!(text.contains("\"missing\": true"), "{text}");
        let loaded = SceneDocument::from_json(&text).unwrap().into_graph().unwrap();
        let slots = loaded.get(loaded.resolve("root").unwrap()).unwrap().components();

        assert_eq!(slots.len(), 3);
        assert_eq!(slots[0].instance().unwrap().qualified_name(), "user::Camera");
        assert_eq!(
            slots[1],
            ComponentSlot::Missing {
                last_type: Some("engine::Light".to_string())
            }
        );
        assert_eq!(slots[2], ComponentSlot::Missing { last_type: None });
    }
}
