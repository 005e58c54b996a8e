//! Built-in command handlers

mod components;
mod delegated;
mod general;
mod objects;
mod scene;

use crate::command::Command;
use crate::dispatcher::{FnHandler, Handler, HandlerContext};
use crate::error::BridgeError;
use ecb_reflect::{accessor, Reflect, TypeDescriptor, TypeRegistry, UNREADABLE};
use ecb_scene::{ComponentInstance, ComponentSlot, NodeId, PropertyValue, SceneGraph};
use indexmap::IndexMap;
use serde_json::Value;
use std::sync::Arc;

type SyncHandler = fn(&mut HandlerContext<'_>, &Command) -> Result<Value, BridgeError>;

fn sync(f: SyncHandler) -> Arc<dyn Handler> {
    Arc::new(FnHandler::new(f))
}

/// Every command a new dispatcher starts with
pub(crate) fn builtin() -> Vec<(&'static str, Arc<dyn Handler>)> {
    vec![
        ("ping", sync(general::ping)),
        ("list_commands", sync(general::list_commands)),
        ("list_types", sync(general::list_types)),
        ("scan", sync(scene::scan)),
        ("hierarchy", sync(scene::hierarchy)),
        ("validate", sync(scene::validate)),
        ("find", sync(scene::find)),
        ("inspect", sync(objects::inspect)),
        ("create_object", sync(objects::create_object)),
        ("delete_object", sync(objects::delete_object)),
        ("rename_object", sync(objects::rename_object)),
        ("reparent_object", sync(objects::reparent_object)),
        ("set_active", sync(objects::set_active)),
        ("add_component", sync(components::add_component)),
        ("remove_component", sync(components::remove_component)),
        ("get_component", sync(components::get_component)),
        ("set_property", sync(components::set_property)),
        ("build", Arc::new(delegated::BuildHandler) as Arc<dyn Handler>),
        ("run_tests", Arc::new(delegated::RunTestsHandler) as Arc<dyn Handler>),
    ]
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<Value, BridgeError> {
    serde_json::to_value(value).map_err(|e| BridgeError::Internal(format!("cannot encode payload: {e}")))
}

/// Node names end up in paths, so they may not be empty, contain `/`, or
/// start or end with whitespace (paths are trimmed when parsed)
fn check_name(name: &str) -> Result<(), BridgeError> {
    if name.trim().is_empty() {
        return Err(BridgeError::invalid_argument("object name must not be empty"));
    }
    if name != name.trim() {
        return Err(BridgeError::invalid_argument(format!(
            "object name '{name}' must not start or end with whitespace"
        )));
    }
    if name.contains('/') {
        return Err(BridgeError::invalid_argument(format!(
            "object name '{name}' must not contain '/'"
        )));
    }
    Ok(())
}

/// Display form of a value; object references show the path they point at
fn display_value(graph: &SceneGraph, value: &PropertyValue) -> String {
    match value {
        PropertyValue::ObjectRef(Some(id)) => graph
            .path_of(*id)
            .map_or_else(|| "null".to_string(), |p| p.to_string()),
        other => other.to_string(),
    }
}

/// Fail-soft read of every member of `target`
fn read_members<T: Reflect + ?Sized>(graph: &SceneGraph, target: &T) -> IndexMap<String, String> {
    accessor::read_all_values(target)
        .into_iter()
        .map(|(name, value)| {
            let shown = value.map_or_else(|| UNREADABLE.to_string(), |v| display_value(graph, &v));
            (name, shown)
        })
        .collect()
}

/// Raw property bag of a component whose type is not registered
fn read_raw(graph: &SceneGraph, instance: &ComponentInstance) -> IndexMap<String, String> {
    instance
        .values()
        .map(|(name, value)| (name.to_string(), display_value(graph, value)))
        .collect()
}

/// A component located on a node
struct Located<'r> {
    index: usize,
    type_name: String,
    descriptor: Option<&'r TypeDescriptor>,
}

/// Find the first attached component of `type_name` on `node`
///
/// A registered type matches only components of exactly that type, so a
/// bare name shadowed by precedence never reaches a same-named type from a
/// later namespace. A name the registry does not know still matches a
/// component of exactly that name already on the node, so unregistered
/// components stay addressable.
fn locate<'r>(
    registry: &'r TypeRegistry,
    graph: &SceneGraph,
    id: NodeId,
    type_name: &str,
) -> Result<Located<'r>, BridgeError> {
    let node = graph.node(id)?;
    match registry.resolve(type_name) {
        Ok(descriptor) => node
            .find_component(|c| is_instance_of(registry, c, descriptor))
            .map(|(index, _)| Located {
                index,
                type_name: registry.display_name(&descriptor.qualified_name()),
                descriptor: Some(descriptor),
            })
            .ok_or_else(|| BridgeError::ComponentNotFound {
                path: graph.describe(id),
                type_name: type_name.to_string(),
            }),
        Err(unresolved) => node
            .find_component(|c| c.qualified_name() == type_name)
            .map(|(index, _)| Located {
                index,
                type_name: type_name.to_string(),
                descriptor: None,
            })
            .ok_or_else(|| unresolved.into()),
    }
}

fn is_instance_of(registry: &TypeRegistry, instance: &ComponentInstance, descriptor: &TypeDescriptor) -> bool {
    registry
        .descriptor_of(instance)
        .is_ok_and(|d| d.is_same_type(descriptor))
}

/// Name a component is reported under; see [`TypeRegistry::display_name`]
fn component_label(registry: &TypeRegistry, instance: &ComponentInstance) -> String {
    registry.display_name(&instance.qualified_name())
}

fn slot_label(registry: &TypeRegistry, slot: &ComponentSlot) -> Option<String> {
    match slot {
        ComponentSlot::Attached(instance) => Some(component_label(registry, instance)),
        ComponentSlot::Missing { last_type } => last_type.as_deref().map(|t| registry.display_name(t)),
    }
}
