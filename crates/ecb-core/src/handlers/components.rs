//! Component commands

use super::{check_name, display_value, locate, read_members, read_raw};
use crate::command::Command;
use crate::dispatcher::HandlerContext;
use crate::error::BridgeError;
use ecb_reflect::{accessor, ReflectError, Reflected, NODE_TYPE};
use ecb_scene::{ComponentSlot, PropertyValue, ValueType};
use serde_json::{json, Value};

fn slot_lost(index: usize) -> BridgeError {
    BridgeError::Internal(format!("component slot {index} vanished during the command"))
}

pub(super) fn add_component(ctx: &mut HandlerContext<'_>, command: &Command) -> Result<Value, BridgeError> {
    let path = command.require(0, "path")?;
    let type_name = command.require(1, "type")?;
    let registry = ctx.registry();
    let graph = ctx.graph_mut();

    let id = graph.resolve(path)?;
    let descriptor = registry.resolve(type_name)?;
    let index = graph.attach(id, descriptor.construct())?;
    Ok(json!({
        "path": graph.describe(id),
        "type": registry.display_name(&descriptor.qualified_name()),
        "index": index,
    }))
}

pub(super) fn remove_component(ctx: &mut HandlerContext<'_>, command: &Command) -> Result<Value, BridgeError> {
    let path = command.require(0, "path")?;
    let type_name = command.require(1, "type")?;
    let registry = ctx.registry();
    let graph = ctx.graph_mut();

    let id = graph.resolve(path)?;
    let located = locate(registry, graph, id, type_name)?;
    let removed = graph.node_mut(id)?.remove_component(located.index).is_some();
    Ok(json!({
        "path": graph.describe(id),
        "type": located.type_name,
        "removed": removed,
    }))
}

pub(super) fn get_component(ctx: &mut HandlerContext<'_>, command: &Command) -> Result<Value, BridgeError> {
    let path = command.require(0, "path")?;
    let type_name = command.require(1, "type")?;
    let registry = ctx.registry();
    let graph = ctx.graph();

    let id = graph.resolve(path)?;
    let located = locate(registry, graph, id, type_name)?;
    let instance = graph
        .node(id)?
        .components()
        .get(located.index)
        .and_then(ComponentSlot::instance)
        .ok_or_else(|| slot_lost(located.index))?;

    let properties = match located.descriptor {
        Some(descriptor) => read_members(graph, &Reflected::new(descriptor, instance)),
        None => read_raw(graph, instance),
    };
    Ok(json!({
        "path": graph.describe(id),
        "type": located.type_name,
        "properties": properties,
    }))
}

/// Set one member of a component, or of the node itself for type `Node`
///
/// Object-reference members take a node path; `null` clears them.
pub(super) fn set_property(ctx: &mut HandlerContext<'_>, command: &Command) -> Result<Value, BridgeError> {
    let path = command.require(0, "path")?;
    let type_name = command.require(1, "type")?;
    let property = command.require(2, "property")?;
    let raw = command.require(3, "value")?;
    let registry = ctx.registry();
    let graph = ctx.graph_mut();
    let id = graph.resolve(path)?;

    if type_name == NODE_TYPE {
        if property == "name" {
            check_name(raw)?;
        }
        let value = accessor::set(graph.node_mut(id)?, property, raw)?;
        return Ok(json!({
            "path": graph.describe(id),
            "type": NODE_TYPE,
            "property": property,
            "value": display_value(graph, &value),
        }));
    }

    let located = locate(registry, graph, id, type_name)?;
    let descriptor = located
        .descriptor
        .ok_or_else(|| ReflectError::TypeNotFound(type_name.to_string()))?;

    let reference = match descriptor.member(property) {
        Some(member) if member.value_type.is_object_ref() && ecb_reflect::coerce(raw, &ValueType::ObjectRef).is_none() => {
            Some(graph.resolve(raw)?)
        }
        _ => None,
    };

    let value = {
        let instance = graph
            .node_mut(id)?
            .components_mut()
            .get_mut(located.index)
            .and_then(ComponentSlot::instance_mut)
            .ok_or_else(|| slot_lost(located.index))?;
        let mut target = Reflected::new(descriptor, instance);
        match reference {
            Some(referenced) => {
                let value = PropertyValue::ObjectRef(Some(referenced));
                accessor::set_value(&mut target, property, value.clone())?;
                value
            }
            None => accessor::set(&mut target, property, raw)?,
        }
    };

    Ok(json!({
        "path": graph.describe(id),
        "type": located.type_name,
        "property": property,
        "value": display_value(graph, &value),
    }))
}
