//! Node-level commands

use super::{check_name, read_members, slot_label};
use crate::command::Command;
use crate::dispatcher::HandlerContext;
use crate::error::BridgeError;
use ecb_reflect::accessor;
use ecb_scene::{NodeId, SceneGraph};
use serde_json::{json, Value};

/// `/` or an empty argument addresses the root set
fn parent_of(graph: &SceneGraph, raw: Option<&str>) -> Result<Option<NodeId>, BridgeError> {
    match raw.map(str::trim) {
        None | Some("" | "/") => Ok(None),
        Some(path) => Ok(Some(graph.resolve(path)?)),
    }
}

pub(super) fn inspect(ctx: &mut HandlerContext<'_>, command: &Command) -> Result<Value, BridgeError> {
    let registry = ctx.registry();
    let graph = ctx.graph();
    let id = graph.resolve(command.require(0, "path")?)?;
    let node = graph.node(id)?;

    let components: Vec<Value> = node
        .components()
        .iter()
        .enumerate()
        .map(|(index, slot)| {
            json!({
                "index": index,
                "type": slot_label(registry, slot),
                "missing": slot.is_missing(),
                "enabled": slot.instance().is_some_and(|c| c.enabled()),
            })
        })
        .collect();

    Ok(json!({
        "path": graph.describe(id),
        "properties": read_members(graph, node),
        "components": components,
    }))
}

pub(super) fn create_object(ctx: &mut HandlerContext<'_>, command: &Command) -> Result<Value, BridgeError> {
    let name = command.require(0, "name")?;
    check_name(name)?;

    // resolve every type before touching the graph
    let registry = ctx.registry();
    let descriptors = command
        .get_option("components")
        .map(|list| {
            list.split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(|t| registry.resolve(t))
                .collect::<Result<Vec<_>, _>>()
        })
        .transpose()?
        .unwrap_or_default();

    let graph = ctx.graph_mut();
    let id = match parent_of(graph, command.get(1))? {
        Some(parent) => graph.add_child(parent, name)?,
        None => graph.add_root(name),
    };
    for descriptor in descriptors {
        graph.attach(id, descriptor.construct())?;
    }

    let path = graph.describe(id);
    tracing::debug!(path = %path, "object created");
    Ok(json!({ "path": path, "name": name }))
}

pub(super) fn delete_object(ctx: &mut HandlerContext<'_>, command: &Command) -> Result<Value, BridgeError> {
    let graph = ctx.graph_mut();
    let id = graph.resolve(command.require(0, "path")?)?;
    let path = graph.describe(id);
    let removed = graph.remove(id)?;
    Ok(json!({ "path": path, "removedNodes": removed }))
}

pub(super) fn rename_object(ctx: &mut HandlerContext<'_>, command: &Command) -> Result<Value, BridgeError> {
    let new_name = command.require(1, "newName")?;
    check_name(new_name)?;

    let graph = ctx.graph_mut();
    let id = graph.resolve(command.require(0, "path")?)?;
    let old_path = graph.describe(id);
    graph.rename(id, new_name)?;
    Ok(json!({ "oldPath": old_path, "path": graph.describe(id) }))
}

pub(super) fn reparent_object(ctx: &mut HandlerContext<'_>, command: &Command) -> Result<Value, BridgeError> {
    let graph = ctx.graph_mut();
    let id = graph.resolve(command.require(0, "path")?)?;
    let parent = parent_of(graph, Some(command.require(1, "newParentPath")?))?;
    graph.reparent(id, parent)?;
    Ok(json!({ "path": graph.describe(id) }))
}

pub(super) fn set_active(ctx: &mut HandlerContext<'_>, command: &Command) -> Result<Value, BridgeError> {
    let raw = command.require(1, "active")?;
    let graph = ctx.graph_mut();
    let id = graph.resolve(command.require(0, "path")?)?;
    let value = accessor::set(graph.node_mut(id)?, "active", raw)?;
    Ok(json!({ "path": graph.describe(id), "active": value.as_bool() }))
}
