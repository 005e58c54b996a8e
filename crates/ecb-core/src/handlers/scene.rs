//! Whole-graph queries

use super::{component_label, is_instance_of, to_json};
use crate::command::Command;
use crate::dispatcher::HandlerContext;
use crate::error::BridgeError;
use ecb_scene::{snapshot, ComponentSlot, Visit};
use ecb_validation::ValidationEngine;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;

/// Counts over every reachable node
pub(super) fn scan(ctx: &mut HandlerContext<'_>, _: &Command) -> Result<Value, BridgeError> {
    let mut active_nodes = 0usize;
    let mut total_components = 0usize;
    let mut missing_slots = 0usize;
    let mut component_counts: BTreeMap<String, usize> = BTreeMap::new();
    let registry = ctx.registry();

    let stats = ctx.session().traversal().walk(ctx.graph(), &mut |visit: Visit<'_>| {
        if visit.node.active() {
            active_nodes += 1;
        }
        for slot in visit.node.components() {
            match slot {
                ComponentSlot::Attached(instance) => {
                    total_components += 1;
                    *component_counts.entry(component_label(registry, instance)).or_default() += 1;
                }
                ComponentSlot::Missing { .. } => missing_slots += 1,
            }
        }
    })?;

    Ok(json!({
        "totalNodes": stats.visited,
        "activeNodes": active_nodes,
        "maxDepth": stats.max_depth,
        "totalComponents": total_components,
        "missingComponentSlots": missing_slots,
        "componentCounts": component_counts,
    }))
}

pub(super) fn hierarchy(ctx: &mut HandlerContext<'_>, command: &Command) -> Result<Value, BridgeError> {
    let graph = ctx.graph();
    let start = command.get(0).map(|path| graph.resolve(path)).transpose()?;
    let hierarchy = snapshot(graph, start, ctx.config().max_traversal_depth)?;
    Ok(json!({
        "totalRootObjects": hierarchy.len(),
        "hierarchy": to_json(&hierarchy)?,
    }))
}

pub(super) fn validate(ctx: &mut HandlerContext<'_>, command: &Command) -> Result<Value, BridgeError> {
    let engine = ValidationEngine::new(ctx.registry(), ctx.config().max_traversal_depth);
    let graph = ctx.graph();
    let report = match command.get(0) {
        Some(path) => engine.validate_subtree(graph, graph.resolve(path)?)?,
        None => engine.validate(graph)?,
    };
    tracing::debug!(
        visited = report.total_nodes_visited,
        issues = report.issues.len(),
        warnings = report.warnings.len(),
        "validation finished"
    );
    to_json(&report)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FindBy {
    Name,
    Tag,
    Component,
    Path,
}

impl FindBy {
    fn parse(raw: &str) -> Result<Self, BridgeError> {
        match raw {
            "name" => Ok(FindBy::Name),
            "tag" => Ok(FindBy::Tag),
            "component" => Ok(FindBy::Component),
            "path" => Ok(FindBy::Path),
            other => Err(BridgeError::invalid_argument(format!(
                "find: unknown --by={other}, expected name, tag, component or path"
            ))),
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            FindBy::Name => "name",
            FindBy::Tag => "tag",
            FindBy::Component => "component",
            FindBy::Path => "path",
        }
    }
}

#[derive(Serialize)]
struct Match {
    name: String,
    path: String,
}

/// Matching nodes in traversal order
pub(super) fn find(ctx: &mut HandlerContext<'_>, command: &Command) -> Result<Value, BridgeError> {
    let query = command.require(0, "query")?;
    let by = FindBy::parse(command.get_option("by").unwrap_or("name"))?;
    let graph = ctx.graph();

    let matches: Vec<Match> = if by == FindBy::Path {
        // a path names at most one node; no match is an empty result
        graph
            .resolve(query)
            .ok()
            .and_then(|id| Some((graph.get(id)?, graph.path_of(id)?)))
            .map(|(node, path)| Match {
                name: node.name().to_string(),
                path: path.to_string(),
            })
            .into_iter()
            .collect()
    } else {
        let registry = ctx.registry();
        let component = match by {
            FindBy::Component => Some(registry.resolve(query).ok()),
            _ => None,
        };
        let mut found = Vec::new();
        ctx.session().traversal().walk(graph, &mut |visit: Visit<'_>| {
            let hit = match by {
                FindBy::Name => visit.node.name() == query,
                FindBy::Tag => visit.node.tag() == query,
                FindBy::Component => match component {
                    Some(Some(descriptor)) => visit
                        .node
                        .find_component(|c| is_instance_of(registry, c, descriptor))
                        .is_some(),
                    _ => visit.node.find_component(|c| c.qualified_name() == query).is_some(),
                },
                FindBy::Path => false,
            };
            if hit {
                found.push(Match {
                    name: visit.node.name().to_string(),
                    path: visit.path.to_string(),
                });
            }
        })?;
        found
    };

    Ok(json!({
        "query": query,
        "by": by.as_str(),
        "count": matches.len(),
        "matches": to_json(&matches)?,
    }))
}
