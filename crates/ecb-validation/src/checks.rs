//! Per-node checks

use crate::issue::{Category, ValidationIssue};
use ecb_reflect::TypeRegistry;
use ecb_scene::{ComponentSlot, PropertyValue, SceneGraph, Visit};
use std::collections::HashSet;

/// Run every per-node check against one visited node
pub(crate) fn check_node(visit: Visit<'_>, registry: &TypeRegistry, out: &mut Vec<ValidationIssue>) {
    let path = visit.path.to_string();
    let node = visit.node;

    if node.name().trim().is_empty() {
        out.push(ValidationIssue::new(Category::EmptyName, &path, "node has an empty name"));
    }
    if !node.active() {
        out.push(ValidationIssue::new(Category::Inactive, &path, "node is inactive"));
    }

    duplicate_children(visit, &path, out);

    for (index, slot) in node.components().iter().enumerate() {
        match slot {
            ComponentSlot::Missing { last_type } => {
                let was = last_type
                    .as_deref()
                    .map(|t| format!(" (was {})", registry.display_name(t)))
                    .unwrap_or_default();
                out.push(ValidationIssue::new(
                    Category::MissingComponent,
                    &path,
                    format!("component slot {index} has no value{was}"),
                ));
            }
            ComponentSlot::Attached(component) => {
                let type_name = registry.display_name(&component.qualified_name());
                if !component.enabled() {
                    out.push(ValidationIssue::new(
                        Category::DisabledComponent,
                        &path,
                        format!("{type_name} at slot {index} is disabled"),
                    ));
                }

                let Ok(descriptor) = registry.descriptor_of(component) else {
                    out.push(ValidationIssue::new(
                        Category::UnregisteredType,
                        &path,
                        format!("{type_name} at slot {index} is not a registered type; references not checked"),
                    ));
                    continue;
                };

                for member in descriptor.reference_members() {
                    let problem = match component.value(&member.name) {
                        Some(PropertyValue::ObjectRef(Some(id))) if visit.graph.contains(*id) => continue,
                        Some(PropertyValue::ObjectRef(Some(_))) => "references a destroyed object",
                        _ => "references no object",
                    };
                    out.push(ValidationIssue::new(
                        Category::MissingReference,
                        &path,
                        format!("{type_name}.{} {problem}", member.name),
                    ));
                }
            }
        }
    }
}

fn duplicate_children(visit: Visit<'_>, path: &str, out: &mut Vec<ValidationIssue>) {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    for &child in visit.node.children() {
        let Some(name) = visit.graph.get(child).map(|c| c.name()) else {
            continue;
        };
        if !seen.insert(name) && reported.insert(name) {
            out.push(ValidationIssue::new(
                Category::DuplicateSiblingName,
                path,
                format!("more than one child is named '{name}'"),
            ));
        }
    }
}

/// Parentless nodes the host never registered as roots
pub(crate) fn detached_roots(graph: &SceneGraph, out: &mut Vec<ValidationIssue>) {
    for id in graph.detached() {
        let name = graph.get(id).map(|n| n.name().to_string()).unwrap_or_default();
        out.push(ValidationIssue::new(
            Category::DetachedRoot,
            &name,
            format!("'{name}' has no parent and is not in the root set"),
        ));
    }
}
