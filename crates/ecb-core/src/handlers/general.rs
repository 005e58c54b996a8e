//! Session-level commands

use super::to_json;
use crate::command::Command;
use crate::dispatcher::HandlerContext;
use crate::error::BridgeError;
use ecb_reflect::{MemberDescriptor, Namespace, TypeDescriptor};
use serde::Serialize;
use serde_json::{json, Value};

pub(super) fn ping(ctx: &mut HandlerContext<'_>, _: &Command) -> Result<Value, BridgeError> {
    Ok(json!({
        "status": "ok",
        "version": crate::VERSION,
        "commandCount": ctx.dispatcher().len(),
        "endpoint": ctx.config().endpoint,
    }))
}

pub(super) fn list_commands(ctx: &mut HandlerContext<'_>, _: &Command) -> Result<Value, BridgeError> {
    let commands: Vec<&str> = ctx.dispatcher().command_names().collect();
    Ok(json!({ "commands": commands }))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MemberInfo<'a> {
    name: &'a str,
    kind: ecb_reflect::MemberKind,
    #[serde(rename = "type")]
    value_type: String,
    readable: bool,
    writable: bool,
    indexed: bool,
    default: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TypeInfo<'a> {
    name: &'a str,
    namespace: Namespace,
    qualified_name: String,
    members: Vec<MemberInfo<'a>>,
}

impl<'a> From<&'a MemberDescriptor> for MemberInfo<'a> {
    fn from(m: &'a MemberDescriptor) -> Self {
        Self {
            name: &m.name,
            kind: m.kind,
            value_type: m.value_type.to_string(),
            readable: m.readable,
            writable: m.writable,
            indexed: m.indexed,
            default: m.default.to_string(),
        }
    }
}

impl<'a> From<&'a TypeDescriptor> for TypeInfo<'a> {
    fn from(t: &'a TypeDescriptor) -> Self {
        Self {
            name: &t.name,
            namespace: t.namespace,
            qualified_name: t.qualified_name(),
            members: t.members.iter().map(MemberInfo::from).collect(),
        }
    }
}

/// Registered types in resolution order, optionally one namespace only
pub(super) fn list_types(ctx: &mut HandlerContext<'_>, command: &Command) -> Result<Value, BridgeError> {
    let registry = ctx.registry();
    let types: Vec<TypeInfo<'_>> = match command.get(0) {
        Some(raw) => {
            let namespace: Namespace = raw.parse().map_err(|_| {
                BridgeError::invalid_argument(format!(
                    "unknown namespace '{raw}', expected one of engine, extensions, user"
                ))
            })?;
            registry.in_namespace(namespace).map(TypeInfo::from).collect()
        }
        None => registry.iter().map(TypeInfo::from).collect(),
    };
    Ok(json!({ "types": to_json(&types)? }))
}
