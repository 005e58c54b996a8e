//! Reflective property accessor
//!
//! Writes are fail-fast: the member must exist and the value must coerce.
//! Reads through [`read_all`] are fail-soft: a member that cannot be read is
//! reported as [`UNREADABLE`] and the rest of the read continues.

use crate::coerce::coerce;
use crate::descriptor::{MemberDescriptor, MemberKind};
use crate::error::ReflectError;
use crate::reflect::{Reflect, ReflectMut};
use ecb_scene::PropertyValue;
use indexmap::IndexMap;

/// Value reported by [`read_all`] for a member whose read failed
pub const UNREADABLE: &str = "<unreadable>";

/// Writable property named `name`, else a writable field of that name
fn settable<'m>(members: &'m [MemberDescriptor], name: &str) -> Option<&'m MemberDescriptor> {
    let find = |kind: MemberKind| {
        members
            .iter()
            .find(|m| m.kind == kind && m.name == name && m.is_settable())
    };
    find(MemberKind::Property).or_else(|| find(MemberKind::Field))
}

fn readable<'m>(members: &'m [MemberDescriptor], name: &str) -> Option<&'m MemberDescriptor> {
    let find = |kind: MemberKind| {
        members
            .iter()
            .find(|m| m.kind == kind && m.name == name && m.readable)
    };
    find(MemberKind::Property).or_else(|| find(MemberKind::Field))
}

/// Read one member
pub fn get<T: Reflect + ?Sized>(target: &T, name: &str) -> Result<PropertyValue, ReflectError> {
    let member = readable(target.members(), name)
        .ok_or_else(|| ReflectError::property_not_found(target.type_name(), name))?;
    target.read(member).ok_or_else(|| ReflectError::Unreadable {
        type_name: target.type_name().to_string(),
        property: name.to_string(),
    })
}

/// Coerce `raw` to the member's type and write it, returning the stored value
pub fn set<T: ReflectMut + ?Sized>(target: &mut T, name: &str, raw: &str) -> Result<PropertyValue, ReflectError> {
    let member = settable(target.members(), name)
        .ok_or_else(|| ReflectError::property_not_found(target.type_name(), name))?
        .clone();
    let value = coerce(raw, &member.value_type).ok_or_else(|| ReflectError::TypeMismatch {
        property: name.to_string(),
        expected: member.value_type.to_string(),
        value: raw.to_string(),
    })?;
    target.write(&member, value.clone());
    tracing::debug!(type_name = target.type_name(), property = name, value = %value, "property set");
    Ok(value)
}

/// Write an already typed value; the value must match the member's type
pub fn set_value<T: ReflectMut + ?Sized>(
    target: &mut T,
    name: &str,
    value: PropertyValue,
) -> Result<(), ReflectError> {
    let member = settable(target.members(), name)
        .ok_or_else(|| ReflectError::property_not_found(target.type_name(), name))?
        .clone();
    if !value.matches(&member.value_type) {
        return Err(ReflectError::TypeMismatch {
            property: name.to_string(),
            expected: member.value_type.to_string(),
            value: value.to_string(),
        });
    }
    target.write(&member, value);
    Ok(())
}

/// Every readable, non-indexed member as typed values, `None` where unreadable
pub fn read_all_values<T: Reflect + ?Sized>(target: &T) -> IndexMap<String, Option<PropertyValue>> {
    target
        .members()
        .iter()
        .filter(|m| m.readable && !m.indexed)
        .map(|m| (m.name.clone(), target.read(m)))
        .collect()
}

/// Every readable, non-indexed member displayed as a string
pub fn read_all<T: Reflect + ?Sized>(target: &T) -> IndexMap<String, String> {
    read_all_values(target)
        .into_iter()
        .map(|(name, value)| {
            let shown = match value {
                Some(v) => v.to_string(),
                None => {
                    tracing::debug!(type_name = target.type_name(), property = %name, "unreadable member");
                    UNREADABLE.to_string()
                }
            };
            (name, shown)
        })
        .collect()
}
