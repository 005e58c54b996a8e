//! The reflection seam
//!
//! [`Reflect`] exposes a member table and raw reads; [`ReflectMut`] adds raw
//! writes. Lookup, coercion and failure handling live in [`crate::accessor`]
//! so every implementor behaves the same way.

use crate::descriptor::{MemberDescriptor, TypeDescriptor};
use ecb_scene::{ComponentInstance, PropertyValue, SceneNode, ValueType};
use std::ops::{Deref, DerefMut};
use std::sync::OnceLock;

/// Read access to a described object
pub trait Reflect {
    /// Type name used in diagnostics
    fn type_name(&self) -> &str;

    /// Members in declaration order
    fn members(&self) -> &[MemberDescriptor];

    /// Current value of a member, `None` when it cannot be read
    fn read(&self, member: &MemberDescriptor) -> Option<PropertyValue>;
}

/// Write access to a described object
pub trait ReflectMut: Reflect {
    /// Store an already type-checked value
    fn write(&mut self, member: &MemberDescriptor, value: PropertyValue);
}

/// A component instance viewed through its descriptor
///
/// `C` is `&ComponentInstance` for reads or `&mut ComponentInstance` for writes.
#[derive(Debug)]
pub struct Reflected<'a, C> {
    descriptor: &'a TypeDescriptor,
    component: C,
}

impl<'a, C> Reflected<'a, C>
where
    C: Deref<Target = ComponentInstance>,
{
    #[inline]
    #[must_use]
    pub fn new(descriptor: &'a TypeDescriptor, component: C) -> Self {
        Self { descriptor, component }
    }

    #[inline]
    #[must_use]
    pub fn descriptor(&self) -> &'a TypeDescriptor {
        self.descriptor
    }
}

impl<C> Reflect for Reflected<'_, C>
where
    C: Deref<Target = ComponentInstance>,
{
    fn type_name(&self) -> &str {
        &self.descriptor.name
    }

    fn members(&self) -> &[MemberDescriptor] {
        &self.descriptor.members
    }

    fn read(&self, member: &MemberDescriptor) -> Option<PropertyValue> {
        if !member.readable {
            return None;
        }
        self.component
            .value(&member.name)
            .filter(|v| v.matches(&member.value_type))
            .cloned()
    }
}

impl<C> ReflectMut for Reflected<'_, C>
where
    C: DerefMut<Target = ComponentInstance>,
{
    fn write(&mut self, member: &MemberDescriptor, value: PropertyValue) {
        self.component.insert_value(member.name.clone(), value);
    }
}

/// Built-in members of every scene node: `name`, `active`, `tag`, `layer`
pub fn node_members() -> &'static [MemberDescriptor] {
    static MEMBERS: OnceLock<Vec<MemberDescriptor>> = OnceLock::new();
    MEMBERS.get_or_init(|| {
        vec![
            MemberDescriptor::property("name", ValueType::String),
            MemberDescriptor::property("active", ValueType::Bool).with_default(PropertyValue::Bool(true)),
            MemberDescriptor::property("tag", ValueType::String),
            MemberDescriptor::property("layer", ValueType::Int),
        ]
    })
}

impl Reflect for SceneNode {
    fn type_name(&self) -> &str {
        crate::NODE_TYPE
    }

    fn members(&self) -> &[MemberDescriptor] {
        node_members()
    }

    fn read(&self, member: &MemberDescriptor) -> Option<PropertyValue> {
        match member.name.as_str() {
            "name" => Some(PropertyValue::String(self.name().to_string())),
            "active" => Some(PropertyValue::Bool(self.active())),
            "tag" => Some(PropertyValue::String(self.tag().to_string())),
            "layer" => Some(PropertyValue::Int(self.layer())),
            _ => None,
        }
    }
}

impl ReflectMut for SceneNode {
    fn write(&mut self, member: &MemberDescriptor, value: PropertyValue) {
        match (member.name.as_str(), value) {
            ("name", PropertyValue::String(v)) => self.set_name(v),
            ("active", PropertyValue::Bool(v)) => self.set_active(v),
            ("tag", PropertyValue::String(v)) => self.set_tag(v),
            ("layer", PropertyValue::Int(v)) => self.set_layer(v),
            (name, value) => {
                tracing::debug!(member = name, value = %value, "ignored write to unknown node member");
            }
        }
    }
}
