use crate::value::PropertyValue;
use indexmap::IndexMap;

/// A typed component attached to one node
///
/// The property bag is keyed by member name and keeps declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentInstance {
    type_name: String,
    namespace: Option<String>,
    enabled: bool,
    values: IndexMap<String, PropertyValue>,
}

impl ComponentInstance {
    /// Separator between namespace and type name in a qualified name
    pub const NAMESPACE_SEPARATOR: &'static str = "::";

    /// Create an empty, enabled component of the given type
    #[inline]
    #[must_use]
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            namespace: None,
            enabled: true,
            values: IndexMap::new(),
        }
    }

    /// Create from `namespace::Name` or a bare `Name`
    #[must_use]
    pub fn from_qualified(raw: &str) -> Self {
        match raw.split_once(Self::NAMESPACE_SEPARATOR) {
            Some((namespace, name)) => Self::new(name).with_namespace(namespace),
            None => Self::new(raw),
        }
    }

    /// Record the namespace the type was declared in
    #[inline]
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Builder-style value insertion
    #[inline]
    #[must_use]
    pub fn with_value(mut self, name: impl Into<String>, value: PropertyValue) -> Self {
        self.values.insert(name.into(), value);
        self
    }

    /// Declared type name
    #[inline]
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Namespace of the declared type; `None` for components built by name only
    #[inline]
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// `namespace::Name` when the namespace is known, else the bare name
    #[must_use]
    pub fn qualified_name(&self) -> String {
        match &self.namespace {
            Some(namespace) => format!("{namespace}{}{}", Self::NAMESPACE_SEPARATOR, self.type_name),
            None => self.type_name.clone(),
        }
    }

    #[inline]
    #[must_use]
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    #[inline]
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Current value of a member
    #[inline]
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&PropertyValue> {
        self.values.get(name)
    }

    /// Replace a member's value, returning the previous one
    #[inline]
    pub fn insert_value(&mut self, name: impl Into<String>, value: PropertyValue) -> Option<PropertyValue> {
        self.values.insert(name.into(), value)
    }

    /// Drop a member's value from the bag
    #[inline]
    pub fn remove_value(&mut self, name: &str) -> Option<PropertyValue> {
        self.values.shift_remove(name)
    }

    /// Iterate values in declaration order
    pub fn values(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Mutable access to every value, for reference fix-ups
    pub fn values_mut(&mut self) -> impl Iterator<Item = (&str, &mut PropertyValue)> {
        self.values.iter_mut().map(|(k, v)| (k.as_str(), v))
    }
}

/// A component slot on a node
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentSlot {
    /// Live component
    Attached(ComponentInstance),
    /// The slot exists but its component resolved to no value
    Missing {
        /// Type the slot held before it was lost, when known
        last_type: Option<String>,
    },
}

impl ComponentSlot {
    /// Attached component, if any
    #[inline]
    #[must_use]
    pub fn instance(&self) -> Option<&ComponentInstance> {
        match self {
            ComponentSlot::Attached(c) => Some(c),
            ComponentSlot::Missing { .. } => None,
        }
    }

    #[inline]
    pub fn instance_mut(&mut self) -> Option<&mut ComponentInstance> {
        match self {
            ComponentSlot::Attached(c) => Some(c),
            ComponentSlot::Missing { .. } => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_missing(&self) -> bool {
        matches!(self, ComponentSlot::Missing { .. })
    }

    /// Type name of the attached or last-known component
    #[must_use]
    pub fn type_name(&self) -> Option<&str> {
        match self {
            ComponentSlot::Attached(c) => Some(c.type_name()),
            ComponentSlot::Missing { last_type } => last_type.as_deref(),
        }
    }
}

impl From<ComponentInstance> for ComponentSlot {
    fn from(value: ComponentInstance) -> Self {
        ComponentSlot::Attached(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qualified_names() {
        let scoped = ComponentInstance::from_qualified("user::Camera");
        assert_eq!(scoped.type_name(), "Camera");
        assert_eq!(scoped.namespace(), Some("user"));
        assert_eq!(scoped.qualified_name(), "user::Camera");

        let bare = ComponentInstance::from_qualified("Camera");
        assert_eq!(bare.namespace(), None);
        assert_eq!(bare.qualified_name(), "Camera");
    }

    #[test]
    fn missing_slot_keeps_last_type() {
        let slot = ComponentSlot::Missing {
            last_type: Some("engine::Rigidbody".to_string()),
        };
        assert!(slot.is_missing());
        assert_eq!(slot.type_name(), Some("engine::Rigidbody"));
        assert!(slot.instance().is_none());
    }
}
