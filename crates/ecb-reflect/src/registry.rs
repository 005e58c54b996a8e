//! Type registry and resolver
//!
//! Provides [`TypeRegistry`] for registering and resolving component types.

use crate::builtin;
use crate::declaration::TypeDeclaration;
use crate::descriptor::TypeDescriptor;
use crate::error::ReflectError;
use crate::namespace::Namespace;
use ecb_scene::ComponentInstance;
use indexmap::IndexMap;
use std::collections::BTreeMap;

/// Registry of component types, grouped by namespace
///
/// Resolution rules:
/// - `Name` → first namespace in [`Namespace::PRECEDENCE`] that defines it
/// - `namespace::Name` → only that namespace
/// - matching is exact and case-sensitive
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    namespaces: BTreeMap<Namespace, IndexMap<String, TypeDescriptor>>,
}

impl TypeRegistry {
    /// Create new empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create registry with the engine and extension types
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for descriptor in builtin::engine_types().into_iter().chain(builtin::extension_types()) {
            registry.insert(descriptor);
        }
        registry
    }

    fn insert(&mut self, descriptor: TypeDescriptor) {
        self.namespaces
            .entry(descriptor.namespace)
            .or_default()
            .insert(descriptor.name.clone(), descriptor);
    }

    /// Register a type; the qualified name must be new
    pub fn register(&mut self, descriptor: TypeDescriptor) -> Result<(), ReflectError> {
        if self.get(descriptor.namespace, &descriptor.name).is_some() {
            return Err(ReflectError::DuplicateType(descriptor.qualified_name()));
        }
        tracing::debug!(type_name = %descriptor.qualified_name(), "registered type");
        self.insert(descriptor);
        Ok(())
    }

    /// Register configured declarations, stopping at the first invalid one
    pub fn register_declarations(&mut self, declarations: &[TypeDeclaration]) -> Result<usize, ReflectError> {
        for declaration in declarations {
            self.register(declaration.to_descriptor()?)?;
        }
        Ok(declarations.len())
    }

    /// Exact lookup inside one namespace
    #[must_use]
    pub fn get(&self, namespace: Namespace, name: &str) -> Option<&TypeDescriptor> {
        self.namespaces.get(&namespace)?.get(name)
    }

    /// Resolve a bare or qualified type name
    pub fn resolve(&self, type_name: &str) -> Result<&TypeDescriptor, ReflectError> {
        let not_found = || ReflectError::TypeNotFound(type_name.to_string());

        if let Some((ns, name)) = type_name.split_once(Namespace::SEPARATOR) {
            let namespace: Namespace = ns.parse().map_err(|_| not_found())?;
            return self.get(namespace, name).ok_or_else(not_found);
        }

        Namespace::PRECEDENCE
            .into_iter()
            .find_map(|ns| self.get(ns, type_name))
            .ok_or_else(not_found)
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, type_name: &str) -> bool {
        self.resolve(type_name).is_ok()
    }

    /// Descriptor of an attached instance
    ///
    /// An instance that knows its namespace resolves to exactly that type;
    /// one built by bare name resolves by precedence.
    pub fn descriptor_of(&self, instance: &ComponentInstance) -> Result<&TypeDescriptor, ReflectError> {
        self.resolve(&instance.qualified_name())
    }

    /// Shortest name that resolves back to the type named by `qualified`
    ///
    /// The bare name, unless a namespace earlier in precedence shadows it.
    #[must_use]
    pub fn display_name(&self, qualified: &str) -> String {
        let Some((_, bare)) = qualified.split_once(Namespace::SEPARATOR) else {
            return qualified.to_string();
        };
        match (self.resolve(qualified), self.resolve(bare)) {
            (Ok(exact), Ok(shadowing)) if !exact.is_same_type(shadowing) => qualified.to_string(),
            _ => bare.to_string(),
        }
    }

    /// All types in resolution order, then registration order
    pub fn iter(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.namespaces.values().flat_map(IndexMap::values)
    }

    /// Types of one namespace in registration order
    pub fn in_namespace(&self, namespace: Namespace) -> impl Iterator<Item = &TypeDescriptor> {
        self.namespaces
            .get(&namespace)
            .into_iter()
            .flat_map(IndexMap::values)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.namespaces.values().map(IndexMap::len).sum()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::MemberDescriptor;
    use ecb_scene::ValueType;

    #[test]
    fn engine_wins_over_user_for_bare_names() {
        let mut registry = TypeRegistry::with_builtins();
        registry
            .register(
                TypeDescriptor::new(Namespace::User, "Camera")
                    .with_member(MemberDescriptor::property("zoom", ValueType::Float)),
            )
            .unwrap();

        assert_eq!(registry.resolve("Camera").unwrap().namespace, Namespace::Engine);
        assert_eq!(registry.resolve("user::Camera").unwrap().namespace, Namespace::User);
    }

    #[test]
    fn shadowed_instances_keep_their_type() {
        let mut registry = TypeRegistry::with_builtins();
        registry
            .register(
                TypeDescriptor::new(Namespace::User, "Camera")
                    .with_member(MemberDescriptor::property("zoom", ValueType::Float)),
            )
            .unwrap();

        let user = registry.resolve("user::Camera").unwrap().construct();
        assert_eq!(registry.descriptor_of(&user).unwrap().namespace, Namespace::User);
        let engine = registry.resolve("Camera").unwrap().construct();
        assert_eq!(registry.descriptor_of(&engine).unwrap().namespace, Namespace::Engine);
        // built by bare name only: precedence decides
        assert_eq!(
            registry.descriptor_of(&ComponentInstance::new("Camera")).unwrap().namespace,
            Namespace::Engine
        );

        assert_eq!(registry.display_name("user::Camera"), "user::Camera");
        assert_eq!(registry.display_name("engine::Camera"), "Camera");
        assert_eq!(registry.display_name("extensions::FollowTarget"), "FollowTarget");
        assert_eq!(registry.display_name("Mystery"), "Mystery");
    }

    #[test]
    fn resolution_is_exact() {
        let registry = TypeRegistry::with_builtins();
        assert!(registry.resolve("Transform").is_ok());
        for name in ["transform", "Trans", "Transform ", "bogus::Transform", "user::Transform", ""] {
            assert_eq!(
                registry.resolve(name).unwrap_err(),
                ReflectError::TypeNotFound(name.to_string()),
                "{name:?}"
            );
        }
    }

    #[test]
    fn duplicate_qualified_name_is_rejected() {
        let mut registry = TypeRegistry::with_builtins();
        let err = registry
            .register(TypeDescriptor::new(Namespace::Engine, "Light"))
            .unwrap_err();
        assert_eq!(err, ReflectError::DuplicateType("engine::Light".into()));
    }

    #[test]
    fn builtin_defaults_fit_their_types() {
        for descriptor in TypeRegistry::with_builtins().iter() {
            for member in &descriptor.members {
                assert!(
                    member.default.matches(&member.value_type),
                    "{}.{}",
                    descriptor.qualified_name(),
                    member.name
                );
            }
        }
    }

    #[test]
    fn iteration_follows_precedence() {
        let mut registry = TypeRegistry::with_builtins();
        registry.register(TypeDescriptor::new(Namespace::User, "Aaa")).unwrap();
        let namespaces: Vec<_> = registry.iter().map(|d| d.namespace).collect();
        let mut sorted = namespaces.clone();
        sorted.sort();
        assert_eq!(namespaces, sorted);
        assert_eq!(registry.in_namespace(Namespace::User).count(), 1);
    }
}
