//! Configured user types flowing through the registry and accessor

use ecb_reflect::{accessor, Namespace, ReflectError, Reflected, TypeDeclaration, TypeRegistry};
use ecb_scene::{PropertyValue, ValueType};
use pretty_assertions::assert_eq;
use serde::Deserialize;

#[derive(Deserialize)]
struct Doc {
    types: Vec<TypeDeclaration>,
}

const TYPES: &str = r#"
[[types]]
name = "Health"

[[types.members]]
name = "current"
type = "float"
default = "100"

[[types.members]]
name = "faction"
type = "enum"
variants = ["Neutral", "Hostile"]

[[types.members]]
name = "owner"
type = "objectRef"
kind = "field"

[[types]]
name = "Camera"
namespace = "user"
"#;

fn registry() -> TypeRegistry {
    let doc: Doc = toml::from_str(TYPES).unwrap();
    let mut registry = TypeRegistry::with_builtins();
    assert_eq!(registry.register_declarations(&doc.types).unwrap(), 2);
    registry
}

#[test]
fn declared_types_resolve_in_user_namespace() {
    let registry = registry();
    let health = registry.resolve("Health").unwrap();
    assert_eq!(health.namespace, Namespace::User);
    assert_eq!(health.qualified_name(), "user::Health");

    let faction = health.member("faction").unwrap();
    assert_eq!(faction.value_type, ValueType::Enum(vec!["Neutral".into(), "Hostile".into()]));
    assert_eq!(faction.default, PropertyValue::Enum("Neutral".into()));

    // engine still wins the bare name
    assert_eq!(registry.resolve("Camera").unwrap().namespace, Namespace::Engine);
}

#[test]
fn declared_defaults_are_constructed_and_settable() {
    let registry = registry();
    let health = registry.resolve("Health").unwrap();
    let mut instance = health.construct();
    assert_eq!(instance.value("current"), Some(&PropertyValue::Float(100.0)));

    let mut target = Reflected::new(health, &mut instance);
    accessor::set(&mut target, "faction", "hostile").unwrap();
    assert_eq!(accessor::get(&target, "faction").unwrap(), PropertyValue::Enum("Hostile".into()));
    assert!(matches!(
        accessor::set(&mut target, "faction", "Friendly"),
        Err(ReflectError::TypeMismatch { .. })
    ));
}

#[test]
fn bad_declarations_are_rejected() {
    let bad: Doc = toml::from_str(
        r#"
        [[types]]
        name = "Broken"
        [[types.members]]
        name = "x"
        type = "quaternion"
        "#,
    )
    .unwrap();
    let mut registry = TypeRegistry::new();
    assert!(matches!(
        registry.register_declarations(&bad.types),
        Err(ReflectError::InvalidDeclaration { .. })
    ));

    let bad_default: Doc = toml::from_str(
        r#"
        [[types]]
        name = "Broken"
        [[types.members]]
        name = "x"
        type = "int"
        default = "lots"
        "#,
    )
    .unwrap();
    assert!(registry.register_declarations(&bad_default.types).is_err());
}
