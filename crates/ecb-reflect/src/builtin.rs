//! Types registered by [`crate::TypeRegistry::with_builtins`]

use crate::descriptor::{MemberDescriptor as M, TypeDescriptor};
use crate::namespace::Namespace;
use ecb_scene::{Color, PropertyValue, ValueType, Vec3};

fn variants(names: &[&str]) -> ValueType {
    ValueType::Enum(names.iter().map(|s| (*s).to_string()).collect())
}

fn float(v: f64) -> PropertyValue {
    PropertyValue::Float(v)
}

pub(crate) fn engine_types() -> Vec<TypeDescriptor> {
    let e = Namespace::Engine;
    vec![
        TypeDescriptor::new(e, "Transform")
            .with_member(M::property("position", ValueType::Vector3))
            .with_member(M::property("rotation", ValueType::Vector3))
            .with_member(M::property("scale", ValueType::Vector3).with_default(PropertyValue::Vector3(Vec3::ONE))),
        TypeDescriptor::new(e, "Camera")
            .with_member(M::property("fieldOfView", ValueType::Float).with_default(float(60.0)))
            .with_member(M::property("nearClip", ValueType::Float).with_default(float(0.3)))
            .with_member(M::property("farClip", ValueType::Float).with_default(float(1000.0)))
            .with_member(M::property("orthographic", ValueType::Bool))
            .with_member(M::property("aspect", ValueType::Float).with_default(float(16.0 / 9.0)).read_only())
            .with_member(M::property("backgroundColor", ValueType::Color))
            .with_member(M::property("target", ValueType::ObjectRef)),
        TypeDescriptor::new(e, "Light")
            .with_member(
                M::property("kind", variants(&["Directional", "Point", "Spot", "Area"]))
                    .with_default(PropertyValue::Enum("Point".to_string())),
            )
            .with_member(M::property("intensity", ValueType::Float).with_default(float(1.0)))
            .with_member(M::property("color", ValueType::Color).with_default(PropertyValue::Color(Color::WHITE)))
            .with_member(M::property("range", ValueType::Float).with_default(float(10.0))),
        TypeDescriptor::new(e, "Rigidbody")
            .with_member(M::property("mass", ValueType::Float).with_default(float(1.0)))
            .with_member(M::property("useGravity", ValueType::Bool).with_default(PropertyValue::Bool(true)))
            .with_member(M::field("isKinematic", ValueType::Bool))
            .with_member(M::property("velocity", ValueType::Vector3).read_only()),
        TypeDescriptor::new(e, "BoxCollider")
            .with_member(M::property("center", ValueType::Vector3))
            .with_member(M::property("size", ValueType::Vector3).with_default(PropertyValue::Vector3(Vec3::ONE)))
            .with_member(M::field("isTrigger", ValueType::Bool)),
        TypeDescriptor::new(e, "MeshRenderer")
            .with_member(M::property("mesh", ValueType::AssetRef))
            .with_member(M::property("material", ValueType::AssetRef))
            .with_member(M::property("materials", ValueType::AssetRef).indexed())
            .with_member(M::property("castShadows", ValueType::Bool).with_default(PropertyValue::Bool(true))),
        TypeDescriptor::new(e, "AudioSource")
            .with_member(M::property("clip", ValueType::AssetRef))
            .with_member(M::field("volume", ValueType::Float).with_default(float(1.0)))
            .with_member(M::field("loop", ValueType::Bool))
            .with_member(M::property("isPlaying", ValueType::Bool).read_only()),
    ]
}

pub(crate) fn extension_types() -> Vec<TypeDescriptor> {
    let x = Namespace::Extensions;
    vec![
        TypeDescriptor::new(x, "TextLabel")
            .with_member(M::property("text", ValueType::String))
            .with_member(M::property("fontSize", ValueType::Float).with_default(float(14.0)))
            .with_member(M::property("color", ValueType::Color).with_default(PropertyValue::Color(Color::WHITE)))
            .with_member(M::property("alignment", variants(&["Left", "Center", "Right"])).with_default(PropertyValue::Enum("Left".to_string()))),
        TypeDescriptor::new(x, "FollowTarget")
            .with_member(M::field("target", ValueType::ObjectRef))
            .with_member(M::field("offset", ValueType::Vector3))
            .with_member(M::field("speed", ValueType::Float).with_default(float(5.0))),
    ]
}
