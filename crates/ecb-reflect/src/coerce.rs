//! Raw string → typed value coercion
//!
//! | Target    | Accepted                                            |
//! |-----------|-----------------------------------------------------|
//! | Bool      | `true/false/1/0/yes/no/on/off`, any case            |
//! | Int       | base-10 `i64`                                       |
//! | Float     | any `f64` literal                                   |
//! | String    | verbatim                                            |
//! | Vector3   | `x,y,z`, optionally in `()` or `[]`                 |
//! | Color     | `r,g,b[,a]` or `#RRGGBB[AA]`                        |
//! | Enum      | declared variant, any case, stored as declared      |
//! | ObjectRef | `null`, `none` or empty                             |
//! | AssetRef  | `null`, `none` or empty → unset, otherwise the path |

use ecb_scene::{Color, PropertyValue, ValueType, Vec3};

/// Coerce `raw` to `value_type`, `None` if it does not parse
#[must_use]
pub fn coerce(raw: &str, value_type: &ValueType) -> Option<PropertyValue> {
    let trimmed = raw.trim();
    match value_type {
        ValueType::Bool => parse_bool(trimmed).map(PropertyValue::Bool),
        ValueType::Int => trimmed.parse().ok().map(PropertyValue::Int),
        ValueType::Float => trimmed.parse().ok().map(PropertyValue::Float),
        ValueType::String => Some(PropertyValue::String(raw.to_string())),
        ValueType::Vector3 => parse_vec3(trimmed).map(PropertyValue::Vector3),
        ValueType::Color => parse_color(trimmed).map(PropertyValue::Color),
        ValueType::Enum(variants) => variants
            .iter()
            .find(|v| v.eq_ignore_ascii_case(trimmed))
            .map(|v| PropertyValue::Enum(v.clone())),
        ValueType::ObjectRef => is_null(trimmed).then_some(PropertyValue::ObjectRef(None)),
        ValueType::AssetRef => Some(PropertyValue::AssetRef(
            (!is_null(trimmed)).then(|| trimmed.to_string()),
        )),
    }
}

/// Parse a declared type name (`bool`, `int`, `float`, `string`, `vector3`,
/// `color`, `enum`, `objectRef`, `assetRef`), case-insensitive
#[must_use]
pub fn parse_value_type(name: &str, variants: &[String]) -> Option<ValueType> {
    let ty = match name.to_ascii_lowercase().as_str() {
        "bool" | "boolean" => ValueType::Bool,
        "int" | "integer" => ValueType::Int,
        "float" | "number" => ValueType::Float,
        "string" => ValueType::String,
        "vector3" | "vec3" => ValueType::Vector3,
        "color" => ValueType::Color,
        "enum" if !variants.is_empty() => ValueType::Enum(variants.to_vec()),
        "objectref" => ValueType::ObjectRef,
        "assetref" => ValueType::AssetRef,
        _ => return None,
    };
    Some(ty)
}

pub(crate) fn is_null(raw: &str) -> bool {
    raw.is_empty() || raw.eq_ignore_ascii_case("null") || raw.eq_ignore_ascii_case("none")
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn unwrap_brackets(raw: &str) -> &str {
    raw.strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .or_else(|| raw.strip_prefix('[').and_then(|s| s.strip_suffix(']')))
        .unwrap_or(raw)
}

fn parse_floats(raw: &str) -> Option<Vec<f32>> {
    unwrap_brackets(raw)
        .split(',')
        .map(|part| part.trim().parse::<f32>().ok())
        .collect()
}

fn parse_vec3(raw: &str) -> Option<Vec3> {
    match parse_floats(raw)?.as_slice() {
        [x, y, z] => Some(Vec3::new(*x, *y, *z)),
        _ => None,
    }
}

fn parse_color(raw: &str) -> Option<Color> {
    if let Some(hex) = raw.strip_prefix('#') {
        return parse_hex_color(hex);
    }
    match parse_floats(raw)?.as_slice() {
        [r, g, b] => Some(Color::rgba(*r, *g, *b, 1.0)),
        [r, g, b, a] => Some(Color::rgba(*r, *g, *b, *a)),
        _ => None,
    }
}

fn parse_hex_color(hex: &str) -> Option<Color> {
    if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| {
        u8::from_str_radix(&hex[i..i + 2], 16)
            .ok()
            .map(|v| f32::from(v) / 255.0)
    };
    let alpha = if hex.len() == 8 { channel(6)? } else { 1.0 };
    Some(Color::rgba(channel(0)?, channel(2)?, channel(4)?, alpha))
}
