use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Allowed type namespaces
///
/// The declaration order is the resolution order: a bare type name resolves
/// to the first namespace that defines it. This order is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Namespace {
    /// Types shipped with the engine
    Engine,
    /// Types registered by plugins and packages
    Extensions,
    /// Project-defined types
    #[default]
    User,
}

impl Namespace {
    /// All namespaces in resolution order
    pub const PRECEDENCE: [Namespace; 3] = [Namespace::Engine, Namespace::Extensions, Namespace::User];

    /// Separator in qualified names (`engine::Camera`)
    pub const SEPARATOR: &'static str = ecb_scene::ComponentInstance::NAMESPACE_SEPARATOR;

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Namespace::Engine => "engine",
            Namespace::Extensions => "extensions",
            Namespace::User => "user",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Namespace {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Namespace::PRECEDENCE
            .into_iter()
            .find(|ns| ns.as_str() == s)
            .ok_or_else(|| format!("unknown namespace '{s}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precedence_is_declaration_order() {
        let mut sorted = Namespace::PRECEDENCE;
        sorted.sort();
        assert_eq!(sorted, Namespace::PRECEDENCE);
    }

    #[test]
    fn parse_is_exact() {
        assert_eq!("engine".parse::<Namespace>(), Ok(Namespace::Engine));
        assert!("Engine".parse::<Namespace>().is_err());
    }
}
