//! Namespaced resource identifiers (`namespace:path`)

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{Error, Result};

/// Namespace assumed when an identifier has none
pub const DEFAULT_NAMESPACE: &str = "minecraft";

fn pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?:([a-z0-9_.-]+):)?([a-z0-9_.-]+(?:/[a-z0-9_.-]+)*)$")
            .expect("identifier pattern is valid")
    })
}

/// A validated `namespace:path` identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceId {
    namespace: String,
    path: String,
}

impl ResourceId {
    /// Parse `namespace:path` or a bare `path` (namespace `minecraft`).
    pub fn parse(id: &str) -> Result<Self> {
        let captures = pattern().captures(id).ok_or_else(|| {
            Error::validation(
                "identifier",
                format!(
                    "\"{}\" is not a valid resource identifier (expected namespace:path in lowercase)",
                    id
                ),
            )
        })?;
        let namespace = captures
            .get(1)
            .map(|m| m.as_str())
            .unwrap_or(DEFAULT_NAMESPACE);
        let path = captures.get(2).map(|m| m.as_str()).unwrap_or_default();
        Ok(Self {
            namespace: namespace.to_string(),
            path: path.to_string(),
        })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The part after the colon, possibly containing `/`
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_namespaced() {
        let id = ResourceId::parse("farmersdelight:comfort").unwrap();
        assert_eq!(id.namespace(), "farmersdelight");
        assert_eq!(id.path(), "comfort");
        assert_eq!(id.to_string(), "farmersdelight:comfort");
    }

    #[test]
    fn test_parse_bare_defaults_namespace() {
        let id = ResourceId::parse("stick").unwrap();
        assert_eq!(id.namespace(), "minecraft");
        assert_eq!(id.to_string(), "minecraft:stick");
    }

    #[test]
    fn test_parse_nested_path() {
        let id = ResourceId::parse("mod:dyes/red").unwrap();
        assert_eq!(id.path(), "dyes/red");
    }

    #[test]
    fn test_parse_rejects_invalid() {
        assert!(ResourceId::parse("").is_err());
        assert!(ResourceId::parse("Minecraft:Stone").is_err());
        assert!(ResourceId::parse("a:b:c").is_err());
        assert!(ResourceId::parse("mod:dyes//red").is_err());
        let err = ResourceId::parse("bad id").unwrap_err();
        assert!(err.to_string().contains("identifier"));
    }
}
