//! Namespaced resource keys (`namespace:path`).

use crate::error::KeyError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Namespace used when a raw key has no `:` separator.
pub const DEFAULT_NAMESPACE: &str = "minecraft";

/// A validated, immutable resource key such as `minecraft:block/stone`.
///
/// Ordering is namespace first, then path, byte-wise.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceKey {
    namespace: String,
    path: String,
}

impl ResourceKey {
    /// Build a key from already split parts.
    pub fn new(namespace: impl Into<String>, path: impl Into<String>) -> Result<Self, KeyError> {
        let namespace = namespace.into();
        let path = path.into();
        let raw = format!("{}:{}", namespace, path);
        validate(&raw, &namespace, &path)?;
        Ok(Self { namespace, path })
    }

    /// Key in the default namespace.
    pub fn minecraft(path: impl Into<String>) -> Result<Self, KeyError> {
        Self::new(DEFAULT_NAMESPACE, path)
    }

    /// Parse a raw key. Splits on the first `:`; without one the whole input is the path.
    pub fn parse(raw: &str) -> Result<Self, KeyError> {
        let (namespace, path) = match raw.split_once(':') {
            Some((namespace, path)) => (namespace, path),
            None => (DEFAULT_NAMESPACE, raw),
        };
        validate(raw, namespace, path)?;
        Ok(Self {
            namespace: namespace.to_string(),
            path: path.to_string(),
        })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Whether the key lives in the default namespace.
    pub fn is_default_namespace(&self) -> bool {
        self.namespace == DEFAULT_NAMESPACE
    }

    /// Return a key with `prefix/` prepended to the path.
    pub fn with_path_prefix(&self, prefix: &str) -> Result<Self, KeyError> {
        Self::new(self.namespace.clone(), format!("{}/{}", prefix, self.path))
    }

    /// Return a key whose path has `.ext` removed, if present.
    pub fn strip_extension(&self, ext: &str) -> Self {
        let suffix = format!(".{}", ext);
        match self.path.strip_suffix(&suffix) {
            Some(stripped) if !stripped.is_empty() => Self {
                namespace: self.namespace.clone(),
                path: stripped.to_string(),
            },
            _ => self.clone(),
        }
    }
}

fn validate(raw: &str, namespace: &str, path: &str) -> Result<(), KeyError> {
    if namespace.is_empty() || !namespace.bytes().all(is_namespace_byte) {
        return Err(KeyError::InvalidNamespace {
            raw: raw.to_string(),
            namespace: namespace.to_string(),
        });
    }
    if path.is_empty() {
        return Err(KeyError::EmptyPath(raw.to_string()));
    }
    if !path.bytes().all(is_path_byte) {
        return Err(KeyError::InvalidPath {
            raw: raw.to_string(),
            path: path.to_string(),
        });
    }
    Ok(())
}

fn is_namespace_byte(b: u8) -> bool {
    matches!(b, b'a'..=b'z' | b'0'..=b'9' | b'_' | b'-' | b'.')
}

fn is_path_byte(b: u8) -> bool {
    is_namespace_byte(b) || b == b'/'
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

impl FromStr for ResourceKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for ResourceKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ResourceKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_namespace() {
        let key = ResourceKey::parse("mymod:block/custom").unwrap();
        assert_eq!(key.namespace(), "mymod");
        assert_eq!(key.path(), "block/custom");
    }

    #[test]
    fn test_parse_default_namespace() {
        let key = ResourceKey::parse("block/stone").unwrap();
        assert_eq!(key.namespace(), "minecraft");
        assert_eq!(key.path(), "block/stone");
        assert!(key.is_default_namespace());
    }

    #[test]
    fn test_splits_on_first_colon_only() {
        // The second colon ends up in the path, which rejects it.
        let err = ResourceKey::parse("a:b:c").unwrap_err();
        assert!(matches!(err, KeyError::InvalidPath { ref path, .. } if path == "b:c"));
    }

    #[test]
    fn test_rejections() {
        assert_eq!(
            ResourceKey::parse("minecraft:"),
            Err(KeyError::EmptyPath("minecraft:".into()))
        );
        assert_eq!(ResourceKey::parse(""), Err(KeyError::EmptyPath("".into())));
        assert!(matches!(
            ResourceKey::parse(":stone"),
            Err(KeyError::InvalidNamespace { .. })
        ));
        assert!(matches!(
            ResourceKey::parse("Minecraft:stone"),
            Err(KeyError::InvalidNamespace { .. })
        ));
        assert!(matches!(
            ResourceKey::parse("my/mod:stone"),
            Err(KeyError::InvalidNamespace { .. })
        ));
        assert!(matches!(
            ResourceKey::parse("minecraft:Block/Stone"),
            Err(KeyError::InvalidPath { .. })
        ));
        assert!(matches!(
            ResourceKey::parse("minecraft:block stone"),
            Err(KeyError::InvalidPath { .. })
        ));
    }

    #[test]
    fn test_display_is_canonical() {
        let key = ResourceKey::parse("stone").unwrap();
        assert_eq!(key.to_string(), "minecraft:stone");
        assert_eq!(ResourceKey::parse(&key.to_string()).unwrap(), key);
    }

    #[test]
    fn test_ordering_namespace_then_path() {
        let mut keys = vec![
            ResourceKey::parse("b:a").unwrap(),
            ResourceKey::parse("a:z").unwrap(),
            ResourceKey::parse("a:b").unwrap(),
        ];
        keys.sort();
        let rendered: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
        assert_eq!(rendered, vec!["a:b", "a:z", "b:a"]);
    }

    #[test]
    fn test_strip_extension_and_prefix() {
        let key = ResourceKey::parse("minecraft:block/stone.png").unwrap();
        assert_eq!(key.strip_extension("png").path(), "block/stone");
        assert_eq!(key.strip_extension("json"), key);

        let prefixed = ResourceKey::parse("x:y").unwrap().with_path_prefix("textures").unwrap();
        assert_eq!(prefixed.to_string(), "x:textures/y");
    }

    #[test]
    fn test_serde_uses_string_form() {
        let key = ResourceKey::parse("mymod:item/gem").unwrap();
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"mymod:item/gem\"");
        let back: ResourceKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
        assert!(serde_json::from_str::<ResourceKey>("\"Bad:Key\"").is_err());
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_parse_is_deterministic(raw in ".{0,24}") {
                prop_assert_eq!(ResourceKey::parse(&raw), ResourceKey::parse(&raw));
            }

            #[test]
            fn test_roundtrip_property(
                namespace in "[a-z0-9_.-]{1,12}",
                path in "[a-z0-9_.-][a-z0-9_./-]{0,20}"
            ) {
                let key = ResourceKey::new(namespace, path)?;
                prop_assert_eq!(ResourceKey::parse(&key.to_string())?, key);
            }
        }
    }
}
