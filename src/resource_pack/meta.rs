//! `pack.mcmeta` parsing and writing.

use crate::error::{PackError, Result};
use crate::text::{json, TextComponent};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Inclusive range of pack formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FormatRange {
    pub min: i32,
    pub max: i32,
}

impl FormatRange {
    pub fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    pub fn single(format: i32) -> Self {
        Self::new(format, format)
    }

    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    pub fn contains(&self, format: i32) -> bool {
        self.min <= format && format <= self.max
    }
}

impl<'de> Deserialize<'de> for FormatRange {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        /// `supported_formats` can be a single int, `[min, max]` or an object.
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawRange {
            Single(i32),
            Pair([i32; 2]),
            Inclusive {
                min_inclusive: i32,
                max_inclusive: i32,
            },
            Plain {
                min: i32,
                max: i32,
            },
        }

        Ok(match RawRange::deserialize(deserializer)? {
            RawRange::Single(format) => FormatRange::single(format),
            RawRange::Pair([min, max]) => FormatRange::new(min, max),
            RawRange::Inclusive {
                min_inclusive,
                max_inclusive,
            } => FormatRange::new(min_inclusive, max_inclusive),
            RawRange::Plain { min, max } => FormatRange::new(min, max),
        })
    }
}

/// Pack-level descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct PackMeta {
    /// `pack_format`.
    pub format: i32,
    pub description: TextComponent,
    /// `supported_formats`, when the pack declares one.
    pub supported_formats: Option<FormatRange>,
    /// Other top-level sections (`language`, `filter`, `overlays`, mod-specific parts),
    /// kept verbatim.
    pub sections: Map<String, Value>,
}

#[derive(Deserialize)]
struct RawMcmeta {
    pack: RawPackSection,
    #[serde(flatten)]
    sections: Map<String, Value>,
}

#[derive(Deserialize)]
struct RawPackSection {
    pack_format: i32,
    #[serde(default)]
    description: Option<Value>,
    #[serde(default)]
    supported_formats: Option<FormatRange>,
}

impl PackMeta {
    pub fn new(format: i32, description: impl Into<TextComponent>) -> Self {
        Self {
            format,
            description: description.into(),
            supported_formats: None,
            sections: Map::new(),
        }
    }

    pub fn with_supported_formats(mut self, range: FormatRange) -> Self {
        self.supported_formats = Some(range);
        self
    }

    pub fn with_section(mut self, name: impl Into<String>, value: Value) -> Self {
        self.sections.insert(name.into(), value);
        self
    }

    /// Parse `pack.mcmeta` content.
    pub fn from_json_bytes(data: &[u8]) -> Result<Self> {
        let raw: RawMcmeta = serde_json::from_slice(data)?;
        let description = match raw.pack.description {
            Some(value) => json::from_json(&value)?,
            None => TextComponent::empty(),
        };
        Ok(Self {
            format: raw.pack.pack_format,
            description,
            supported_formats: raw.pack.supported_formats,
            sections: raw.sections,
        })
    }

    /// Render as the JSON document written to `pack.mcmeta`.
    pub fn to_json(&self) -> Result<Value> {
        let mut pack = Map::new();
        pack.insert("pack_format".into(), Value::from(self.format));
        pack.insert("description".into(), json::to_json(&self.description)?);
        if let Some(range) = self.supported_formats {
            pack.insert(
                "supported_formats".into(),
                serde_json::json!({"min_inclusive": range.min, "max_inclusive": range.max}),
            );
        }

        let mut root = Map::new();
        root.insert("pack".into(), Value::Object(pack));
        for (name, section) in &self.sections {
            root.insert(name.clone(), section.clone());
        }
        Ok(Value::Object(root))
    }

    pub fn to_json_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(&self.to_json()?).map_err(PackError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::{NamedColor, TextColor};

    #[test]
    fn test_parse_minimal() {
        let meta = PackMeta::from_json_bytes(br#"{"pack":{"pack_format":15,"description":"Hello"}}"#).unwrap();
        assert_eq!(meta.format, 15);
        assert_eq!(meta.description.plain_text(), "Hello");
        assert_eq!(meta.supported_formats, None);
        assert!(meta.sections.is_empty());
    }

    #[test]
    fn test_parse_component_description_and_sections() {
        let meta = PackMeta::from_json_bytes(
            br#"{
                "pack": {
                    "pack_format": 18,
                    "description": {"text": "Fancy", "color": "gold"},
                    "supported_formats": [16, 20]
                },
                "language": {"xx_yy": {"name": "X", "region": "Y", "bidirectional": false}}
            }"#,
        )
        .unwrap();
        assert_eq!(meta.description.style().color, Some(TextColor::Named(NamedColor::Gold)));
        assert_eq!(meta.supported_formats, Some(FormatRange::new(16, 20)));
        assert!(meta.sections.contains_key("language"));
    }

    #[test]
    fn test_supported_formats_shapes() {
        let single: FormatRange = serde_json::from_str("12").unwrap();
        assert_eq!(single, FormatRange::single(12));
        let object: FormatRange =
            serde_json::from_str(r#"{"min_inclusive": 3, "max_inclusive": 9}"#).unwrap();
        assert_eq!(object, FormatRange::new(3, 9));
        assert!(FormatRange::new(5, 4).is_empty());
        assert!(FormatRange::new(4, 5).contains(5));
    }

    #[test]
    fn test_missing_pack_section_fails() {
        assert!(PackMeta::from_json_bytes(br#"{"language":{}}"#).is_err());
        assert!(PackMeta::from_json_bytes(b"not json").is_err());
    }

    #[test]
    fn test_json_roundtrip() {
        let meta = PackMeta::new(22, TextComponent::text("Desc").color(NamedColor::Aqua))
            .with_supported_formats(FormatRange::new(18, 22))
            .with_section("sodium", serde_json::json!({"ignored_shaders": ["clouds"]}));
        let bytes = meta.to_json_bytes().unwrap();
        let back = PackMeta::from_json_bytes(&bytes).unwrap();
        assert_eq!(back, meta);
    }

    #[test]
    fn test_overdeep_description_is_an_error() {
        let mut description = TextComponent::text("top");
        let mut parent = description.root();
        for _ in 0..1_000 {
            parent = description.push_child(parent, "x", crate::text::Style::new());
        }
        let meta = PackMeta::new(22, description);
        assert!(matches!(
            meta.to_json_bytes(),
            Err(PackError::Text(crate::error::TextError::TooDeep { depth: 1_001, .. }))
        ));
    }
}
