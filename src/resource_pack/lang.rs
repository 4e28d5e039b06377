//! Language files (`assets/<namespace>/lang/<locale>.json`).

use crate::error::{PackError, Result, TextError};
use crate::text::{LegacySerializer, TextComponent};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Translation key → legacy-formatted string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageFile {
    entries: BTreeMap<String, String>,
}

impl LanguageFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a lang JSON object. Values must all be strings.
    pub fn parse(data: &[u8]) -> Result<Self> {
        serde_json::from_slice(data).map_err(PackError::from)
    }

    /// Build a file by serializing each component to legacy text.
    pub fn from_components<'a, I>(entries: I, serializer: &LegacySerializer) -> std::result::Result<Self, TextError>
    where
        I: IntoIterator<Item = (String, &'a TextComponent)>,
    {
        let mut file = Self::new();
        for (key, component) in entries {
            file.entries.insert(key, serializer.serialize(component)?);
        }
        Ok(file)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Entry parsed back into a flat component.
    pub fn component(&self, key: &str, serializer: &LegacySerializer) -> Option<TextComponent> {
        self.get(key).map(|value| serializer.deserialize(value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn to_json_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self).map_err(PackError::from)
    }
}
