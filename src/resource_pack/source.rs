//! Registered pack contents.

use super::category::{AssetCategory, AssetId};
use super::meta::PackMeta;
use super::store::{AssetEntry, AssetStore};
use crate::error::KeyError;
use crate::key::ResourceKey;
use bytes::Bytes;
use std::collections::HashSet;

/// A `(key string, category, bytes)` triple as produced by a pack loader.
#[derive(Debug, Clone)]
pub struct RawAsset {
    pub key: String,
    pub category: AssetCategory,
    pub content: Bytes,
    /// Texture `.png.mcmeta` content, if any.
    pub metadata: Option<Bytes>,
}

impl RawAsset {
    pub fn new(key: impl Into<String>, category: AssetCategory, content: impl Into<Bytes>) -> Self {
        Self {
            key: key.into(),
            category,
            content: content.into(),
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, metadata: impl Into<Bytes>) -> Self {
        self.metadata = Some(metadata.into());
        self
    }
}

/// An ordered set of assets plus pack-level metadata.
///
/// A source is immutable once built: the `with_*` methods consume it and return a new one.
/// Entries are kept exactly as given, duplicates included, so that the overlay resolver can
/// reject authoring mistakes at registration.
#[derive(Debug, Clone, Default)]
pub struct PackSource {
    name: String,
    meta: Option<PackMeta>,
    icon: Option<Bytes>,
    entries: Vec<AssetEntry>,
}

impl PackSource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Take every entry out of a store.
    pub fn from_store(name: impl Into<String>, store: AssetStore) -> Self {
        Self {
            name: name.into(),
            entries: store.into_entries().collect(),
            ..Self::default()
        }
    }

    /// Build a source from loader triples, parsing every key. Entries get priority 0.
    pub fn from_raw<I>(name: impl Into<String>, assets: I) -> Result<Self, KeyError>
    where
        I: IntoIterator<Item = RawAsset>,
    {
        let entries = assets
            .into_iter()
            .map(|raw| {
                let key = ResourceKey::parse(&raw.key)?;
                let mut entry = AssetEntry::new(key, raw.category, raw.content, 0, 0);
                entry.metadata = raw.metadata;
                Ok(entry)
            })
            .collect::<Result<Vec<_>, KeyError>>()?;
        Ok(Self {
            name: name.into(),
            entries,
            ..Self::default()
        })
    }

    pub fn with_meta(mut self, meta: PackMeta) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn with_icon(mut self, icon: impl Into<Bytes>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_entry(mut self, entry: AssetEntry) -> Self {
        self.entries.push(entry);
        self
    }

    pub fn with_entries<I: IntoIterator<Item = AssetEntry>>(mut self, entries: I) -> Self {
        self.entries.extend(entries);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn meta(&self) -> Option<&PackMeta> {
        self.meta.as_ref()
    }

    pub fn icon(&self) -> Option<&Bytes> {
        self.icon.as_ref()
    }

    pub fn entries(&self) -> &[AssetEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries per category.
    pub fn count(&self, category: AssetCategory) -> usize {
        self.entries.iter().filter(|e| e.category == category).count()
    }

    /// First asset identity that appears more than once, if any.
    pub fn find_duplicate(&self) -> Option<AssetId> {
        let mut seen = HashSet::with_capacity(self.entries.len());
        self.entries
            .iter()
            .map(AssetEntry::id)
            .find(|id| !seen.insert(id.clone()))
    }

    /// Sorted, deduplicated namespaces used by the entries.
    pub fn namespaces(&self) -> Vec<&str> {
        let mut namespaces: Vec<&str> = self.entries.iter().map(|e| e.key.namespace()).collect();
        namespaces.sort();
        namespaces.dedup();
        namespaces
    }
}
