//! Per-pack asset storage.

use super::category::{AssetCategory, AssetId};
use crate::error::StoreError;
use crate::key::ResourceKey;
use bytes::Bytes;
use std::collections::BTreeMap;

/// One asset: its identity, opaque content and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetEntry {
    pub key: ResourceKey,
    pub category: AssetCategory,
    /// Raw file content, never interpreted by the store.
    pub content: Bytes,
    /// Id of the pack (or registered source) that owns this entry.
    pub source_pack_id: u64,
    /// Priority the owning source contributes this entry with.
    pub source_priority: i32,
    /// Texture properties (`<texture>.png.mcmeta`: animation, blur, clamp) that are
    /// resolved and exported together with the texture.
    pub metadata: Option<Bytes>,
}

impl AssetEntry {
    pub fn new(
        key: ResourceKey,
        category: AssetCategory,
        content: impl Into<Bytes>,
        source_pack_id: u64,
        source_priority: i32,
    ) -> Self {
        Self {
            key,
            category,
            content: content.into(),
            source_pack_id,
            source_priority,
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, metadata: impl Into<Bytes>) -> Self {
        self.metadata = Some(metadata.into());
        self
    }

    pub fn id(&self) -> AssetId {
        AssetId::new(self.category, self.key.clone())
    }

    /// Content as UTF-8 text, if it is valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.content).ok()
    }
}

/// Assets of a single pack, keyed by `(category, key)`.
///
/// Writes within a store are last-write-wins; `list` walks a sorted snapshot.
#[derive(Debug, Clone, Default)]
pub struct AssetStore {
    pack_id: u64,
    entries: BTreeMap<AssetId, AssetEntry>,
}

impl AssetStore {
    pub fn new(pack_id: u64) -> Self {
        Self {
            pack_id,
            entries: BTreeMap::new(),
        }
    }

    pub fn pack_id(&self) -> u64 {
        self.pack_id
    }

    /// Insert or replace the entry for `(key, category)`. Returns the replaced entry.
    pub fn put(
        &mut self,
        key: ResourceKey,
        category: AssetCategory,
        content: impl Into<Bytes>,
        priority: i32,
    ) -> Option<AssetEntry> {
        let entry = AssetEntry::new(key, category, content, self.pack_id, priority);
        self.entries.insert(entry.id(), entry)
    }

    /// Insert a prepared entry (for example a texture carrying metadata) under this store's
    /// pack id. Returns the replaced entry.
    pub fn insert(&mut self, mut entry: AssetEntry) -> Option<AssetEntry> {
        entry.source_pack_id = self.pack_id;
        self.entries.insert(entry.id(), entry)
    }

    pub fn get(&self, key: &ResourceKey, category: AssetCategory) -> Result<&AssetEntry, StoreError> {
        let id = AssetId::new(category, key.clone());
        self.entries.get(&id).ok_or(StoreError::NotFound(id))
    }

    pub fn contains(&self, key: &ResourceKey, category: AssetCategory) -> bool {
        self.entries.contains_key(&AssetId::new(category, key.clone()))
    }

    pub fn remove(&mut self, key: &ResourceKey, category: AssetCategory) -> Option<AssetEntry> {
        self.entries.remove(&AssetId::new(category, key.clone()))
    }

    /// Entries ordered by `(category, key)`, optionally restricted to one category.
    pub fn list(&self, category: Option<AssetCategory>) -> impl Iterator<Item = &AssetEntry> + '_ {
        self.entries
            .values()
            .filter(move |entry| category.map_or(true, |c| entry.category == c))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries per category.
    pub fn count(&self, category: AssetCategory) -> usize {
        self.list(Some(category)).count()
    }

    /// Get all namespaces in the store.
    pub fn namespaces(&self) -> Vec<&str> {
        let mut namespaces: Vec<&str> = self.entries.keys().map(|id| id.key.namespace()).collect();
        namespaces.sort();
        namespaces.dedup();
        namespaces
    }

    pub(crate) fn into_entries(self) -> impl Iterator<Item = AssetEntry> {
        self.entries.into_values()
    }
}
