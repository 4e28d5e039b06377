//! Immutable merged view snapshots.

use crate::error::StoreError;
use crate::key::ResourceKey;
use crate::resource_pack::{AssetCategory, AssetEntry, AssetId};
use im::OrdMap;
use std::cmp::Ordering as CmpOrdering;
use std::collections::BTreeSet;
use std::iter::Peekable;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

pub(crate) fn next_generation() -> u64 {
    NEXT_GENERATION.fetch_add(1, Ordering::Relaxed)
}

/// The winning entry for every asset identity across all registered sources.
///
/// A view never changes after it is published. Every view carries a process-wide unique
/// generation, the generation it was derived from and the identities whose winner changed
/// in that step, so that [`diff`] between consecutive views needs no scan.
///
/// Entries live in a persistent map: a successor shares every untouched node with its
/// parent, so publishing costs time proportional to the changed identities only.
#[derive(Debug, Clone)]
pub struct MergedView {
    generation: u64,
    parent: Option<u64>,
    changes: BTreeSet<AssetId>,
    entries: OrdMap<AssetId, AssetEntry>,
}

impl Default for MergedView {
    fn default() -> Self {
        Self::empty()
    }
}

impl MergedView {
    pub fn empty() -> Self {
        Self {
            generation: next_generation(),
            parent: None,
            changes: BTreeSet::new(),
            entries: OrdMap::new(),
        }
    }

    pub(crate) fn successor(
        &self,
        entries: OrdMap<AssetId, AssetEntry>,
        changes: BTreeSet<AssetId>,
    ) -> Self {
        Self {
            generation: next_generation(),
            parent: Some(self.generation),
            changes,
            entries,
        }
    }

    pub(crate) fn entries(&self) -> &OrdMap<AssetId, AssetEntry> {
        &self.entries
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Generation of the view this one was derived from.
    pub fn parent_generation(&self) -> Option<u64> {
        self.parent
    }

    /// Identities whose winner changed relative to the parent view.
    pub fn changes(&self) -> &BTreeSet<AssetId> {
        &self.changes
    }

    pub fn get(&self, id: &AssetId) -> Option<&AssetEntry> {
        self.entries.get(id)
    }

    pub fn resolve(&self, key: &ResourceKey, category: AssetCategory) -> Result<&AssetEntry, StoreError> {
        let id = AssetId::new(category, key.clone());
        self.entries.get(&id).ok_or(StoreError::NotFound(id))
    }

    pub fn contains(&self, id: &AssetId) -> bool {
        self.entries.contains_key(id)
    }

    /// Winning entries ordered by `(category, key)`.
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

    pub fn count(&self, category: AssetCategory) -> usize {
        self.list(Some(category)).count()
    }

    pub fn namespaces(&self) -> Vec<&str> {
        let mut namespaces: Vec<&str> = self.entries.keys().map(|id| id.key.namespace()).collect();
        namespaces.sort();
        namespaces.dedup();
        namespaces
    }
}

/// Identities whose winning entry differs between two views, including ones that appeared
/// or disappeared.
pub fn diff(old: &MergedView, new: &MergedView) -> BTreeSet<AssetId> {
    if old.generation == new.generation {
        return BTreeSet::new();
    }
    if new.parent == Some(old.generation) {
        return new.changes.clone();
    }
    if old.parent == Some(new.generation) {
        return old.changes.clone();
    }
    merge_walk(old.entries.iter().peekable(), new.entries.iter().peekable())
}

fn merge_walk<'a, I>(mut old: Peekable<I>, mut new: Peekable<I>) -> BTreeSet<AssetId>
where
    I: Iterator<Item = (&'a AssetId, &'a AssetEntry)>,
{
    let mut changed = BTreeSet::new();
    loop {
        let order = match (old.peek(), new.peek()) {
            (None, None) => break,
            (Some(_), None) => CmpOrdering::Less,
            (None, Some(_)) => CmpOrdering::Greater,
            (Some((a, _)), Some((b, _))) => a.cmp(b),
        };
        match order {
            CmpOrdering::Less => {
                if let Some((id, _)) = old.next() {
                    changed.insert(id.clone());
                }
            }
            CmpOrdering::Greater => {
                if let Some((id, _)) = new.next() {
                    changed.insert(id.clone());
                }
            }
            CmpOrdering::Equal => {
                if let (Some((id, a)), Some((_, b))) = (old.next(), new.next()) {
                    if a != b {
                        changed.insert(id.clone());
                    }
                }
            }
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(key: &str, content: &'static [u8], source: u64) -> AssetEntry {
        AssetEntry::new(ResourceKey::parse(key).unwrap(), AssetCategory::Texture, content, source, 0)
    }

    fn view(entries: Vec<AssetEntry>) -> MergedView {
        let map = entries.into_iter().map(|e| (e.id(), e)).collect();
        MergedView::empty().successor(map, BTreeSet::new())
    }

    #[test]
    fn test_unrelated_views_are_walked() {
        let old = view(vec![entry("a", b"1", 1), entry("b", b"1", 1), entry("c", b"1", 1)]);
        let new = view(vec![entry("b", b"1", 1), entry("c", b"2", 2), entry("d", b"1", 1)]);

        let changed: Vec<String> = diff(&old, &new).iter().map(|id| id.key.to_string()).collect();
        assert_eq!(changed, vec!["minecraft:a", "minecraft:c", "minecraft:d"]);
        assert_eq!(diff(&new, &old), diff(&old, &new));
        assert!(diff(&old, &old).is_empty());
    }

    #[test]
    fn test_successor_uses_recorded_changes() {
        let base = view(vec![entry("a", b"1", 1)]);
        let changes: BTreeSet<AssetId> = [entry("z", b"", 0).id()].into_iter().collect();
        let next = base.successor(base.entries().clone(), changes.clone());

        assert_eq!(next.parent_generation(), Some(base.generation()));
        assert_eq!(diff(&base, &next), changes);
        assert_eq!(diff(&next, &base), changes);
    }

    #[test]
    fn test_lookup() {
        let v = view(vec![entry("mymod:gem", b"x", 1)]);
        let key = ResourceKey::parse("mymod:gem").unwrap();
        assert!(v.resolve(&key, AssetCategory::Texture).is_ok());
        assert!(matches!(
            v.resolve(&key, AssetCategory::Model),
            Err(StoreError::NotFound(_))
        ));
        assert_eq!(v.namespaces(), vec!["mymod"]);
        assert_eq!(v.count(AssetCategory::Texture), 1);
    }
}
