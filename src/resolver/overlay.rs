//! Multi-pack overlay resolution.

use super::view::MergedView;
use crate::error::StoreError;
use crate::key::ResourceKey;
use crate::resource_pack::{AssetCategory, AssetEntry, AssetId, PackMeta, PackSource};
use bytes::Bytes;
use parking_lot::{Mutex, RwLock};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Handle returned by [`OverlayResolver::register`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(u64);

impl SourceId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A registered source as seen from outside the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceInfo {
    pub id: SourceId,
    pub name: String,
    /// Priority given at registration, if any.
    pub priority: Option<i32>,
    /// Registration order, increasing.
    pub sequence: u64,
    pub asset_count: usize,
}

/// Sort key of a contribution: higher wins.
type Rank = (i32, u64);

#[derive(Debug, Clone)]
struct Contribution {
    source: SourceId,
    rank: Rank,
    entry: AssetEntry,
}

#[derive(Debug)]
struct Registered {
    priority: Option<i32>,
    sequence: u64,
    source: PackSource,
}

impl Registered {
    /// Rank of the source as a whole, used to pick pack-level metadata.
    fn rank(&self) -> Rank {
        (self.priority.unwrap_or(0), self.sequence)
    }
}

#[derive(Debug, Default)]
struct OverlayState {
    next_id: u64,
    next_sequence: u64,
    sources: BTreeMap<SourceId, Registered>,
    /// Contributions per identity, ascending by rank; the winner is last.
    index: HashMap<AssetId, Vec<Contribution>>,
}

/// Merges registered pack sources into one [`MergedView`].
///
/// Contributions are ranked by `(priority, registration sequence)` and the highest rank wins.
/// The priority is the one passed to [`register`](Self::register) when given, else the
/// `source_priority` each entry carries. Without explicit priorities the most recently
/// registered source wins; equal priorities fall back to the same rule.
///
/// Writers are serialized by a mutex around the index. Every change publishes a fresh
/// `Arc<MergedView>`, so readers holding a snapshot never see a half-applied update.
#[derive(Debug)]
pub struct OverlayResolver {
    state: Mutex<OverlayState>,
    current: RwLock<Arc<MergedView>>,
}

impl Default for OverlayResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl OverlayResolver {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(OverlayState::default()),
            current: RwLock::new(Arc::new(MergedView::empty())),
        }
    }

    /// Admit a source. Only identities the source defines are re-evaluated.
    ///
    /// Fails with [`StoreError::DuplicateKeyInSource`] when the source defines one asset
    /// twice; the view is left untouched in that case.
    pub fn register(&self, source: PackSource, priority: Option<i32>) -> Result<SourceId, StoreError> {
        if let Some(asset) = source.find_duplicate() {
            return Err(StoreError::DuplicateKeyInSource {
                asset,
                source_name: source.name().to_string(),
            });
        }

        let mut state = self.state.lock();
        let id = SourceId(state.next_id);
        let sequence = state.next_sequence;
        state.next_id += 1;
        state.next_sequence += 1;

        let mut touched = BTreeSet::new();
        for entry in source.entries() {
            let effective = priority.unwrap_or(entry.source_priority);
            let mut entry = entry.clone();
            entry.source_pack_id = id.0;
            entry.source_priority = effective;

            let asset = entry.id();
            let rank = (effective, sequence);
            let contributions = state.index.entry(asset.clone()).or_default();
            let position = contributions.partition_point(|c| c.rank < rank);
            contributions.insert(
                position,
                Contribution {
                    source: id,
                    rank,
                    entry,
                },
            );
            touched.insert(asset);
        }

        let name = source.name().to_string();
        let asset_count = source.len();
        state.sources.insert(
            id,
            Registered {
                priority,
                sequence,
                source,
            },
        );

        let changed = self.publish(&state, touched);
        debug!(source = %id, name = %name, assets = asset_count, changed, "registered pack source");
        Ok(id)
    }

    /// Remove a source and fall back to the next-ranked contributor for every identity it
    /// defined. Returns the source as it was registered.
    pub fn unregister(&self, id: SourceId) -> Result<PackSource, StoreError> {
        let mut state = self.state.lock();
        let registered = state
            .sources
            .remove(&id)
            .ok_or(StoreError::UnknownSource(id.0))?;

        let mut touched = BTreeSet::new();
        for entry in registered.source.entries() {
            let asset = entry.id();
            if let Some(contributions) = state.index.get_mut(&asset) {
                contributions.retain(|c| c.source != id);
                if contributions.is_empty() {
                    state.index.remove(&asset);
                }
            }
            touched.insert(asset);
        }

        let changed = self.publish(&state, touched);
        debug!(source = %id, name = %registered.source.name(), changed, "unregistered pack source");
        Ok(registered.source)
    }

    /// Recompute the winners of `touched`, publish the new view and return how many
    /// winners changed.
    fn publish(&self, state: &OverlayState, touched: BTreeSet<AssetId>) -> usize {
        let previous = self.snapshot();
        let mut entries = previous.entries().clone();
        let mut changes = BTreeSet::new();

        for asset in touched {
            let winner = state
                .index
                .get(&asset)
                .and_then(|contributions| contributions.last())
                .map(|c| &c.entry);

            match winner {
                Some(winner) => {
                    if entries.get(&asset) != Some(winner) {
                        entries.insert(asset.clone(), winner.clone());
                        changes.insert(asset);
                    }
                }
                None => {
                    if entries.remove(&asset).is_some() {
                        changes.insert(asset);
                    }
                }
            }
        }

        let changed = changes.len();
        let next = Arc::new(previous.successor(entries, changes));
        *self.current.write() = next;
        changed
    }

    /// The current merged view.
    pub fn snapshot(&self) -> Arc<MergedView> {
        self.current.read().clone()
    }

    /// The winning entry for `(key, category)` in the current view.
    pub fn resolve(&self, key: &ResourceKey, category: AssetCategory) -> Result<AssetEntry, StoreError> {
        self.snapshot().resolve(key, category).cloned()
    }

    /// See [`super::diff`].
    pub fn diff(&self, old: &MergedView, new: &MergedView) -> BTreeSet<AssetId> {
        super::view::diff(old, new)
    }

    /// Registered sources in registration order.
    pub fn sources(&self) -> Vec<SourceInfo> {
        let state = self.state.lock();
        let mut sources: Vec<SourceInfo> = state
            .sources
            .iter()
            .map(|(id, registered)| SourceInfo {
                id: *id,
                name: registered.source.name().to_string(),
                priority: registered.priority,
                sequence: registered.sequence,
                asset_count: registered.source.len(),
            })
            .collect();
        sources.sort_by_key(|info| info.sequence);
        sources
    }

    pub fn source_count(&self) -> usize {
        self.state.lock().sources.len()
    }

    /// Every contribution to `id`, winner first.
    pub fn contributors(&self, id: &AssetId) -> Vec<AssetEntry> {
        let state = self.state.lock();
        state
            .index
            .get(id)
            .map(|contributions| contributions.iter().rev().map(|c| c.entry.clone()).collect())
            .unwrap_or_default()
    }

    /// Pack metadata of the highest-ranked source that has any.
    pub fn primary_meta(&self) -> Option<PackMeta> {
        let state = self.state.lock();
        state
            .sources
            .values()
            .filter(|r| r.source.meta().is_some())
            .max_by_key(|r| r.rank())
            .and_then(|r| r.source.meta().cloned())
    }

    /// Icon of the highest-ranked source that has one.
    pub fn primary_icon(&self) -> Option<Bytes> {
        let state = self.state.lock();
        state
            .sources
            .values()
            .filter(|r| r.source.icon().is_some())
            .max_by_key(|r| r.rank())
            .and_then(|r| r.source.icon().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::diff;
    use crate::resource_pack::RawAsset;

    fn source(name: &str, assets: &[(&str, AssetCategory, &'static str)]) -> PackSource {
        PackSource::from_raw(
            name,
            assets
                .iter()
                .map(|(key, category, content)| RawAsset::new(*key, *category, content.as_bytes())),
        )
        .unwrap()
    }

    fn key(raw: &str) -> ResourceKey {
        ResourceKey::parse(raw).unwrap()
    }

    fn content(resolver: &OverlayResolver, raw: &str, category: AssetCategory) -> String {
        let entry = resolver.resolve(&key(raw), category).unwrap();
        entry.as_str().unwrap().to_string()
    }

    #[test]
    fn test_higher_priority_wins_and_unregister_falls_back() {
        let resolver = OverlayResolver::new();
        let a = resolver
            .register(source("a", &[("k", AssetCategory::Texture, "a")]), Some(1))
            .unwrap();
        let b = resolver
            .register(source("b", &[("k", AssetCategory::Texture, "b")]), Some(2))
            .unwrap();

        assert_eq!(content(&resolver, "k", AssetCategory::Texture), "b");
        let entry = resolver.resolve(&key("k"), AssetCategory::Texture).unwrap();
        assert_eq!(entry.source_pack_id, b.get());
        assert_eq!(entry.source_priority, 2);

        resolver.unregister(b).unwrap();
        assert_eq!(content(&resolver, "k", AssetCategory::Texture), "a");

        resolver.unregister(a).unwrap();
        assert!(matches!(
            resolver.resolve(&key("k"), AssetCategory::Texture),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_explicit_priority_beats_order() {
        let resolver = OverlayResolver::new();
        resolver
            .register(source("high", &[("k", AssetCategory::Model, "high")]), Some(10))
            .unwrap();
        resolver
            .register(source("low", &[("k", AssetCategory::Model, "low")]), Some(1))
            .unwrap();
        assert_eq!(content(&resolver, "k", AssetCategory::Model), "high");
    }

    #[test]
    fn test_later_registration_wins_without_priorities() {
        let resolver = OverlayResolver::new();
        resolver
            .register(source("first", &[("k", AssetCategory::Lang, "first")]), None)
            .unwrap();
        resolver
            .register(source("second", &[("k", AssetCategory::Lang, "second")]), None)
            .unwrap();
        assert_eq!(content(&resolver, "k", AssetCategory::Lang), "second");

        // Equal explicit priorities behave the same.
        resolver
            .register(source("third", &[("k", AssetCategory::Lang, "third")]), Some(0))
            .unwrap();
        assert_eq!(content(&resolver, "k", AssetCategory::Lang), "third");
    }

    #[test]
    fn test_entry_priority_used_without_explicit_priority() {
        let mut store = crate::resource_pack::AssetStore::new(0);
        store.put(key("k"), AssetCategory::Sound, &b"stored"[..], 5);
        let resolver = OverlayResolver::new();
        resolver
            .register(PackSource::from_store("stored", store), None)
            .unwrap();
        resolver
            .register(source("later", &[("k", AssetCategory::Sound, "later")]), None)
            .unwrap();
        assert_eq!(content(&resolver, "k", AssetCategory::Sound), "stored");
    }

    #[test]
    fn test_duplicate_key_rejected_and_view_unchanged() {
        let resolver = OverlayResolver::new();
        resolver
            .register(source("base", &[("k", AssetCategory::Texture, "base")]), None)
            .unwrap();
        let before = resolver.snapshot();

        let result = resolver.register(
            source(
                "broken",
                &[
                    ("k", AssetCategory::Texture, "one"),
                    ("minecraft:k", AssetCategory::Texture, "two"),
                ],
            ),
            Some(100),
        );
        match result {
            Err(StoreError::DuplicateKeyInSource { asset, source_name }) => {
                assert_eq!(asset.key, key("k"));
                assert_eq!(source_name, "broken");
            }
            other => panic!("expected duplicate error, got {other:?}"),
        }

        let after = resolver.snapshot();
        assert_eq!(after.generation(), before.generation());
        assert_eq!(content(&resolver, "k", AssetCategory::Texture), "base");
        assert_eq!(resolver.source_count(), 1);
    }

    #[test]
    fn test_same_key_in_different_categories_is_not_duplicate() {
        let resolver = OverlayResolver::new();
        resolver
            .register(
                source(
                    "both",
                    &[
                        ("block/stone", AssetCategory::Texture, "png"),
                        ("block/stone", AssetCategory::Model, "json"),
                    ],
                ),
                None,
            )
            .unwrap();
        assert_eq!(resolver.snapshot().len(), 2);
    }

    #[test]
    fn test_unknown_source() {
        let resolver = OverlayResolver::new();
        let id = resolver.register(source("x", &[]), None).unwrap();
        resolver.unregister(id).unwrap();
        assert!(matches!(resolver.unregister(id), Err(StoreError::UnknownSource(_))));
    }

    #[test]
    fn test_diff_between_snapshots() {
        let resolver = OverlayResolver::new();
        resolver
            .register(
                source(
                    "base",
                    &[
                        ("a", AssetCategory::Texture, "1"),
                        ("b", AssetCategory::Texture, "1"),
                    ],
                ),
                None,
            )
            .unwrap();
        let v1 = resolver.snapshot();

        let top = resolver
            .register(
                source(
                    "top",
                    &[
                        ("b", AssetCategory::Texture, "2"),
                        ("c", AssetCategory::Texture, "2"),
                    ],
                ),
                Some(5),
            )
            .unwrap();
        let v2 = resolver.snapshot();

        let changed: Vec<String> = resolver.diff(&v1, &v2).iter().map(|id| id.key.to_string()).collect();
        assert_eq!(changed, vec!["minecraft:b", "minecraft:c"]);

        // A lower-ranked source whose only asset is shadowed changes nothing.
        resolver
            .register(source("hidden", &[("c", AssetCategory::Texture, "0")]), Some(-1))
            .unwrap();
        let v3 = resolver.snapshot();
        assert!(diff(&v2, &v3).is_empty());

        resolver.unregister(top).unwrap();
        let v4 = resolver.snapshot();
        // Non-consecutive views are compared entry by entry.
        let changed: Vec<String> = diff(&v2, &v4).iter().map(|id| id.key.to_string()).collect();
        assert_eq!(changed, vec!["minecraft:b", "minecraft:c"]);
        assert_eq!(content(&resolver, "c", AssetCategory::Texture), "0");
        assert_eq!(diff(&v1, &v4).len(), 1);
    }

    #[test]
    fn test_contributors_and_sources() {
        let resolver = OverlayResolver::new();
        resolver
            .register(source("base", &[("k", AssetCategory::Texture, "base")]), None)
            .unwrap();
        resolver
            .register(source("top", &[("k", AssetCategory::Texture, "top")]), Some(3))
            .unwrap();

        let id = AssetId::new(AssetCategory::Texture, key("k"));
        let chain: Vec<String> = resolver
            .contributors(&id)
            .iter()
            .map(|e| e.as_str().unwrap().to_string())
            .collect();
        assert_eq!(chain, vec!["top", "base"]);

        let sources = resolver.sources();
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].name, "base");
        assert_eq!(sources[1].priority, Some(3));
    }

    #[test]
    fn test_primary_meta_follows_rank() {
        let resolver = OverlayResolver::new();
        resolver
            .register(PackSource::new("a").with_meta(PackMeta::new(15, "A")), Some(5))
            .unwrap();
        resolver
            .register(PackSource::new("b").with_meta(PackMeta::new(18, "B")), None)
            .unwrap();
        resolver.register(PackSource::new("c"), Some(9)).unwrap();
        assert_eq!(resolver.primary_meta().unwrap().format, 15);
        assert!(resolver.primary_icon().is_none());
    }

    #[test]
    fn test_readers_see_whole_snapshots() {
        let resolver = OverlayResolver::new();
        let assets: Vec<String> = (0..50).map(|i| format!("asset_{i}")).collect();

        std::thread::scope(|scope| {
            scope.spawn(|| {
                for round in 0..20 {
                    let raw = assets
                        .iter()
                        .map(|k| RawAsset::new(k.clone(), AssetCategory::Texture, format!("{round}")));
                    let id = resolver
                        .register(PackSource::from_raw(format!("p{round}"), raw).unwrap(), None)
                        .unwrap();
                    if round % 2 == 1 {
                        resolver.unregister(id).unwrap();
                    }
                }
            });

            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..200 {
                        let view = resolver.snapshot();
                        let contents: BTreeSet<&[u8]> =
                            view.list(None).map(|e| e.content.as_ref()).collect();
                        assert!(view.is_empty() || (view.len() == 50 && contents.len() == 1));
                    }
                });
            }
        });

        assert_eq!(resolver.source_count(), 10);
        assert_eq!(content(&resolver, "asset_7", AssetCategory::Texture), "18");
    }

    #[test]
    fn test_small_updates_leave_large_views_intact() {
        let resolver = OverlayResolver::new();
        let base = (0..10_000).map(|i| RawAsset::new(format!("block/b{i}"), AssetCategory::Texture, &b"base"[..]));
        resolver
            .register(PackSource::from_raw("base", base).unwrap(), None)
            .unwrap();
        let first = resolver.snapshot();

        let mut previous = first.clone();
        for i in 0..500 {
            resolver
                .register(
                    source(&format!("tweak{i}"), &[("block/b0", AssetCategory::Texture, "tweak")]),
                    None,
                )
                .unwrap();
            let next = resolver.snapshot();
            assert_eq!(next.parent_generation(), Some(previous.generation()));
            assert_eq!(next.changes().len(), 1);
            assert_eq!(next.len(), 10_000);
            previous = next;
        }

        // Earlier snapshots keep their own winners.
        let stone = key("block/b0");
        assert_eq!(first.resolve(&stone, AssetCategory::Texture).unwrap().as_str(), Some("base"));
        assert_eq!(previous.resolve(&stone, AssetCategory::Texture).unwrap().as_str(), Some("tweak"));
        assert_eq!(diff(&first, &previous).len(), 1);
    }

    #[test]
    fn test_texture_metadata_resolves_with_texture() {
        let resolver = OverlayResolver::new();
        let animated = PackSource::from_raw(
            "animated",
            vec![RawAsset::new("block/water_still", AssetCategory::Texture, &b"frames"[..])
                .with_metadata(&br#"{"animation":{}}"#[..])],
        )
        .unwrap();
        let flat = source("flat", &[("block/water_still", AssetCategory::Texture, "flat")]);
        resolver.register(animated, None).unwrap();
        resolver.register(flat, None).unwrap();

        let winner = resolver.resolve(&key("block/water_still"), AssetCategory::Texture).unwrap();
        assert_eq!(winner.as_str(), Some("flat"));
        assert_eq!(winner.metadata, None);
    }
}
