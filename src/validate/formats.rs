//! Accepted pack formats per game version.

use crate::error::{PackError, Result};
use crate::resource_pack::FormatRange;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Newest release in [`FormatRangeTable::vanilla`].
pub const VANILLA_SNAPSHOT_LATEST: &str = "1.21.4";

/// Java Edition releases and the pack format each one reads.
const VANILLA_FORMATS: &[(&str, i32)] = &[
    ("1.16.2", 6),
    ("1.16.5", 6),
    ("1.17", 7),
    ("1.17.1", 7),
    ("1.18", 8),
    ("1.18.2", 8),
    ("1.19", 9),
    ("1.19.2", 9),
    ("1.19.3", 12),
    ("1.19.4", 13),
    ("1.20", 15),
    ("1.20.1", 15),
    ("1.20.2", 18),
    ("1.20.4", 22),
    ("1.20.6", 32),
    ("1.21", 34),
    ("1.21.1", 34),
    ("1.21.3", 42),
    ("1.21.4", 46),
];

/// Target version → inclusive window of accepted pack formats.
///
/// Serialized as `{"1.20.1": {"min": 15, "max": 15}, ...}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormatRangeTable {
    targets: BTreeMap<String, FormatRange>,
}

impl FormatRangeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in snapshot of vanilla releases up to [`VANILLA_SNAPSHOT_LATEST`], each
    /// accepting exactly its own format.
    ///
    /// The snapshot is frozen with this crate and goes stale as the game ships new formats.
    /// Prefer a table loaded with [`from_path`](Self::from_path) or
    /// [`from_json_bytes`](Self::from_json_bytes); newer targets are reported as
    /// [`UnknownTarget`](crate::ValidationError::UnknownTarget) here.
    pub fn vanilla() -> Self {
        let targets = VANILLA_FORMATS
            .iter()
            .map(|(version, format)| (version.to_string(), FormatRange::single(*format)))
            .collect();
        Self { targets }
    }

    pub fn from_json_bytes(data: &[u8]) -> Result<Self> {
        serde_json::from_slice(data).map_err(PackError::from)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_json_bytes(&data)
    }

    pub fn with_target(mut self, target: impl Into<String>, range: FormatRange) -> Self {
        self.insert(target, range);
        self
    }

    pub fn insert(&mut self, target: impl Into<String>, range: FormatRange) -> Option<FormatRange> {
        self.targets.insert(target.into(), range)
    }

    pub fn get(&self, target: &str) -> Option<FormatRange> {
        self.targets.get(target).copied()
    }

    /// Known target names, sorted.
    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.targets.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}
