//! Pack publishing.
//!
//! Writes a [`MergedView`] back out as a loadable resource pack, either as a ZIP archive or
//! as a directory tree, using the layout of each asset category.

pub mod archive;
pub mod directory;

pub use archive::{write_zip, write_zip_with};
pub use directory::write_directory;

use crate::error::{PackError, Result};
use crate::resolver::MergedView;
use crate::resource_pack::{is_safe_archive_path, AssetCategory, PackMeta};
use bytes::Bytes;
use std::collections::hash_map::{Entry, HashMap};

const MCMETA_FILE: &str = "pack.mcmeta";
const ICON_FILE: &str = "pack.png";

/// Export behaviour.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Deflate archive members instead of storing them.
    pub compress: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self { compress: true }
    }
}

impl ExportOptions {
    pub fn stored() -> Self {
        Self { compress: false }
    }
}

/// Published files in order, each remembering which asset wrote it.
struct FileList {
    files: Vec<(String, Bytes)>,
    owners: HashMap<String, String>,
}

impl FileList {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            files: Vec::with_capacity(capacity),
            owners: HashMap::with_capacity(capacity),
        }
    }

    fn push(&mut self, path: String, content: Bytes, owner: String) -> Result<()> {
        if !is_safe_archive_path(&path) {
            return Err(PackError::UnsafePath(path));
        }
        match self.owners.entry(path) {
            Entry::Occupied(slot) => Err(PackError::PathCollision {
                path: slot.key().clone(),
                first: slot.get().clone(),
                second: owner,
            }),
            Entry::Vacant(slot) => {
                self.files.push((slot.key().clone(), content));
                slot.insert(owner);
                Ok(())
            }
        }
    }
}

/// Every file of the published pack as `(archive path, content)`, metadata first.
///
/// A pack-meta entry named `pack.mcmeta` or `pack.png` in the view is replaced by `meta`
/// or `icon` when those are given. Texture metadata is written next to its texture.
///
/// Fails with [`PackError::UnsafePath`] when a path would leave the pack root and with
/// [`PackError::PathCollision`] when two entries map to the same path, for example
/// pack-meta keys that differ only by namespace.
pub fn pack_files(view: &MergedView, meta: Option<&PackMeta>, icon: Option<&Bytes>) -> Result<Vec<(String, Bytes)>> {
    let mut files = FileList::with_capacity(view.len() + 2);
    if let Some(meta) = meta {
        files.push(MCMETA_FILE.to_string(), Bytes::from(meta.to_json_bytes()?), "pack metadata".into())?;
    }
    if let Some(icon) = icon {
        files.push(ICON_FILE.to_string(), icon.clone(), "pack icon".into())?;
    }

    for entry in view.list(None) {
        let id = entry.id();
        let path = id.archive_path();
        if entry.category == AssetCategory::PackMeta
            && ((path == MCMETA_FILE && meta.is_some()) || (path == ICON_FILE && icon.is_some()))
        {
            continue;
        }
        files.push(path, entry.content.clone(), id.to_string())?;
        if let (Some(metadata), Some(metadata_path)) = (&entry.metadata, id.metadata_path()) {
            files.push(metadata_path, metadata.clone(), format!("{} metadata", id))?;
        }
    }
    Ok(files.files)
}
