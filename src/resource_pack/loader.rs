//! Resource pack loading from ZIP files and directories.

use super::category::{classify_path, classify_texture_metadata, is_safe_archive_path, AssetCategory, AssetId};
use super::meta::PackMeta;
use super::source::PackSource;
use super::store::AssetEntry;
use crate::error::{PackError, Result};
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

const MCMETA_FILE: &str = "pack.mcmeta";
const ICON_FILE: &str = "pack.png";

/// Loader behaviour.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Fail on files whose names are not valid keys or would leave the pack root, or on a
    /// broken `pack.mcmeta`, instead of skipping them with a warning.
    pub strict: bool,
    /// Keep root-level files other than `pack.mcmeta`/`pack.png` as pack-meta assets.
    pub include_root_files: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            strict: false,
            include_root_files: true,
        }
    }
}

impl LoaderConfig {
    pub fn strict() -> Self {
        Self {
            strict: true,
            ..Self::default()
        }
    }

    pub fn with_root_files(mut self, include: bool) -> Self {
        self.include_root_files = include;
        self
    }
}

/// Load a resource pack from a file path with the default configuration.
///
/// Supports both ZIP files and directories.
pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<PackSource> {
    load_from_path_with(path, &LoaderConfig::default())
}

pub fn load_from_path_with<P: AsRef<Path>>(path: P, config: &LoaderConfig) -> Result<PackSource> {
    let path = path.as_ref();
    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| "pack".to_string());

    if path.is_dir() {
        load_from_directory(&name, path, config)
    } else {
        let data = std::fs::read(path)?;
        load_from_bytes_with(&name, &data, config)
    }
}

/// Load a resource pack from bytes (ZIP data).
pub fn load_from_bytes(data: &[u8]) -> Result<PackSource> {
    load_from_bytes_with("archive", data, &LoaderConfig::default())
}

pub fn load_from_bytes_with(name: &str, data: &[u8], config: &LoaderConfig) -> Result<PackSource> {
    let cursor = std::io::Cursor::new(data);
    let mut archive = zip::ZipArchive::new(cursor)?;

    // Some archives wrap the whole pack in one top-level folder.
    let prefix = archive
        .file_names()
        .find(|n| n.ends_with(MCMETA_FILE) && n.matches('/').count() == 1)
        .filter(|_| archive.index_for_name(MCMETA_FILE).is_none())
        .map(|n| n.trim_end_matches(MCMETA_FILE).to_string())
        .unwrap_or_default();

    let mut collector = PackCollector::new(name, config);

    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        if file.is_dir() {
            continue;
        }
        let Some(file_path) = file.name().strip_prefix(&prefix).map(str::to_string) else {
            continue;
        };

        let declared = file.size();
        let contents = read_member(&mut file, declared)?;
        collector.add_file(&file_path, contents)?;
    }

    collector.finish()
}

/// Largest buffer reserved up front for one archive member.
const MAX_PREALLOCATION: u64 = 1 << 20;

/// Read one archive member. The declared size comes from the archive and only hints the
/// initial capacity.
fn read_member<R: Read>(mut reader: R, declared_size: u64) -> std::io::Result<Vec<u8>> {
    let mut contents = Vec::with_capacity(declared_size.min(MAX_PREALLOCATION) as usize);
    reader.read_to_end(&mut contents)?;
    Ok(contents)
}

/// Load a resource pack from a directory.
fn load_from_directory(name: &str, path: &Path, config: &LoaderConfig) -> Result<PackSource> {
    if !path.join("assets").exists() && !path.join(MCMETA_FILE).exists() {
        return Err(PackError::InvalidResourcePack(
            "No assets directory or pack.mcmeta found".to_string(),
        ));
    }

    let mut collector = PackCollector::new(name, config);
    load_files_recursive(path, path, &mut |relative, data| collector.add_file(relative, data))?;
    collector.finish()
}

/// Visit every file below `dir`, passing its `/`-separated path relative to `base`.
fn load_files_recursive<F>(base: &Path, dir: &Path, handler: &mut F) -> Result<()>
where
    F: FnMut(&str, Vec<u8>) -> Result<()>,
{
    let mut entries: Vec<_> = std::fs::read_dir(dir)?.collect::<std::io::Result<_>>()?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let path = entry.path();
        if path.is_dir() {
            load_files_recursive(base, &path, handler)?;
        } else {
            let relative = path
                .strip_prefix(base)
                .map_err(|e| PackError::InvalidResourcePack(e.to_string()))?
                .to_string_lossy()
                .replace('\\', "/");
            let data = std::fs::read(&path)?;
            handler(&relative, data)?;
        }
    }
    Ok(())
}

/// Sorts loose files into assets, metadata and icon.
struct PackCollector<'a> {
    name: String,
    config: &'a LoaderConfig,
    entries: Vec<AssetEntry>,
    /// `.png.mcmeta` files by the texture they describe, with their own path.
    texture_metadata: BTreeMap<AssetId, (String, Vec<u8>)>,
    meta: Option<PackMeta>,
    icon: Option<Vec<u8>>,
    skipped: usize,
}

impl<'a> PackCollector<'a> {
    fn new(name: &str, config: &'a LoaderConfig) -> Self {
        Self {
            name: name.to_string(),
            config,
            entries: Vec::new(),
            texture_metadata: BTreeMap::new(),
            meta: None,
            icon: None,
            skipped: 0,
        }
    }

    fn add_file(&mut self, file_path: &str, data: Vec<u8>) -> Result<()> {
        match file_path {
            MCMETA_FILE => {
                match PackMeta::from_json_bytes(&data) {
                    Ok(meta) => self.meta = Some(meta),
                    Err(e) if self.config.strict => return Err(e),
                    Err(e) => {
                        warn!(pack = %self.name, error = %e, "failed to parse pack.mcmeta");
                    }
                }
                return Ok(());
            }
            ICON_FILE => {
                self.icon = Some(data);
                return Ok(());
            }
            _ => {}
        }

        if !is_safe_archive_path(file_path) {
            if self.config.strict {
                return Err(PackError::UnsafePath(file_path.to_string()));
            }
            self.skipped += 1;
            warn!(pack = %self.name, path = file_path, "skipping file outside the pack root");
            return Ok(());
        }

        match classify_texture_metadata(file_path) {
            Ok(Some(texture)) => {
                self.texture_metadata.insert(texture, (file_path.to_string(), data));
                return Ok(());
            }
            Ok(None) => {}
            Err(e) if self.config.strict => return Err(e.into()),
            Err(e) => {
                self.skipped += 1;
                warn!(pack = %self.name, path = file_path, error = %e, "skipping file with invalid resource key");
                return Ok(());
            }
        }

        self.add_asset(file_path, data)
    }

    fn add_asset(&mut self, file_path: &str, data: Vec<u8>) -> Result<()> {
        match classify_path(file_path) {
            Ok(Some(id)) => {
                if id.category == AssetCategory::PackMeta && !self.config.include_root_files {
                    return Ok(());
                }
                self.entries.push(AssetEntry::new(id.key, id.category, data, 0, 0));
            }
            Ok(None) => {}
            Err(e) if self.config.strict => return Err(e.into()),
            Err(e) => {
                self.skipped += 1;
                warn!(pack = %self.name, path = file_path, error = %e, "skipping file with invalid resource key");
            }
        }
        Ok(())
    }

    fn finish(mut self) -> Result<PackSource> {
        for entry in &mut self.entries {
            if entry.category == AssetCategory::Texture {
                if let Some((_, metadata)) = self.texture_metadata.remove(&entry.id()) {
                    entry.metadata = Some(metadata.into());
                }
            }
        }
        // Metadata without its texture is kept as a plain file.
        for (_, (file_path, data)) in std::mem::take(&mut self.texture_metadata) {
            debug!(pack = %self.name, path = %file_path, "texture metadata without texture");
            self.add_asset(&file_path, data)?;
        }

        debug!(
            pack = %self.name,
            assets = self.entries.len(),
            skipped = self.skipped,
            has_meta = self.meta.is_some(),
            "loaded resource pack"
        );

        let mut source = PackSource::new(self.name).with_entries(self.entries);
        if let Some(meta) = self.meta {
            source = source.with_meta(meta);
        }
        if let Some(icon) = self.icon {
            source = source.with_icon(icon);
        }
        Ok(source)
    }
}
