//! Asset categories and their location inside a pack.

use crate::error::KeyError;
use crate::key::{ResourceKey, DEFAULT_NAMESPACE};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of asset. Decides the on-disk layout and how validators interpret content; the
/// store itself never looks inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetCategory {
    Texture,
    Model,
    Sound,
    Lang,
    /// Pack-level files at the archive root (credits, custom metadata).
    PackMeta,
    /// Anything else under `assets/<namespace>/`, keyed by its full relative path.
    Other,
}

impl AssetCategory {
    pub const ALL: [AssetCategory; 6] = [
        AssetCategory::Texture,
        AssetCategory::Model,
        AssetCategory::Sound,
        AssetCategory::Lang,
        AssetCategory::PackMeta,
        AssetCategory::Other,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AssetCategory::Texture => "texture",
            AssetCategory::Model => "model",
            AssetCategory::Sound => "sound",
            AssetCategory::Lang => "lang",
            AssetCategory::PackMeta => "pack_meta",
            AssetCategory::Other => "other",
        }
    }

    /// Directory below `assets/<namespace>/`, for categories that have one.
    pub fn directory(self) -> Option<&'static str> {
        match self {
            AssetCategory::Texture => Some("textures"),
            AssetCategory::Model => Some("models"),
            AssetCategory::Sound => Some("sounds"),
            AssetCategory::Lang => Some("lang"),
            AssetCategory::PackMeta | AssetCategory::Other => None,
        }
    }

    /// File extension implied by the category (not part of the key).
    pub fn extension(self) -> Option<&'static str> {
        match self {
            AssetCategory::Texture => Some("png"),
            AssetCategory::Model | AssetCategory::Lang => Some("json"),
            AssetCategory::Sound => Some("ogg"),
            AssetCategory::PackMeta | AssetCategory::Other => None,
        }
    }

    fn from_directory(directory: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.directory() == Some(directory))
    }
}

impl fmt::Display for AssetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Identity of an asset inside a store or a merged view.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetId {
    pub category: AssetCategory,
    pub key: ResourceKey,
}

impl AssetId {
    pub fn new(category: AssetCategory, key: ResourceKey) -> Self {
        Self { category, key }
    }

    /// Path of this asset inside a pack archive, using `/` separators.
    pub fn archive_path(&self) -> String {
        let key = &self.key;
        match (self.category.directory(), self.category.extension()) {
            (Some(directory), Some(extension)) => format!(
                "assets/{}/{}/{}.{}",
                key.namespace(),
                directory,
                key.path(),
                extension
            ),
            _ if self.category == AssetCategory::PackMeta => key.path().to_string(),
            _ => format!("assets/{}/{}", key.namespace(), key.path()),
        }
    }

    /// Path of the `.mcmeta` file paired with a texture. `None` for other categories.
    pub fn metadata_path(&self) -> Option<String> {
        (self.category == AssetCategory::Texture)
            .then(|| format!("{}.{}", self.archive_path(), METADATA_EXTENSION))
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.key, self.category)
    }
}

const METADATA_EXTENSION: &str = "mcmeta";

/// Whether `path` is relative and stays inside the pack root: `/`-separated, with no
/// empty, `.` or `..` segments and no backslashes.
pub fn is_safe_archive_path(path: &str) -> bool {
    !path.is_empty()
        && !path.contains('\\')
        && path
            .split('/')
            .all(|segment| !segment.is_empty() && segment != "." && segment != "..")
}

/// The texture a `textures/**.png.mcmeta` path describes, if it is one.
pub fn classify_texture_metadata(file_path: &str) -> Result<Option<AssetId>, KeyError> {
    let Some(texture) = file_path
        .strip_suffix(METADATA_EXTENSION)
        .and_then(|rest| rest.strip_suffix('.'))
    else {
        return Ok(None);
    };
    Ok(classify_path(texture)?.filter(|id| id.category == AssetCategory::Texture))
}

/// Classify an archive path.
///
/// Returns `Ok(None)` for files that are not assets (outside `assets/`, directories, data
/// packs) and an error when the path looks like an asset but its name is not a valid key.
pub fn classify_path(file_path: &str) -> Result<Option<AssetId>, KeyError> {
    // Expected format: assets/{namespace}/{type}/{path}
    let parts: Vec<&str> = file_path.splitn(3, '/').collect();
    match parts.as_slice() {
        ["assets", namespace, rest] if !rest.is_empty() => {
            let (category, path) = match rest.split_once('/') {
                Some((directory, inner)) => match AssetCategory::from_directory(directory) {
                    Some(category) => match strip_category_extension(category, inner) {
                        Some(stripped) => (category, stripped),
                        None => (AssetCategory::Other, *rest),
                    },
                    None => (AssetCategory::Other, *rest),
                },
                None => (AssetCategory::Other, *rest),
            };
            let key = ResourceKey::new(*namespace, path)?;
            Ok(Some(AssetId::new(category, key)))
        }
        [name] if !name.is_empty() => {
            let key = ResourceKey::new(DEFAULT_NAMESPACE, *name)?;
            Ok(Some(AssetId::new(AssetCategory::PackMeta, key)))
        }
        _ => Ok(None),
    }
}

fn strip_category_extension(category: AssetCategory, path: &str) -> Option<&str> {
    let extension = category.extension()?;
    let stripped = path.strip_suffix(extension)?.strip_suffix('.')?;
    (!stripped.is_empty()).then_some(stripped)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(category: AssetCategory, key: &str) -> AssetId {
        AssetId::new(category, ResourceKey::parse(key).unwrap())
    }

    #[test]
    fn test_classify_path() {
        assert_eq!(
            classify_path("assets/minecraft/textures/block/stone.png").unwrap(),
            Some(id(AssetCategory::Texture, "minecraft:block/stone"))
        );
        assert_eq!(
            classify_path("assets/minecraft/models/block/stone.json").unwrap(),
            Some(id(AssetCategory::Model, "minecraft:block/stone"))
        );
        assert_eq!(
            classify_path("assets/mymod/sounds/step/gravel1.ogg").unwrap(),
            Some(id(AssetCategory::Sound, "mymod:step/gravel1"))
        );
        assert_eq!(
            classify_path("assets/mymod/lang/en_us.json").unwrap(),
            Some(id(AssetCategory::Lang, "mymod:en_us"))
        );
        assert_eq!(
            classify_path("assets/minecraft/textures/block/water.png.mcmeta").unwrap(),
            Some(id(AssetCategory::Other, "minecraft:textures/block/water.png.mcmeta"))
        );
        assert_eq!(
            classify_path("assets/minecraft/blockstates/stone.json").unwrap(),
            Some(id(AssetCategory::Other, "minecraft:blockstates/stone.json"))
        );
        assert_eq!(
            classify_path("assets/minecraft/sounds.json").unwrap(),
            Some(id(AssetCategory::Other, "minecraft:sounds.json"))
        );
        assert_eq!(
            classify_path("credits.txt").unwrap(),
            Some(id(AssetCategory::PackMeta, "minecraft:credits.txt"))
        );
        assert_eq!(classify_path("data/minecraft/recipes/test.json").unwrap(), None);
        assert_eq!(classify_path("assets/minecraft/").unwrap(), None);
    }

    #[test]
    fn test_texture_metadata_paths() {
        let water = id(AssetCategory::Texture, "minecraft:block/water_still");
        assert_eq!(
            classify_texture_metadata("assets/minecraft/textures/block/water_still.png.mcmeta").unwrap(),
            Some(water.clone())
        );
        assert_eq!(
            water.metadata_path().as_deref(),
            Some("assets/minecraft/textures/block/water_still.png.mcmeta")
        );
        assert_eq!(classify_texture_metadata("assets/minecraft/models/a.json.mcmeta").unwrap(), None);
        assert_eq!(classify_texture_metadata("pack.mcmeta").unwrap(), None);
        assert_eq!(id(AssetCategory::Model, "a").metadata_path(), None);
    }

    #[test]
    fn test_safe_archive_paths() {
        assert!(is_safe_archive_path("assets/minecraft/textures/a.png"));
        assert!(is_safe_archive_path("credits.txt"));
        assert!(is_safe_archive_path("assets/x/..hidden/file"));
        assert!(!is_safe_archive_path("../escaped.txt"));
        assert!(!is_safe_archive_path("assets/../../etc"));
        assert!(!is_safe_archive_path("assets/./a"));
        assert!(!is_safe_archive_path("/abs"));
        assert!(!is_safe_archive_path("a//b"));
        assert!(!is_safe_archive_path("a\\b"));
        assert!(!is_safe_archive_path(""));
    }

    #[test]
    fn test_classify_rejects_invalid_names() {
        assert!(classify_path("assets/minecraft/textures/block/Stone.png").is_err());
        assert!(classify_path("assets/My Mod/lang/en_us.json").is_err());
    }

    #[test]
    fn test_archive_path_inverts_classify() {
        for path in [
            "assets/minecraft/textures/block/stone.png",
            "assets/mymod/models/item/gem.json",
            "assets/mymod/sounds/boom.ogg",
            "assets/minecraft/lang/en_us.json",
            "assets/minecraft/font/default.json",
            "credits.txt",
        ] {
            let asset = classify_path(path).unwrap().unwrap();
            assert_eq!(asset.archive_path(), path);
        }
    }
}
