//! Resource pack contents.
//!
//! This module holds the per-pack building blocks: asset categories and their on-disk layout,
//! the asset entry store, registered pack sources, `pack.mcmeta` and language files, and the
//! loader that reads packs from ZIP files or directories.

pub mod category;
pub mod lang;
pub mod loader;
pub mod meta;
pub mod source;
pub mod store;

pub use category::{classify_path, classify_texture_metadata, is_safe_archive_path, AssetCategory, AssetId};
pub use lang::LanguageFile;
pub use loader::LoaderConfig;
pub use meta::{FormatRange, PackMeta};
pub use source::{PackSource, RawAsset};
pub use store::{AssetEntry, AssetStore};
