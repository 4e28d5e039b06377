//! # Creative Pack
//!
//! A Rust library for assembling Minecraft: Java Edition resource packs.
//!
//! ## Overview
//!
//! Packs are collections of namespaced assets (textures, models, sounds, language files and
//! pack metadata) addressed by `namespace:path` keys. This library parses those keys, stores
//! assets per pack, merges several packs into one view with deterministic precedence,
//! validates `pack.mcmeta` and converts rich text components to and from legacy
//! `§`-formatted text.
//!
//! ## Quick Start
//!
//! ```ignore
//! use creative_pack::{load_resource_pack, write_zip, OverlayResolver};
//!
//! // Load two packs
//! let base = load_resource_pack("path/to/base.zip")?;
//! let tweaks = load_resource_pack("path/to/tweaks")?;
//!
//! // Stack them: the later registration wins unless a priority says otherwise
//! let resolver = OverlayResolver::new();
//! resolver.register(base, None)?;
//! resolver.register(tweaks, Some(10))?;
//!
//! // Publish the merged view
//! let view = resolver.snapshot();
//! let zip = write_zip(&view, resolver.primary_meta().as_ref(), None)?;
//! ```
//!
//! ## Legacy Text
//!
//! ```ignore
//! use creative_pack::{LegacySerializer, NamedColor, TextComponent};
//!
//! let title = TextComponent::text("Ruby").color(NamedColor::Red).bold(true);
//! assert_eq!(LegacySerializer::section().serialize(&title)?, "§c§lRuby");
//! ```

pub mod error;
pub mod export;
pub mod key;
pub mod resolver;
pub mod resource_pack;
pub mod text;
pub mod validate;

// Re-export main types for convenience
pub use error::{KeyError, PackError, Result, StoreError, TextError, ValidationError};
pub use export::{write_directory, write_zip, ExportOptions};
pub use key::{ResourceKey, DEFAULT_NAMESPACE};
pub use resolver::{diff, MergedView, OverlayResolver, SourceId, SourceInfo};
pub use resource_pack::{
    AssetCategory, AssetEntry, AssetId, AssetStore, FormatRange, LanguageFile, LoaderConfig,
    PackMeta, PackSource, RawAsset,
};
pub use text::{Decoration, HexMode, LegacySerializer, NamedColor, Style, TextColor, TextComponent};
pub use validate::{FormatRangeTable, PackValidator, ValidationReport};

/// Load a resource pack from a file path (ZIP or directory).
pub fn load_resource_pack<P: AsRef<std::path::Path>>(path: P) -> Result<PackSource> {
    resource_pack::loader::load_from_path(path)
}

/// Load a resource pack from bytes (for WASM compatibility).
pub fn load_resource_pack_from_bytes(data: &[u8]) -> Result<PackSource> {
    resource_pack::loader::load_from_bytes(data)
}

#[cfg(feature = "wasm")]
pub mod wasm;
