//! Error types for resource pack assembly.

use crate::resource_pack::AssetId;
use thiserror::Error;

/// Result type alias using PackError.
pub type Result<T> = std::result::Result<T, PackError>;

/// Failure to parse a resource key.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    /// Namespace is empty or contains a character outside `[a-z0-9_.-]`.
    #[error("invalid namespace '{namespace}' in key '{raw}'")]
    InvalidNamespace { raw: String, namespace: String },

    /// Path contains a character outside `[a-z0-9_.-/]`.
    #[error("invalid path '{path}' in key '{raw}'")]
    InvalidPath { raw: String, path: String },

    /// Nothing after the namespace separator.
    #[error("empty path in key '{0}'")]
    EmptyPath(String),
}

/// Failure inside an asset store or the overlay resolver.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No entry for the requested asset.
    #[error("asset not found: {0}")]
    NotFound(AssetId),

    /// A single source defines the same asset twice.
    #[error("asset {asset} defined more than once in source '{source_name}'")]
    DuplicateKeyInSource { asset: AssetId, source_name: String },

    /// The source id was never registered or was already removed.
    #[error("unknown source id {0}")]
    UnknownSource(u64),
}

/// Failure converting a text component.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TextError {
    /// Content carries a marker plus a valid code, which would change meaning on re-parse.
    ///
    /// `offset` is a byte position in the node content, or in the serialized text when the
    /// code only forms where two nodes meet.
    #[error("content contains embedded format code '{marker}{code}' at byte {offset}")]
    EmbeddedFormatCode { marker: char, code: char, offset: usize },

    /// The legacy format has no font slot and the serializer is strict.
    #[error("font '{0}' cannot be represented in legacy text")]
    UnrepresentableFont(String),

    /// Malformed JSON component.
    #[error("invalid JSON component: {0}")]
    InvalidJson(String),

    /// Tree too deep to build as a `serde_json::Value`.
    #[error("component is {depth} levels deep; at most {max} can be built as a JSON value")]
    TooDeep { depth: usize, max: usize },
}

/// Advisory pack metadata issue. Collected into a report, never used to drop a pack.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Pack format is outside the accepted window for the target.
    #[error("pack format {format} is not supported by {target} (accepts {min}..={max})")]
    UnsupportedFormatVersion {
        format: i32,
        target: String,
        min: i32,
        max: i32,
    },

    /// Description cannot be rendered as legacy text.
    #[error("invalid description: {0}")]
    InvalidDescription(String),

    /// `supported_formats` has `min > max`.
    #[error("supported format range is empty ({min} > {max})")]
    InvalidSupportedRange { min: i32, max: i32 },

    /// Pack format is not contained in the pack's own `supported_formats`.
    #[error("pack format {format} lies outside its supported range {min}..={max}")]
    FormatOutsideSupportedRange { format: i32, min: i32, max: i32 },

    /// Target missing from the format range table.
    #[error("unknown target version '{0}'")]
    UnknownTarget(String),

    /// The source carries no `pack.mcmeta`.
    #[error("pack has no pack.mcmeta")]
    MissingMetadata,

    /// `pack.png` does not decode as a square image.
    #[error("invalid pack icon: {0}")]
    InvalidIcon(String),

    /// A lang asset is not a JSON object of strings.
    #[error("invalid language file {key}: {reason}")]
    InvalidLanguageFile { key: String, reason: String },
}

/// Main error type for resource pack operations.
#[derive(Error, Debug)]
pub enum PackError {
    /// Failed to read or write a ZIP archive.
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Failed to parse JSON data.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to decode an image.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Key(#[from] KeyError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Text(#[from] TextError),

    /// Invalid resource pack structure.
    #[error("Invalid resource pack: {0}")]
    InvalidResourcePack(String),

    /// A file path would leave the pack root.
    #[error("unsafe archive path '{0}'")]
    UnsafePath(String),

    /// Two published files map to the same archive path.
    #[error("archive path '{path}' is written by both {first} and {second}")]
    PathCollision {
        path: String,
        first: String,
        second: String,
    },
}
