//! Pack metadata validation.
//!
//! Validation is advisory: every check adds to a [`ValidationReport`] and nothing here
//! rejects or alters a pack. Callers decide whether a non-empty report blocks admission.

pub mod formats;

pub use formats::{FormatRangeTable, VANILLA_SNAPSHOT_LATEST};

use crate::error::ValidationError;
use crate::resource_pack::{AssetCategory, LanguageFile, PackMeta, PackSource};
use crate::text::LegacySerializer;
use std::fmt;
use tracing::debug;

/// Issues found by a [`PackValidator`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    issues: Vec<ValidationError>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, issue: ValidationError) {
        self.issues.push(issue);
    }

    /// `true` when no issue was found.
    pub fn is_ok(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn issues(&self) -> &[ValidationError] {
        &self.issues
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn into_issues(self) -> Vec<ValidationError> {
        self.issues
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.issues.is_empty() {
            return writeln!(f, "no issues");
        }
        for issue in &self.issues {
            writeln!(f, "- {issue}")?;
        }
        Ok(())
    }
}

/// Checks pack metadata against a [`FormatRangeTable`].
#[derive(Debug, Clone)]
pub struct PackValidator {
    table: FormatRangeTable,
    serializer: LegacySerializer,
}

impl PackValidator {
    pub fn new(table: FormatRangeTable) -> Self {
        Self {
            table,
            serializer: LegacySerializer::section(),
        }
    }

    /// Serializer the description must convert with.
    pub fn with_serializer(mut self, serializer: LegacySerializer) -> Self {
        self.serializer = serializer;
        self
    }

    pub fn table(&self) -> &FormatRangeTable {
        &self.table
    }

    /// Check format version, description and supported range of one `pack.mcmeta`.
    pub fn validate(&self, meta: &PackMeta, target: &str) -> ValidationReport {
        let mut report = ValidationReport::new();
        self.check_meta(meta, target, &mut report);
        report
    }

    /// Everything [`validate`](Self::validate) checks, plus the icon and every lang asset.
    pub fn validate_source(&self, source: &PackSource, target: &str) -> ValidationReport {
        let mut report = ValidationReport::new();

        match source.meta() {
            Some(meta) => self.check_meta(meta, target, &mut report),
            None => report.push(ValidationError::MissingMetadata),
        }

        if let Some(icon) = source.icon() {
            if let Err(issue) = check_icon(icon) {
                report.push(issue);
            }
        }

        for entry in source.entries().iter().filter(|e| e.category == AssetCategory::Lang) {
            if let Err(e) = LanguageFile::parse(&entry.content) {
                report.push(ValidationError::InvalidLanguageFile {
                    key: entry.key.to_string(),
                    reason: e.to_string(),
                });
            }
        }

        debug!(pack = %source.name(), version = target, issues = report.len(), "validated pack source");
        report
    }

    fn check_meta(&self, meta: &PackMeta, target: &str, report: &mut ValidationReport) {
        match self.table.get(target) {
            Some(window) if !window.contains(meta.format) => {
                report.push(ValidationError::UnsupportedFormatVersion {
                    format: meta.format,
                    target: target.to_string(),
                    min: window.min,
                    max: window.max,
                });
            }
            Some(_) => {}
            None => report.push(ValidationError::UnknownTarget(target.to_string())),
        }

        if let Err(e) = self.serializer.serialize(&meta.description) {
            report.push(ValidationError::InvalidDescription(e.to_string()));
        }

        if let Some(range) = meta.supported_formats {
            if range.is_empty() {
                report.push(ValidationError::InvalidSupportedRange {
                    min: range.min,
                    max: range.max,
                });
            } else if !range.contains(meta.format) {
                report.push(ValidationError::FormatOutsideSupportedRange {
                    format: meta.format,
                    min: range.min,
                    max: range.max,
                });
            }
        }
    }
}

fn check_icon(data: &[u8]) -> Result<(), ValidationError> {
    let img = image::load_from_memory(data).map_err(|e| ValidationError::InvalidIcon(e.to_string()))?;
    let (width, height) = (img.width(), img.height());
    if width != height {
        return Err(ValidationError::InvalidIcon(format!(
            "icon is {width}x{height}, expected a square image"
        )));
    }
    Ok(())
}
