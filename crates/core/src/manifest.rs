//! Package manifest types, file classification, and validation reporting.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Required file constants
// ---------------------------------------------------------------------------

/// Primary markup file of a module package.
pub const FILE_MODULE_HTML: &str = "module.html";
/// Field definitions payload.
pub const FILE_FIELDS_JSON: &str = "fields.json";
/// Module meta descriptor payload.
pub const FILE_META_JSON: &str = "meta.json";

/// Files that must be present for packaging to proceed.
pub const REQUIRED_FILES: &[&str] = &[FILE_MODULE_HTML, FILE_FIELDS_JSON, FILE_META_JSON];

// ---------------------------------------------------------------------------
// File classification
// ---------------------------------------------------------------------------

/// Role of a file inside a package, classified by name and extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileType {
    Markup,
    Fields,
    Meta,
    Style,
    Script,
    Documentation,
    Asset,
}

impl FileType {
    /// Human-readable label for display.
    pub fn label(self) -> &'static str {
        match self {
            Self::Markup => "Markup",
            Self::Fields => "Fields",
            Self::Meta => "Meta",
            Self::Style => "Style",
            Self::Script => "Script",
            Self::Documentation => "Documentation",
            Self::Asset => "Asset",
        }
    }
}

/// Classify a file by its well-known name first, then its extension.
pub fn classify_file(path: &str) -> FileType {
    let name = path.rsplit('/').next().unwrap_or(path);
    match name {
        FILE_FIELDS_JSON => return FileType::Fields,
        FILE_META_JSON => return FileType::Meta,
        _ => {}
    }
    match name.rsplit('.').next().unwrap_or("") {
        "html" | "htm" => FileType::Markup,
        "css" => FileType::Style,
        "js" => FileType::Script,
        "md" | "txt" => FileType::Documentation,
        "json" => FileType::Meta,
        _ => FileType::Asset,
    }
}

// ---------------------------------------------------------------------------
// Validation issues and reports
// ---------------------------------------------------------------------------

/// Severity level for a packaging validation issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    /// Blocks packaging.
    Error,
    /// Recorded, deducts from the performance score, never blocks.
    Warning,
}

/// A single issue found during packaging pre-validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub severity: IssueSeverity,
    pub category: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn error(category: &str, message: impl Into<String>) -> Self {
        Self {
            severity: IssueSeverity::Error,
            category: category.to_string(),
            message: message.into(),
        }
    }

    pub fn warning(category: &str, message: impl Into<String>) -> Self {
        Self {
            severity: IssueSeverity::Warning,
            category: category.to_string(),
            message: message.into(),
        }
    }
}

/// Aggregated result of a pre-validation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    /// Starts at 100; each soft violation deducts from it.
    pub performance_score: i32,
}

impl ValidationReport {
    /// Build a report from a flat issue list and a computed score.
    pub fn from_issues(issues: &[ValidationIssue], performance_score: i32) -> Self {
        let errors: Vec<String> = issues
            .iter()
            .filter(|i| i.severity == IssueSeverity::Error)
            .map(|i| format!("{}: {}", i.category, i.message))
            .collect();
        let warnings: Vec<String> = issues
            .iter()
            .filter(|i| i.severity == IssueSeverity::Warning)
            .map(|i| format!("{}: {}", i.category, i.message))
            .collect();
        let is_valid = errors.is_empty();
        Self {
            is_valid,
            errors,
            warnings,
            performance_score: performance_score.clamp(0, 100),
        }
    }
}

/// Overall manifest validation status derived from the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    Valid,
    Warning,
    Invalid,
}

/// `Invalid` when blocking errors exist, `Warning` when only soft
/// violations were recorded, `Valid` otherwise.
pub fn validation_status(report: &ValidationReport) -> ValidationStatus {
    if !report.errors.is_empty() {
        ValidationStatus::Invalid
    } else if !report.warnings.is_empty() {
        ValidationStatus::Warning
    } else {
        ValidationStatus::Valid
    }
}

// ---------------------------------------------------------------------------
// Manifest
// ---------------------------------------------------------------------------

/// Caller-supplied identity of the module being packaged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageMetadata {
    pub name: String,
    pub version: String,
    pub author: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub dependencies: Vec<String>,
}

/// One file entry in the manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestFile {
    pub path: String,
    pub size_bytes: u64,
    /// SHA-256 hex digest over the file's raw bytes.
    pub checksum: String,
    pub file_type: FileType,
}

/// Aggregate metadata over the package contents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestMetadata {
    pub total_size_bytes: u64,
    pub file_count: usize,
    /// `(uncompressed - compressed) / uncompressed`, 0.0 for empty input.
    pub compression_ratio: f64,
    pub validation_status: ValidationStatus,
    pub validation_errors: Vec<String>,
}

/// Machine-readable description of a package's contents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageManifest {
    pub package_id: String,
    pub name: String,
    pub version: String,
    pub author: String,
    pub description: String,
    pub dependencies: Vec<String>,
    pub files: Vec<ManifestFile>,
    pub metadata: ManifestMetadata,
    pub created_at: DateTime<Utc>,
}

/// Achieved compression ratio. Returns 0.0 when there was nothing to
/// compress, or when compression overhead made the archive larger.
pub fn compression_ratio(uncompressed: u64, compressed: u64) -> f64 {
    if uncompressed == 0 || compressed >= uncompressed {
        return 0.0;
    }
    (uncompressed - compressed) as f64 / uncompressed as f64
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- classify_file --------------------------------------------------------

    #[test]
    fn well_known_names_classified_by_role() {
        assert_eq!(classify_file("fields.json"), FileType::Fields);
        assert_eq!(classify_file("meta.json"), FileType::Meta);
        assert_eq!(classify_file("some/dir/fields.json"), FileType::Fields);
    }

    #[test]
    fn extensions_classified() {
        assert_eq!(classify_file("module.html"), FileType::Markup);
        assert_eq!(classify_file("module.css"), FileType::Style);
        assert_eq!(classify_file("module.js"), FileType::Script);
        assert_eq!(classify_file("README.md"), FileType::Documentation);
        assert_eq!(classify_file("extra.json"), FileType::Meta);
        assert_eq!(classify_file("logo.png"), FileType::Asset);
    }

    #[test]
    fn unknown_extension_is_asset() {
        assert_eq!(classify_file("data.bin"), FileType::Asset);
        assert_eq!(classify_file("no_extension"), FileType::Asset);
    }

    // -- ValidationReport -----------------------------------------------------

    #[test]
    fn report_valid_with_warnings_only() {
        let issues = vec![ValidationIssue::warning("size", "module.css is large")];
        let report = ValidationReport::from_issues(&issues, 90);
        assert!(report.is_valid);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.errors.is_empty());
        assert_eq!(report.performance_score, 90);
    }

    #[test]
    fn report_invalid_with_errors() {
        let issues = vec![
            ValidationIssue::error("missing", "module.html not provided"),
            ValidationIssue::warning("size", "fields.json is large"),
        ];
        let report = ValidationReport::from_issues(&issues, 95);
        assert!(!report.is_valid);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn performance_score_clamped() {
        let report = ValidationReport::from_issues(&[], 130);
        assert_eq!(report.performance_score, 100);
        let report = ValidationReport::from_issues(&[], -10);
        assert_eq!(report.performance_score, 0);
    }

    // -- validation_status ----------------------------------------------------

    #[test]
    fn status_valid_when_clean() {
        let report = ValidationReport::from_issues(&[], 100);
        assert_eq!(validation_status(&report), ValidationStatus::Valid);
    }

    #[test]
    fn status_warning_when_soft_violations() {
        let issues = vec![ValidationIssue::warning("size", "big")];
        let report = ValidationReport::from_issues(&issues, 95);
        assert_eq!(validation_status(&report), ValidationStatus::Warning);
    }

    #[test]
    fn status_invalid_when_errors() {
        let issues = vec![ValidationIssue::error("missing", "gone")];
        let report = ValidationReport::from_issues(&issues, 100);
        assert_eq!(validation_status(&report), ValidationStatus::Invalid);
    }

    // -- compression_ratio ----------------------------------------------------

    #[test]
    fn ratio_for_typical_compression() {
        assert!((compression_ratio(1000, 250) - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn ratio_zero_for_empty_input() {
        assert!((compression_ratio(0, 0) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn ratio_zero_when_archive_grew() {
        assert!((compression_ratio(100, 120) - 0.0).abs() < f64::EPSILON);
    }
}
