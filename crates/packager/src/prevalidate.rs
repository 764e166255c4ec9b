//! Packaging pre-validation.
//!
//! Blocking errors: required files absent, or structured payloads that
//! do not parse. Soft violations (oversized assets, excessive inline
//! styling) are recorded as warnings and deducted from the performance
//! score, never blocking.

use modcraft_core::manifest::{
    ValidationIssue, ValidationReport, FILE_FIELDS_JSON, FILE_META_JSON, FILE_MODULE_HTML,
    REQUIRED_FILES,
};

use crate::files::{find_file, PackageFile};

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

/// Points deducted from the performance score per soft violation.
pub const PENALTY_PER_WARNING: i32 = 10;

/// Inline `style=` attributes tolerated in the primary markup before a
/// warning is raised.
pub const MAX_INLINE_STYLES: usize = 10;

/// Size limits, in bytes, above which a file draws a warning.
#[derive(Debug, Clone)]
pub struct SizeThresholds {
    pub markup_bytes: usize,
    pub style_bytes: usize,
    pub script_bytes: usize,
    pub asset_bytes: usize,
}

impl Default for SizeThresholds {
    fn default() -> Self {
        Self {
            markup_bytes: 256 * 1024,
            style_bytes: 128 * 1024,
            script_bytes: 128 * 1024,
            asset_bytes: 1024 * 1024,
        }
    }
}

impl SizeThresholds {
    fn limit_for(&self, path: &str) -> usize {
        match path.rsplit('.').next().unwrap_or("") {
            "html" | "htm" => self.markup_bytes,
            "css" => self.style_bytes,
            "js" => self.script_bytes,
            _ => self.asset_bytes,
        }
    }
}

// ---------------------------------------------------------------------------
// Pre-validation
// ---------------------------------------------------------------------------

/// Validate the file set before any transformation or archiving.
pub fn prevalidate(files: &[PackageFile], thresholds: &SizeThresholds) -> ValidationReport {
    let mut issues = Vec::new();

    for required in REQUIRED_FILES {
        if find_file(files, required).is_none() {
            issues.push(ValidationIssue::error(
                "missing",
                format!("Required file '{required}' not provided"),
            ));
        }
    }

    if let Some(fields) = find_file(files, FILE_FIELDS_JSON) {
        check_json_payload(fields, "fields.json", &mut issues);
    }
    if let Some(meta) = find_file(files, FILE_META_JSON) {
        check_json_payload(meta, "meta.json", &mut issues);
    }

    for file in files {
        let limit = thresholds.limit_for(&file.path);
        if file.contents.len() > limit {
            issues.push(ValidationIssue::warning(
                "size",
                format!(
                    "'{}' is {} bytes, above the {} byte threshold",
                    file.path,
                    file.contents.len(),
                    limit
                ),
            ));
        }
    }

    if let Some(markup) = find_file(files, FILE_MODULE_HTML) {
        if let Some(text) = markup.as_text() {
            let inline_styles = text.matches("style=").count();
            if inline_styles > MAX_INLINE_STYLES {
                issues.push(ValidationIssue::warning(
                    "style",
                    format!(
                        "Markup carries {inline_styles} inline style attributes (max {MAX_INLINE_STYLES})"
                    ),
                ));
            }
        }
    }

    let warnings = issues
        .iter()
        .filter(|i| i.severity == modcraft_core::manifest::IssueSeverity::Warning)
        .count() as i32;
    ValidationReport::from_issues(&issues, 100 - warnings * PENALTY_PER_WARNING)
}

fn check_json_payload(file: &PackageFile, label: &str, issues: &mut Vec<ValidationIssue>) {
    match file.as_text() {
        None => issues.push(ValidationIssue::error(
            "parse",
            format!("'{label}' is not valid UTF-8"),
        )),
        Some(text) => {
            if serde_json::from_str::<serde_json::Value>(text).is_err() {
                issues.push(ValidationIssue::error(
                    "parse",
                    format!("'{label}' is not valid JSON"),
                ));
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
