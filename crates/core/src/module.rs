//! Content module data: field definitions, metadata, markup, and the
//! combined module produced by the aggregation stage.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Field definitions
// ---------------------------------------------------------------------------

/// One editable field exposed by a content module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDef {
    /// Field identifier, unique within its module.
    pub id: String,
    /// Editor-facing label.
    pub name: String,
    /// Field type, e.g. `"text"`, `"richtext"`, `"image"`, `"url"`.
    pub field_type: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub default: Option<serde_json::Value>,
}

/// Module-level metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleMeta {
    pub label: String,
    pub description: String,
    /// CMS content types this module may be placed in.
    #[serde(default)]
    pub content_types: Vec<String>,
}

// ---------------------------------------------------------------------------
// Per-section module data
// ---------------------------------------------------------------------------

/// Structured content generated for one section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleData {
    pub fields: Vec<FieldDef>,
    pub meta: ModuleMeta,
    pub html: String,
    #[serde(default)]
    pub css: Option<String>,
}

impl ModuleData {
    /// Empty-but-well-typed module data, used when generation fails hard.
    pub fn empty() -> Self {
        Self {
            fields: Vec::new(),
            meta: ModuleMeta {
                label: String::new(),
                description: String::new(),
                content_types: Vec::new(),
            },
            html: String::new(),
            css: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.html.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Combined module
// ---------------------------------------------------------------------------

/// The single composite module produced by merging all completed sections.
///
/// Field identifiers are globally unique (prefixed with their source
/// section id); HTML and CSS carry per-section containers and scoping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombinedModule {
    pub fields: Vec<FieldDef>,
    pub meta: ModuleMeta,
    pub html: String,
    pub css: String,
    /// Number of sections merged into this module.
    pub section_count: usize,
}

/// Return the identifiers that appear more than once in `fields`.
///
/// An aggregation result with a non-empty return here violates the
/// collision-avoidance invariant.
pub fn duplicate_field_ids(fields: &[FieldDef]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut duplicates = Vec::new();
    for field in fields {
        if !seen.insert(field.id.as_str()) && !duplicates.contains(&field.id) {
            duplicates.push(field.id.clone());
        }
    }
    duplicates
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
