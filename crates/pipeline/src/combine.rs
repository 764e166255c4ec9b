//! Combination of completed sections into one composite module.
//!
//! The combination is a pure, deterministic reduction over the completed
//! sections: stable priority ordering, section-prefixed field ids, and
//! per-section HTML containers with scoped CSS. Repeated calls over the
//! same input produce byte-identical output.

use modcraft_core::module::{CombinedModule, FieldDef, ModuleMeta};
use modcraft_core::processing::{ProcessedSection, ProcessingBatch};
use modcraft_core::status::SectionStatus;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum CombineError {
    /// No section across all batches reached `Completed`.
    #[error("No completed sections available to combine")]
    NoEligibleContent,
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Conservative content-type set: safe for any placement.
pub const DEFAULT_CONTENT_TYPES: &[&str] = &["page", "landing_page", "blog_post"];

// ---------------------------------------------------------------------------
// Combination
// ---------------------------------------------------------------------------

/// Merge all completed sections across `batches` into one module.
///
/// Sections are ordered by descriptor priority ascending; ties keep
/// their original batch/section order (stable sort). Every field id is
/// prefixed with its section id, guaranteeing global uniqueness.
pub fn combine(batches: &[ProcessingBatch]) -> Result<CombinedModule, CombineError> {
    let mut eligible: Vec<&ProcessedSection> = batches
        .iter()
        .flat_map(|b| b.sections.iter())
        .filter(|s| s.status == SectionStatus::Completed)
        .collect();

    if eligible.is_empty() {
        return Err(CombineError::NoEligibleContent);
    }

    eligible.sort_by_key(|s| s.descriptor.priority);

    let fields: Vec<FieldDef> = eligible
        .iter()
        .flat_map(|s| prefixed_fields(s))
        .collect();

    let html = eligible
        .iter()
        .map(|s| wrap_section_html(s))
        .collect::<Vec<_>>()
        .join("\n\n");

    let css = eligible
        .iter()
        .filter_map(|s| {
            s.module_data
                .css
                .as_deref()
                .filter(|css| !css.trim().is_empty())
                .map(|css| scoped_section_css(&s.descriptor.id, css))
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    let meta = synthesize_meta(&eligible);
    let section_count = eligible.len();

    Ok(CombinedModule {
        fields,
        meta,
        html,
        css,
        section_count,
    })
}

/// Prefix a section's fields with its id and title so the flattened
/// field list stays collision-free and editor-readable.
fn prefixed_fields(section: &ProcessedSection) -> Vec<FieldDef> {
    let descriptor = &section.descriptor;
    section
        .module_data
        .fields
        .iter()
        .map(|f| FieldDef {
            id: format!("{}_{}", descriptor.id, f.id),
            name: format!("{}: {}", descriptor.display_title(), f.name),
            field_type: f.field_type.clone(),
            required: f.required,
            default: f.default.clone(),
        })
        .collect()
}

/// Wrap a section's markup in an addressable container preceded by a
/// human-readable marker comment.
fn wrap_section_html(section: &ProcessedSection) -> String {
    let descriptor = &section.descriptor;
    format!(
        "<!-- Section: {} ({}) -->\n<div class=\"module-section\" data-section-id=\"{}\" data-section-kind=\"{}\">\n{}\n</div>",
        descriptor.display_title(),
        descriptor.id,
        descriptor.id,
        descriptor.kind.slug(),
        section.module_data.html,
    )
}

/// Scope a section's stylesheet under its container attribute so rules
/// cannot leak across sections.
fn scoped_section_css(section_id: &str, css: &str) -> String {
    let scope = format!("[data-section-id=\"{section_id}\"]");
    let mut out = format!("/* Section: {section_id} */\n");

    for rule in css.split('}') {
        let rule = rule.trim();
        if rule.is_empty() {
            continue;
        }
        match rule.split_once('{') {
            Some((selectors, body)) => {
                let selectors = selectors.trim();
                // At-rules keep their own prelude; everything else gets
                // the scope prefix on each selector in the list.
                if selectors.starts_with('@') {
                    out.push_str(&format!("{selectors} {{ {} }}\n", body.trim()));
                } else {
                    let scoped: Vec<String> = selectors
                        .split(',')
                        .map(|sel| format!("{scope} {}", sel.trim()))
                        .collect();
                    out.push_str(&format!("{} {{ {} }}\n", scoped.join(", "), body.trim()));
                }
            }
            None => {
                // Declarations without a selector apply to the container
                // itself.
                out.push_str(&format!("{scope} {{ {rule} }}\n"));
            }
        }
    }

    out.trim_end().to_string()
}

/// Synthesize combined-module metadata from the merged sections.
fn synthesize_meta(sections: &[&ProcessedSection]) -> ModuleMeta {
    let titles: Vec<&str> = sections
        .iter()
        .map(|s| s.descriptor.display_title())
        .collect();
    ModuleMeta {
        label: format!("Combined Module ({} sections)", sections.len()),
        description: format!("Merged sections: {}", titles.join(", ")),
        content_types: DEFAULT_CONTENT_TYPES
            .iter()
            .map(|s| s.to_string())
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
