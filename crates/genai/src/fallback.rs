//! Fallback module construction for malformed generation payloads.
//!
//! Generation-service instability must never abort a batch: when the
//! payload cannot be parsed, the section continues with a minimal module
//! derived from its descriptor and is scored like any other result.

use modcraft_core::module::{FieldDef, ModuleData, ModuleMeta};
use modcraft_core::section::{SectionDescriptor, SectionKind};

/// Build a minimal module for `descriptor` from kind-driven defaults.
///
/// The markup seed captured by the splitter is used verbatim when
/// present; otherwise a bare container carrying the section id is
/// emitted so the combined module stays addressable.
pub fn fallback_module(descriptor: &SectionDescriptor) -> ModuleData {
    let fields = default_fields(descriptor.kind);
    let html = match &descriptor.markup_seed {
        Some(seed) if !seed.trim().is_empty() => seed.clone(),
        _ => format!(
            "<div class=\"{} {}-placeholder\"></div>",
            descriptor.kind.slug(),
            descriptor.id
        ),
    };

    ModuleData {
        fields,
        meta: ModuleMeta {
            label: descriptor.display_title().to_string(),
            description: format!(
                "{} section (fallback content)",
                descriptor.kind.label()
            ),
            content_types: Vec::new(),
        },
        html,
        css: None,
    }
}

/// Minimal editable fields for each section kind.
fn default_fields(kind: SectionKind) -> Vec<FieldDef> {
    let specs: &[(&str, &str, &str)] = match kind {
        SectionKind::Header => &[
            ("logo", "Logo", "image"),
            ("site_title", "Site Title", "text"),
        ],
        SectionKind::Hero => &[
            ("headline", "Headline", "text"),
            ("subheadline", "Subheadline", "text"),
            ("background_image", "Background Image", "image"),
        ],
        SectionKind::Content => &[
            ("heading", "Heading", "text"),
            ("body", "Body", "richtext"),
        ],
        SectionKind::Footer => &[
            ("copyright", "Copyright", "text"),
            ("links", "Links", "richtext"),
        ],
        SectionKind::Navigation => &[("menu_items", "Menu Items", "richtext")],
        SectionKind::Sidebar => &[("content", "Content", "richtext")],
        SectionKind::Form => &[
            ("form_title", "Form Title", "text"),
            ("submit_label", "Submit Label", "text"),
        ],
        SectionKind::Gallery => &[("images", "Images", "richtext")],
    };

    specs
        .iter()
        .map(|(id, name, field_type)| FieldDef {
            id: (*id).to_string(),
            name: (*name).to_string(),
            field_type: (*field_type).to_string(),
            required: false,
            default: None,
        })
        .collect()
}
