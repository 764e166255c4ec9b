//! Section descriptors produced by the upstream design-splitting step.
//!
//! Descriptors are immutable input: the pipeline consumes them read-only
//! and never re-orders them before the combination stage.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Section kind
// ---------------------------------------------------------------------------

/// The visual role a section plays in the source design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Header,
    Hero,
    Content,
    Footer,
    Navigation,
    Sidebar,
    Form,
    Gallery,
}

impl SectionKind {
    /// Human-readable label for display.
    pub fn label(self) -> &'static str {
        match self {
            Self::Header => "Header",
            Self::Hero => "Hero",
            Self::Content => "Content",
            Self::Footer => "Footer",
            Self::Navigation => "Navigation",
            Self::Sidebar => "Sidebar",
            Self::Form => "Form",
            Self::Gallery => "Gallery",
        }
    }

    /// Stable lowercase identifier, used in container attributes and
    /// fallback field naming.
    pub fn slug(self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::Hero => "hero",
            Self::Content => "content",
            Self::Footer => "footer",
            Self::Navigation => "navigation",
            Self::Sidebar => "sidebar",
            Self::Form => "form",
            Self::Gallery => "gallery",
        }
    }
}

// ---------------------------------------------------------------------------
// Section descriptor
// ---------------------------------------------------------------------------

/// One independently processable unit of a split design.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionDescriptor {
    /// Unique identifier assigned by the splitting step.
    pub id: String,
    pub kind: SectionKind,
    /// Ordinal complexity estimate (higher = more involved generation).
    pub complexity: u8,
    /// Defines final ordering in the combined module, ascending.
    pub priority: i32,
    /// Expected number of editable fields, used for quality heuristics.
    pub estimated_field_count: u32,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Raw markup seed extracted by the splitter, if any. Feeds the
    /// fallback module when generation returns a malformed payload.
    #[serde(default)]
    pub markup_seed: Option<String>,
}

impl SectionDescriptor {
    /// The title if present, otherwise the id.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.id)
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a single descriptor.
///
/// Ids end up embedded in field identifiers and container attributes, so
/// they must be non-empty and free of whitespace.
pub fn validate_descriptor(descriptor: &SectionDescriptor) -> Result<(), CoreError> {
    if descriptor.id.trim().is_empty() {
        return Err(CoreError::Validation(
            "Section id must not be empty".to_string(),
        ));
    }
    if descriptor.id.chars().any(char::is_whitespace) {
        return Err(CoreError::Validation(format!(
            "Section id '{}' must not contain whitespace",
            descriptor.id
        )));
    }
    Ok(())
}

/// Validate a full descriptor list: each descriptor well-formed, ids
/// unique across the request.
pub fn validate_descriptors(descriptors: &[SectionDescriptor]) -> Result<(), CoreError> {
    let mut seen = std::collections::HashSet::new();
    for descriptor in descriptors {
        validate_descriptor(descriptor)?;
        if !seen.insert(descriptor.id.as_str()) {
            return Err(CoreError::Validation(format!(
                "Duplicate section id '{}'",
                descriptor.id
            )));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(id: &str) -> SectionDescriptor {
        SectionDescriptor {
            id: id.to_string(),
            kind: SectionKind::Content,
            complexity: 2,
            priority: 0,
            estimated_field_count: 3,
            title: None,
            description: None,
            markup_seed: None,
        }
    }

    // -- validate_descriptor --------------------------------------------------

    #[test]
    fn valid_descriptor_passes() {
        assert!(validate_descriptor(&descriptor("hero_1")).is_ok());
    }

    #[test]
    fn empty_id_rejected() {
        let err = validate_descriptor(&descriptor("")).unwrap_err();
        assert!(err.to_string().contains("must not be empty"));
    }

    #[test]
    fn whitespace_id_rejected() {
        let err = validate_descriptor(&descriptor("hero 1")).unwrap_err();
        assert!(err.to_string().contains("whitespace"));
    }

    // -- validate_descriptors -------------------------------------------------

    #[test]
    fn unique_ids_pass() {
        let list = vec![descriptor("a"), descriptor("b")];
        assert!(validate_descriptors(&list).is_ok());
    }

    #[test]
    fn duplicate_ids_rejected() {
        let list = vec![descriptor("a"), descriptor("a")];
        let err = validate_descriptors(&list).unwrap_err();
        assert!(err.to_string().contains("Duplicate section id"));
    }

    // -- SectionKind ----------------------------------------------------------

    #[test]
    fn kind_labels_are_non_empty() {
        let kinds = [
            SectionKind::Header,
            SectionKind::Hero,
            SectionKind::Content,
            SectionKind::Footer,
            SectionKind::Navigation,
            SectionKind::Sidebar,
            SectionKind::Form,
            SectionKind::Gallery,
        ];
        for k in kinds {
            assert!(!k.label().is_empty());
            assert!(!k.slug().is_empty());
        }
    }

    #[test]
    fn kind_serializes_snake_case() {
        let json = serde_json::to_string(&SectionKind::Navigation).unwrap();
        assert_eq!(json, "\"navigation\"");
    }

    #[test]
    fn display_title_falls_back_to_id() {
        let mut d = descriptor("hero_1");
        assert_eq!(d.display_title(), "hero_1");
        d.title = Some("Main Hero".to_string());
        assert_eq!(d.display_title(), "Main Hero");
    }
}
