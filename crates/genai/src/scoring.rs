//! Quality scoring for generated section content.
//!
//! The generation service may report its own validation score; when it
//! does not, the injected [`QualityScorer`] decides. [`HeuristicScorer`]
//! is the default: a structural-completeness heuristic with no external
//! calls.

use modcraft_core::module::ModuleData;
use modcraft_core::section::SectionDescriptor;

// ---------------------------------------------------------------------------
// Scoring weights
// ---------------------------------------------------------------------------

/// Points for non-empty markup.
const POINTS_HTML: f64 = 40.0;
/// Maximum points for field coverage against the descriptor's estimate.
const POINTS_FIELDS: f64 = 30.0;
/// Points for stylesheet presence.
const POINTS_CSS: f64 = 10.0;
/// Points for a meta label.
const POINTS_META_LABEL: f64 = 10.0;
/// Points for a meta description.
const POINTS_META_DESCRIPTION: f64 = 10.0;

// ---------------------------------------------------------------------------
// Scorer trait
// ---------------------------------------------------------------------------

/// Scores generated content on the `[0, 100]` scale.
pub trait QualityScorer: Send + Sync {
    fn score(&self, descriptor: &SectionDescriptor, data: &ModuleData) -> f64;
}

// ---------------------------------------------------------------------------
// Heuristic scorer
// ---------------------------------------------------------------------------

/// Structural-completeness scorer.
///
/// Rewards non-empty markup, field coverage relative to the splitter's
/// estimate, stylesheet presence, and meta completeness.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicScorer;

impl QualityScorer for HeuristicScorer {
    fn score(&self, descriptor: &SectionDescriptor, data: &ModuleData) -> f64 {
        let mut score = 0.0;

        if !data.html.trim().is_empty() {
            score += POINTS_HTML;
        }

        score += field_coverage(descriptor.estimated_field_count, data.fields.len()) * POINTS_FIELDS;

        if data.css.as_deref().is_some_and(|css| !css.trim().is_empty()) {
            score += POINTS_CSS;
        }
        if !data.meta.label.trim().is_empty() {
            score += POINTS_META_LABEL;
        }
        if !data.meta.description.trim().is_empty() {
            score += POINTS_META_DESCRIPTION;
        }

        modcraft_core::quality::clamp_score(score)
    }
}

/// Coverage ratio in `[0, 1]`.
///
/// A zero estimate means the splitter had no expectation; any field
/// satisfies it, and none is also acceptable.
fn field_coverage(estimated: u32, actual: usize) -> f64 {
    if estimated == 0 {
        return 1.0;
    }
    (actual as f64 / estimated as f64).min(1.0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
