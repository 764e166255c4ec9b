//! Quality gate: threshold evaluation and score validation.

use crate::error::CoreError;
use crate::status::SectionStatus;

// ---------------------------------------------------------------------------
// Score bounds and defaults
// ---------------------------------------------------------------------------

/// Lowest possible quality score.
pub const MIN_QUALITY_SCORE: f64 = 0.0;
/// Highest possible quality score.
pub const MAX_QUALITY_SCORE: f64 = 100.0;
/// Default acceptance threshold.
pub const DEFAULT_QUALITY_THRESHOLD: f64 = 75.0;

// ---------------------------------------------------------------------------
// Gate evaluation
// ---------------------------------------------------------------------------

/// Decide the terminal status for a scored section.
///
/// Returns `Completed` when `score >= threshold`; otherwise `Skipped`
/// when the skip policy is on, else `Failed`. This is the only place a
/// score is converted into a status, which keeps the completed ⇔
/// above-threshold invariant in one function.
pub fn gate_section(score: f64, threshold: f64, skip_failed_sections: bool) -> SectionStatus {
    if score >= threshold {
        SectionStatus::Completed
    } else if skip_failed_sections {
        SectionStatus::Skipped
    } else {
        SectionStatus::Failed
    }
}

/// Clamp a raw score into the valid `[0, 100]` range.
pub fn clamp_score(score: f64) -> f64 {
    score.clamp(MIN_QUALITY_SCORE, MAX_QUALITY_SCORE)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate that a threshold lies in `[0, 100]`.
pub fn validate_threshold(threshold: f64) -> Result<(), CoreError> {
    if (MIN_QUALITY_SCORE..=MAX_QUALITY_SCORE).contains(&threshold) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Quality threshold must be between {MIN_QUALITY_SCORE} and {MAX_QUALITY_SCORE}, got {threshold}"
        )))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
