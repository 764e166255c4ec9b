//! Section and batch status state machines.
//!
//! This module lives in `core` (zero internal deps) so the pipeline, the
//! packager, and any future tooling agree on the same lifecycle.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Section status
// ---------------------------------------------------------------------------

/// Lifecycle status of a single section.
///
/// `Completed`, `Failed`, and `Skipped` are terminal; a finalized
/// [`crate::processing::ProcessedSection`] is never revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionStatus {
    /// Section has not entered processing yet.
    Pending,
    /// Generation is underway.
    Processing,
    /// Quality gate passed; the section is eligible for combination.
    Completed,
    /// Generation failed hard, or the quality gate rejected the section
    /// with skipping disabled.
    Failed,
    /// Quality gate rejected the section and the skip policy retained a
    /// partial result instead of failing.
    Skipped,
}

impl SectionStatus {
    /// Human-readable label for display.
    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Processing => "Processing",
            Self::Completed => "Completed",
            Self::Failed => "Failed",
            Self::Skipped => "Skipped",
        }
    }

    /// Terminal statuses allow no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Skipped)
    }

    /// Returns the set of statuses reachable from `self`.
    pub fn valid_transitions(self) -> &'static [SectionStatus] {
        match self {
            Self::Pending => &[Self::Processing],
            Self::Processing => &[Self::Completed, Self::Failed, Self::Skipped],
            Self::Completed | Self::Failed | Self::Skipped => &[],
        }
    }

    /// Check whether a transition from `self` to `to` is valid.
    pub fn can_transition(self, to: SectionStatus) -> bool {
        self.valid_transitions().contains(&to)
    }
}

// ---------------------------------------------------------------------------
// Batch status
// ---------------------------------------------------------------------------

/// Lifecycle status of one processing batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    Pending,
    Processing,
    /// All sections terminal, none failed.
    Completed,
    /// At least one contained section failed.
    Failed,
}

impl BatchStatus {
    /// Human-readable label for display.
    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Processing => "Processing",
            Self::Completed => "Completed",
            Self::Failed => "Failed",
        }
    }
}

/// Derive a batch's terminal status from its finalized sections.
pub fn batch_status_from_sections(statuses: &[SectionStatus]) -> BatchStatus {
    if statuses.iter().any(|s| *s == SectionStatus::Failed) {
        BatchStatus::Failed
    } else {
        BatchStatus::Completed
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
