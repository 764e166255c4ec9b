//! Processing results: finalized sections, batches, and the aggregate
//! outcome of one pipeline invocation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::module::{CombinedModule, ModuleData};
use crate::section::SectionDescriptor;
use crate::status::{BatchStatus, SectionStatus};

// ---------------------------------------------------------------------------
// Processed section
// ---------------------------------------------------------------------------

/// A section after processing. Immutable once its status is terminal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedSection {
    pub descriptor: SectionDescriptor,
    pub module_data: ModuleData,
    /// Quality score in `[0, 100]`; 0 for hard failures.
    pub quality_score: f64,
    pub status: SectionStatus,
    pub processing_time_ms: u64,
    /// Generation attempts made beyond the first (retry loop).
    pub refinement_iterations: u32,
    #[serde(default)]
    pub error: Option<String>,
}

// ---------------------------------------------------------------------------
// Processing batch
// ---------------------------------------------------------------------------

/// One ordered, size-bounded partition of the input descriptors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingBatch {
    /// Zero-based position in processing order.
    pub index: usize,
    pub status: BatchStatus,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub sections: Vec<ProcessedSection>,
}

impl ProcessingBatch {
    /// Mean quality score over this batch's completed sections, or 0.0
    /// when none completed.
    pub fn average_quality_score(&self) -> f64 {
        mean_completed_score(&self.sections)
    }
}

// ---------------------------------------------------------------------------
// Status tallies
// ---------------------------------------------------------------------------

/// Per-status counts over a set of finalized sections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub completed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl StatusCounts {
    pub fn total(&self) -> usize {
        self.completed + self.failed + self.skipped
    }
}

/// Tally terminal statuses. Non-terminal statuses are not expected here
/// and are ignored.
pub fn count_statuses(sections: &[ProcessedSection]) -> StatusCounts {
    let mut counts = StatusCounts::default();
    for section in sections {
        match section.status {
            SectionStatus::Completed => counts.completed += 1,
            SectionStatus::Failed => counts.failed += 1,
            SectionStatus::Skipped => counts.skipped += 1,
            SectionStatus::Pending | SectionStatus::Processing => {}
        }
    }
    counts
}

/// Mean quality score over completed sections, 0.0 when none completed.
pub fn mean_completed_score(sections: &[ProcessedSection]) -> f64 {
    let completed: Vec<f64> = sections
        .iter()
        .filter(|s| s.status == SectionStatus::Completed)
        .map(|s| s.quality_score)
        .collect();
    if completed.is_empty() {
        0.0
    } else {
        completed.iter().sum::<f64>() / completed.len() as f64
    }
}

// ---------------------------------------------------------------------------
// Processing result
// ---------------------------------------------------------------------------

/// Aggregate outcome of one pipeline invocation.
///
/// Always returned, never thrown: counts let the caller distinguish
/// full, partial, and empty success without catching errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingResult {
    pub total_sections: usize,
    pub processed_sections: usize,
    pub failed_sections: usize,
    pub skipped_sections: usize,
    /// Mean over completed sections' scores, 0.0 when none completed.
    pub overall_quality_score: f64,
    pub total_processing_time_ms: u64,
    pub batches: Vec<ProcessingBatch>,
    /// Present only when combination ran and produced eligible content.
    #[serde(default)]
    pub combined_module: Option<CombinedModule>,
}

impl ProcessingResult {
    /// Build the aggregate from finalized batches.
    pub fn from_batches(batches: Vec<ProcessingBatch>, total_processing_time_ms: u64) -> Self {
        let all_sections: Vec<&ProcessedSection> =
            batches.iter().flat_map(|b| b.sections.iter()).collect();
        let mut counts = StatusCounts::default();
        let mut completed_scores = Vec::new();
        for section in &all_sections {
            match section.status {
                SectionStatus::Completed => {
                    counts.completed += 1;
                    completed_scores.push(section.quality_score);
                }
                SectionStatus::Failed => counts.failed += 1,
                SectionStatus::Skipped => counts.skipped += 1,
                SectionStatus::Pending | SectionStatus::Processing => {}
            }
        }
        let overall = if completed_scores.is_empty() {
            0.0
        } else {
            completed_scores.iter().sum::<f64>() / completed_scores.len() as f64
        };
        Self {
            total_sections: all_sections.len(),
            processed_sections: counts.completed,
            failed_sections: counts.failed,
            skipped_sections: counts.skipped,
            overall_quality_score: overall,
            total_processing_time_ms,
            batches,
            combined_module: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
