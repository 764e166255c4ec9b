//! Sequential batch scheduling over section descriptors.
//!
//! Batches are contiguous chunks of the input, processed strictly in
//! order, one section at a time. Generation calls are expensive and
//! rate-limited upstream, so there is deliberately no parallelism inside
//! an invocation; callers may run independent invocations concurrently.

use std::sync::Arc;

use chrono::Utc;
use modcraft_core::error::CoreError;
use modcraft_core::options::ProcessingOptions;
use modcraft_core::processing::{count_statuses, ProcessingBatch, ProcessingResult};
use modcraft_core::section::{self, SectionDescriptor};
use modcraft_core::status::{batch_status_from_sections, SectionStatus};
use modcraft_genai::adapter::{ContentGenerator, GenerationContext};
use modcraft_genai::scoring::QualityScorer;

use crate::combine::{combine, CombineError};
use crate::processor::SectionProcessor;

/// Drives full pipeline invocations against injected collaborators.
pub struct BatchScheduler {
    generator: Arc<dyn ContentGenerator>,
    scorer: Arc<dyn QualityScorer>,
}

impl BatchScheduler {
    pub fn new(generator: Arc<dyn ContentGenerator>, scorer: Arc<dyn QualityScorer>) -> Self {
        Self { generator, scorer }
    }

    /// Process all descriptors and return the aggregate result.
    ///
    /// Errors only on invalid input (bad options, duplicate ids); once
    /// processing starts, section-level failures are converted into
    /// `Failed` sections and the run always completes. When
    /// `combine_results` is set and no section completed, the result
    /// carries `combined_module: None` rather than an error.
    pub async fn process(
        &self,
        descriptors: &[SectionDescriptor],
        options: &ProcessingOptions,
    ) -> Result<ProcessingResult, CoreError> {
        options.validate()?;
        section::validate_descriptors(descriptors)?;

        let batch_count = descriptors.len().div_ceil(options.batch_size);
        tracing::info!(
            total_sections = descriptors.len(),
            batch_count,
            batch_size = options.batch_size,
            quality_threshold = options.quality_threshold,
            "Starting section processing",
        );

        let processor = SectionProcessor::new(self.generator.as_ref(), self.scorer.as_ref());
        let mut context = GenerationContext::default();
        let mut batches = Vec::with_capacity(batch_count);
        let mut total_time_ms = 0u64;

        for (index, chunk) in descriptors.chunks(options.batch_size).enumerate() {
            let started_at = Utc::now();
            let mut sections = Vec::with_capacity(chunk.len());

            for descriptor in chunk {
                let processed = processor
                    .process_section(descriptor, options, &context)
                    .await;
                total_time_ms += processed.processing_time_ms;
                if processed.status == SectionStatus::Completed {
                    // Later sections see the most recent accepted markup.
                    context.prior_html = Some(processed.module_data.html.clone());
                }
                sections.push(processed);
            }

            let statuses: Vec<SectionStatus> = sections.iter().map(|s| s.status).collect();
            let batch = ProcessingBatch {
                index,
                status: batch_status_from_sections(&statuses),
                started_at: Some(started_at),
                finished_at: Some(Utc::now()),
                sections,
            };

            let counts = count_statuses(&batch.sections);
            tracing::info!(
                batch = index + 1,
                batch_count,
                completed = counts.completed,
                failed = counts.failed,
                skipped = counts.skipped,
                average_quality = batch.average_quality_score(),
                status = batch.status.label(),
                "Batch finished",
            );
            batches.push(batch);
        }

        let mut result = ProcessingResult::from_batches(batches, total_time_ms);

        if options.combine_results {
            match combine(&result.batches) {
                Ok(module) => {
                    tracing::info!(
                        section_count = module.section_count,
                        field_count = module.fields.len(),
                        "Combined module built",
                    );
                    result.combined_module = Some(module);
                }
                Err(CombineError::NoEligibleContent) => {
                    tracing::warn!("No completed sections, skipping combination");
                }
            }
        }

        tracing::info!(
            total = result.total_sections,
            completed = result.processed_sections,
            failed = result.failed_sections,
            skipped = result.skipped_sections,
            overall_quality = result.overall_quality_score,
            total_time_ms = result.total_processing_time_ms,
            "Section processing finished",
        );
        Ok(result)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
