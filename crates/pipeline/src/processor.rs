//! Per-section processing: generation, scoring, and status assignment.
//!
//! State machine per section: pending -> processing -> one of
//! completed / failed / skipped (terminal). The generation call is the
//! single suspension point and is bounded by the per-section timeout;
//! a timeout is treated exactly like a transport failure.

use std::time::Instant;

use modcraft_core::module::ModuleData;
use modcraft_core::options::ProcessingOptions;
use modcraft_core::processing::ProcessedSection;
use modcraft_core::quality::{clamp_score, gate_section};
use modcraft_core::section::SectionDescriptor;
use modcraft_core::status::SectionStatus;
use modcraft_genai::adapter::{ContentGenerator, GenerationContext, GenerationError};
use modcraft_genai::content::parse_content;
use modcraft_genai::fallback::fallback_module;
use modcraft_genai::scoring::QualityScorer;

/// Processes one section at a time against injected collaborators.
pub struct SectionProcessor<'a> {
    generator: &'a dyn ContentGenerator,
    scorer: &'a dyn QualityScorer,
}

impl<'a> SectionProcessor<'a> {
    pub fn new(generator: &'a dyn ContentGenerator, scorer: &'a dyn QualityScorer) -> Self {
        Self { generator, scorer }
    }

    /// Drive `descriptor` to a terminal status.
    ///
    /// Never returns an error: hard generation failures (after the retry
    /// budget) produce a `Failed` section with an empty module and score
    /// 0; malformed payloads continue with a fallback module.
    pub async fn process_section(
        &self,
        descriptor: &SectionDescriptor,
        options: &ProcessingOptions,
        context: &GenerationContext,
    ) -> ProcessedSection {
        let started = Instant::now();
        tracing::info!(
            section_id = %descriptor.id,
            kind = descriptor.kind.label(),
            "Processing section",
        );

        let (payload, attempts) = self.generate_with_retries(descriptor, options, context).await;

        let section = match payload {
            Err(e) => {
                tracing::error!(
                    section_id = %descriptor.id,
                    error = %e,
                    attempts,
                    "Section generation failed",
                );
                ProcessedSection {
                    descriptor: descriptor.clone(),
                    module_data: ModuleData::empty(),
                    quality_score: 0.0,
                    status: SectionStatus::Failed,
                    processing_time_ms: started.elapsed().as_millis() as u64,
                    refinement_iterations: attempts.saturating_sub(1),
                    error: Some(e.to_string()),
                }
            }
            Ok(raw) => {
                let (module_data, service_score) = match parse_content(&raw) {
                    Ok(content) => {
                        let score = content.quality_score;
                        (content.into_module_data(), score)
                    }
                    Err(parse_err) => {
                        tracing::warn!(
                            section_id = %descriptor.id,
                            error = %parse_err,
                            "Malformed generation payload, building fallback module",
                        );
                        (fallback_module(descriptor), None)
                    }
                };

                let score = clamp_score(
                    service_score.unwrap_or_else(|| self.scorer.score(descriptor, &module_data)),
                );
                let status = gate_section(
                    score,
                    options.quality_threshold,
                    options.skip_failed_sections,
                );

                ProcessedSection {
                    descriptor: descriptor.clone(),
                    module_data,
                    quality_score: score,
                    status,
                    processing_time_ms: started.elapsed().as_millis() as u64,
                    refinement_iterations: attempts.saturating_sub(1),
                    error: None,
                }
            }
        };

        tracing::info!(
            section_id = %section.descriptor.id,
            status = section.status.label(),
            quality_score = section.quality_score,
            elapsed_ms = section.processing_time_ms,
            "Section finished",
        );
        section
    }

    /// Call the generator with the per-attempt timeout, retrying hard
    /// failures up to `max_retries` extra attempts. Returns the payload
    /// or the last error, plus the number of attempts made.
    async fn generate_with_retries(
        &self,
        descriptor: &SectionDescriptor,
        options: &ProcessingOptions,
        context: &GenerationContext,
    ) -> (Result<serde_json::Value, GenerationError>, u32) {
        let mut attempts = 0u32;
        loop {
            attempts += 1;
            let outcome = match tokio::time::timeout(
                options.timeout_per_section(),
                self.generator.generate(descriptor, context),
            )
            .await
            {
                Ok(result) => result,
                Err(_) => Err(GenerationError::Timeout(options.timeout_per_section_secs)),
            };

            match outcome {
                Ok(payload) => return (Ok(payload), attempts),
                Err(e) if attempts <= options.max_retries => {
                    tracing::warn!(
                        section_id = %descriptor.id,
                        error = %e,
                        attempt = attempts,
                        max_retries = options.max_retries,
                        "Generation attempt failed, retrying",
                    );
                }
                Err(e) => return (Err(e), attempts),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use modcraft_core::section::SectionKind;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct FixedScorer(f64);

    impl QualityScorer for FixedScorer {
        fn score(&self, _: &SectionDescriptor, _: &ModuleData) -> f64 {
            self.0
        }
    }

    /// Generator scripted to fail a number of times before succeeding.
    struct FlakyGenerator {
        failures_before_success: u32,
        calls: AtomicU32,
    }

    #[async_trait]
    impl ContentGenerator for FlakyGenerator {
        async fn generate(
            &self,
            _: &SectionDescriptor,
            _: &GenerationContext,
        ) -> Result<serde_json::Value, GenerationError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures_before_success {
                Err(GenerationError::Transport("connection reset".to_string()))
            } else {
                Ok(serde_json::json!({
                    "html": "<div>ok</div>",
                    "fields": [{"id": "headline"}],
                }))
            }
        }
    }

    struct MalformedGenerator;

    #[async_trait]
    impl ContentGenerator for MalformedGenerator {
        async fn generate(
            &self,
            _: &SectionDescriptor,
            _: &GenerationContext,
        ) -> Result<serde_json::Value, GenerationError> {
            Ok(serde_json::json!({"unexpected": true}))
        }
    }

    fn descriptor() -> SectionDescriptor {
        SectionDescriptor {
            id: "hero_1".to_string(),
            kind: SectionKind::Hero,
            complexity: 2,
            priority: 0,
            estimated_field_count: 1,
            title: None,
            description: None,
            markup_seed: None,
        }
    }

    #[tokio::test]
    async fn success_above_threshold_completes() {
        let generator = FlakyGenerator {
            failures_before_success: 0,
            calls: AtomicU32::new(0),
        };
        let scorer = FixedScorer(90.0);
        let processor = SectionProcessor::new(&generator, &scorer);
        let section = processor
            .process_section(
                &descriptor(),
                &ProcessingOptions::default(),
                &GenerationContext::default(),
            )
            .await;
        assert_eq!(section.status, SectionStatus::Completed);
        assert!((section.quality_score - 90.0).abs() < f64::EPSILON);
        assert_eq!(section.refinement_iterations, 0);
        assert!(section.error.is_none());
    }

    #[tokio::test]
    async fn hard_failure_after_retries_fails_section() {
        let generator = FlakyGenerator {
            failures_before_success: u32::MAX,
            calls: AtomicU32::new(0),
        };
        let scorer = FixedScorer(90.0);
        let processor = SectionProcessor::new(&generator, &scorer);
        let options = ProcessingOptions {
            max_retries: 2,
            ..Default::default()
        };
        let section = processor
            .process_section(&descriptor(), &options, &GenerationContext::default())
            .await;
        assert_eq!(section.status, SectionStatus::Failed);
        assert!((section.quality_score - 0.0).abs() < f64::EPSILON);
        assert!(section.module_data.is_empty());
        assert!(section.error.is_some());
        // 1 initial + 2 retries
        assert_eq!(generator.calls.load(Ordering::SeqCst), 3);
        assert_eq!(section.refinement_iterations, 2);
    }

    #[tokio::test]
    async fn transient_failure_recovers_within_budget() {
        let generator = FlakyGenerator {
            failures_before_success: 1,
            calls: AtomicU32::new(0),
        };
        let scorer = FixedScorer(90.0);
        let processor = SectionProcessor::new(&generator, &scorer);
        let section = processor
            .process_section(
                &descriptor(),
                &ProcessingOptions::default(),
                &GenerationContext::default(),
            )
            .await;
        assert_eq!(section.status, SectionStatus::Completed);
        assert_eq!(section.refinement_iterations, 1);
    }

    #[tokio::test]
    async fn malformed_payload_takes_fallback_path() {
        let generator = MalformedGenerator;
        let scorer = FixedScorer(80.0);
        let processor = SectionProcessor::new(&generator, &scorer);
        let section = processor
            .process_section(
                &descriptor(),
                &ProcessingOptions::default(),
                &GenerationContext::default(),
            )
            .await;
        // Fallback content is scored, not failed.
        assert_eq!(section.status, SectionStatus::Completed);
        assert!(!section.module_data.fields.is_empty());
        assert!(section.error.is_none());
    }

    #[tokio::test]
    async fn below_threshold_skips_when_policy_on() {
        let generator = FlakyGenerator {
            failures_before_success: 0,
            calls: AtomicU32::new(0),
        };
        let scorer = FixedScorer(90.0);
        let processor = SectionProcessor::new(&generator, &scorer);
        let options = ProcessingOptions {
            quality_threshold: 95.0,
            skip_failed_sections: true,
            ..Default::default()
        };
        let section = processor
            .process_section(&descriptor(), &options, &GenerationContext::default())
            .await;
        assert_eq!(section.status, SectionStatus::Skipped);
    }

    #[tokio::test]
    async fn below_threshold_fails_when_policy_off() {
        let generator = FlakyGenerator {
            failures_before_success: 0,
            calls: AtomicU32::new(0),
        };
        let scorer = FixedScorer(90.0);
        let processor = SectionProcessor::new(&generator, &scorer);
        let options = ProcessingOptions {
            quality_threshold: 95.0,
            skip_failed_sections: false,
            ..Default::default()
        };
        let section = processor
            .process_section(&descriptor(), &options, &GenerationContext::default())
            .await;
        assert_eq!(section.status, SectionStatus::Failed);
    }
}
