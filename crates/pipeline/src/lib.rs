//! Batch section-processing pipeline.
//!
//! Drives descriptors through generation in strictly sequential batches,
//! applies the quality gate per section, and combines accepted sections
//! into one composite module. Generation failures degrade gracefully:
//! they become `failed` sections, never errors out of the scheduler.

pub mod combine;
pub mod processor;
pub mod scheduler;

pub use combine::{combine, CombineError};
pub use processor::SectionProcessor;
pub use scheduler::BatchScheduler;
