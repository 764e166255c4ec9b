//! Caller-supplied options for processing and packaging.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::quality::{self, DEFAULT_QUALITY_THRESHOLD};

// ---------------------------------------------------------------------------
// Processing defaults
// ---------------------------------------------------------------------------

/// Default number of sections per batch when the splitting step supplies
/// no recommendation.
pub const DEFAULT_BATCH_SIZE: usize = 5;
/// Default retry budget for hard generation failures.
pub const DEFAULT_MAX_RETRIES: u32 = 2;
/// Default per-section generation timeout, seconds.
pub const DEFAULT_TIMEOUT_PER_SECTION_SECS: u64 = 120;

// ---------------------------------------------------------------------------
// Processing options
// ---------------------------------------------------------------------------

/// Options governing one pipeline invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingOptions {
    /// Sections per batch. Must be >= 1.
    pub batch_size: usize,
    /// Retry budget for hard generation failures (timeouts, transport
    /// errors). Quality rejections are never retried.
    pub max_retries: u32,
    /// Below-threshold sections become `Skipped` instead of `Failed`.
    pub skip_failed_sections: bool,
    /// Run the combination stage after all batches complete.
    pub combine_results: bool,
    /// Acceptance threshold in `[0, 100]`.
    pub quality_threshold: f64,
    /// Per-attempt generation timeout, seconds.
    pub timeout_per_section_secs: u64,
}

impl Default for ProcessingOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            max_retries: DEFAULT_MAX_RETRIES,
            skip_failed_sections: true,
            combine_results: true,
            quality_threshold: DEFAULT_QUALITY_THRESHOLD,
            timeout_per_section_secs: DEFAULT_TIMEOUT_PER_SECTION_SECS,
        }
    }
}

impl ProcessingOptions {
    /// The per-attempt timeout as a [`Duration`].
    pub fn timeout_per_section(&self) -> Duration {
        Duration::from_secs(self.timeout_per_section_secs)
    }

    /// Validate option values.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.batch_size < 1 {
            return Err(CoreError::Validation(
                "batch_size must be at least 1".to_string(),
            ));
        }
        if self.timeout_per_section_secs < 1 {
            return Err(CoreError::Validation(
                "timeout_per_section_secs must be at least 1".to_string(),
            ));
        }
        quality::validate_threshold(self.quality_threshold)
    }
}

// ---------------------------------------------------------------------------
// Package options
// ---------------------------------------------------------------------------

/// Output archive container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchiveFormat {
    Zip,
    Tar,
}

impl ArchiveFormat {
    /// File extension for the archive, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Zip => "zip",
            Self::Tar => "tar",
        }
    }
}

/// Archive compression effort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionLevel {
    None,
    Fast,
    Best,
}

/// Options governing one packaging call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageOptions {
    pub format: ArchiveFormat,
    pub compression: CompressionLevel,
    /// Synthesize a README from the meta/fields payloads.
    pub include_documentation: bool,
    /// Minify markup, styles, and scripts before archiving.
    pub minify_assets: bool,
}

impl Default for PackageOptions {
    fn default() -> Self {
        Self {
            format: ArchiveFormat::Zip,
            compression: CompressionLevel::Best,
            include_documentation: true,
            minify_assets: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
